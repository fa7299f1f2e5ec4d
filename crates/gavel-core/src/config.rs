use crate::plan::Division;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable carrying the portal account name
pub const USERNAME_ENV: &str = "GAVEL_PORTAL_USERNAME";
/// Environment variable carrying the portal account password
pub const PASSWORD_ENV: &str = "GAVEL_PORTAL_PASSWORD";

/// Portal account credentials, passed explicitly into the run.
///
/// Credentials are never read from a config file on disk; they come from
/// flags or the environment.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Validate that both values are present, or explain how to supply them
    pub fn resolve(username: Option<String>, password: Option<String>) -> Result<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self { username, password })
            }
            _ => Err(Error::MissingCredentials(format!(
                "Portal credentials are not set. Pass --username and --password, \
                 or export {USERNAME_ENV} and {PASSWORD_ENV}."
            ))),
        }
    }
}

// Keep the password out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Optional JSON config file supplying the search inputs.
///
/// Every field can also be given as a CLI flag; flags win.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfigFile {
    pub portal_url: Option<String>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl RunConfigFile {
    /// Load and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}
