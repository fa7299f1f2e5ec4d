use crate::selectors;
use crate::{Error, Result};
use gavel_browser::PortalSession;
use gavel_core::config::Credentials;
use url::Url;

/// Log into the portal and open the hearing-search page.
///
/// Lands on the login form, submits the credentials, then clicks through
/// the hearings portlet on the account landing page.
pub async fn login(
    session: &PortalSession,
    portal_url: &str,
    credentials: &Credentials,
) -> Result<()> {
    let url = Url::parse(portal_url)
        .map_err(|e| Error::Login(format!("invalid portal URL '{}': {}", portal_url, e)))?;
    tracing::info!("Logging into {}", url.host_str().unwrap_or(portal_url));

    session.goto(portal_url).await?;

    session
        .type_into(selectors::USERNAME_INPUT, &credentials.username)
        .await?;
    session
        .type_into(selectors::PASSWORD_INPUT, &credentials.password)
        .await?;
    session.click(selectors::LOGIN_BUTTON).await?;

    // The portlet only renders once the login sticks, so a timeout here
    // almost always means rejected credentials.
    match session.wait_for(selectors::HEARINGS_PORTLET).await {
        Ok(_) => {}
        Err(gavel_browser::Error::WaitTimeout { .. }) => {
            return Err(Error::Login(
                "hearing search page never appeared after submitting credentials; \
                 check the account name and password"
                    .to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    session.click(selectors::HEARINGS_PORTLET).await?;
    tracing::info!("Login complete, hearing search open");

    Ok(())
}
