mod chrome;
mod error;
mod session;

pub use chrome::{ChromeFinder, ChromeLauncher, ProfileManager};
pub use error::{Error, Result};
pub use session::PortalSession;
