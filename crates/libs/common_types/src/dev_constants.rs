//! Credentials used by local development and the integration suite.

pub const EMAIL: &str = "admin@facescore.local";
pub const PASSWORD: &str = "correct-horse-battery";
pub const USERNAME: &str = "Admin";

pub const SECOND_EMAIL: &str = "viewer@facescore.local";
pub const SECOND_USERNAME: &str = "Viewer";
