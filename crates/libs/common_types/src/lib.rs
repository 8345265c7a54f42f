#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
pub mod app_user;
pub mod dev_constants;
pub mod photo;
pub mod vision;
