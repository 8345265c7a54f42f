#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

#[cfg(test)]
pub mod runner;
#[cfg(test)]
pub mod test_helpers;
