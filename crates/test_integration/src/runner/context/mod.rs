pub mod context_utils;
pub mod fake_services;
pub mod test_context;
