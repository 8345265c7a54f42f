pub mod auth;
pub mod image_scores;
pub mod upload;
