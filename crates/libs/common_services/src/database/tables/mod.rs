pub mod app_user;
pub mod image_score;
