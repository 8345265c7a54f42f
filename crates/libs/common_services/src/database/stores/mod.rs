pub mod image_score_store;
pub mod user_store;
