pub mod article;
pub mod community;
pub mod post;
pub mod token;
pub mod user;
