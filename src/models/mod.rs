pub mod auth;
pub mod banner;
