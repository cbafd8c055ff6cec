pub mod banners;
pub mod error;
pub mod policy;
pub mod search;
pub mod sweeper;
