pub mod accounting;
pub mod cache;
pub mod config;
pub mod data;
