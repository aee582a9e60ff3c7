pub mod attributes;
#[cfg(feature = "templating")]
pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod rendering;
pub mod services;
