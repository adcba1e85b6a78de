pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod news;
pub mod provider;

pub use config::Config;
pub use error::{Error, Result};
