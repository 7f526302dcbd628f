pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod market;

pub use error::{AdvisorError, Result};
