pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod io;
pub mod manifest;
pub mod mirror;

pub use error::{MirrorError, Result};
