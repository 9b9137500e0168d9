//! Declarative mirror configuration documents written for SwiftPM

pub mod writer;

pub use writer::{MirrorConfigEntry, MirrorsConfig, MIRRORS_CONFIG_VERSION};
