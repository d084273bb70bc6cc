//! Common types, errors, and configuration for tilekit
//!
//! This crate holds the vocabulary shared by the layout, capacity and format
//! crates: the [`TileError`] type every operation reports through, the small
//! enums describing dest register modes, and the layered [`TileKitConfig`].

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, TileKitConfig};
pub use error::{Result, TileError};
pub use types::{ChipArchitecture, DatumWidth, DestAccumulation, DestSync};
