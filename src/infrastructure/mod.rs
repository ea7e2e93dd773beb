//! Infrastructure layer - Loading configuration and game data
//!
//! The interception engine performs no I/O itself; these adapters load its
//! static inputs once at startup.

pub mod repositories;

pub use repositories::*;
