//! anonboard/crates/ab-core/src/lib.rs
//!
//! The central domain logic and interface definitions for anonboard.

pub mod models;
pub mod projection;
pub mod service;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use projection::*;
pub use service::*;
pub use traits::*;
pub use error::*;
