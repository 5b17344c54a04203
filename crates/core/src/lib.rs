//! Core logic for badgewatch
//!
//! This crate contains:
//! - Achievement models and the adapters from the RetroAchievements response shapes
//! - The refresh schedule and refresh sequence
//! - The selection/mode state machine
//! - Grid layout and text wrapping
//! - Error types

pub mod error;
pub mod layout;
pub mod models;
pub mod refresh;
pub mod selection;

pub use error::*;
pub use layout::*;
pub use models::*;
pub use refresh::*;
pub use selection::*;
