//! Centralized theme for the dashboard.
//!
//! - `palette` - Raw color constants and category colors
//! - `styles` - Semantic style builder functions

pub mod palette;
pub mod styles;
