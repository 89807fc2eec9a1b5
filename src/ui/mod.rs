// src/ui/mod.rs
//! Watchface UI
//!
//! - Core drawable trait and display size
//! - The heart-rate history chart component
//! - Colours and the accent-aware theme

pub mod components;
pub mod core;
pub mod styling;

pub use components::GraphWidget;
pub use core::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, Drawable};
pub use styling::Theme;
