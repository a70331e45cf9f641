//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `colors`: entity-class color palette assignment
//! - `text`: character-offset slicing helpers

mod colors;
mod text;

pub use colors::{next_color, unused_colors, COLOR_PALETTE, DEFAULT_COLOR};
pub use text::{char_len, slice_chars};
