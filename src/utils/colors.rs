//! Entity-class color palette.
//!
//! Fifty distinct Material swatches, grouped by hue, assigned to entity
//! classes in palette order so neighboring classes stay visually distinct.

/// Fallback color for annotations whose entity class no longer exists.
pub const DEFAULT_COLOR: &str = "#ffeb3b";

/// Standard color palette with 50 distinct colors optimized for readability.
pub const COLOR_PALETTE: [&str; 50] = [
    // Reds
    "#ffcdd2", "#ef9a9a", "#e57373", "#ef5350", "#f44336",
    // Pinks
    "#f8bbd0", "#f48fb1", "#f06292", "#ec407a", "#e91e63",
    // Purples
    "#e1bee7", "#ce93d8", "#ba68c8", "#ab47bc", "#9c27b0",
    // Deep purples
    "#d1c4e9", "#b39ddb", "#9575cd", "#7e57c2", "#673ab7",
    // Blues
    "#bbdefb", "#90caf9", "#64b5f6", "#42a5f5", "#2196f3",
    // Light blues
    "#b3e5fc", "#81d4fa", "#4fc3f7", "#29b6f6", "#03a9f4",
    // Cyans
    "#b2ebf2", "#80deea", "#4dd0e1", "#26c6da", "#00bcd4",
    // Teals
    "#b2dfdb", "#80cbc4", "#4db6ac", "#26a69a", "#009688",
    // Greens
    "#c8e6c9", "#a5d6a7", "#81c784", "#66bb6a", "#4caf50",
    // Light greens
    "#dcedc8", "#c5e1a5", "#aed581", "#9ccc65", "#8bc34a",
];

/// Palette colors not present in `used`.
pub fn unused_colors(used: &[&str]) -> Vec<&'static str> {
    COLOR_PALETTE
        .iter()
        .copied()
        .filter(|color| !used.contains(color))
        .collect()
}

/// Next available palette color, wrapping to the first swatch when all
/// fifty are taken.
pub fn next_color(used: &[&str]) -> &'static str {
    COLOR_PALETTE
        .iter()
        .copied()
        .find(|color| !used.contains(color))
        .unwrap_or(COLOR_PALETTE[0])
}
