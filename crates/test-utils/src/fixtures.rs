//! Common test fixtures for station-heatmap tests.
//!
//! This module provides pre-defined palette tables and input files that
//! represent common scenarios in station data processing.

use std::io::Write;

use tempfile::NamedTempFile;

/// Palette table in the colorbrewer JSON layout.
///
/// - `Greys`: black to white in 2 and 3 colors (hex without `#`)
/// - `RdYlBu`: 3, 5 and 8 colors (hex with `#`), plus a `type` key
/// - `Mono`: 4 colors in `rgb()` notation
pub const PALETTE_JSON: &str = r##"{
    "Greys": {
        "2": ["000000", "ffffff"],
        "3": ["000000", "808080", "ffffff"],
        "type": "seq"
    },
    "RdYlBu": {
        "3": ["#fc8d59", "#ffffbf", "#91bfdb"],
        "5": ["#d7191c", "#fdae61", "#ffffbf", "#abd9e9", "#2c7bb6"],
        "8": ["#d73027", "#f46d43", "#fdae61", "#fee090", "#e0f3f8", "#abd9e9", "#74add1", "#4575b4"],
        "type": "div"
    },
    "Mono": {
        "4": ["rgb(0,0,0)", "rgb(10,10,10)", "rgb(20,20,20)", "rgb(30,30,30)"]
    }
}"##;

/// A palette table with a malformed color.
pub const BROKEN_PALETTE_JSON: &str = r##"{
    "Bad": { "3": ["#000000", "#zzzzzz", "#ffffff"] }
}"##;

/// Writes `contents` to a named temporary file with the given suffix.
///
/// The file is removed when the returned handle is dropped.
pub fn temp_file_with(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Convenience: the palette fixture written to a `.json` temp file.
pub fn palette_file() -> NamedTempFile {
    temp_file_with(PALETTE_JSON, ".json")
}
