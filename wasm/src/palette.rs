//! Tile background colours used by the page.

/// Background of an empty cell and of any value without its own colour.
pub const EMPTY_COLOR: &str = "#cdc1b4";

/// CSS colour for a tile value.
pub fn tile_color(value: u32) -> &'static str {
    match value {
        2 => "#eee4da",
        4 => "#ede0c8",
        8 => "#f2b179",
        16 => "#f59563",
        32 | 64 => "#f67c5f",
        128 => "#f9f5d9",
        256 => "#e8e4d0",
        512 => "#e9c97c",
        1024 | 2048 => "#edc53f",
        _ => EMPTY_COLOR,
    }
}

/// Text shown inside a cell; empty cells stay blank.
pub fn tile_label(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tiles_have_colors() {
        assert_eq!(tile_color(2), "#eee4da");
        assert_eq!(tile_color(64), tile_color(32));
        assert_eq!(tile_color(2048), "#edc53f");
    }

    #[test]
    fn test_unknown_tiles_fall_back() {
        assert_eq!(tile_color(0), EMPTY_COLOR);
        assert_eq!(tile_color(4096), EMPTY_COLOR);
    }

    #[test]
    fn test_labels() {
        assert_eq!(tile_label(0), "");
        assert_eq!(tile_label(128), "128");
    }
}
