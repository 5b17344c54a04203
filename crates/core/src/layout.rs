//! Grid placement and text flow for the badge board
//!
//! All measurements are in logical pixels. Badges are square cells laid out
//! left to right with no gutter; the detail panel sits below the last row.

/// Edge length of one badge cell at size multiple 1
pub const BADGE_SIZE: f32 = 64.0;
/// Gap between the grid and the detail panel content
pub const SPACER: f32 = 64.0;
/// Height reserved below the grid for the detail panel
pub const DETAIL_PANEL_HEIGHT: f32 = SPACER + 200.0;
/// Left inset of the detail panel content
pub const DETAIL_INSET: f32 = 10.0;
/// Gap between the detail badge and the title/description
pub const TEXT_GAP: f32 = 20.0;
/// Vertical distance between wrapped lines
pub const LINE_SPACING: f32 = 24.0;
/// Size of the monospace detail text
pub const DETAIL_FONT_SIZE: f32 = 18.0;
/// Advance of one monospace character at [`DETAIL_FONT_SIZE`]
pub const GLYPH_WIDTH: f32 = DETAIL_FONT_SIZE * 0.6;
/// Scale of the trophy glyph relative to its base size
pub const TROPHY_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Edge length of a badge cell for `display.achievementSizeMultiple`
pub fn cell_size(size_multiple: usize) -> f32 {
    BADGE_SIZE * size_multiple.max(1) as f32
}

pub fn cell_for_index(index: usize, per_row: usize) -> GridCell {
    let per_row = per_row.max(1);
    GridCell {
        row: index / per_row,
        column: index % per_row,
    }
}

/// Top-left corner of the badge at `index`
pub fn cell_origin(index: usize, per_row: usize, cell_size: f32) -> Point {
    let cell = cell_for_index(index, per_row);
    Point {
        x: cell.column as f32 * cell_size,
        y: cell.row as f32 * cell_size,
    }
}

pub fn row_count(count: usize, per_row: usize) -> usize {
    count.div_ceil(per_row.max(1))
}

/// Inner window size for `count` badges at `per_row` per row
pub fn window_size(count: usize, per_row: usize, cell_size: f32) -> (f32, f32) {
    let per_row = per_row.max(1);
    let width = per_row as f32 * cell_size;
    let height = row_count(count, per_row) as f32 * cell_size + DETAIL_PANEL_HEIGHT;
    (width, height)
}

/// Where the detail panel's badge is drawn
pub fn detail_origin(count: usize, per_row: usize, cell_size: f32) -> Point {
    Point {
        x: DETAIL_INSET,
        y: row_count(count, per_row) as f32 * cell_size + SPACER,
    }
}

/// Horizontal offset of the title/description from the panel inset
pub fn text_offset(cell_size: f32) -> f32 {
    cell_size + TEXT_GAP
}

/// Column budget for detail text at the given grid density
pub fn wrap_width(per_row: usize, cell_size: f32) -> usize {
    let available = per_row.max(1) as f32 * cell_size - text_offset(cell_size) - DETAIL_INSET;
    ((available / GLYPH_WIDTH).floor() as usize).max(1)
}

/// Greedy word wrap on whitespace, measured in characters.
///
/// Explicit newlines are kept, every produced line is trimmed, and a word
/// longer than `width` is put on a line of its own rather than split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }
        lines.push(current.trim().to_string());
    }

    lines
}

/// Vertical position of each wrapped line starting at `y`
pub fn line_offsets(y: f32, lines: usize) -> impl Iterator<Item = f32> {
    (0..lines).map(move |i| y + i as f32 * LINE_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_for_index() {
        assert_eq!(cell_for_index(17, 8), GridCell { row: 2, column: 1 });
        assert_eq!(cell_for_index(0, 8), GridCell { row: 0, column: 0 });
        assert_eq!(cell_for_index(7, 8), GridCell { row: 0, column: 7 });
        assert_eq!(cell_for_index(8, 8), GridCell { row: 1, column: 0 });
        // zero per-row is treated as one column
        assert_eq!(cell_for_index(3, 0), GridCell { row: 3, column: 0 });
    }

    #[test]
    fn test_cell_origin_has_no_gutter() {
        let origin = cell_origin(17, 8, BADGE_SIZE);
        assert_eq!(origin, Point { x: 64.0, y: 128.0 });
    }

    #[test]
    fn test_size_multiple_scales_cells() {
        assert_eq!(cell_size(1), 64.0);
        assert_eq!(cell_size(2), 128.0);
        assert_eq!(cell_size(0), 64.0);

        let cell = cell_size(2);
        assert_eq!(cell_origin(17, 8, cell), Point { x: 128.0, y: 256.0 });
        assert_eq!(window_size(20, 8, cell), (1024.0, 3.0 * 128.0 + 264.0));
        assert_eq!(detail_origin(20, 8, cell), Point { x: 10.0, y: 3.0 * 128.0 + 64.0 });
        assert_eq!(text_offset(cell), 148.0);
    }

    #[test]
    fn test_window_size() {
        assert_eq!(row_count(20, 8), 3);
        assert_eq!(row_count(16, 8), 2);
        assert_eq!(row_count(0, 8), 0);
        assert_eq!(window_size(20, 8, BADGE_SIZE), (512.0, 3.0 * 64.0 + 264.0));
        assert_eq!(window_size(0, 4, BADGE_SIZE), (256.0, 264.0));
    }

    #[test]
    fn test_detail_origin_below_grid() {
        assert_eq!(detail_origin(20, 8, BADGE_SIZE), Point { x: 10.0, y: 256.0 });
    }

    #[test]
    fn test_wrap_width_scales_with_columns() {
        assert_eq!(wrap_width(8, BADGE_SIZE), 38);
        assert!(wrap_width(12, BADGE_SIZE) > wrap_width(8, BADGE_SIZE));
        assert_eq!(wrap_width(1, BADGE_SIZE), 1);
        assert_eq!(wrap_width(8, cell_size(2)), 80);
    }

    #[test]
    fn test_wrapped_lines_fit_beside_the_badge() {
        for multiple in 1..=3 {
            let cell = cell_size(multiple);
            for per_row in 2..=16 {
                let columns = wrap_width(per_row, cell) as f32;
                let right_edge = DETAIL_INSET + text_offset(cell) + columns * GLYPH_WIDTH;
                assert!(right_edge <= per_row as f32 * cell + 0.01, "overflow at {} x{}", per_row, multiple);
            }
        }
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "Defeat the final boss without taking any damage on the hardest difficulty setting";
        let lines = wrap_text(text, 20);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 20, "line too long: {:?}", line);
            assert_eq!(line, line.trim());
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_text_long_word_on_own_line() {
        let lines = wrap_text("go Supercalifragilisticexpialidocious now", 10);
        assert_eq!(lines, vec!["go", "Supercalifragilisticexpialidocious", "now"]);
        for line in &lines {
            let words = line.split_whitespace().count();
            assert!(line.chars().count() <= 10 || words == 1);
        }
    }

    #[test]
    fn test_wrap_text_trims_and_keeps_newlines() {
        let lines = wrap_text("  first line  \n   second   ", 38);
        assert_eq!(lines, vec!["first line", "second"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_line_offsets() {
        let offsets: Vec<f32> = line_offsets(100.0, 3).collect();
        assert_eq!(offsets, vec![100.0, 124.0, 148.0]);
    }
}
