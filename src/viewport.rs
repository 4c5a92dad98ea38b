/// Vertical scroll position of the text area.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top_line: usize,
}

impl Viewport {
    /// Chooses `top_line` for a text area of `num_rows` rows so that cursor line `cy` is visible
    /// in a document of `num_lines` lines. Cursor is kept at the middle of the screen except
    /// near the head or the end of the document, where the screen is pinned to the edge.
    pub fn scroll(&mut self, cy: usize, num_lines: usize, num_rows: usize) {
        if num_rows == 0 {
            self.top_line = cy;
            return;
        }

        let half = num_rows / 2;
        self.top_line = if num_lines <= num_rows || cy <= half {
            0 // Whole document fits or cursor is near the head
        } else if cy + half >= num_lines {
            num_lines - num_rows // Last line stays at the bottom of screen
        } else {
            cy - half
        };
    }

    pub fn contains(&self, cy: usize, num_rows: usize) -> bool {
        self.top_line <= cy && cy < self.top_line + num_rows
    }
}
