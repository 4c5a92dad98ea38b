use crate::row::Row;

// Whole document and cursor saved just before a change
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rows: Vec<Row>,
    pub cursor: (usize, usize), // (row, col)
}

// Single-level undo. Each change overwrites the previous snapshot and undo consumes it, so
// there is neither redo nor deeper history
#[derive(Default)]
pub struct History {
    saved: Option<Snapshot>,
}

impl History {
    pub fn save(&mut self, rows: &[Row], cursor: (usize, usize)) {
        self.saved = Some(Snapshot {
            rows: rows.to_vec(),
            cursor,
        });
    }

    pub fn undo(&mut self) -> Option<Snapshot> {
        self.saved.take()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.saved.is_none()
    }
}
