use crate::history::History;
use crate::row::Row;
use crate::search;
use std::cmp;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::slice;

// Contain both actual path sequence and display string
#[derive(Debug, Clone)]
pub struct FilePath {
    pub path: PathBuf,
    pub display: String,
}

impl FilePath {
    fn from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        FilePath {
            path: PathBuf::from(path),
            display: path.to_string_lossy().to_string(),
        }
    }

    fn from_string<S: Into<String>>(s: S) -> Self {
        let display = s.into();
        FilePath {
            path: PathBuf::from(&display),
            display,
        }
    }
}

/// Capacity of a document. Lines longer than `max_line_len` characters are truncated on load
/// and refuse further insertion. Lines beyond `max_lines` are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_line_len: usize,
    pub max_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_len: 1024,
            max_lines: 10000,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CursorDir {
    Left,
    Right,
    Up,
    Down,
}

pub struct Lines<'a>(slice::Iter<'a, Row>);

impl<'a> Lines<'a> {
    pub(crate) fn new(rows: &'a [Row]) -> Self {
        Lines(rows.iter())
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| r.buffer())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.as_slice().len();
        (len, Some(len))
    }
}

/// The document being edited with its cursor and single-level undo history.
///
/// The document always has at least one line. Cursor row is always a valid index into it and
/// cursor column is at most the length of the current line, where column == length is the
/// position just after the last character.
pub struct TextBuffer {
    // (x, y) coordinate in internal text buffer of rows
    cx: usize,
    cy: usize,
    // File editor is opening
    file: Option<FilePath>,
    // Lines of text buffer
    row: Vec<Row>,
    limits: Limits,
    history: History,
}

impl TextBuffer {
    pub fn empty(limits: Limits) -> Self {
        Self {
            cx: 0,
            cy: 0,
            file: None,
            row: vec![Row::empty()],
            limits,
            history: History::default(),
        }
    }

    pub fn with_lines<'a, I: Iterator<Item = &'a str>>(lines: I, limits: Limits) -> Self {
        let mut buf = Self::empty(limits);
        buf.row = Self::clamp_lines(lines.map(Row::new), limits);
        buf
    }

    fn clamp_lines<I: Iterator<Item = Row>>(rows: I, limits: Limits) -> Vec<Row> {
        let mut rows: Vec<_> = rows
            .take(limits.max_lines)
            .map(|mut r| {
                r.truncate(limits.max_line_len);
                r
            })
            .collect();
        if rows.is_empty() {
            rows.push(Row::empty());
        }
        rows
    }

    /// Loads the file at `path`. Fails when the file cannot be opened or read, so that caller
    /// can start a new file with the same name instead.
    pub fn open<P: AsRef<Path>>(path: P, limits: Limits) -> io::Result<Self> {
        let path = path.as_ref();
        let mut bytes = vec![];
        File::open(path)?.read_to_end(&mut bytes)?;

        // Segment after the last newline is a line too, so that an empty last line survives
        // save and open. Invalid UTF-8 is replaced rather than rejected
        let rows = bytes
            .split(|b| *b == b'\n')
            .map(|line| Row::new(String::from_utf8_lossy(line)));

        let mut buf = Self::empty(limits);
        buf.row = Self::clamp_lines(rows, limits);
        buf.file = Some(FilePath::from(path));
        Ok(buf)
    }

    fn save_undo_point(&mut self) {
        self.history.save(&self.row, self.cursor());
    }

    /// Restores the document and cursor saved before the last change. Returns false when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.history.undo() {
            self.row = snapshot.rows;
            let (y, x) = snapshot.cursor;
            self.set_cursor(y, x);
            true
        } else {
            false
        }
    }

    /// Re-establishes the invariants on document and cursor. Returns true when the document
    /// had too many lines and was truncated.
    pub fn ensure_cursor_in_bounds(&mut self) -> bool {
        let truncated = self.row.len() > self.limits.max_lines;
        if truncated {
            self.row.truncate(self.limits.max_lines);
        }
        if self.row.is_empty() {
            self.row.push(Row::empty());
        }
        self.cy = cmp::min(self.cy, self.row.len() - 1);
        self.cx = cmp::min(self.cx, self.row[self.cy].len());
        truncated
    }

    pub fn is_blank(&self) -> bool {
        self.row.len() == 1 && self.row[0].is_empty()
    }

    /// Returns false when the current line is already at its maximum length.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.row[self.cy].len() >= self.limits.max_line_len {
            return false;
        }
        self.save_undo_point();
        self.row[self.cy].insert_char(self.cx, ch);
        self.cx += 1;
        true
    }

    // Splits the current line at cursor. The suffix becomes a new line below
    pub fn insert_line(&mut self) {
        self.save_undo_point();
        let suffix = self.row[self.cy].split_off(self.cx);
        self.row.insert(self.cy + 1, suffix);
        self.cy += 1;
        self.cx = 0;
    }

    fn squash_to_previous_line(&mut self) {
        let removed = self.row.remove(self.cy);
        self.cy -= 1;
        // At top of line, backspace concats current line to previous line
        self.cx = self.row[self.cy].len();
        self.row[self.cy].append(removed.buffer());
    }

    /// Deletes the character before cursor. At the head of a line, joins the line onto the
    /// previous one. Returns false when nothing was deleted.
    pub fn delete_char(&mut self) -> bool {
        if self.cx == 0 && self.cy == 0 {
            return false;
        }
        self.save_undo_point();
        if self.cx > 0 {
            self.row[self.cy].remove_char(self.cx - 1);
            self.cx -= 1;
        } else {
            self.squash_to_previous_line();
        }
        true
    }

    /// Deletes the character under cursor. Returns false at end of line.
    pub fn delete_right_char(&mut self) -> bool {
        if self.cx >= self.row[self.cy].len() {
            return false;
        }
        self.save_undo_point();
        self.row[self.cy].remove_char(self.cx);
        true
    }

    /// Removes the current line and returns it. Returns None when the document consists of a
    /// single empty line.
    pub fn delete_line(&mut self) -> Option<Row> {
        if self.is_blank() {
            return None;
        }
        self.save_undo_point();
        let removed = self.row.remove(self.cy);
        if self.row.is_empty() {
            self.row.push(Row::empty());
        }
        self.cy = cmp::min(self.cy, self.row.len() - 1);
        self.cx = cmp::min(self.cx, self.row[self.cy].len());
        Some(removed)
    }

    pub fn current_line(&self) -> Option<&Row> {
        if self.is_blank() {
            None
        } else {
            Some(&self.row[self.cy])
        }
    }

    // Inserts rows just after the current line and moves cursor to the first of them
    pub fn paste_lines(&mut self, rows: &[Row]) {
        if rows.is_empty() {
            return;
        }
        self.save_undo_point();
        let at = self.cy + 1;
        self.row.splice(at..at, rows.iter().cloned());
        self.cy = at;
        self.cx = 0;
    }

    pub fn open_line(&mut self, dir: CursorDir) {
        debug_assert!(dir == CursorDir::Up || dir == CursorDir::Down);
        self.save_undo_point();
        if dir == CursorDir::Down {
            self.cy += 1;
        }
        self.row.insert(self.cy, Row::empty());
        self.cx = 0;
    }

    pub fn move_cursor_one(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Up => self.cy = self.cy.saturating_sub(1),
            CursorDir::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    // When moving to left at top of line, move cursor to end of previous line
                    self.cy -= 1;
                    self.cx = self.row[self.cy].len();
                }
            }
            CursorDir::Down => {
                if self.cy + 1 < self.row.len() {
                    self.cy += 1;
                }
            }
            CursorDir::Right => {
                if self.cx < self.row[self.cy].len() {
                    self.cx += 1;
                } else if self.cy + 1 < self.row.len() {
                    // When moving to right at the end of line, move cursor to top of next line.
                    self.cy += 1;
                    self.cx = 0;
                }
            }
        };

        // Snap cursor to end of line when moving up/down from longer line
        self.cx = cmp::min(self.cx, self.row[self.cy].len());
    }

    // Left/Right go to head/end of line. Up goes to top of buffer and Down goes to the head of
    // the last line
    pub fn move_cursor_to_buffer_edge(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Left => self.cx = 0,
            CursorDir::Right => self.cx = self.row[self.cy].len(),
            CursorDir::Up => {
                self.cy = 0;
                self.cx = 0;
            }
            CursorDir::Down => {
                self.cy = self.row.len() - 1;
                self.cx = 0;
            }
        }
    }

    /// Moves cursor to the next occurrence of `pattern` after cursor. Returns false when not
    /// found, leaving cursor unmoved.
    pub fn find_next(&mut self, pattern: &str) -> bool {
        match search::find_next(&self.row, pattern, self.cy, self.cx + 1) {
            Some((y, x)) => {
                self.set_cursor(y, x);
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.row
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn filename(&self) -> &str {
        self.file
            .as_ref()
            .map(|f| f.display.as_str())
            .unwrap_or("[No Name]")
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn cx(&self) -> usize {
        self.cx
    }

    pub fn cy(&self) -> usize {
        self.cy
    }

    // (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        (self.cy, self.cx)
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines::new(&self.row)
    }

    pub fn set_file<S: Into<String>>(&mut self, file_path: S) {
        self.file = Some(FilePath::from_string(file_path));
    }

    pub fn set_unnamed(&mut self) {
        self.file = None;
    }

    pub fn set_cursor(&mut self, y: usize, x: usize) {
        self.cy = y;
        self.cx = x;
    }

    fn write_file(&self, path: &Path) -> io::Result<()> {
        let mut f = io::BufWriter::new(File::create(path)?);
        for (i, line) in self.row.iter().enumerate() {
            if i > 0 {
                f.write_all(b"\n")?;
            }
            f.write_all(line.buffer().as_bytes())?;
        }
        f.flush()
    }

    /// Writes lines joined with newlines to `display` without changing the file of this buffer.
    pub fn save_as<S: AsRef<str>>(&self, display: S) -> std::result::Result<String, String> {
        let display = display.as_ref();
        match self.write_file(Path::new(display)) {
            Ok(()) => Ok(format!("Saved: {} ({} lines)", display, self.row.len())),
            Err(e) => Err(format!("Error: cannot write to {}: {}", display, e)),
        }
    }

    pub fn save(&self) -> std::result::Result<String, String> {
        let file = if let Some(file) = &self.file {
            file
        } else {
            return Err("Error: no file name".to_string());
        };

        match self.write_file(&file.path) {
            Ok(()) => Ok(format!("Saved: {} ({} lines)", file.display, self.row.len())),
            Err(e) => Err(format!("Error: cannot write to {}: {}", file.display, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn buf(lines: &[&str]) -> TextBuffer {
        TextBuffer::with_lines(lines.iter().copied(), Limits::default())
    }

    fn text(b: &TextBuffer) -> Vec<&str> {
        b.lines().collect()
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("minivi-{}-{}", std::process::id(), name))
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let b = TextBuffer::empty(Limits::default());
        assert_eq!(text(&b), vec![""]);
        assert_eq!(b.cursor(), (0, 0));
        assert_eq!(text(&buf(&[])), vec![""]);
    }

    #[test]
    fn ensure_cursor_in_bounds_clamps_and_is_idempotent() {
        let mut b = buf(&["abc", "de"]);
        b.set_cursor(5, 9);
        assert!(!b.ensure_cursor_in_bounds());
        assert_eq!(b.cursor(), (1, 2));
        assert!(!b.ensure_cursor_in_bounds());
        assert_eq!(b.cursor(), (1, 2));
        assert_eq!(text(&b), vec!["abc", "de"]);
    }

    #[test]
    fn ensure_cursor_in_bounds_truncates_lines() {
        let limits = Limits {
            max_line_len: 10,
            max_lines: 3,
        };
        let mut b = TextBuffer::with_lines(["a", "b"].iter().copied(), limits);
        b.paste_lines(&[Row::new("c"), Row::new("d")]);
        assert_eq!(b.rows().len(), 4);
        assert!(b.ensure_cursor_in_bounds());
        assert_eq!(text(&b), vec!["a", "c", "d"]);
        assert_eq!(b.cursor(), (1, 0));
        assert!(!b.ensure_cursor_in_bounds());
    }

    #[test]
    fn with_lines_clamps_to_limits() {
        let limits = Limits {
            max_line_len: 3,
            max_lines: 2,
        };
        let b = TextBuffer::with_lines(["abcdef", "gh", "ij"].iter().copied(), limits);
        assert_eq!(text(&b), vec!["abc", "gh"]);
    }

    #[test]
    fn insert_char_respects_line_length() {
        let limits = Limits {
            max_line_len: 2,
            max_lines: 10,
        };
        let mut b = TextBuffer::empty(limits);
        assert!(b.insert_char('a'));
        assert!(b.insert_char('b'));
        assert!(!b.insert_char('c'));
        assert_eq!(text(&b), vec!["ab"]);
        assert_eq!(b.cursor(), (0, 2));
    }

    #[test]
    fn insert_line_splits_at_cursor() {
        let mut b = buf(&["hello world"]);
        b.set_cursor(0, 5);
        b.insert_line();
        assert_eq!(text(&b), vec!["hello", " world"]);
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn delete_char_joins_lines_at_head() {
        let mut b = buf(&["foo", "bar"]);
        b.set_cursor(1, 0);
        assert!(b.delete_char());
        assert_eq!(text(&b), vec!["foobar"]);
        assert_eq!(b.cursor(), (0, 3));

        b.set_cursor(0, 0);
        assert!(!b.delete_char());
    }

    #[test]
    fn delete_right_char_until_empty() {
        let mut b = buf(&["abc"]);
        for _ in 0..3 {
            assert!(b.delete_right_char());
        }
        assert!(!b.delete_right_char());
        assert_eq!(text(&b), vec![""]);
        assert_eq!(b.cursor(), (0, 0));
    }

    #[test]
    fn delete_line_keeps_one_line() {
        let mut b = buf(&["a", "b", "c"]);
        b.set_cursor(2, 1);
        assert_eq!(b.delete_line().unwrap().buffer(), "c");
        assert_eq!(b.cursor(), (1, 1));
        assert_eq!(b.delete_line().unwrap().buffer(), "b");
        assert_eq!(b.delete_line().unwrap().buffer(), "a");
        assert_eq!(text(&b), vec![""]);
        assert_eq!(b.cursor(), (0, 0));
        assert!(b.delete_line().is_none());
    }

    #[test]
    fn paste_lines_after_current_line() {
        let mut b = buf(&["one", "two"]);
        b.paste_lines(&[Row::new("x"), Row::new("y")]);
        assert_eq!(text(&b), vec!["one", "x", "y", "two"]);
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn open_line_above_and_below() {
        let mut b = buf(&["a"]);
        b.open_line(CursorDir::Down);
        assert_eq!(text(&b), vec!["a", ""]);
        assert_eq!(b.cursor(), (1, 0));
        b.open_line(CursorDir::Up);
        assert_eq!(text(&b), vec!["a", "", ""]);
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn undo_restores_last_change_once() {
        let mut b = buf(&["abc", "def"]);
        b.set_cursor(1, 1);
        b.delete_line();
        assert!(b.undo());
        assert_eq!(text(&b), vec!["abc", "def"]);
        assert_eq!(b.cursor(), (1, 1));
        assert!(!b.undo());
    }

    #[test]
    fn move_cursor_wraps_between_lines() {
        let mut b = buf(&["ab", "cdef"]);
        b.set_cursor(0, 2);
        b.move_cursor_one(CursorDir::Right);
        assert_eq!(b.cursor(), (1, 0));
        b.move_cursor_one(CursorDir::Left);
        assert_eq!(b.cursor(), (0, 2));

        b.set_cursor(1, 4);
        b.move_cursor_one(CursorDir::Up);
        assert_eq!(b.cursor(), (0, 2));
        b.move_cursor_one(CursorDir::Up);
        assert_eq!(b.cursor(), (0, 2));

        b.move_cursor_to_buffer_edge(CursorDir::Down);
        assert_eq!(b.cursor(), (1, 0));
        b.move_cursor_one(CursorDir::Down);
        assert_eq!(b.cursor(), (1, 0));
    }

    #[test]
    fn save_and_open_round_trip() {
        let path = temp_path("round-trip.txt");
        let b = buf(&["first", "", "  third"]);
        let msg = b.save_as(path.to_str().unwrap()).unwrap();
        assert!(msg.starts_with("Saved: "), "{}", msg);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n\n  third");
        assert!(!b.has_file());

        let opened = TextBuffer::open(&path, Limits::default()).unwrap();
        assert_eq!(text(&opened), vec!["first", "", "  third"]);
        assert_eq!(opened.filename(), path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn empty_last_line_survives_save_and_open() {
        let path = temp_path("trailing-empty.txt");
        let cases = vec![&["x", ""][..], &[""][..], &["", ""][..], &["a", "b", ""][..]];
        for lines in cases {
            let b = buf(lines);
            b.save_as(path.to_str().unwrap()).unwrap();
            let opened = TextBuffer::open(&path, Limits::default()).unwrap();
            assert_eq!(text(&opened), lines.to_vec());
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn open_keeps_invalid_utf8_lossily() {
        let path = temp_path("lossy.txt");
        fs::write(&path, b"a\xffb\nc").unwrap();
        let opened = TextBuffer::open(&path, Limits::default()).unwrap();
        assert_eq!(text(&opened), vec!["a\u{fffd}b", "c"]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn open_missing_file_fails() {
        let path = temp_path("does-not-exist.txt");
        assert!(TextBuffer::open(&path, Limits::default()).is_err());
    }

    #[test]
    fn save_to_unwritable_path_reports_error() {
        let mut b = buf(&["x"]);
        assert!(b.save().is_err());
        let dir = env::temp_dir();
        let msg = b.save_as(dir.to_str().unwrap()).unwrap_err();
        assert!(msg.starts_with("Error: cannot write to"), "{}", msg);
        b.set_file(dir.to_str().unwrap());
        assert!(b.save().is_err());
    }
}
