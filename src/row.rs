// Returns byte index of `at`th character. Index just past the last character is the string length
fn byte_index_at(at: usize, s: &str) -> usize {
    s.char_indices().nth(at).map(|c| c.0).unwrap_or_else(|| s.len())
}

// One line of a document. Columns are counted in characters, not bytes
#[derive(Default, Clone, PartialEq, Debug)]
pub struct Row {
    buf: String,
    len: usize,
}

impl Row {
    pub fn new<S: Into<String>>(line: S) -> Row {
        let buf = line.into();
        let len = buf.chars().count();
        Row { buf, len }
    }

    pub fn empty() -> Row {
        Row::default()
    }

    pub fn buffer(&self) -> &str {
        self.buf.as_str()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert_char(&mut self, at: usize, c: char) {
        if self.len <= at {
            self.buf.push(c);
        } else {
            let idx = byte_index_at(at, &self.buf);
            self.buf.insert(idx, c);
        }
        self.len += 1;
    }

    pub fn remove_char(&mut self, at: usize) -> Option<char> {
        if at >= self.len {
            return None;
        }
        let idx = byte_index_at(at, &self.buf);
        let removed = self.buf.remove(idx);
        self.len -= 1;
        Some(removed)
    }

    pub fn append<S: AsRef<str>>(&mut self, s: S) {
        let s = s.as_ref();
        self.buf.push_str(s);
        self.len += s.chars().count();
    }

    // Cuts the row at `at` and returns the cut suffix
    pub fn split_off(&mut self, at: usize) -> Row {
        if at >= self.len {
            return Row::empty();
        }
        let idx = byte_index_at(at, &self.buf);
        let suffix = self.buf.split_off(idx);
        self.len = at;
        Row::new(suffix)
    }

    pub fn truncate(&mut self, at: usize) {
        if at < self.len {
            let idx = byte_index_at(at, &self.buf);
            self.buf.truncate(idx);
            self.len = at;
        }
    }

    // Character column of the first occurrence of `pat` at or after column `from`
    pub fn find_from(&self, pat: &str, from: usize) -> Option<usize> {
        if pat.is_empty() || from > self.len {
            return None;
        }
        let start = byte_index_at(from, &self.buf);
        self.buf[start..]
            .find(pat)
            .map(|idx| from + self.buf[start..start + idx].chars().count())
    }
}
