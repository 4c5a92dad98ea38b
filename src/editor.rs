use crate::command::Command;
use crate::error::Result;
use crate::input::Key;
use crate::mode::Mode;
use crate::row::Row;
use crate::status_bar::StatusBar;
use crate::terminal::{Frame, Terminal};
use crate::text_buffer::{CursorDir, Lines, Limits, TextBuffer};
use crate::viewport::Viewport;
use log::{debug, info, warn};
use std::path::Path;

const WELCOME: &str = "Welcome to minivi (press i to insert, :w to save, :q to quit)";

pub struct Editor<T: Terminal> {
    term: T,
    buf: TextBuffer,
    viewport: Viewport,
    mode: Mode,
    // Lines cut or copied last. Paste does not consume them
    yanked: Vec<Row>,
    status_bar: StatusBar,
    // Set by quit commands and when input has ended
    quitting: bool,
}

impl<T: Terminal> Editor<T> {
    pub fn with_buffer(buf: TextBuffer, term: T) -> Editor<T> {
        Editor {
            term,
            buf,
            viewport: Viewport::default(),
            mode: Mode::Normal,
            yanked: vec![],
            status_bar: StatusBar::new(WELCOME),
            quitting: false,
        }
    }

    pub fn new(term: T) -> Editor<T> {
        Self::with_buffer(TextBuffer::empty(Limits::default()), term)
    }

    pub fn with_lines<'a, L: Iterator<Item = &'a str>>(lines: L, term: T) -> Editor<T> {
        Self::with_buffer(TextBuffer::with_lines(lines, Limits::default()), term)
    }

    /// Opens the file at `path`. When it cannot be read, starts with an empty document which
    /// will be saved to `path`.
    pub fn open<P: AsRef<Path>>(path: P, term: T, limits: Limits) -> Editor<T> {
        let path = path.as_ref();
        let display = path.to_string_lossy();
        match TextBuffer::open(path, limits) {
            Ok(buf) => {
                let msg = format!("Opened: {} ({} lines)", display, buf.rows().len());
                info!("opened {} ({} lines)", display, buf.rows().len());
                let mut editor = Self::with_buffer(buf, term);
                editor.status_bar.set_info_message(msg);
                editor
            }
            Err(err) => {
                info!("could not open {}: {}. Starting new file", display, err);
                let mut buf = TextBuffer::empty(limits);
                buf.set_file(display.to_string());
                let mut editor = Self::with_buffer(buf, term);
                editor
                    .status_bar
                    .set_info_message(format!("File not found, starting new file: {}", display));
                editor
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn read_key(&mut self) -> Result<Option<Key>> {
        let key = self.term.read_key()?;
        if key.is_none() {
            self.quitting = true;
        }
        Ok(key)
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.term.read_line(prompt)?;
        if line.is_none() {
            self.quitting = true;
        }
        Ok(line)
    }

    fn ensure_cursor_in_bounds(&mut self) {
        if self.buf.ensure_cursor_in_bounds() {
            let max = self.buf.limits().max_lines;
            warn!("document truncated to {} lines", max);
            self.status_bar
                .set_error_message(format!("Truncated buffer to {} lines", max));
        }
    }

    fn render_screen(&mut self) -> Result<()> {
        let rows = self.term.text_rows();
        let (cy, cx) = self.buf.cursor();
        self.viewport.scroll(cy, self.buf.rows().len(), rows);
        debug_assert!(self.viewport.contains(cy, rows));
        self.status_bar.update(self.mode, &self.buf);

        let top_line = self.viewport.top_line;
        let frame = Frame {
            lines: &self.buf.rows()[top_line..],
            top_line,
            cursor: (cy - top_line, cx),
            status: &self.status_bar,
        };
        self.term.draw(&frame)
    }

    fn enter_insert(&mut self) {
        self.set_mode(Mode::Insert);
        self.status_bar.set_info_message(Mode::Insert.name());
    }

    fn delete_line(&mut self) {
        if let Some(row) = self.buf.delete_line() {
            self.yanked = vec![row];
            self.status_bar.set_info_message("Deleted line");
        }
    }

    fn yank_line(&mut self) {
        if let Some(row) = self.buf.current_line() {
            self.yanked = vec![row.clone()];
            self.status_bar.set_info_message("Yanked line");
        }
    }

    fn paste(&mut self) {
        if self.yanked.is_empty() {
            self.status_bar.set_info_message("Nothing to paste");
            return;
        }
        self.buf.paste_lines(&self.yanked);
        self.status_bar.set_info_message("Pasted");
    }

    fn undo(&mut self) {
        if self.buf.undo() {
            self.status_bar.set_info_message("Undo successful");
        } else {
            self.status_bar.set_info_message("Nothing to undo");
        }
    }

    // Second key of 'gg', 'dd' and 'yy'
    fn handle_operator(&mut self, prefix: char) -> Result<()> {
        let key = loop {
            match self.read_key()? {
                Some(Key::Resize) => continue,
                Some(key) => break key,
                None => return Ok(()),
            }
        };

        match (prefix, key) {
            ('g', Key::Char('g')) => self.buf.move_cursor_to_buffer_edge(CursorDir::Up),
            ('d', Key::Char('d')) => self.delete_line(),
            ('y', Key::Char('y')) => self.yank_line(),
            (_, key) => self
                .status_bar
                .set_error_message(format!("Unknown command {}{}", prefix, key)),
        }
        Ok(())
    }

    fn handle_normal(&mut self, key: Key) -> Result<()> {
        use Key::*;

        match key {
            Char('i') => self.enter_insert(),
            Char('a') => {
                let (cy, cx) = self.buf.cursor();
                if cx < self.buf.rows()[cy].len() {
                    self.buf.set_cursor(cy, cx + 1);
                }
                self.enter_insert();
            }
            Char('A') => {
                self.buf.move_cursor_to_buffer_edge(CursorDir::Right);
                self.enter_insert();
            }
            Char('o') => {
                self.buf.open_line(CursorDir::Down);
                self.enter_insert();
            }
            Char('O') => {
                self.buf.open_line(CursorDir::Up);
                self.enter_insert();
            }
            Char('x') => {
                if self.buf.delete_right_char() {
                    self.status_bar.set_info_message("Deleted char");
                }
            }
            Char('h') | Left | Backspace => self.buf.move_cursor_one(CursorDir::Left),
            Char('j') | Down => self.buf.move_cursor_one(CursorDir::Down),
            Char('k') | Up => self.buf.move_cursor_one(CursorDir::Up),
            Char('l') | Right => self.buf.move_cursor_one(CursorDir::Right),
            Char('0') | Char('^') | Home => self.buf.move_cursor_to_buffer_edge(CursorDir::Left),
            Char('$') | End => self.buf.move_cursor_to_buffer_edge(CursorDir::Right),
            Char('G') => self.buf.move_cursor_to_buffer_edge(CursorDir::Down),
            Char(c @ 'g') | Char(c @ 'd') | Char(c @ 'y') => self.handle_operator(c)?,
            Char('u') => self.undo(),
            Char('p') => self.paste(),
            Char('/') => self.set_mode(Mode::Search),
            Char(':') => self.set_mode(Mode::Command),
            _ => {} // Ignore unknown keys
        }

        self.ensure_cursor_in_bounds();
        Ok(())
    }

    fn handle_insert(&mut self, key: Key) {
        match key {
            Key::Esc => {
                self.set_mode(Mode::Normal);
                // Cursor cannot stay after the last character in normal mode
                let (cy, cx) = self.buf.cursor();
                if cx > 0 {
                    self.buf.set_cursor(cy, cx - 1);
                }
                self.status_bar.set_info_message(Mode::Normal.name());
            }
            Key::Backspace => {
                self.buf.delete_char();
            }
            Key::Enter => self.buf.insert_line(),
            Key::Char(c) if !c.is_control() => {
                if !self.buf.insert_char(c) {
                    let max = self.buf.limits().max_line_len;
                    self.status_bar.set_error_message(format!(
                        "Line length limit reached ({} chars)",
                        max
                    ));
                }
            }
            _ => {}
        }
        self.ensure_cursor_in_bounds();
    }

    fn save(&mut self) -> Result<()> {
        let mut create = false;
        if !self.buf.has_file() {
            match self.read_line("Filename: ")? {
                Some(name) if !name.is_empty() => {
                    self.buf.set_file(name);
                    create = true;
                }
                Some(_) => {
                    self.status_bar.set_info_message("Canceled");
                    return Ok(());
                }
                None => return Ok(()),
            }
        }

        match self.buf.save() {
            Ok(msg) => {
                info!("{}", msg);
                self.status_bar.set_info_message(msg);
            }
            Err(msg) => {
                warn!("{}", msg);
                self.status_bar.set_error_message(msg);
                if create {
                    self.buf.set_unnamed();
                }
            }
        }
        Ok(())
    }

    fn save_as(&mut self, name: &str) {
        match self.buf.save_as(name) {
            Ok(msg) => {
                info!("{}", msg);
                self.status_bar.set_info_message(msg);
            }
            Err(msg) => {
                warn!("{}", msg);
                self.status_bar.set_error_message(msg);
            }
        }
    }

    fn handle_command(&mut self) -> Result<()> {
        if let Some(line) = self.read_line(":")? {
            let cmd = Command::parse(&line);
            debug!("command {:?}", cmd);
            match cmd {
                Command::Nop => {}
                Command::Quit => self.quitting = true,
                Command::Write => self.save()?,
                Command::WriteAs(name) => self.save_as(&name),
                Command::WriteQuit => {
                    self.save()?;
                    self.quitting = true;
                }
                Command::Unknown(line) => self
                    .status_bar
                    .set_error_message(format!("Unknown command: {}", line)),
            }
        }
        self.set_mode(Mode::Normal);
        Ok(())
    }

    fn handle_search(&mut self) -> Result<()> {
        if let Some(pattern) = self.read_line("/")? {
            if !pattern.is_empty() {
                if self.buf.find_next(&pattern) {
                    self.status_bar
                        .set_info_message(format!("Found: {}", pattern));
                } else {
                    self.status_bar
                        .set_error_message(format!("Pattern not found: {}", pattern));
                }
            }
        }
        self.set_mode(Mode::Normal);
        Ok(())
    }

    // Draws screen and handles one input. Returns false when editing is over
    pub(crate) fn step(&mut self) -> Result<bool> {
        self.render_screen()?;

        match self.mode {
            Mode::Command => self.handle_command()?,
            Mode::Search => self.handle_search()?,
            Mode::Normal | Mode::Insert => match self.read_key()? {
                None | Some(Key::Resize) => {}
                Some(key) if self.mode == Mode::Insert => self.handle_insert(key),
                Some(key) => self.handle_normal(key)?,
            },
        }

        Ok(!self.quitting)
    }

    /// Runs the editor until a quit command or until the input ends.
    pub fn edit(&mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }

    pub fn lines(&self) -> Lines<'_> {
        self.buf.lines()
    }

    pub fn buf(&self) -> &TextBuffer {
        &self.buf
    }

    // (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        self.buf.cursor()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn yanked(&self) -> Lines<'_> {
        Lines::new(&self.yanked)
    }

    pub fn top_line(&self) -> usize {
        self.viewport.top_line
    }

    pub fn message_text(&self) -> &str {
        self.status_bar.message_text()
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.term
    }
}
