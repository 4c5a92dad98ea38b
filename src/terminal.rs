use crate::error::Result;
use crate::input::Key;
use crate::row::Row;
use crate::screen::Screen;
use crate::status_bar::StatusBar;
use std::io::Write;

/// What the editor shows on one redraw.
pub struct Frame<'a> {
    /// Document lines from the first visible line to the end of the document
    pub lines: &'a [Row],
    /// Index of `lines[0]` in the document
    pub top_line: usize,
    /// Cursor (row, col) relative to `lines`
    pub cursor: (usize, usize),
    pub status: &'a StatusBar,
}

/// Screen and keyboard device driven by the editor. All calls block.
pub trait Terminal {
    /// Next key. `None` means the input has ended and nothing more will arrive.
    fn read_key(&mut self) -> Result<Option<Key>>;

    /// Reads one line of text with `prompt` shown on the status line. Canceling returns an
    /// empty string. `None` means the input has ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn draw(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Number of rows available for document lines.
    fn text_rows(&self) -> usize;
}

/// Terminal on a VT100 compatible tty. Keys come from `I` and escape sequences go to `W`.
pub struct Tty<I, W>
where
    I: Iterator<Item = Result<Key>>,
    W: Write,
{
    input: I, // Escape sequences stream represented as Iterator
    screen: Screen<W>,
}

impl<I, W> Tty<I, W>
where
    I: Iterator<Item = Result<Key>>,
    W: Write,
{
    pub fn new(mut input: I, output: W, window_size: Option<(usize, usize)>) -> Result<Self> {
        let screen = Screen::new(window_size, &mut input, output)?;
        Ok(Self { input, screen })
    }

    pub fn screen(&self) -> &Screen<W> {
        &self.screen
    }

    pub fn clear(&mut self) -> Result<()> {
        self.screen.clear()
    }
}

impl<I, W> Terminal for Tty<I, W>
where
    I: Iterator<Item = Result<Key>>,
    W: Write,
{
    fn read_key(&mut self) -> Result<Option<Key>> {
        loop {
            if self.screen.maybe_resize(&mut self.input) {
                return Ok(Some(Key::Resize));
            }
            match self.input.next() {
                None => return Ok(None),
                Some(seq) => match seq? {
                    // Read timed out or stray terminal report
                    Key::Unidentified | Key::Cursor(..) => continue,
                    key => return Ok(Some(key)),
                },
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut buf = String::new();
        self.screen.render_prompt(prompt, &buf)?;

        while let Some(key) = self.read_key()? {
            match key {
                Key::Enter => return Ok(Some(buf)),
                Key::Esc | Key::Ctrl(b'g') => return Ok(Some(String::new())),
                Key::Backspace => {
                    buf.pop();
                }
                Key::Ctrl(b'u') => buf.clear(),
                Key::Char(c) if !c.is_control() => buf.push(c),
                Key::Resize => {} // Redraw prompt on resized window
                _ => continue,
            }
            self.screen.render_prompt(prompt, &buf)?;
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.screen.render(frame)
    }

    fn text_rows(&self) -> usize {
        self.screen.rows()
    }
}
