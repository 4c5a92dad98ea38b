use crate::ansi_color::{ColorSupport, ScreenColor};
use crate::error::{Error, Result};
use crate::input::Key;
use crate::signal::SigwinchWatcher;
use crate::status_bar::{StatusBar, StatusMessageKind};
use crate::terminal::Frame;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

// "%4d " before each line
const GUTTER_WIDTH: usize = 5;
// Frames to wait for cursor position report. Each frame is 1/10 second in raw mode
const SIZE_QUERY_TIMEOUT: usize = 30;

fn char_width(c: char) -> usize {
    c.width_cjk().unwrap_or(1)
}

// Clips `s` to fit in `max` columns. Returns clipped string and its width
fn clip(s: &str, max: usize) -> (String, usize) {
    let mut width = 0;
    let mut clipped = String::with_capacity(s.len());
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max {
            break;
        }
        width += w;
        clipped.push(if c.is_control() { '?' } else { c });
    }
    (clipped, width)
}

fn get_window_size<I, W>(input: &mut I, mut output: W) -> Result<(usize, usize)>
where
    I: Iterator<Item = Result<Key>>,
    W: Write,
{
    // By moving cursor at the bottom-right corner by 'B' and 'C' commands, get the size of
    // current screen. \x1b[9999;9999H is not available since it does not guarantee cursor
    // stops on the corner. Finaly command 'n' queries cursor position.
    output.write_all(b"\x1b[9999C\x1b[9999B\x1b[6n")?;
    output.flush()?;

    // Wait for response from terminal discarding other sequences
    for seq in input.take(SIZE_QUERY_TIMEOUT) {
        if let Key::Cursor(r, c) = seq? {
            return Ok((c, r));
        }
    }

    Err(Error::UnknownWindowSize)
}

fn check_window_size(w: usize, h: usize) -> Result<()> {
    if w <= GUTTER_WIDTH + 2 || h < 2 {
        Err(Error::TooSmallWindow(w, h))
    } else {
        Ok(())
    }
}

/// VT100 renderer of the text area and the status line.
pub struct Screen<W: Write> {
    output: W,
    num_cols: usize,
    // Text area height. The last line of the window is the status line
    num_rows: usize,
    color_support: ColorSupport,
    // Watches window resize only when the size is queried from the terminal
    sigwinch: Option<SigwinchWatcher>,
}

impl<W: Write> Screen<W> {
    pub fn new<I>(window_size: Option<(usize, usize)>, input: &mut I, mut output: W) -> Result<Self>
    where
        I: Iterator<Item = Result<Key>>,
    {
        let (sigwinch, (w, h)) = if let Some(s) = window_size {
            (None, s)
        } else {
            let s = get_window_size(input, &mut output)?;
            (Some(SigwinchWatcher::new()?), s)
        };
        check_window_size(w, h)?;

        Ok(Self {
            output,
            num_cols: w,
            num_rows: h - 1,
            color_support: ColorSupport::from_env(),
            sigwinch,
        })
    }

    pub fn rows(&self) -> usize {
        self.num_rows
    }

    pub fn cols(&self) -> usize {
        self.num_cols
    }

    /// Re-queries the window size after SIGWINCH. Returns true when the size was updated.
    pub fn maybe_resize<I>(&mut self, input: &mut I) -> bool
    where
        I: Iterator<Item = Result<Key>>,
    {
        let notified = self
            .sigwinch
            .as_mut()
            .map(|s| s.notified())
            .unwrap_or(false);
        notified && self.resize(input)
    }

    // Failing to get a usable size is not fatal after startup. Previous size is kept
    fn resize<I>(&mut self, input: &mut I) -> bool
    where
        I: Iterator<Item = Result<Key>>,
    {
        let size = get_window_size(input, &mut self.output)
            .and_then(|(w, h)| check_window_size(w, h).map(|_| (w, h)));
        match size {
            Ok((w, h)) => {
                log::debug!("window resized to {}x{}", w, h);
                self.num_cols = w;
                self.num_rows = h - 1;
                true
            }
            Err(err) => {
                log::warn!(
                    "keeping window size {}x{} on resize: {}",
                    self.num_cols,
                    self.num_rows + 1,
                    err
                );
                false
            }
        }
    }

    fn color(&self, buf: &mut Vec<u8>, color: ScreenColor) {
        buf.extend_from_slice(color.sequence(self.color_support));
    }

    fn draw_rows(&self, buf: &mut Vec<u8>, frame: &Frame<'_>) -> Result<()> {
        let text_width = self.num_cols - GUTTER_WIDTH;

        for y in 0..self.num_rows {
            // Move cursor to target line
            write!(buf, "\x1b[{}H", y + 1)?;

            if let Some(row) = frame.lines.get(y) {
                self.color(buf, ScreenColor::LineNumber);
                write!(buf, "{:>4} ", frame.top_line + y + 1)?;
                self.color(buf, ScreenColor::Reset);
                let (text, _) = clip(row.buffer(), text_width);
                buf.write_all(text.as_bytes())?;
            } else {
                self.color(buf, ScreenColor::Tilde);
                buf.write_all(b"~")?;
                self.color(buf, ScreenColor::Reset);
            }

            // Erases the part of the line to the right of the cursor. http://vt100.net/docs/vt100-ug/chapter3.html#EL
            buf.write_all(b"\x1b[K")?;
        }

        Ok(())
    }

    fn draw_status_bar(&self, buf: &mut Vec<u8>, status: &StatusBar) -> Result<()> {
        write!(buf, "\x1b[{}H", self.num_rows + 1)?;
        self.color(buf, ScreenColor::StatusLine);

        // The last column is left blank so that terminal does not scroll
        let max = self.num_cols - 1;
        let (left, left_width) = clip(&status.left(), max);
        buf.write_all(left.as_bytes())?;

        let (msg, msg_width) = clip(status.message_text(), max);
        let msg_start = max - msg_width;
        if msg_width > 0 && msg_start > left_width {
            buf.write_all(" ".repeat(msg_start - left_width).as_bytes())?;
            if status.message.kind == StatusMessageKind::Error {
                self.color(buf, ScreenColor::ErrorMessage);
            }
            buf.write_all(msg.as_bytes())?;
        } else {
            buf.write_all(" ".repeat(max - left_width).as_bytes())?;
        }

        // Default argument of 'm' command is 0 so it resets attributes
        self.color(buf, ScreenColor::Reset);
        buf.write_all(b"\x1b[K")?;
        Ok(())
    }

    // Position of terminal cursor (row, col), 0-based
    fn cursor_position(&self, frame: &Frame<'_>) -> (usize, usize) {
        let (y, x) = frame.cursor;
        let rx: usize = frame
            .lines
            .get(y)
            .map(|r| r.buffer().chars().take(x).map(char_width).sum())
            .unwrap_or(0);
        let col = std::cmp::min(GUTTER_WIDTH + rx, self.num_cols - 1);
        (std::cmp::min(y, self.num_rows.saturating_sub(1)), col)
    }

    pub fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        let mut buf = Vec::with_capacity((self.num_rows + 1) * self.num_cols);

        // \x1b[: Escape sequence header
        // Hide cursor while updating screen. 'l' is command to set mode http://vt100.net/docs/vt100-ug/chapter3.html#SM
        buf.write_all(b"\x1b[?25l")?;
        // H: Command to move cursor. Here \x1b[H is the same as \x1b[1;1H
        buf.write_all(b"\x1b[H")?;

        self.draw_rows(&mut buf, frame)?;
        self.draw_status_bar(&mut buf, frame.status)?;

        let (row, col) = self.cursor_position(frame);
        write!(buf, "\x1b[{};{}H", row + 1, col + 1)?;

        // Reveal cursor again. 'h' is command to reset mode https://vt100.net/docs/vt100-ug/chapter3.html#RM
        buf.write_all(b"\x1b[?25h")?;

        self.output.write_all(&buf)?;
        self.output.flush()?;
        Ok(())
    }

    // Replaces the status line with the prompt and input so far, cursor just after the input
    pub fn render_prompt(&mut self, prompt: &str, input: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(self.num_cols);
        write!(buf, "\x1b[{}H", self.num_rows + 1)?;
        self.color(&mut buf, ScreenColor::Reset);

        let line = format!("{}{}", prompt, input);
        let (line, width) = clip(&line, self.num_cols - 1);
        buf.write_all(line.as_bytes())?;
        buf.write_all(b"\x1b[K")?;
        write!(buf, "\x1b[{};{}H", self.num_rows + 1, width + 1)?;

        self.output.write_all(&buf)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        // 2: Argument of 'J' command to reset entire screen
        // J: Command to erase screen http://vt100.net/docs/vt100-ug/chapter3.html#ED
        self.output.write_all(b"\x1b[2J")?;
        // Set cursor position to left-top corner
        self.output.write_all(b"\x1b[H")?;
        self.output.flush()?;
        Ok(())
    }
}
