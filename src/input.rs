use crate::error::Result;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::str;

pub struct StdinRawMode {
    stdin: io::Stdin,
    orig: termios::Termios,
}

impl StdinRawMode {
    pub fn new() -> Result<StdinRawMode> {
        use termios::*;

        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        let mut termios = Termios::from_fd(fd)?;
        let orig = termios;

        // Set terminal raw mode. Disable echo back, canonical mode, signals (SIGINT, SIGTSTP) and Ctrl+V.
        termios.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
        // Disable control flow mode (Ctrl+Q/Ctrl+S) and CR-to-NL translation
        termios.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
        // Disable output processing such as \n to \r\n translation
        termios.c_oflag &= !OPOST;
        // Ensure character size is 8bits
        termios.c_cflag |= CS8;
        // Do not wait for next byte with blocking since reading 0 byte is permitted
        termios.c_cc[VMIN] = 0;
        // Read timeout of 1/10 second. A lone ESC is told apart from an escape sequence by it
        termios.c_cc[VTIME] = 1;
        tcsetattr(fd, TCSAFLUSH, &termios)?;

        Ok(StdinRawMode { stdin, orig })
    }

    pub fn input_keys(self) -> InputSequences {
        KeyDecoder::new(self)
    }
}

impl Drop for StdinRawMode {
    fn drop(&mut self) {
        // Restore original terminal mode. Nothing can be done on failure while dropping
        let _ = termios::tcsetattr(self.stdin.as_raw_fd(), termios::TCSAFLUSH, &self.orig);
    }
}

impl Read for StdinRawMode {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Key {
    Unidentified,
    Char(char),
    Ctrl(u8), // Lower-case key pressed with Ctrl
    Enter,
    Esc,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Resize,               // Pseudo key sent after the window size changed
    Cursor(usize, usize), // Pseudo key (row, col) from cursor position report
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        match self {
            Unidentified => write!(f, "UNKNOWN"),
            Char(' ') => write!(f, "SPACE"),
            Char(c) if c.is_control() => write!(f, "\\x{:x}", *c as u32),
            Char(c) => write!(f, "{}", c),
            Ctrl(b) => write!(f, "C-{}", *b as char),
            Enter => write!(f, "ENTER"),
            Esc => write!(f, "ESC"),
            Backspace => write!(f, "BACKSPACE"),
            Delete => write!(f, "DELETE"),
            Left => write!(f, "LEFT"),
            Right => write!(f, "RIGHT"),
            Up => write!(f, "UP"),
            Down => write!(f, "DOWN"),
            Home => write!(f, "HOME"),
            End => write!(f, "END"),
            PageUp => write!(f, "PAGEUP"),
            PageDown => write!(f, "PAGEDOWN"),
            Resize => write!(f, "RESIZE"),
            Cursor(r, c) => write!(f, "CURSOR({},{})", r, c),
        }
    }
}

// Final bytes of SS3 sequences sent for arrow, Home and End keys
fn is_ss3_final(b: u8) -> bool {
    matches!(b, b'A' | b'B' | b'C' | b'D' | b'F' | b'H')
}

// Decodes raw terminal bytes into keys. Generic over the byte source so that decoding can be
// tested without a tty
pub struct KeyDecoder<R: Read> {
    source: R,
    // Bytes read ahead after ESC which turned out not to start an escape sequence
    pending: VecDeque<u8>,
}

pub type InputSequences = KeyDecoder<StdinRawMode>;

impl<R: Read> KeyDecoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pending.pop_front() {
            return Ok(Some(b));
        }
        let mut one_byte: [u8; 1] = [0];
        Ok(if self.source.read(&mut one_byte)? == 0 {
            None
        } else {
            Some(one_byte[0])
        })
    }

    fn decode_escape_sequence(&mut self) -> Result<Key> {
        use Key::*;

        // If next byte does not arrive within next tick, ESC was pressed alone. Any other byte
        // is kept for next read since vi users often hit ESC and next key quickly.
        let header = match self.read_byte()? {
            Some(b) if b == b'[' || b == b'O' => b,
            Some(b) => {
                self.pending.push_front(b);
                return Ok(Esc);
            }
            None => return Ok(Esc),
        };

        // Terminal sends a whole sequence at once. When the header is not followed immediately
        // by a valid byte, ESC and the header were typed as keys (e.g. ESC then 'O' in vi)
        let first = match self.read_byte()? {
            Some(b) if header == b'[' || is_ss3_final(b) => b,
            Some(b) => {
                self.pending.push_front(b);
                self.pending.push_front(header);
                return Ok(Esc);
            }
            None => {
                self.pending.push_front(header);
                return Ok(Esc);
            }
        };

        // Eat the sequence until its final byte
        let mut buf = vec![];
        let mut next = Some(first);
        let cmd = loop {
            match next {
                // Control command chars from http://ascii-table.com/ansi-escape-sequences-vt-100.php
                Some(b) if b"ABCDFHKJRcfghlmnqty~".contains(&b) => break b,
                Some(b) => buf.push(b),
                None => return Ok(Unidentified),
            }
            next = self.read_byte()?;
        };

        fn parse_bytes_as_usize(b: &[u8]) -> Option<usize> {
            str::from_utf8(b).ok().and_then(|s| s.parse().ok())
        }

        let mut args = buf.split(|b| *b == b';');
        let key = match (header, cmd) {
            (b'[', b'R') => {
                // https://vt100.net/docs/vt100-ug/chapter3.html#CPR e.g. \x1b[24;80R
                let mut i = args.filter_map(parse_bytes_as_usize);
                match (i.next(), i.next()) {
                    (Some(r), Some(c)) => Cursor(r, c),
                    _ => Unidentified,
                }
            }
            (_, b'A') => Up,
            (_, b'B') => Down,
            (_, b'C') => Right,
            (_, b'D') => Left,
            (_, b'H') => Home,
            (_, b'F') => End,
            (b'[', b'~') => match args.next() {
                Some(b"5") => PageUp,
                Some(b"6") => PageDown,
                Some(b"1") | Some(b"7") => Home,
                Some(b"4") | Some(b"8") => End,
                Some(b"3") => Delete,
                _ => Unidentified,
            },
            _ => Unidentified,
        };
        Ok(key)
    }

    fn decode_utf8(&mut self, b: u8) -> Result<Key> {
        let mut buf = [b, 0, 0, 0];
        let mut len = 1;

        loop {
            match self.read_byte()? {
                Some(b) => {
                    buf[len] = b;
                    len += 1;
                }
                None => return Ok(Key::Unidentified),
            }

            if let Ok(s) = str::from_utf8(&buf[..len]) {
                return Ok(s.chars().next().map(Key::Char).unwrap_or(Key::Unidentified));
            }

            if len == 4 {
                return Ok(Key::Unidentified);
            }
        }
    }

    fn decode(&mut self, b: u8) -> Result<Key> {
        use Key::*;
        match b {
            0x1b => self.decode_escape_sequence(),
            b'\r' | b'\n' => Ok(Enter),
            0x08 | 0x7f => Ok(Backspace),
            b'\t' => Ok(Char('\t')),
            // 0x00~0x1f keys are ascii keys with ctrl. Ctrl mod masks key with 0b11111.
            0x00..=0x1f => Ok(Ctrl(b | 0b0110_0000)),
            0x20..=0x7e => Ok(Char(b as char)),
            0x80..=0xff => self.decode_utf8(b),
        }
    }

    fn read_key(&mut self) -> Result<Key> {
        if let Some(b) = self.read_byte()? {
            self.decode(b)
        } else {
            Ok(Key::Unidentified)
        }
    }
}

impl<R: Read> Iterator for KeyDecoder<R> {
    type Item = Result<Key>;

    // Read next byte with timeout 100ms. If nothing was read, it returns Key::Unidentified.
    // This method never returns None so for loop never ends
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_key())
    }
}
