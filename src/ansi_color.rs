//! SGR sequences for the few colored parts of the screen: line numbers in the gutter, tildes
//! past the end of the document, the inverted status line and error messages on it.
//! Sequences are chosen by how many colors the terminal supports.

use std::env;
use term::terminfo::TermInfo;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ColorSupport {
    TrueColor,
    Extended256,
    Only16,
}

impl ColorSupport {
    // COLORTERM is checked first since terminfo cannot tell 24bit colors
    fn detect(colorterm: Option<&str>, terminfo_colors: Option<u32>) -> ColorSupport {
        match (colorterm, terminfo_colors) {
            (Some("truecolor"), _) | (Some("24bit"), _) => ColorSupport::TrueColor,
            (_, Some(n)) if n >= 256 => ColorSupport::Extended256,
            _ => ColorSupport::Only16,
        }
    }

    pub fn from_env() -> ColorSupport {
        let colorterm = env::var("COLORTERM").ok();
        let colors = TermInfo::from_env()
            .ok()
            .and_then(|info| info.numbers.get("colors").copied());
        Self::detect(colorterm.as_deref(), colors)
    }
}

/// What a piece of text on screen is, rather than which color it gets.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ScreenColor {
    Reset,
    LineNumber,
    Tilde,
    StatusLine,
    ErrorMessage,
}

impl ScreenColor {
    // 'm' sets attributes to text printed after: https://vt100.net/docs/vt100-ug/chapter3.html#SGR
    // 256 colors sequences are '\x1b[38;5;<n>m' (for fg) or '\x1b[48;5;<n>m (for bg)
    pub fn sequence(self, support: ColorSupport) -> &'static [u8] {
        use ScreenColor::*;
        match (self, support) {
            (Reset, _) => b"\x1b[39;0m",
            (StatusLine, _) => b"\x1b[7m",
            (LineNumber, ColorSupport::TrueColor) => b"\x1b[38;2;168;153;132m",
            (LineNumber, ColorSupport::Extended256) => b"\x1b[38;5;246m",
            (LineNumber, ColorSupport::Only16) => b"\x1b[90m",
            (Tilde, ColorSupport::TrueColor) => b"\x1b[38;2;131;165;152m",
            (Tilde, ColorSupport::Extended256) => b"\x1b[38;5;109m",
            (Tilde, ColorSupport::Only16) => b"\x1b[94m",
            (ErrorMessage, ColorSupport::TrueColor) => b"\x1b[48;2;204;36;29m",
            (ErrorMessage, ColorSupport::Extended256) => b"\x1b[48;5;124m",
            (ErrorMessage, ColorSupport::Only16) => b"\x1b[41m",
        }
    }
}
