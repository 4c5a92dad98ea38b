// Refs:
//   Build Your Own Text Editor: https://viewsourcecode.org/snaptoken/kilo/index.html
//   VT100 User Guide: https://vt100.net/docs/vt100-ug/chapter3.html

mod ansi_color;
mod command;
mod editor;
mod error;
mod history;
mod input;
mod mode;
mod row;
mod screen;
mod search;
mod signal;
mod status_bar;
mod terminal;
mod text_buffer;
mod viewport;


pub use editor::Editor;
pub use error::{Error, Result};
pub use input::{InputSequences, Key, KeyDecoder, StdinRawMode};
pub use mode::Mode;
pub use row::Row;
pub use screen::Screen;
pub use status_bar::StatusBar;
pub use terminal::{Frame, Terminal, Tty};
pub use text_buffer::{Limits, Lines, TextBuffer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
