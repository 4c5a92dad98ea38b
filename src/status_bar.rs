use crate::mode::Mode;
use crate::text_buffer::TextBuffer;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum StatusMessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusMessageKind,
}

impl StatusMessage {
    fn new<S: Into<String>>(message: S, kind: StatusMessageKind) -> StatusMessage {
        StatusMessage {
            text: message.into(),
            kind,
        }
    }
}

// Contents of the status line at the bottom of screen
pub struct StatusBar {
    pub mode: Mode,
    pub filename: String,
    pub line_pos: (usize, usize), // (current line, total lines). 1-based
    pub col: usize,               // 1-based
    pub message: StatusMessage,
}

impl StatusBar {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            mode: Mode::Normal,
            filename: "[No Name]".to_string(),
            line_pos: (1, 1),
            col: 1,
            message: StatusMessage::new(message, StatusMessageKind::Info),
        }
    }

    pub fn update(&mut self, mode: Mode, buf: &TextBuffer) {
        self.mode = mode;
        if self.filename != buf.filename() {
            self.filename = buf.filename().to_string();
        }
        self.line_pos = (buf.cy() + 1, buf.rows().len());
        self.col = buf.cx() + 1;
    }

    pub fn left(&self) -> String {
        let (y, len) = self.line_pos;
        format!(
            "{} | {} Ln {}/{}, Col {} ",
            self.mode.name(),
            self.filename,
            y,
            len,
            self.col,
        )
    }

    pub fn set_info_message<S: Into<String>>(&mut self, message: S) {
        self.message = StatusMessage::new(message, StatusMessageKind::Info);
    }

    pub fn set_error_message<S: Into<String>>(&mut self, message: S) {
        self.message = StatusMessage::new(message, StatusMessageKind::Error);
    }

    pub fn message_text(&self) -> &str {
        self.message.text.as_str()
    }
}
