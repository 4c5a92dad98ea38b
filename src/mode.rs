#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    Search,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "-- NORMAL --",
            Mode::Insert => "-- INSERT --",
            Mode::Command => "-- COMMAND --",
            Mode::Search => "-- SEARCH --",
        }
    }
}
