/// Line entered in command mode (without the leading ':')
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nop,
    Quit,
    Write,
    WriteAs(String),
    WriteQuit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        match line {
            "" => Command::Nop,
            "q" => Command::Quit,
            "w" => Command::Write,
            "wq" | "x" => Command::WriteQuit,
            _ => {
                if let Some(name) = line.strip_prefix("w ") {
                    let name = name.trim();
                    if name.is_empty() {
                        Command::Write
                    } else {
                        Command::WriteAs(name.to_string())
                    }
                } else {
                    Command::Unknown(line.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse(""), Command::Nop);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("w"), Command::Write);
        assert_eq!(Command::parse("wq"), Command::WriteQuit);
        assert_eq!(Command::parse("x"), Command::WriteQuit);
    }

    #[test]
    fn parse_write_as() {
        assert_eq!(
            Command::parse("w out.txt"),
            Command::WriteAs("out.txt".to_string())
        );
        assert_eq!(
            Command::parse("w   spaced.txt  "),
            Command::WriteAs("spaced.txt".to_string())
        );
        assert_eq!(Command::parse("w  "), Command::Write);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(Command::parse("wx"), Command::Unknown("wx".to_string()));
        assert_eq!(Command::parse("q!"), Command::Unknown("q!".to_string()));
        assert_eq!(Command::parse(" q"), Command::Unknown(" q".to_string()));
    }
}
