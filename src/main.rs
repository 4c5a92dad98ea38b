use clap::Parser;
use minivi::{Editor, Limits, StdinRawMode, Tty};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

const KEYS_HELP: &str = "Normal mode:
    i a A o O   Enter insert mode (ESC goes back)
    h j k l     Move cursor (arrow keys also work)
    0 ^ $       Move to start or end of line
    gg G        Move to first or last line
    x dd yy p   Delete char, delete line, yank line, paste
    u           Undo last change
    /           Search forward
    :w :q :wq   Save, quit, save and quit";

/// A minimal modal text editor
#[derive(Parser, Debug)]
#[command(name = "minivi", version, after_help = KEYS_HELP)]
struct Args {
    /// File to edit. It is created on first save when it does not exist
    file: Option<PathBuf>,
    /// Write debug log to FILE. Verbosity follows RUST_LOG (default: info)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn init_logger(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn edit(file: Option<&Path>) -> minivi::Result<()> {
    let input = StdinRawMode::new()?.input_keys();
    let tty = Tty::new(input, io::stdout(), None)?;
    let mut editor = match file {
        Some(path) => Editor::open(path, tty, Limits::default()),
        None => Editor::new(tty),
    };
    editor.edit()?;
    // Leave the terminal clean for shell
    editor.terminal_mut().clear()
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log {
        if let Err(err) = init_logger(path) {
            eprintln!("Error: could not open log file {}: {}", path.display(), err);
            exit(1);
        }
    }
    log::info!("minivi {} started", minivi::VERSION);

    if let Err(err) = edit(args.file.as_deref()) {
        log::error!("{}", err);
        eprintln!("Error: {}", err);
        exit(1);
    }
}
