//! hdevedit - terminal editor for HALCON HDevelop programs

mod buffer;
mod command;
mod display;
mod editor;
mod input;
mod terminal;
mod window;

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hdevedit::config::Config;
use hdevedit::document::Document;
use hdevedit::error::{EditorError, Result};
use hdevedit::transcode;

use editor::EditorState;
use terminal::Terminal;

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Help,
    Version,
    /// Decode a program and print its lines
    Print(PathBuf),
    /// Encode a plain text file as a program
    Convert(PathBuf, PathBuf),
    /// Interactive editor, optionally on a file
    Edit(Option<PathBuf>),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mode = parse_args(&args)?;

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    match mode {
        Mode::Help => print_usage(),
        Mode::Version => print_version(),
        Mode::Print(path) => {
            init_logging(None)?;
            report_config_error(config_error);
            print_program(&path)?;
        }
        Mode::Convert(input, output) => {
            init_logging(None)?;
            report_config_error(config_error);
            let count = convert(&input, &output)?;
            info!("converted {} lines", count);
        }
        Mode::Edit(path) => {
            // Only a file may receive log output while the terminal is raw
            if let Some(log_file) = &config.log_file {
                init_logging(Some(log_file))?;
            }
            report_config_error(config_error);
            edit(config, path.as_deref())?;
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Mode> {
    let Some(first) = args.first() else {
        return Ok(Mode::Edit(None));
    };

    let mode = match first.as_str() {
        "--help" | "-h" => Mode::Help,
        "--version" | "-V" => Mode::Version,
        "--print" | "-p" => match &args[1..] {
            [file] => Mode::Print(PathBuf::from(file)),
            _ => return Err(usage_error("--print takes one FILE")),
        },
        "--convert" | "-c" => match &args[1..] {
            [input, output] => Mode::Convert(PathBuf::from(input), PathBuf::from(output)),
            _ => return Err(usage_error("--convert takes IN and OUT")),
        },
        option if option.starts_with('-') => {
            return Err(usage_error(&format!("unknown option {}", option)))
        }
        file => {
            if args.len() > 1 {
                return Err(usage_error("only one FILE may be given"));
            }
            Mode::Edit(Some(PathBuf::from(file)))
        }
    };
    Ok(mode)
}

fn usage_error(msg: &str) -> EditorError {
    EditorError::Message(format!("{} (see --help)", msg))
}

/// Install the tracing subscriber
///
/// Output goes to `log_file` when given, otherwise to stderr. `RUST_LOG`
/// overrides the default `warn` level.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| EditorError::Message(format!("cannot initialise logging: {}", e)))
}

fn report_config_error(error: Option<EditorError>) {
    if let Some(e) = error {
        warn!("ignoring configuration file: {}", e);
    }
}

/// Decode a program and print one line per node
fn print_program(path: &Path) -> Result<()> {
    let document = transcode::load(path)?;
    for line in document.lines() {
        println!("{}", line.text());
    }
    Ok(())
}

/// Encode a plain text file as a program, returning the line count
fn convert(input: &Path, output: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EditorError::FileNotFound(input.display().to_string()),
        _ => EditorError::Io(e),
    })?;
    let document = Document::from_text(&text);
    transcode::save(&document, output)?;
    Ok(document.len())
}

fn edit(config: Config, path: Option<&Path>) -> Result<()> {
    let terminal = Terminal::new()?;
    let mut editor = EditorState::new(terminal, config);

    if let Some(path) = path {
        if path.exists() {
            if let Err(e) = editor.open_file(path) {
                warn!("opening {} failed: {}", path.display(), e);
                editor
                    .display
                    .set_message(format!("Cannot open {}: {}", path.display(), e));
            }
        } else {
            editor.open_new_file(path);
        }
    }

    editor.run()
}

fn print_usage() {
    println!("hdevedit {} - editor for HALCON HDevelop programs", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: hdevedit [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -p, --print FILE       Print the lines of a program");
    println!("  -c, --convert IN OUT   Save plain text IN as program OUT");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Key bindings:");
    println!("  C-o            Open program");
    println!("  C-s, C-x C-s   Save");
    println!("  C-x C-w        Save as");
    println!("  C-x C-n        New program");
    println!("  C-x n          Toggle line numbers");
    println!("  C-x h          Toggle syntax highlighting");
    println!("  C-k            Kill to end of line");
    println!("  C-v, PageDown  Scroll down one page");
    println!("  M-v, PageUp    Scroll up one page");
    println!("  M-<, M->       Beginning / end of program");
    println!("  C-l            Redraw screen");
    println!("  C-g            Abort current operation");
    println!("  C-q, C-x C-c   Quit");
    println!();
    println!("Settings are read from ~/.hdevedit.toml");
}

fn print_version() {
    println!("hdevedit {}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&[]).unwrap(), Mode::Edit(None));
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Mode::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Mode::Version);
        assert_eq!(
            parse_args(&args(&["prog.hdev"])).unwrap(),
            Mode::Edit(Some(PathBuf::from("prog.hdev")))
        );
        assert_eq!(
            parse_args(&args(&["-p", "prog.hdev"])).unwrap(),
            Mode::Print(PathBuf::from("prog.hdev"))
        );
        assert_eq!(
            parse_args(&args(&["--convert", "in.txt", "out.hdev"])).unwrap(),
            Mode::Convert(PathBuf::from("in.txt"), PathBuf::from("out.hdev"))
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
        assert!(parse_args(&args(&["-p"])).is_err());
        assert!(parse_args(&args(&["-c", "only-one"])).is_err());
        assert!(parse_args(&args(&["a.hdev", "b.hdev"])).is_err());
    }

    #[test]
    fn test_convert() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("prog.txt");
        let output = dir.path().join("prog.hdev");
        std::fs::write(&input, "read_image(Image, 'board')\n* a comment\nstop\n").unwrap();

        assert_eq!(convert(&input, &output).unwrap(), 3);
        let document = transcode::load(&output).unwrap();
        let lines: Vec<&str> = document.lines().iter().map(|l| l.text()).collect();
        assert_eq!(lines, vec!["read_image(Image, 'board')", "a comment", "stop"]);
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert(&dir.path().join("missing.txt"), &dir.path().join("out.hdev"));
        assert!(matches!(result, Err(EditorError::FileNotFound(_))));
    }
}
