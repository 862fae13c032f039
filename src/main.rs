//! # Tabba - A Tablature Editor
//!
//! Guitar and bass tab, one row at a time.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the current guitar part
//! cargo run -- show
//!
//! # Add two rows to the bass part
//! cargo run -- --instrument bass add-row 2
//!
//! # Press keys the way the text widget would
//! cargo run -- key enter ctrl+backspace
//!
//! # Save the tab and export it
//! cargo run -- name "Blues in A" && cargo run -- save && cargo run -- download
//! ```

mod clipboard;
mod session;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session::Session;
use tabba_core::{
    Command, CommandOutcome, Config, DeviceClass, Export, FileStore, Instrument, KeyOutcome,
    KeyPress, Persistence,
};

/// Tabba - a guitar and bass tablature editor
#[derive(Parser, Debug)]
#[command(name = "tabba")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Instrument part to work on
    #[arg(short, long, value_parser = parse_instrument, global = true)]
    instrument: Option<Instrument>,

    /// Device class: narrow (mobile) or wide (desktop)
    #[arg(short, long, value_parser = parse_device, global = true)]
    device: Option<DeviceClass>,

    /// Derive the device class from a browser user-agent string
    #[arg(long, value_name = "UA", global = true, conflicts_with = "device")]
    user_agent: Option<String>,

    /// Tab store directory
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the active part
    Show {
        /// Also print name, title, row count and string labels
        #[arg(long)]
        stats: bool,
    },
    /// Append blank rows
    AddRow {
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Delete rows from the end (the last row always stays)
    DeleteRow {
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Reset the active part to one blank row
    Reset,
    /// Replace the active part with text from a file (or stdin)
    Edit {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Rename the active part
    Title { text: String },
    /// Rename the tab
    Name { text: String },
    /// Copy the active part to the clipboard
    Copy {
        /// Print instead of using the system clipboard
        #[arg(long)]
        stdout: bool,
    },
    /// Write the whole tab to a text file
    Download {
        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
    /// Save the tab in the library under its name
    Save,
    /// Load a saved tab
    Load { name: String },
    /// Delete a saved tab
    Remove { name: String },
    /// List saved tabs
    List,
    /// Simulate key presses, e.g. `enter`, `shift+enter`, `ctrl+backspace`
    Key {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print keyboard shortcuts
    Shortcuts,
    /// Run commands from a file (or stdin), one per line
    Script {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn parse_instrument(s: &str) -> Result<Instrument, String> {
    Instrument::parse(s).ok_or_else(|| format!("unknown instrument {s:?} (expected guitar or bass)"))
}

fn parse_device(s: &str) -> Result<DeviceClass, String> {
    DeviceClass::parse(s).ok_or_else(|| format!("unknown device {s:?} (expected narrow or wide)"))
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Tabba v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let persistence = Persistence::open(&config).context("Failed to open tab store")?;
    let mut session = Session::open(persistence, config, args.instrument);

    run(&mut session, args.command.unwrap_or(Action::Show { stats: false }))
}

/// Reads the config and applies command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::load(),
    };

    if let Some(device) = args.device {
        config.editor.device = device;
    } else if let Some(ua) = &args.user_agent {
        config.editor.device = DeviceClass::from_user_agent(ua);
    }
    if let Some(dir) = &args.store {
        config.storage.dir = Some(dir.clone());
    }

    tracing::debug!(device = %config.editor.device, "Config loaded");
    Ok(config)
}

fn run(session: &mut Session<FileStore>, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Show { stats } => show(session, stats),
        Action::AddRow { count } => {
            for _ in 0..count {
                session.run(Command::RowAdd);
            }
            show(session, false);
        }
        Action::DeleteRow { count } => {
            for _ in 0..count {
                session.run(Command::RowDelete);
            }
            show(session, false);
        }
        Action::Reset => {
            session.run(Command::Reset);
            show(session, false);
        }
        Action::Edit { file } => {
            let text = read_input(file.as_deref())?;
            session.run(Command::RawEdit { text });
        }
        Action::Title { text } => {
            session.run(Command::TitleEdit { text });
        }
        Action::Name { text } => {
            session.run(Command::NameEdit { text });
        }
        Action::Copy { stdout } => {
            let outcome = session.run(Command::Copy);
            deliver(outcome, stdout, Path::new("."))?;
        }
        Action::Download { output } => {
            let outcome = session.run(Command::Download);
            deliver(outcome, false, &output)?;
        }
        Action::Save => {
            session.run(Command::SaveNamed);
            println!("Tab saved!");
        }
        Action::Load { name } => {
            if session.editor().library().get(&name).is_none() {
                anyhow::bail!("No saved tab named {name:?}");
            }
            session.run(Command::LoadNamed { name });
            show(session, false);
        }
        Action::Remove { name } => {
            session.run(Command::DeleteNamed { name });
        }
        Action::List => {
            let library = session.editor().library();
            if library.is_empty() {
                println!("No saved tabs yet.");
            }
            for name in library.names() {
                println!("{name}");
            }
        }
        Action::Key { keys } => {
            for key_str in keys {
                let key = KeyPress::parse(&key_str)
                    .with_context(|| format!("Invalid key {key_str:?}"))?;
                match session.press(&key) {
                    KeyOutcome::Handled(outcome) => deliver(outcome, true, Path::new("."))?,
                    KeyOutcome::Passthrough => {
                        tracing::info!("{} passes through to the text widget", key);
                    }
                }
            }
            show(session, false);
        }
        Action::Shortcuts => {
            let editor = session.editor();
            let shortcuts = editor.keymap().shortcuts(editor.instrument(), editor.device());
            if shortcuts.is_empty() {
                println!("No keyboard shortcuts on {} devices; use the row commands.", editor.device());
            }
            for shortcut in shortcuts {
                println!("{} - {}", shortcut.keys, shortcut.description);
            }
        }
        Action::Script { file } => {
            let script = read_input(file.as_deref())?;
            for (n, line) in script.lines().enumerate() {
                let line = line.trim_end_matches('\r');
                if line.trim().is_empty() || line.trim_start().starts_with('#') {
                    continue;
                }
                let command: Command = line
                    .parse()
                    .with_context(|| format!("Script line {}", n + 1))?;
                let outcome = session.run(command);
                deliver(outcome, false, Path::new("."))?;
            }
            show(session, false);
        }
    }
    Ok(())
}

fn show(session: &Session<FileStore>, stats: bool) {
    let editor = session.editor();
    if stats {
        let labels: Vec<String> = editor.string_labels().iter().map(ToString::to_string).collect();
        println!("Tab:     {}", editor.tab().name);
        println!("Part:    {} ({})", editor.active_part().title, editor.instrument());
        println!("Rows:    {}", editor.row_count());
        println!("Strings: {}", labels.join(" "));
        println!();
    }
    println!("{}", editor.content());
}

/// Hands a command's result to the outside world.
fn deliver(outcome: CommandOutcome, to_stdout: bool, dir: &Path) -> anyhow::Result<()> {
    match outcome {
        CommandOutcome::Done => {}
        CommandOutcome::Copied(text) => {
            if to_stdout {
                println!("{text}");
            } else {
                match clipboard::copy(&text) {
                    Ok(transport) => {
                        tracing::debug!(?transport, "Copied");
                        println!("Copied to clipboard!");
                    }
                    Err(e) => {
                        tracing::warn!("Clipboard unavailable, printing instead: {}", e);
                        println!("{text}");
                    }
                }
            }
        }
        CommandOutcome::Exported(export) => {
            let path = write_export(&export, dir)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn write_export(export: &Export, dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join(&export.file_name);
    std::fs::write(&path, &export.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
