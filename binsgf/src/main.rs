//! SGF command-line tool for checking, summarizing, and transcoding game records.
//!
//! Usage: sgf [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (summary, sgf, json, yaml, toml, cbor)
//!                          [default: summary]
//!   -w, --write            Write output next to the input, with the format's extension
//!   -o, --output <FILE>    Write output to specified file
//!       --check            Print `ok` or the first error (exit 0 if valid, 1 if invalid)
//!   -v, --verbose          Raise log verbosity (repeat for trace); RUST_LOG overrides
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Without a path the document is read from stdin. A directory argument
//! processes every `.sgf` file in it, in name order.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use libsgf::{parse_with_filename, props, to_sgf, Game};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod transcode;

#[derive(Parser, Debug)]
#[command(name = "sgf", version)]
#[command(about = "Check, summarize, and transcode SGF game records", long_about = None)]
struct Cli {
    /// Input .sgf file or directory; stdin when omitted
    path: Option<PathBuf>,

    /// Output format
    #[arg(short = 't', long = "to", value_enum, default_value_t = Format::Summary)]
    to: Format,

    /// Write output to specified file
    #[arg(short, long, conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Write output next to the input, with the format's extension
    #[arg(short, long)]
    write: bool,

    /// Only report whether the record parses cleanly
    #[arg(long, conflicts_with_all = ["output", "write"])]
    check: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Summary,
    Sgf,
    Json,
    Yaml,
    Toml,
    Cbor,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Summary => "txt",
            Format::Sgf => "sgf",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Cbor => "cbor",
        }
    }
}

enum Output {
    Text(String),
    Binary(Vec<u8>),
}

impl Output {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Output::Text(s) => s.as_bytes(),
            Output::Binary(b) => b,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Process the requested input. Returns whether every record was clean.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.path {
        Some(path) if path.is_dir() => {
            if cli.output.is_some() {
                bail!("--output cannot be used with a directory");
            }
            process_directory(path, cli)
        }
        Some(path) => {
            let input =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            process_input(&input, Some(path), cli)
        }
        None => {
            if cli.write {
                bail!("--write requires an input file");
            }
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            process_input(&input, None, cli)
        }
    }
}

fn process_directory(dir: &Path, cli: &Cli) -> Result<bool> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()));
    let (paths, unreadable) = sgf_files(entries);
    debug!(dir = %dir.display(), files = paths.len(), "processing directory");

    let mut clean = unreadable.is_empty();
    for err in &unreadable {
        eprintln!("Error: reading an entry of {}: {}", dir.display(), err);
    }
    for path in &paths {
        let result = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|input| process_input(&input, Some(path), cli));
        match result {
            Ok(ok) => clean &= ok,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                clean = false;
            }
        }
    }
    Ok(clean)
}

/// Sort directory entries into `.sgf` paths, in name order, and the errors
/// met while listing them.
fn sgf_files(
    entries: impl IntoIterator<Item = io::Result<PathBuf>>,
) -> (Vec<PathBuf>, Vec<io::Error>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.extension().is_some_and(|ext| ext == "sgf") => paths.push(path),
            Ok(_) => {}
            Err(err) => errors.push(err),
        }
    }
    paths.sort();
    (paths, errors)
}

fn process_input(input: &str, input_file: Option<&Path>, cli: &Cli) -> Result<bool> {
    let label = input_file.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    let filename = input_file
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string());
    let game = parse_with_filename(input, filename.as_deref());

    if cli.check {
        match game.errors().first() {
            None if input_file.is_some() => println!("{}: ok", label),
            None => println!("ok"),
            Some(err) => eprintln!("{}: {}", label, err),
        }
        return Ok(game.is_ok());
    }

    // A broken record is still rendered, up to the point of the error.
    for err in game.errors() {
        eprintln!("{}: {}", label, err);
    }
    let output = render(&game, cli.to)?;
    write_output(&output, cli.output.as_deref(), cli.write, input_file, cli.to)?;
    Ok(game.is_ok())
}

fn render(game: &Game, format: Format) -> Result<Output> {
    use transcode::{cbor, json, toml, yaml};

    let shape = || transcode::record(game).map_err(anyhow::Error::msg);
    let output = match format {
        Format::Summary => Output::Text(summary(game)?),
        Format::Sgf => Output::Text(to_sgf(game)),
        Format::Json => Output::Text(json::encode(&shape()?).map_err(anyhow::Error::msg)?),
        Format::Yaml => Output::Text(yaml::encode(&shape()?).map_err(anyhow::Error::msg)?),
        Format::Toml => Output::Text(toml::encode(&shape()?).map_err(anyhow::Error::msg)?),
        Format::Cbor => Output::Binary(cbor::encode(&shape()?).map_err(anyhow::Error::msg)?),
    };
    Ok(output)
}

/// Human-readable overview: header properties by their catalog names, the
/// players, and the shape of the main line.
fn summary(game: &Game) -> Result<String> {
    let mut out = String::new();
    for (name, value) in game.info().sorted() {
        let label = props::describe(name).unwrap_or(name);
        writeln!(out, "{}: {}", label, value)?;
    }

    let info = game.info();
    writeln!(out, "Black: {}", info.black_player())?;
    writeln!(out, "White: {}", info.white_player())?;

    let moves = game
        .main_line()
        .filter(|node| node.move_property().is_some())
        .count();
    let branches = game
        .main_line()
        .filter(|node| node.variations().next().is_some())
        .count();
    writeln!(out, "Main line: {} nodes, {} moves", game.node_count(), moves)?;
    writeln!(out, "Branch points: {}", branches)?;

    for err in game.errors() {
        writeln!(out, "Error: {}", err)?;
    }
    Ok(out)
}

fn write_output(
    output: &Output,
    output_file: Option<&Path>,
    write_back: bool,
    input_file: Option<&Path>,
    format: Format,
) -> Result<()> {
    if let Some(path) = output_file {
        fs::write(path, output.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote output");
    } else if write_back {
        let input_path = input_file.context("--write requires an input file")?;
        let output_path = input_path.with_extension(format.extension());
        fs::write(&output_path, output.as_bytes())
            .with_context(|| format!("writing {}", output_path.display()))?;
        info!(path = %output_path.display(), "wrote output");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.as_bytes())
            .context("writing to stdout")?;
        // Ensure text output ends with newline
        if let Output::Text(text) = output {
            if !text.ends_with('\n') {
                handle.write_all(b"\n").context("writing to stdout")?;
            }
        }
    }
    Ok(())
}
