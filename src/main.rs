use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use reflink::commands::{self, Outcome};
use reflink::config::Config;
use reflink::diagnostics;
use reflink::error::Error;
use reflink::host::{Buffer, TerminalPrompter};
use reflink::types::{ReferenceKind, Selection};

#[derive(Parser)]
#[command(name = "reflink", about = "Convert markdown selections into reference-style links")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace selections with `![text][n]` and define `[n]: url`
    Image(ConvertArgs),
    /// Replace selections with `[text][n]` and define `[n]: url`
    Link(ConvertArgs),
    /// List reference definitions and the next free index
    List {
        /// Markdown file to read
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Markdown file to edit
    file: PathBuf,
    /// Zero-based range to convert, as LINE:CHAR-LINE:CHAR (repeatable)
    #[arg(short, long = "selection", required = true)]
    selections: Vec<Selection>,
    /// Print the result instead of writing the file
    #[arg(long)]
    stdout: bool,
    /// Link target; prompted for when omitted
    #[arg(long)]
    url: Option<String>,
}

fn main() -> ExitCode {
    // RUST_LOG=debug shows how the reference was chosen and placed.
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Image(args) => cmd_convert(ReferenceKind::Image, args),
        Commands::Link(args) => cmd_convert(ReferenceKind::Link, args),
        Commands::List { file, json } => cmd_list(&file, json),
    };

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Read a markdown file, mapping a missing file to a clear diagnostic.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file doesn't exist, `Error::Io` otherwise.
fn read_document(path: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::FileNotFound { path: path.to_path_buf() })
        },
        other => Ok(other?),
    };
}

/// Convert the selections in one file and write the result back.
///
/// # Errors
///
/// Returns errors from config loading, file I/O, prompting, or editing.
fn cmd_convert(kind: ReferenceKind, args: ConvertArgs) -> Result<(), Error> {
    let config = Config::load(Path::new("."))?;
    let text = read_document(&args.file)?;
    let mut buffer = Buffer::new(text, args.selections);

    let stdin = std::io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), std::io::stderr());

    match commands::insert_reference(&mut buffer, &mut prompter, kind, args.url.as_deref(), &config)? {
        Outcome::Cancelled => {
            eprintln!("Cancelled, {} unchanged.", args.file.display());
            return Ok(());
        },
        Outcome::Applied(reference) => {
            if args.stdout {
                std::io::stdout().write_all(buffer.text().as_bytes())?;
            } else {
                std::fs::write(&args.file, buffer.text())?;
            }
            let how = if reference.existed { "reused" } else { "added" };
            eprintln!("[{}]: {} ({how})", reference.index, reference.url);
        },
    }

    return Ok(());
}

/// Print the reference definitions of one file.
///
/// # Errors
///
/// Returns errors from file I/O or JSON serialization.
fn cmd_list(file: &Path, json: bool) -> Result<(), Error> {
    let buffer = Buffer::new(read_document(file)?, Vec::new());
    let listing = commands::list_references(&buffer);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for reference in &listing.references {
        println!("{:>6}  [{}]: {}", reference.line_number, reference.index, reference.url);
    }
    println!();
    let count = listing.references.len();
    println!("{count} references, next index {}", listing.next_index);
    return Ok(());
}
