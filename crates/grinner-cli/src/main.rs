use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use grinner_core::AngleProfile;
use tracing_subscriber::EnvFilter;

mod board;
mod commands;
mod error;
mod settings;

use error::{CliError, ErrorCode};
use settings::Settings;

#[derive(Parser)]
#[command(name = "grinner", version, about = "Lay keyboard switch rows out on a Grin curve")]
struct Cli {
    /// Log curve fitting and placement details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print placements for a row of key sizes
    Preview {
        /// Key sizes left to right, e.g. 1.5u 1u 1u 1.25u
        #[arg(value_name = "SIZE", required = true)]
        sizes: Vec<String>,

        #[command(flatten)]
        params: ParamArgs,

        /// Print placements as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move the selected switches of a board onto the curve
    Place {
        /// Board document (JSON)
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Re-open the row saved on this footprint and select its switches
        #[arg(long, value_name = "REF")]
        reopen: Option<String>,

        /// Write the placed board here instead of overwriting BOARD
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Compute and print placements without touching the board
        #[arg(long)]
        dry_run: bool,
    },
    /// List the rows saved on a board
    Rows {
        #[arg(value_name = "BOARD")]
        board: PathBuf,
    },
    /// Decode a saved parameter field
    Decode {
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// YAML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sag of the curve apex below the baseline, in mm
    #[arg(long, value_name = "MM")]
    sag: Option<f64>,

    /// Flat keys at both ends (0-2)
    #[arg(long, value_name = "N")]
    flat: Option<u8>,

    #[arg(long, value_name = "N")]
    flat_left: Option<u8>,

    #[arg(long, value_name = "N")]
    flat_right: Option<u8>,

    /// Angle profile: cosine, bezier or quadratic
    #[arg(long, value_name = "NAME")]
    profile: Option<AngleProfile>,

    /// Shift the apex toward the wider end key
    #[arg(long, conflicts_with = "symmetric")]
    asymmetric: bool,

    /// Keep the apex centered even if a saved row or settings file says otherwise
    #[arg(long)]
    symmetric: bool,
}

impl ParamArgs {
    fn overrides(&self) -> Settings {
        let asymmetric = match (self.asymmetric, self.symmetric) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Settings {
            sag: self.sag,
            flat: self.flat,
            flat_left: self.flat_left,
            flat_right: self.flat_right,
            profile: self.profile,
            asymmetric,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Preview {
            sizes,
            params,
            json,
        } => commands::preview(&sizes, &params, json),
        Command::Place {
            board,
            params,
            reopen,
            output,
            dry_run,
        } => commands::place(&commands::PlaceArgs {
            board,
            params,
            reopen,
            output,
            dry_run,
        }),
        Command::Rows { board } => commands::rows(&board),
        Command::Decode { text } => commands::decode(&text),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(ErrorCode::Usage as u8)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}
