use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use db_schema_diff::serialize::SnapshotFormat;
use db_schema_diff::{
    compare_snapshots, convert_snapshot, generate_script, CompareOptions, ConvertOptions,
    ScriptOptions,
};

#[derive(Parser)]
#[command(name = "db-schema-diff")]
#[command(author, version, about = "Structural diff of database schema snapshots")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Binary,
    Xml,
}

impl From<FormatArg> for SnapshotFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Binary => SnapshotFormat::Binary,
            FormatArg::Xml => SnapshotFormat::Xml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a checked snapshot against a master snapshot
    Compare {
        /// Snapshot of the reference database
        #[arg(short, long)]
        master: PathBuf,

        /// Snapshot of the database to check
        #[arg(short, long)]
        checked: PathBuf,

        /// Also list objects that are equal
        #[arg(short, long)]
        all: bool,
    },
    /// Generate a DDL creation script from a snapshot
    Script {
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-encode a snapshot as binary or XML
    Convert {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Target format (defaults to the output file extension)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compare {
            master,
            checked,
            all,
        } => {
            let options = CompareOptions {
                master_path: master,
                checked_path: checked,
                show_equal: all,
            };

            let outcome = compare_snapshots(&options)?;
            print!("{}", outcome.report);
            if outcome.has_differences() {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Script { input, output } => {
            let options = ScriptOptions {
                input_path: input,
                output_path: output,
            };

            let script = generate_script(&options)?;
            if options.output_path.is_none() {
                print!("{}", script);
            }
        }
        Commands::Convert {
            input,
            output,
            format,
        } => {
            let options = ConvertOptions {
                input_path: input,
                output_path: output,
                format: format.map(Into::into),
            };

            convert_snapshot(&options)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
