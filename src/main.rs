use anyhow::Context;
use clap::{Parser, Subcommand};
use phx_phpp::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phx")]
#[command(about = "Write PHX building-energy models into localized PHPP workbooks.")]
#[command(long_about = "PHX → PHPP - write a PHX project into a PHPP workbook

The workbook's version and language are read from its 'Data' worksheet and
the matching shape locates every input table, so user-inserted rows and
localized layouts are handled without configuration.

COMMANDS:
  write    - Write a project into a PHPP and save the result
  inspect  - Show the PHPP version, language and shape in use
  locate   - Show the rows of every table section

EXAMPLES:
  phx write house.json phpp.xlsx -o house-phpp.xlsx
  phx write house.yaml phpp.xlsx -o out.xlsx --activate-variants
  phx locate phpp.xlsx

SHAPES:
  Only the English PHPP 10.6 shape (EN_10_6.json) is built in. German (DE)
  and Spanish (ES) workbooks, and other versions, need --shapes-dir or
  PHX_SHAPES_DIR pointing at a directory of {LANG}_{MAJOR}_{MINOR}.json files.

LOGGING:
  RUST_LOG=phx_phpp=debug shows every section scan and cell write.")]
#[command(version)]
struct Cli {
    /// Directory of PHPP shape files to use instead of the built-in EN_10_6 one
    /// (required for DE and ES workbooks)
    #[arg(long, global = true, env = "PHX_SHAPES_DIR")]
    shapes_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Write a PHX project into a PHPP workbook.

Writes certification settings, climate, assemblies, window and ventilation
components, surfaces, thermal bridges, windows, shading, ventilation,
hot water and appliances, then saves a new workbook.

Tables with more entries than the PHPP has rows for are truncated with a
warning. easyPH workbooks only get the envelope data.

NOTE: cell formatting of the source workbook is not carried over.")]
    /// Write a project into a PHPP and save the result
    Write {
        /// Path to the PHX project (.json, .yaml or .yml)
        project: PathBuf,

        /// Path to the PHPP workbook (.xlsx)
        phpp: PathBuf,

        /// Output workbook path (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Link assemblies, windows and ventilation to the Variants worksheet
        #[arg(long)]
        activate_variants: bool,
    },

    /// Show the PHPP version, language and shape in use
    Inspect {
        /// Path to the PHPP workbook (.xlsx)
        phpp: PathBuf,
    },

    /// Show the header, first and last entry rows of every table section
    Locate {
        /// Path to the PHPP workbook (.xlsx)
        phpp: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "phx_phpp=debug" } else { "phx_phpp=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Write {
            project,
            phpp,
            output,
            activate_variants,
        } => cli::write(project.clone(), phpp.clone(), output, activate_variants, cli.shapes_dir)
            .with_context(|| format!("writing {} into {}", project.display(), phpp.display())),

        Commands::Inspect { phpp } => cli::inspect(phpp.clone(), cli.shapes_dir)
            .with_context(|| format!("inspecting {}", phpp.display())),

        Commands::Locate { phpp } => cli::locate(phpp.clone(), cli.shapes_dir)
            .with_context(|| format!("locating sections in {}", phpp.display())),
    }
}
