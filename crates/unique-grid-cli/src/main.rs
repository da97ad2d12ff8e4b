//! Generate rotation-unique grids from the command line.
//!
//! The library never retries a failed search; trying successively larger
//! windows is caller policy, and this binary implements it behind
//! `--max-patch-size`.

use clap::Parser;
use log::LevelFilter;

use unique_grid::{construct, ConstructError, Grid, GridSpec};

#[derive(Parser)]
#[command(
    name = "unique-grid",
    version,
    about = "Generate rotation-unique binary grids for printable calibration targets"
)]
struct Cli {
    /// Number of grid rows
    #[arg(short, long, default_value_t = 4)]
    rows: usize,

    /// Number of grid columns
    #[arg(short, long, default_value_t = 4)]
    cols: usize,

    /// Window side length that identifies position and orientation
    #[arg(short, long, default_value_t = 3)]
    patch_size: usize,

    /// On an exhausted search, retry with larger windows up to this size
    #[arg(long)]
    max_patch_size: Option<usize>,

    /// Emit the grid as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("unrecognized log level '{0}'")]
    InvalidLogLevel(String),
    #[error(transparent)]
    Construct(#[from] ConstructError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let level: LevelFilter = cli
        .log_level
        .parse()
        .map_err(|_| CliError::InvalidLogLevel(cli.log_level.clone()))?;
    let _ = unique_grid::init_with_level(level);

    let grid = construct_escalating(cli)?;

    if cli.json {
        // The fingerprint rides along as a string; it can exceed the
        // range JSON numbers portably represent.
        let fingerprint = grid.fingerprint().ok().map(|fp| fp.to_string());
        let doc = serde_json::json!({
            "grid": grid,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("patch_size = {}", grid.patch_size());
        match grid.fingerprint() {
            Ok(fp) => println!("fingerprint = {fp}"),
            Err(err) => log::debug!("fingerprint unavailable: {err}"),
        }
        print!("{grid}");
    }

    Ok(())
}

/// Run the search, stepping `patch_size` up to `--max-patch-size` while
/// the tree keeps exhausting.
fn construct_escalating(cli: &Cli) -> Result<Grid, CliError> {
    let max = cli.max_patch_size.unwrap_or(cli.patch_size).max(cli.patch_size);
    for patch_size in cli.patch_size..=max {
        let spec = GridSpec {
            rows: cli.rows,
            cols: cli.cols,
            patch_size,
        };
        match construct(spec) {
            Ok(grid) => {
                log::info!("found {}x{} grid with patch_size {patch_size}", cli.rows, cli.cols);
                return Ok(grid);
            }
            Err(ConstructError::Exhausted { .. }) if patch_size < max => {
                log::warn!(
                    "no {}x{} grid with patch_size {patch_size}, retrying with {}",
                    cli.rows,
                    cli.cols,
                    patch_size + 1
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
    unreachable!("escalation loop returns on its final iteration")
}
