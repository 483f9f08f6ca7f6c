//! zstd-pbf
//!
//! Re-compress the blobs of an OSM PBF file with zstd.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::{info, Level};

use pbf_core::compression::CompressionLevel;
use pbf_core::stream::{transcode_file, TranscodeConfig};
use pbf_core::telemetry::Stage;
use pbf_core::types::StreamError;

#[derive(Debug, Parser)]
#[command(
    name = "zstd-pbf",
    version,
    about = "Re-compress the blobs of an OSM PBF file with zstd",
    group(ArgGroup::new("level").args(["fastest", "better", "best"]).multiple(false))
)]
struct Args {
    /// Use the fastest compression level
    #[arg(long)]
    fastest: bool,

    /// Use a compression level with better compression than default
    #[arg(long)]
    better: bool,

    /// Use the compression level with the best compression
    #[arg(long)]
    best: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Print run statistics as JSON on stderr
    #[arg(long)]
    stats: bool,

    /// Decode every new zstd payload and compare it with the raw input
    #[arg(long)]
    verify: bool,

    /// Input PBF file
    in_file: PathBuf,

    /// Output PBF file; must not exist
    out_file: PathBuf,
}

impl Args {
    fn level(&self) -> CompressionLevel {
        if self.fastest {
            CompressionLevel::Fastest
        } else if self.better {
            CompressionLevel::Better
        } else if self.best {
            CompressionLevel::Best
        } else {
            CompressionLevel::Default
        }
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Name the failing operation and the file it touched.
fn describe(err: &StreamError, input: &Path, output: &Path) -> String {
    let StreamError::Frame { index, stage, .. } = err else {
        return match err {
            StreamError::OutputExists(_) => "refusing to overwrite existing output".to_string(),
            _ => format!("could not transcode '{}' into '{}'", input.display(), output.display()),
        };
    };
    let input = input.display();
    match stage {
        Stage::Read => format!("could not read frame {index} from '{input}'"),
        Stage::Decode => format!("could not decode blob of frame {index} in '{input}'"),
        Stage::Decompress => format!("could not decompress blob of frame {index} in '{input}'"),
        Stage::Compress => format!("could not re-compress blob of frame {index} in '{input}'"),
        Stage::Encode => format!("could not serialize frame {index} of '{input}'"),
        Stage::Write => format!("could not write frame {index} to '{}'", output.display()),
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = TranscodeConfig::new(args.level()).with_verify(args.verify);

    let snapshot = match transcode_file(&args.in_file, &args.out_file, &config) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            let context = describe(&e, &args.in_file, &args.out_file);
            return Err(e).context(context);
        }
    };

    info!(
        frames = snapshot.frames,
        bytes_in = snapshot.bytes_in,
        bytes_out = snapshot.bytes_out,
        ratio = snapshot.compression_ratio,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "done"
    );

    if args.stats {
        let json = serde_json::to_string_pretty(&snapshot).context("could not serialize statistics")?;
        eprintln!("{json}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.chain().count() > 1 {
                eprintln!("error: {err}: {}", err.root_cause());
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}
