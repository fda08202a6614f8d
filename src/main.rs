// LogSift - GPL-3.0-or-later
// This file is part of LogSift.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogSift is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogSift is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogSift.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context;
use clap::Parser;
use logsift::report::Report;
use logsift::{analyze, parse_file, AnalyzerConfig, Error, ParseOptions, Vendor};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "ram-profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(author = "LogSift Team")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LOGSIFT_GIT_REVISION"), ")"))]
#[command(about = "Summarize PaloAlto, UniFi, WatchGuard and Meraki syslog exports", long_about = None)]
struct Args {
    /// Log source: palo-alto, unifi, watchguard or meraki
    #[arg(value_name = "VENDOR")]
    vendor: Vendor,

    /// Path to the syslog export
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Rows per table (default: 5 for palo-alto, 10 otherwise)
    #[arg(long)]
    top: Option<usize>,

    /// Share in percent at which a group is reported as noise
    #[arg(long, value_name = "PERCENT")]
    noise_threshold: Option<f64>,

    /// Year for syslog timestamps, which carry none (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Config file to use instead of the one in the user config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Path for the DHAT heap profiling output (only used when built with --features ram-profiling)
    #[cfg(feature = "ram-profiling")]
    #[arg(
        long = "profile-output",
        value_name = "PROFILE_FILE",
        default_value = "dhat-heap.json"
    )]
    profile_output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG environment variable to override (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!(
        "LogSift starting up (version {})",
        env!("CARGO_PKG_VERSION")
    );

    #[cfg(feature = "ram-profiling")]
    let _profiler = {
        tracing::info!("RAM profiling enabled, output: {:?}", args.profile_output);
        dhat::Profiler::builder()
            .file_name(args.profile_output.clone())
            .build()
    };

    #[cfg(feature = "cpu-profiling")]
    let _tracy = {
        tracing::info!("CPU profiling enabled with Tracy - run Tracy profiler to connect");
        tracy_client::Client::start()
    };

    let config = args
        .config
        .as_deref()
        .map_or_else(AnalyzerConfig::load, AnalyzerConfig::load_from)?;

    let options = args
        .year
        .map_or_else(|| config.parse_options(), |year| ParseOptions { year });
    let top = args.top.unwrap_or_else(|| config.top_for(args.vendor));
    let noise_threshold = args.noise_threshold.unwrap_or(config.noise_threshold);

    let result = parse_file(&args.file, args.vendor, &options)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    let bundle = analyze(&result, top, noise_threshold)?;

    let report = Report::new(&result, &bundle);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if result.report.parsed == 0 {
        return Err(Error::EmptyInput {
            total_lines: result.report.total_lines,
        }
        .into());
    }
    Ok(())
}
