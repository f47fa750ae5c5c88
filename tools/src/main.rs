use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{decode_strategy_with, encode_strategy, DecodeOptions, DecodePolicy};
use stgy_tools::{
    block_histogram, format_hex_dump, format_pretty, inspect_token, payload_bytes, summarize,
    InspectReport,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stgy",
    version,
    about = "Strategy code inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a token into the board model.
    Decode {
        /// The `[stgy:...]` token, or `-` to read it from stdin.
        token: String,
        /// Reject anything the encoder would not have produced.
        #[arg(long)]
        strict: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Show stage sizes, header fields and blocks.
    Inspect {
        /// The `[stgy:...]` token, or `-` to read it from stdin.
        token: String,
        #[arg(long)]
        strict: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Hex dump the inflated payload.
    Hexdump {
        /// The `[stgy:...]` token, or `-` to read it from stdin.
        token: String,
        /// First byte to dump.
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Number of bytes to dump.
        #[arg(long, default_value_t = 256)]
        length: usize,
    },
    /// Decode leniently and print the canonical token.
    Reencode {
        /// The `[stgy:...]` token, or `-` to read it from stdin.
        token: String,
    },
    /// Find and decode every token in files matching a glob.
    Scan {
        /// Glob pattern, e.g. `notes/**/*.txt`.
        pattern: String,
        /// Limit the number of files scanned.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Decode {
            token,
            strict,
            format,
        } => {
            let token = read_token(&token)?;
            let strategy =
                decode_strategy_with(&token, &options(strict)).context("decode token")?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&strategy).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => {
                    println!("{}", format_pretty(&strategy));
                    for (name, count) in block_histogram(&strategy) {
                        debug!(block = name, count, "block count");
                    }
                }
            }
        }
        Command::Inspect {
            token,
            strict,
            format,
        } => {
            let token = read_token(&token)?;
            let report = inspect_token(&token, &options(strict)).context("inspect token")?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print_inspect_report(&report),
            }
        }
        Command::Hexdump {
            token,
            start,
            length,
        } => {
            let token = read_token(&token)?;
            let bytes = payload_bytes(&token, &DecodeOptions::lenient()).context("decode token")?;
            println!("{}", format_hex_dump(&bytes, start, length));
        }
        Command::Reencode { token } => {
            let token = read_token(&token)?;
            let strategy =
                decode_strategy_with(&token, &DecodeOptions::lenient()).context("decode token")?;
            let canonical = encode_strategy(&strategy).context("encode strategy")?;
            if canonical != token {
                debug!("token was not canonical");
            }
            println!("{canonical}");
        }
        Command::Scan { pattern, limit } => {
            let paths = collect_paths(&pattern, limit)?;
            for path in paths {
                let contents = match fs::read_to_string(&path) {
                    Ok(contents) => contents,
                    Err(err) => {
                        warn!(path = %path.display(), %err, "skipping unreadable file");
                        continue;
                    }
                };
                for token in text::find_tokens(&contents) {
                    match decode_strategy_with(token, &DecodeOptions::lenient()) {
                        Ok(strategy) => println!("{}: {}", path.display(), summarize(&strategy)),
                        Err(err) => println!("{}: {}: {err}", path.display(), err.kind()),
                    }
                }
            }
        }
    }
    Ok(())
}

fn options(strict: bool) -> DecodeOptions {
    let policy = if strict {
        DecodePolicy::Strict
    } else {
        DecodePolicy::Lenient
    };
    DecodeOptions::default().with_policy(policy)
}

fn read_token(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.trim().to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("read token from stdin")?;
    Ok(buf.trim().to_string())
}

fn collect_paths(pattern: &str, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern).context("invalid glob pattern")? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    if let Some(limit) = limit {
        paths.truncate(limit);
    }
    Ok(paths)
}

fn print_inspect_report(report: &InspectReport) {
    println!(
        "token: {} chars, key '{}', {} data symbols",
        report.token_len, report.key, report.symbols
    );
    if !report.quirks.is_clean() {
        println!(
            "symbol quirks: dangling={} nonzero_padding={}",
            report.quirks.dangling_symbol, report.quirks.nonzero_padding
        );
    }
    println!(
        "compressed: {} bytes ({}, {})",
        report.compressed_len,
        report.container,
        if report.canonical_compression {
            "canonical"
        } else {
            "non-canonical"
        }
    );
    let header = report.header;
    println!(
        "payload: {} bytes, version {} body_len {} content_len {}{}",
        report.payload_len,
        header.version,
        header.body_len,
        header.content_len,
        if report.header_lengths_match {
            ""
        } else {
            " (stale)"
        }
    );
    println!("blocks:");
    for block in &report.blocks {
        println!(
            "  {:>4}: 0x{:04x} {:<10} {:<10} ({} bytes)",
            block.offset,
            block.tag,
            block.section.to_string(),
            block.name,
            block.len
        );
    }
}
