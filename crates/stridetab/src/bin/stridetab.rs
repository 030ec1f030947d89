//! Command-line front end: compile a pattern file into table entries.
//!
//! ```text
//! stridetab <pattern-file> [--stride N] [--table-id N] [--format mat|kv|map]
//! ```
//!
//! `mat` and `kv` print one JSON entry per line; `map` prints the fixed-layout
//! binary records as hex rows.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use stridetab::{map_format, validate_tables, TableCompiler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    MatchAction,
    KeyValue,
    Map,
}

struct Args {
    pattern_file: PathBuf,
    stride: usize,
    table_id: u32,
    format: OutputFormat,
}

fn usage() -> ! {
    eprintln!("Usage: stridetab <pattern-file> [--stride N] [--table-id N] [--format mat|kv|map]");
    process::exit(2);
}

fn parse_args() -> Result<Args> {
    let mut pattern_file = None;
    let mut stride = 1usize;
    let mut table_id = 0u32;
    let mut format = OutputFormat::MatchAction;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stride" => {
                let value = args.next().unwrap_or_else(|| usage());
                stride = value
                    .parse()
                    .with_context(|| format!("invalid stride: {}", value))?;
            }
            "--table-id" => {
                let value = args.next().unwrap_or_else(|| usage());
                table_id = value
                    .parse()
                    .with_context(|| format!("invalid table id: {}", value))?;
            }
            "--format" => {
                let value = args.next().unwrap_or_else(|| usage());
                format = match value.as_str() {
                    "mat" => OutputFormat::MatchAction,
                    "kv" => OutputFormat::KeyValue,
                    "map" => OutputFormat::Map,
                    _ => bail!("unknown format: {} (expected mat, kv, or map)", value),
                };
            }
            "--help" | "-h" => usage(),
            _ if pattern_file.is_none() => pattern_file = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }

    let Some(pattern_file) = pattern_file else {
        usage();
    };
    Ok(Args {
        pattern_file,
        stride,
        table_id,
        format,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let compiler = TableCompiler::new(args.stride, args.table_id)?;
    let compilation = compiler
        .compile_file(&args.pattern_file)
        .with_context(|| format!("failed to compile {}", args.pattern_file.display()))?;

    let report = validate_tables(&compilation);
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("Error: {}", error);
        }
        bail!("compiled tables failed validation");
    }

    let tables = compilation.tables();
    eprintln!(
        "Compiled table {} (stride {}): {} states, {} entries",
        tables.table_id(),
        tables.stride(),
        report.stats.state_count,
        tables.mat_entries().len()
    );

    match args.format {
        OutputFormat::MatchAction => {
            for entry in tables.mat_entries() {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
        OutputFormat::KeyValue => {
            for entry in tables.key_value_entries() {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
        OutputFormat::Map => {
            for (key, value) in map_format::encode_entries(tables)? {
                let mut row = String::new();
                for byte in zerocopy::IntoBytes::as_bytes(&key) {
                    row.push_str(&format!("{:02x}", byte));
                }
                row.push(' ');
                for byte in zerocopy::IntoBytes::as_bytes(&value) {
                    row.push_str(&format!("{:02x}", byte));
                }
                println!("{}", row);
            }
        }
    }

    Ok(())
}
