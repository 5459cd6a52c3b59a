//! crimp CLI - inspect binary image files with a bounds-checked cursor.
//!
//! This is the main entry point for the crimp command-line application.

mod layout;
mod sniff;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memmap2::Mmap;

use crimp::prelude::*;

/// crimp - binary image file inspection tool
#[derive(Parser)]
#[command(name = "crimp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a file's format from its leading bytes
    Sniff {
        /// Input file
        #[arg(short, long, env = "CRIMP_INPUT")]
        input: PathBuf,
    },

    /// Decode fields from a file following a layout
    Read {
        /// Input file
        #[arg(short, long, env = "CRIMP_INPUT")]
        input: PathBuf,

        /// Start offset
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Comma-separated layout, e.g. `magic:424d,u32le,skip:4,u32le`
        #[arg(short, long)]
        layout: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the builtin image types
    Types {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Sniff { input } => {
            cmd_sniff(&input)?;
        }
        Commands::Read { input, offset, layout, json } => {
            cmd_read(&input, offset, &layout, json)?;
        }
        Commands::Types { json } => {
            cmd_types(json)?;
        }
    }

    Ok(())
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    // The mapping is read-only and dropped before the command returns.
    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to map {}", path.display()))?;
    log::debug!("mapped {} ({} bytes)", path.display(), mmap.len());
    Ok(mmap)
}

fn cmd_sniff(input: &Path) -> Result<()> {
    let data = map_file(input)?;

    match sniff::sniff(&data) {
        Some(format) => println!("{}: {} ({} bytes)", input.display(), format, data.len()),
        None => println!("{}: unknown ({} bytes)", input.display(), data.len()),
    }

    Ok(())
}

fn cmd_read(input: &Path, offset: usize, layout: &str, json: bool) -> Result<()> {
    let fields = layout::parse_layout(layout)?;
    let data = map_file(input)?;

    let mut cursor = ByteCursor::new_at(&data, offset)
        .with_context(|| format!("Start offset {} is outside {}", offset, input.display()))?;

    if json {
        let mut records = Vec::with_capacity(fields.len());
        layout::walk(&mut cursor, &fields, |record| records.push(record))?;
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        layout::walk(&mut cursor, &fields, |record| {
            println!("{:>10}  {:<12} {}", record.offset, record.field, record.value);
        })?;
        println!("{:>10}  end ({} bytes remaining)", cursor.tell(), cursor.remaining());
    }

    Ok(())
}

fn cmd_types(json: bool) -> Result<()> {
    let registry = ImageTypeRegistry::with_builtins();

    if json {
        let types: Vec<&ImageType> = registry.iter().map(|t| &**t).collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
    } else {
        for image_type in registry.iter() {
            println!(
                "{:<10} {:>2} bytes  {}",
                image_type.name(),
                image_type.size(),
                image_type.channels().join(" ")
            );
        }
    }

    Ok(())
}
