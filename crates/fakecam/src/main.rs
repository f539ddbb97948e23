//! fakecam
//!
//! Encodes the USB Video Class descriptor set of an emulated webcam from a
//! TOML profile and answers code lookups for control-request diagnostics.

mod assemble;
mod config;

use anyhow::{Context, Result};
use assemble::{Assembly, hex};
use clap::Parser;
use common::setup_logging;
use config::FakeCamConfig;
use descriptor::uvc::{self, request};
use descriptor::{Catalog, DescriptorRecord, UvcError};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "fakecam")]
#[command(
    author,
    version,
    about = "fakecam - Encode UVC descriptors for an emulated webcam"
)]
#[command(long_about = "
Builds the class-specific and standard descriptors of a USB Video Class
function from a webcam profile and prints them as hex.

EXAMPLES:
    # Encode the built-in 176x144 MJPEG profile
    fakecam

    # Encode a custom profile and write the raw block to a file
    fakecam --config ~/cam.toml --output descriptors.bin

    # Save the built-in profile as a starting point
    fakecam --save-config

    # Explain a control request number or a host-side error code
    fakecam --request 0x81
    fakecam --error-code -7

CONFIGURATION:
    The profile is read from the following locations in order:
    1. Path specified with --config
    2. ~/.config/fakecam/fakecam.toml
    3. /etc/fakecam/fakecam.toml
    4. Built-in webcam profile
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write the encoded descriptor block to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// List built-in descriptor schemas and exit
    #[arg(long)]
    list_schemas: bool,

    /// List UVC code tables and exit
    #[arg(long)]
    list_codes: bool,

    /// Describe a video class request number (e.g. 0x81) and exit
    #[arg(long, value_name = "CODE", value_parser = parse_code)]
    request: Option<i32>,

    /// Describe a UVC error code (e.g. -7) and exit
    #[arg(long, value_name = "CODE", value_parser = parse_code, allow_negative_numbers = true)]
    error_code: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.save_config {
        let config = FakeCamConfig::default();
        let path = FakeCamConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    if let Some(code) = args.request {
        return describe_request(code);
    }
    if let Some(code) = args.error_code {
        return describe_error_code(code);
    }
    if args.list_codes {
        list_codes();
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        FakeCamConfig::load(Some(config::expand_path(path))).context("Failed to load configuration")?
    } else {
        FakeCamConfig::load_or_default()
    };

    let log_level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("fakecam v{}", env!("CARGO_PKG_VERSION"));
    debug!("Log level: {}", log_level);

    let catalog = descriptor::catalog().context("Failed to build descriptor catalog")?;

    if args.list_schemas {
        return list_schemas(catalog);
    }

    let assembly = Assembly::from_config(&config, catalog).context("Failed to assemble descriptors")?;
    print_assembly(&assembly)?;

    let output = args
        .output
        .as_deref()
        .map(config::expand_path)
        .or_else(|| config.assembly.output_path());
    if let Some(path) = output {
        write_block(&assembly, &path)?;
    }

    Ok(())
}

/// Parse a decimal or `0x`-prefixed hex code, optionally negative
fn parse_code(s: &str) -> std::result::Result<i32, String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex_digits) => i64::from_str_radix(hex_digits, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| format!("Invalid code '{}': {}", s, e))?;

    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| format!("Code '{}' is out of range", s))
}

fn describe_request(code: i32) -> Result<()> {
    let entry = request::TABLE
        .from_code(code)
        .context("Failed to look up request")?;
    println!("{}", entry);

    // Codes shared with other tables, e.g. 0x01 is both SET_CUR and VC_HEADER
    for table in uvc::TABLES
        .iter()
        .filter(|table| table.name() != request::TABLE.name() && table.contains_code(code))
    {
        debug!("{:#04x} is also defined in {}", code, table.name());
    }
    Ok(())
}

fn describe_error_code(code: i32) -> Result<()> {
    let error = UvcError::from_code(code).context("Failed to look up error code")?;
    println!("{}", error);
    Ok(())
}

fn list_codes() {
    for table in uvc::TABLES {
        println!("{}:", table.name());
        for entry in table.entries() {
            println!("  {}", entry);
        }
        println!();
    }

    println!("{}:", UvcError::REGISTRY);
    for error in UvcError::ALL {
        println!("  {}", error);
    }
}

fn list_schemas(catalog: &Catalog) -> Result<()> {
    println!("Built-in descriptor schemas ({}):\n", catalog.len());
    for schema in catalog.iter() {
        let header = schema.header();
        let subtype = header
            .subtype_tag
            .map(|tag| format!("{:#04x}", tag))
            .unwrap_or_else(|| "-".to_string());
        let length = DescriptorRecord::with_defaults(schema)
            .length()
            .with_context(|| format!("Failed to compute length of {}", schema.name()))?;

        println!(
            "  {} (type {:#04x}, subtype {}, {} bytes by default)",
            schema.name(),
            header.type_tag,
            subtype,
            length
        );
        for field in schema.effective_fields() {
            let marker = if field.is_constant() { " (constant)" } else { "" };
            println!("      {}: {}{}", field.name(), field.kind(), marker);
        }
        println!();
    }
    Ok(())
}

fn print_assembly(assembly: &Assembly) -> Result<()> {
    for group in &assembly.groups {
        println!("Interface {}:", group.interface);
        for record in &group.records {
            let bytes = record
                .encode()
                .with_context(|| format!("Failed to encode {}", record.schema().name()))?;
            println!(
                "  {:<26} {:>3} bytes  {}",
                record.schema().name(),
                bytes.len(),
                hex(&bytes)
            );
        }
    }

    let block = assembly.encode().context("Failed to encode descriptor block")?;
    println!("\nTotal: {} bytes", block.len());
    println!("{}", hex(&block));
    Ok(())
}

fn write_block(assembly: &Assembly, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = assembly
        .write_to(&mut writer)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    info!("Wrote {} bytes to {}", written, path.display());
    Ok(())
}
