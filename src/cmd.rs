//! Command line interface.
//!
//! Arguments can also come from the environment (`VLSM_*`), which `.env` may populate.

use crate::models::{AddressBlock, Strategy};
use crate::output::{render_report, write_csv, write_free, write_json, write_table};
use crate::processing::allocate;
use clap::{Parser, ValueEnum};
use lazy_static::lazy_static;
use regex::Regex;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

/// How the subnet list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "vlsm-planner",
    version,
    about = "Carve an IPv4 network into right-sized subnets (VLSM)"
)]
pub struct Cli {
    /// Base network in CIDR form, e.g. 192.168.1.0/24
    pub base: String,

    /// Hosts per subnet, comma or space separated, e.g. 50,30,10
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub hosts: Vec<String>,

    /// Which child of a split block is assigned
    #[arg(short, long, value_enum, env = "VLSM_STRATEGY", default_value_t = Strategy::First)]
    pub strategy: Strategy,

    /// Output format for the subnet list
    #[arg(short, long, value_enum, env = "VLSM_FORMAT", default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also print the step-by-step derivation
    #[arg(short, long)]
    pub report: bool,

    /// Also print the address space left free
    #[arg(long)]
    pub free: bool,

    /// log4rs configuration file
    #[arg(long, env = "VLSM_LOG_CONFIG", default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

impl Cli {
    /// Host counts from all positional arguments, in order.
    pub fn host_counts(&self) -> Vec<i64> {
        parse_host_list(&self.hosts.join(","))
    }
}

lazy_static! {
    static ref SEPARATOR_RE: Regex = Regex::new(r"\s*[,;]\s*|\s+").expect("Invalid Regex?");
}

/// Split a host list on commas, semicolons or whitespace.
///
/// Empty and non-numeric entries become 0 so they keep their position and are
/// discarded later like any other non-positive count.
pub fn parse_host_list(input: &str) -> Vec<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }
    SEPARATOR_RE
        .split(input)
        .map(|token| match token.parse::<i64>() {
            Ok(hosts) => hosts,
            Err(_) => {
                if !token.is_empty() {
                    log::warn!("Ignoring host count '{token}': not a number");
                }
                0
            }
        })
        .collect()
}

/// Run one allocation and print it to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn Error>> {
    let base = AddressBlock::base_network(&cli.base)?;
    let host_counts = cli.host_counts();
    log::debug!("run() base={base} hosts={host_counts:?} strategy={}", cli.strategy);

    let allocation = allocate(base, &host_counts, cli.strategy)?;

    match cli.format {
        OutputFormat::Table => write_table(out, &allocation)?,
        OutputFormat::Csv => write_csv(out, &allocation)?,
        OutputFormat::Json => write_json(out, &allocation, cli.report)?,
    }
    // json already carries the steps
    if cli.report && cli.format != OutputFormat::Json {
        writeln!(out)?;
        write!(out, "{}", render_report(&allocation))?;
    }
    if cli.free && cli.format == OutputFormat::Table {
        writeln!(out)?;
        write_free(out, &allocation)?;
    }
    Ok(())
}
