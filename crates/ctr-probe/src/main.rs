//! ctr-probe entry point.
//!
//! Drives the platform layer against a simulated console built from the
//! platform configuration, and decodes values copied off real hardware.

mod report;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ctr_common::clock::{duration_to_ticks, CPU_TICKS_PER_MSEC};
use ctr_common::config::{ConsoleModel, PlatformConfig};
use ctr_common::result::ResultCode;
use ctr_os::addr::{mapping_of, old_linear_to_new, virt_to_phys};
use ctr_os::registers::SystemRegisters;
use ctr_os::sim::{SimulatedBus, SimulatedConsole};
use ctr_os::speedup::set_speedup_enable;
use ctr_os::strerror::str_error;
use ctr_os::sysver::{system_version_data, version_result_code};
use ctr_os::tick::TickCounter;
use ctr_os::time::current_time_ms;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::report::SystemReport;
use crate::storage::DirVersionStorage;

/// Probe command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "ctr-probe",
    about = "Inspect Horizon OS registers, result codes and version records",
    version,
    long_about = None
)]
struct Args {
    /// Path to a platform configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Console model to simulate (overrides config file).
    #[arg(long, short = 'm', value_enum)]
    model: Option<ModelArg>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModelArg {
    Old,
    New,
}

impl From<ModelArg> for ConsoleModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Old => ConsoleModel::Old,
            ModelArg::New => ConsoleModel::New,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print versions, registers, memory usage and time.
    Info {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Describe a service result code (hex with 0x prefix, or decimal).
    Strerror {
        /// The result code.
        #[arg(value_parser = parse_result_code, allow_hyphen_values = true)]
        code: ResultCode,
    },
    /// Translate a virtual address to physical and to the new linear mapping.
    Translate {
        /// The virtual address (hex with 0x prefix, or decimal).
        #[arg(value_parser = parse_u32)]
        vaddr: u32,
    },
    /// Read NVer/CVer dumps from a directory holding nver.bin and cver.bin.
    Sysver {
        /// Directory with the dumped records.
        #[arg(long, short = 'd', value_name = "DIR")]
        dir: PathBuf,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the simulated wall-clock time.
    Time,
    /// Sample the tick counter at a fixed simulated interval.
    Ticks {
        /// Number of samples (overrides config file).
        #[arg(long, short = 'n')]
        samples: Option<u32>,

        /// Interval between samples, e.g. "16ms" (overrides config file).
        #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting ctr-probe");

    let mut config = load_config(&args)?;
    if let Some(model) = args.model {
        config.model = model.into();
    }

    run(&config, args.command)
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "ctr_probe={},ctr_os={},ctr_common={}",
        level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `CTR_PROBE_CONFIG` environment variable
/// 3. `config/probe.toml` (local development)
/// 4. Built-in defaults
fn load_config(args: &Args) -> Result<PlatformConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return PlatformConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    if let Ok(env_path) = std::env::var("CTR_PROBE_CONFIG") {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from CTR_PROBE_CONFIG");
            return PlatformConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from CTR_PROBE_CONFIG={:?}", env_path)
            });
        }
        warn!(
            path = %env_path,
            "CTR_PROBE_CONFIG set but file does not exist, checking other locations"
        );
    }

    let local_path = PathBuf::from("config/probe.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return PlatformConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {:?}", local_path));
    }

    debug!("No config file found, using built-in defaults");
    Ok(PlatformConfig::default())
}

/// Build the simulated console and execute one command.
fn run(config: &PlatformConfig, command: Command) -> Result<()> {
    let regs = SystemRegisters::new(SimulatedBus::from_config(&config.simulation));
    let console = SimulatedConsole::from_config(&config.simulation).with_model(config.model);

    if config.speedup {
        set_speedup_enable(&console, true);
    }

    match command {
        Command::Info { json } => {
            let report = SystemReport::collect(config.model, &regs, &console);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Strerror { code } => {
            println!(
                "{code}: {} (level {:?}, summary {:?}, module {}, description {})",
                str_error(code),
                code.level(),
                code.summary(),
                code.module(),
                code.description()
            );
        }
        Command::Translate { vaddr } => {
            match (mapping_of(vaddr), virt_to_phys(vaddr)) {
                (Some(region), Some(paddr)) => {
                    println!("0x{vaddr:08X} -> 0x{paddr:08X} ({})", region.name);
                }
                _ => println!("0x{vaddr:08X} -> unmapped"),
            }
            match old_linear_to_new(vaddr) {
                Some(new) => println!("linear: 0x{new:08X}"),
                None => println!("linear: outside both linear mappings"),
            }
        }
        Command::Sysver { dir, json } => {
            let mut storage = DirVersionStorage::new(dir);
            let result = system_version_data(&mut storage);
            let code = version_result_code(&result);
            let data = result.with_context(|| {
                format!(
                    "Failed to read version records from {:?} (result {code})",
                    storage.dir()
                )
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!(
                    "CVer {}.{}.{}  NVer {}  region {}",
                    data.cver.mainver,
                    data.cver.minor,
                    data.cver.build,
                    data.nver.mainver,
                    data.nver.region_char()
                );
            }
        }
        Command::Time => {
            let ms = current_time_ms(&regs, &console);
            println!("{ms} ms since 1900-01-01");
        }
        Command::Ticks { samples, interval } => {
            let samples = samples.unwrap_or(config.probe.samples);
            let interval = interval.unwrap_or(config.probe.sample_interval);
            let step = duration_to_ticks(interval);
            info!(samples, ?interval, step, "Sampling tick counter");

            let mut counter = TickCounter::new();
            counter.start(&console);
            for i in 0..samples {
                console.clock().advance(step);
                counter.update(&console);
                println!(
                    "#{i}: {} ticks  {:.3} ms  ({})",
                    counter.elapsed(),
                    counter.read(),
                    humantime::format_duration(counter.elapsed_duration())
                );
            }
            debug!(ticks_per_ms = CPU_TICKS_PER_MSEC, "Sampling complete");
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

/// Parse a hex (`0x` prefix) or decimal unsigned word.
fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid number {s:?}: {e}"))
}

/// Parse a result code given as an unsigned hex/decimal word or a negative decimal.
fn parse_result_code(s: &str) -> Result<ResultCode, String> {
    if s.trim_start().starts_with('-') {
        return s
            .trim()
            .parse::<i32>()
            .map(ResultCode)
            .map_err(|e| format!("invalid result code {s:?}: {e}"));
    }
    parse_u32(s).map(ResultCode::from_raw)
}
