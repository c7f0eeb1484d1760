mod options;

pub use options::*;

use std::{
    net::IpAddr,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use tile_link::{EditorService, Mode};

#[derive(Parser, Debug)]
#[command(version, about = "Shared tile grid that a remote device can edit over TCP", long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind, e.g. 127.0.0.1
    #[arg(long, value_name = "ADDR")]
    bind: Option<IpAddr>,

    /// Edit loop ticks per second
    #[arg(long, value_name = "HZ")]
    tick_rate: Option<u32>,

    /// Options file to use instead of the one in the config dir
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Write the default options file and exit
    #[clap(long, default_value_t = false)]
    write_default_options: bool,
}

impl Args {
    fn apply(&self, options: &mut Options) {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(bind) = self.bind {
            options.bind_address = bind;
        }
        if let Some(tick_rate) = self.tick_rate {
            options.tick_rate = tick_rate;
        }
    }
}

fn start_logger() -> Option<LoggerHandle> {
    let logger = match Logger::try_with_env_or_str("info") {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Invalid log specification: {err}");
            return None;
        }
    };
    let logger = match get_config_dir() {
        Some(log_dir) => logger
            .log_to_file(FileSpec::default().directory(&log_dir).basename("tile_host").suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(flexi_logger::Duplicate::Warn),
        None => {
            eprintln!("Failed to create log file, logging to stderr");
            logger.log_to_stderr()
        }
    };
    match logger.start() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger();

    if args.write_default_options {
        let path = args.options.clone().or_else(Options::default_path).context("no options path available")?;
        Options::default().store(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::load_options(),
    };
    args.apply(&mut options);

    log::info!("Starting tile_host {}", env!("CARGO_PKG_VERSION"));
    let mut service = EditorService::start(options.service_config(), options.catalog()).context("failed to start editor service")?;
    service.announce_mode(Mode::Editor);

    run(&mut service, options.tick_rate);
    service.shutdown();
    let stats = service.router_stats();
    log::info!(
        "handled {} commands ({} malformed, {} for unknown actors)",
        stats.dispatched,
        stats.malformed,
        stats.invalid_actor
    );
    Ok(())
}

/// Tick at a fixed rate until the remote editor is gone and its lines are handled.
fn run(service: &mut EditorService, tick_rate: u32) {
    let period = Duration::from_secs(1) / tick_rate.max(1);
    let mut next = Instant::now();
    loop {
        service.tick();
        if service.is_idle() {
            log::info!("remote editor disconnected");
            return;
        }

        next += period;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        } else {
            next = now;
        }
    }
}
