//! syncd - the hardware-side half of the split SAI adapter.
//!
//! Connects to the bus, loads the vendor SDK behind the [`VendorSdk`]
//! trait, and runs the dispatch loop until a fatal condition or shutdown.

use clap::Parser;
use sai_bus::store::LogLevel;
use sai_bus::{Bus, RedisBus};
use std::backtrace::Backtrace;
use std::process::ExitCode;
use std::sync::Arc;
use syncd::{diag, logging, Dispatcher, SimSdk, VendorSdk};
use tracing::{error, info};

/// SAI sync daemon
#[derive(Parser, Debug)]
#[command(name = "syncd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start the vendor diag shell thread
    #[arg(long)]
    diag: bool,

    /// Redis server backing the bus
    #[arg(long, default_value = "redis://127.0.0.1:6379/1")]
    redis_url: String,

    /// Front-panel port count presented by the simulated SDK
    #[arg(long, default_value = "32")]
    ports: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_handle = logging::init();

    info!("--- Starting syncd ---");

    let bus: Arc<dyn Bus> = match RedisBus::connect(&args.redis_url) {
        Ok(bus) => Arc::new(bus),
        Err(e) => {
            error!(error = %e, url = %args.redis_url, "failed to connect to the bus");
            return ExitCode::FAILURE;
        }
    };

    let mut log_level = LogLevel::default();
    logging::sync_from_store(&*bus, &log_handle, &mut log_level);

    // the concrete vendor SDK is linked in behind this trait object
    let sdk: Box<dyn VendorSdk> = Box::new(SimSdk::new(args.ports));

    let mut dispatcher = Dispatcher::new(Arc::clone(&bus), sdk);

    if args.diag {
        diag::spawn(Arc::clone(&bus), dispatcher.stop_handle());
    }

    let hook_bus = Arc::clone(&bus);
    dispatcher.set_idle_hook(Box::new(move || {
        logging::sync_from_store(&*hook_bus, &log_handle, &mut log_level);
    }));

    info!("syncd started");
    match dispatcher.run() {
        Ok(()) => {
            info!("syncd exiting cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "fatal error, exiting");
            error!("backtrace:\n{}", Backtrace::force_capture());
            ExitCode::FAILURE
        }
    }
}
