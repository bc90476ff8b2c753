//! Prop controller — bench runner
//!
//! Runs the full control loop against simulated hardware.  Request lines
//! and bench directives are read from stdin:
//!
//! ```text
//! /raise                      GET path (or a full "GET /raise HTTP/1.1" line)
//! weight 1020 | weight none   set the simulated raw scale load / fail the scale
//! press                       momentary press of the set-target button
//! wait 1500                   keep looping for 1500 ms before the next line
//! status                      print outputs and prop state
//! quit
//! ```
//!
//! ```text
//! ┌────────────┐  mpsc   ┌──────────────────────────────────────────────┐
//! │ stdin      │────────▶│ main loop (single writer)                    │
//! │ reader thr │ String  │  PropService::tick(now) · handle_request()   │
//! └────────────┘         │  BenchHardware · LogEventSink                │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! The reader thread only forwards owned lines; every controller mutation
//! happens on the main thread.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use propctl::adapters::bench::BenchHardware;
use propctl::adapters::log_sink::LogEventSink;
use propctl::adapters::time::MonotonicClock;
use propctl::app::service::PropService;
use propctl::config::PropConfig;

/// Prop controller bench runner
#[derive(Parser, Debug)]
#[command(name = "propctl")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file (missing fields take defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from the maglock door preset instead of the winch defaults
    #[arg(long)]
    door: bool,

    /// Override the target weight
    #[arg(long)]
    target: Option<i32>,

    /// Override the weight window half-width
    #[arg(long)]
    window: Option<u32>,

    /// Host loop pass interval in milliseconds
    #[arg(long, default_value = "5")]
    poll_ms: u64,
}

/// One stdin line, decoded.
#[derive(Debug, PartialEq, Eq)]
enum BenchLine {
    Request(String),
    Weight(Option<i32>),
    Press,
    Wait(u64),
    Status,
    Quit,
    Blank,
}

fn parse_line(line: &str) -> Option<BenchLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Some(BenchLine::Blank);
    }
    if line.starts_with('/') || line.starts_with("GET ") {
        return Some(BenchLine::Request(line.to_owned()));
    }

    let mut words = line.split_ascii_whitespace();
    let verb = words.next()?;
    let arg = words.next();
    match (verb, arg) {
        ("weight", Some("none")) => Some(BenchLine::Weight(None)),
        ("weight", Some(n)) => n.parse().ok().map(|w| BenchLine::Weight(Some(w))),
        ("wait", Some(ms)) => ms.parse().ok().map(BenchLine::Wait),
        ("press", None) => Some(BenchLine::Press),
        ("status", None) => Some(BenchLine::Status),
        ("quit" | "exit", None) => Some(BenchLine::Quit),
        _ => None,
    }
}

fn load_config(args: &Args) -> Result<PropConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| anyhow!("parsing {}: {e}", path.display()))?
        }
        None if args.door => PropConfig::door(),
        None => PropConfig::default(),
    };
    if let Some(target) = args.target {
        config.target_weight = target;
    }
    if let Some(window) = args.window {
        config.weight_window = window;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("propctl v{} (bench)", env!("CARGO_PKG_VERSION"));

    let clock = MonotonicClock::new();
    let mut hw = BenchHardware::new();
    let mut sink = LogEventSink::new();
    let mut service = PropService::new(config);
    service.start(clock.now_ms(), &mut sink);

    let lines = spawn_stdin_reader();
    let poll = Duration::from_millis(args.poll_ms.max(1));
    let mut resume_at = 0u64;

    loop {
        service.tick(clock.now_ms(), &mut hw, &mut sink);

        while clock.now_ms() >= resume_at {
            let line = match lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("stdin closed, stopping");
                    return Ok(());
                }
            };
            match parse_line(&line) {
                Some(BenchLine::Request(raw)) => {
                    match service.handle_request(&raw, &mut hw, &mut sink) {
                        Some(resp) => println!("{}", resp.to_http()),
                        None => println!("(no response)"),
                    }
                }
                Some(BenchLine::Weight(raw)) => hw.scale.set_raw(raw),
                Some(BenchLine::Press) => hw.press_set_target(),
                Some(BenchLine::Wait(ms)) => resume_at = clock.now_ms() + ms,
                Some(BenchLine::Status) => {
                    println!("{} | {:?} | {:?}", hw.describe(), service.state(), service.trigger_state());
                }
                Some(BenchLine::Quit) => return Ok(()),
                Some(BenchLine::Blank) => {}
                None => warn!("Unrecognised bench line: {:?}", line),
            }
        }

        thread::sleep(poll);
    }
}
