//! `sentinel-monitor` command line host

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sentinel_core::{logging, CameraStream, LatencyMode, SentinelConfig};
use sentinel_monitor::{
    demo_streams, spawn_all, Dashboard, FaultInjector, FrameAnalyzer, HeadlessPlayer,
    SimulatedAnalyzer,
};
use sentinel_stream::{provision, Transport};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

const DEFAULT_DURATION_SECS: u64 = 30;
const DEFAULT_SEED: u64 = 42;
const FAULT_TICK: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("sentinel-monitor")
        .version(sentinel_monitor::VERSION)
        .about("Sentinel headless monitoring console")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run a simulated monitoring session")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to a .toml or .yaml configuration file"),
                )
                .arg(
                    Arg::new("duration-secs")
                        .long("duration-secs")
                        .default_value("30")
                        .value_parser(value_parser!(u64))
                        .help("How long to run before printing the report"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for the simulated analyzer"),
                )
                .arg(
                    Arg::new("fault-rate")
                        .long("fault-rate")
                        .default_value("0.0")
                        .value_parser(value_parser!(f64))
                        .help("Chance per tile and tick of an injected playback fault"),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Show how a URL would be played")
                .arg(Arg::new("url").required(true).help("Stream URL")),
        )
        .subcommand(
            Command::new("provision")
                .about("Provision a playback URL for an RTSP camera")
                .arg(Arg::new("url").required(true).help("rtsp:// source"))
                .arg(
                    Arg::new("low-latency")
                        .long("low-latency")
                        .action(ArgAction::SetTrue)
                        .help("Request a realtime link instead of a segmented stream"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("run", args)) => run(args).await,
        Some(("classify", args)) => {
            let url = args.get_one::<String>("url").context("missing URL")?;
            let transport = Transport::classify(url);
            println!("{url}");
            println!("  Transport: {} ({transport:?})", transport.label());
            println!("  Playable:  {}", transport != Transport::Unsupported);
            Ok(())
        }
        Some(("provision", args)) => {
            let url = args.get_one::<String>("url").context("missing URL")?;
            let mode = if args.get_flag("low-latency") {
                LatencyMode::LowLatency
            } else {
                LatencyMode::Standard
            };
            let config = SentinelConfig::default();
            let playback = provision(url, mode, config.stream.provision_delay()).await?;
            println!("{playback}");
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.get_one::<String>("config").map(Path::new);
    let mut config = logging::bootstrap(path).with_context(|| match path {
        Some(path) => format!("failed to start from {}", path.display()),
        None => "failed to start with default configuration".to_string(),
    })?;

    let duration = args
        .get_one::<u64>("duration-secs")
        .copied()
        .unwrap_or(DEFAULT_DURATION_SECS);
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(DEFAULT_SEED);
    let fault_rate = args.get_one::<f64>("fault-rate").copied().unwrap_or(0.0);

    let streams: Vec<CameraStream> = if config.streams.is_empty() {
        demo_streams()
    } else {
        std::mem::take(&mut config.streams)
    };
    let guard_interval = config.guard.interval();

    let dashboard = Arc::new(Dashboard::new(config, |stream: &CameraStream| {
        HeadlessPlayer::new(stream.id.clone())
    }));
    dashboard.mount_all(streams)?;
    for tile in dashboard.tiles() {
        tile.set_auto_guard(true);
    }

    tracing::info!(
        cameras = dashboard.len(),
        duration_secs = duration,
        seed,
        "monitoring session started"
    );

    let analyzer: Arc<dyn FrameAnalyzer> = Arc::new(SimulatedAnalyzer::seeded(seed));
    let mut tasks = spawn_all(&dashboard, &analyzer, guard_interval);

    if fault_rate > 0.0 {
        let injector = FaultInjector::seeded(seed.wrapping_add(1), fault_rate);
        let dashboard = Arc::clone(&dashboard);
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FAULT_TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                for tile in dashboard.tiles() {
                    if let Err(e) = injector.inject(&tile) {
                        tracing::warn!(stream = %tile.id(), error = %e, "fault injection failed");
                    }
                }
            }
        }));
    }

    tokio::time::sleep(Duration::from_secs(duration)).await;
    for task in &tasks {
        task.abort();
    }
    futures::future::join_all(tasks).await;

    print_report(&dashboard);
    dashboard.shutdown();
    Ok(())
}

fn print_report(dashboard: &Dashboard<HeadlessPlayer>) {
    println!("Cameras");
    println!("=======");
    for tile in dashboard.tiles() {
        let stream = tile.stream();
        let status = tile.status();
        let transport = status.transport.map_or("-", Transport::label);
        println!(
            "  [{}] {:<22} {:<5} {}",
            stream.id,
            stream.name,
            transport,
            status.indicator()
        );
        if let Some(metrics) = &status.metrics {
            println!("        {metrics}");
        }
        if let Some(error) = &status.error {
            for line in error.render().lines() {
                println!("        {line}");
            }
        }
    }

    let cap = dashboard.badge_cap();
    let groups = dashboard.grouped_alerts();
    println!();
    println!("Alerts ({} events, {} groups)", dashboard.feed().len(), groups.len());
    println!("======");
    for group in &groups {
        let alert = group.alert();
        let badge = group.badge(cap).map(|b| format!(" {b}")).unwrap_or_default();
        println!(
            "  {} [{}] {} cam {}{}: {}",
            alert.timestamp.format("%H:%M:%S"),
            alert.severity,
            alert.category.label(),
            alert.stream_id,
            badge,
            alert.description
        );
    }
}
