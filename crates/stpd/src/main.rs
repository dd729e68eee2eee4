//! stpd entry point.
//!
//! Replays controller events (JSON lines, see [`stpd::ControllerEvent`])
//! from a file or stdin through the spanning-tree controller.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use sdn_types::{Dpid, MacAddress, PortNo};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stpd::{
    ControllerEvent, EventSender, LinkPortLearning, SpanningTreeOrch, StpConfig, StpDaemon,
    SwitchCallbacks,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Spanning-tree SDN controller
#[derive(Parser, Debug)]
#[command(name = "stpd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// JSON-lines event file (reads stdin when omitted)
    #[arg(short = 'e', long)]
    events: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Policy for packet sources on switch-facing ports (propagate, suppress)
    #[arg(long)]
    link_port_learning: Option<LinkPortLearning>,

    /// Capacity of the inbound event channel
    #[arg(long)]
    event_queue_depth: Option<usize>,

    /// Print a JSON snapshot of the final topology to stdout
    #[arg(long)]
    dump: bool,
}

/// Stand-in for the flow-programming collaborator: logs what it would do.
struct LoggingCallbacks;

impl SwitchCallbacks for LoggingCallbacks {
    fn on_link_state_changed(&self, switch: Dpid, port: PortNo, active: bool) {
        info!(
            "switch {} port {} -> {}",
            switch,
            port,
            if active { "forwarding" } else { "blocking" }
        );
    }

    fn on_mac_learned(&self, switch: Dpid, mac: MacAddress, port: PortNo) {
        info!("switch {} fdb {} -> port {}", switch, mac, port);
    }
}

fn load_config(args: &Args) -> Result<StpConfig> {
    let mut config = match &args.config {
        Some(path) => StpConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => StpConfig::default(),
    };
    if let Some(policy) = args.link_port_learning {
        config.link_port_learning = policy;
    }
    if let Some(depth) = args.event_queue_depth {
        config.event_queue_depth = depth;
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

/// Parses one event per line and forwards it; malformed lines are skipped.
async fn feed_events<R>(reader: R, sender: EventSender) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut sent = 0usize;

    while let Some(line) = lines.next_line().await.context("reading events")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<ControllerEvent>(line) {
            Ok(event) => {
                sender
                    .send(event)
                    .await
                    .context("event loop stopped unexpectedly")?;
                sent += 1;
            }
            Err(e) => warn!("Skipping malformed event on line {}: {}", line_no, e),
        }
    }

    Ok(sent)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!("Link-port learning: {}", config.link_port_learning);
    info!("Event queue depth: {}", config.event_queue_depth);

    let mut orch = SpanningTreeOrch::new(config);
    orch.set_callbacks(Arc::new(LoggingCallbacks));

    let (daemon, sender) = StpDaemon::new(orch);
    let event_loop = tokio::spawn(daemon.run());

    let sent = match &args.events {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening event file {}", path.display()))?;
            feed_events(BufReader::new(file), sender).await?
        }
        None => feed_events(BufReader::new(tokio::io::stdin()), sender).await?,
    };
    info!("Submitted {} events", sent);

    let orch = event_loop.await.context("event loop task failed")?;

    match orch.root() {
        Some(root) => info!("Spanning tree root: switch {}", root),
        None => info!("No spanning tree root (no links discovered)"),
    }
    for (a, pa, b, pb) in orch.topology().active_edges() {
        info!("Active link {}[{}] <-> {}[{}]", a, pa, b, pb);
    }
    let stats = orch.stats();
    info!(
        "Stats: {} links discovered, {} rebuilds, {} MAC entries taught, {} events rejected",
        stats.links_discovered, stats.rebuilds, stats.macs_taught, stats.events_rejected
    );

    if args.dump {
        let json = serde_json::to_string_pretty(&orch.snapshot())
            .context("serializing topology snapshot")?;
        println!("{}", json);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    info!("Starting stpd");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("stpd failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
