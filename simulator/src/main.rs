use anyhow::Context;
use bridge::bridge::{DashboardBridge, SessionFactory};
use clap::Parser;
use homecore::ActionRequest;
use scenario::profile::build_session;
use session::config::DashboardConfig;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod scenario;
mod session;

#[derive(Parser)]
#[command(author, version, about = "Home security dashboard simulator")]
struct Args {
    /// Run a headless session and print a summary instead of serving
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Render cycles to run in offline mode (at least one per scripted action)
    #[arg(long, default_value_t = 20)]
    ticks: usize,
    /// Replay the config's scripted actions during the offline run
    #[arg(long, default_value_t = false)]
    script: bool,
    /// Load a dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
    #[arg(long, default_value_t = 0.15)]
    motion_probability: f64,
    #[arg(long, default_value_t = 8)]
    log_capacity: usize,
    /// Seed the motion sensor for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 2)]
    refresh_secs: u64,
    /// Host the dashboard over HTTP (the default when --offline is absent)
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = &args.config {
        DashboardConfig::load(path)?
    } else {
        let config = DashboardConfig::from_args(
            args.bind,
            args.motion_probability,
            args.log_capacity,
            args.seed,
            args.refresh_secs,
        );
        config.validate().context("validating command-line options")?;
        config
    };

    if args.offline {
        run_offline(&config, args.ticks, args.script)?;
    }

    if args.serve || !args.offline {
        serve(config)?;
    }

    Ok(())
}

fn run_offline(config: &DashboardConfig, ticks: usize, use_script: bool) -> anyhow::Result<()> {
    let mut session = build_session(config)?;
    let script: &[ActionRequest] = if use_script { config.script.as_slice() } else { &[] };
    let summary = session
        .run_offline(ticks, script)
        .context("running offline session")?;

    println!(
        "Offline run -> cycles {}, motion events {}, alerts {}, mode {}, log capacity {}",
        summary.cycles,
        summary.motion_events,
        summary.snapshot.alerts.len(),
        summary.snapshot.mode,
        session.machine().config().log_capacity
    );
    println!("{}", summary.snapshot.to_json_pretty()?);

    let report = format!(
        "last_update={} cycles={} motion_events={} alerts={} mode={} log_entries={}\n",
        summary.snapshot.last_update,
        summary.cycles,
        summary.motion_events,
        summary.snapshot.alerts.len(),
        summary.snapshot.mode,
        summary.snapshot.activity_log.len()
    );
    let report_path = PathBuf::from("tools/data/offline_session.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("opening {}", report_path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}

fn serve(config: DashboardConfig) -> anyhow::Result<()> {
    let bind = config.bind;
    let refresh_secs = config.refresh_secs;
    let factory: SessionFactory = Box::new(move || build_session(&config));
    let bridge = DashboardBridge::new(factory, refresh_secs).context("starting dashboard session")?;
    bridge.spawn(bind);
    log::info!("dashboard bridge running at http://{} (Ctrl+C to stop)", bind);

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    runtime.block_on(async {
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
        Ok::<(), anyhow::Error>(())
    })?;

    if let Ok(session) = bridge.state().session_metrics() {
        log::info!(
            "session ended after {} cycles ({} transitions, {} alerts)",
            session.cycles,
            session.counters.transitions,
            session.counters.alerts_raised
        );
    }
    Ok(())
}
