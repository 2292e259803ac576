use anyhow::Context;
use clap::Parser;
use coveragecore::record::ViewportBound;
use gui_bridge::bridge::{BridgeContext, GuiBridge};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use store::{RecordSource, RecordStore};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DashboardConfig;
use workflow::runner::Runner;

mod gui_bridge;
mod store;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Network coverage map dashboard")]
struct Args {
    /// Load a dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV URL or local path overriding the configured source
    #[arg(long)]
    source: Option<String>,
    /// Network to select initially (defaults to the first option)
    #[arg(long)]
    network: Option<String>,
    /// Viewport as south,north,west,east in degrees
    #[arg(long, allow_hyphen_values = true)]
    viewport: Option<ViewportBound>,
    /// Run one render pass and print the view as JSON
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Append a one-line summary of the offline pass to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the HTTP bridge alive for the map presenter
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_overrides(args.source.clone(), args.bind);

    let runner = Runner::new(&config)?;
    let store = RecordStore::load(RecordSource::parse(&config.source));
    let ctx = BridgeContext::new(store, runner, args.network.clone());
    let selected = ctx.networks().selected;
    if args.network.is_some() && selected != args.network {
        log::warn!(
            "network {:?} not in data, selected {:?} instead",
            args.network,
            selected
        );
    }
    ctx.set_viewport(args.viewport);

    if args.offline {
        match ctx.view() {
            Ok(view) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&view).context("serializing coverage view")?
                );
                let line = format!(
                    "network={} markers={} center=({:.4},{:.4}) fallback={} summary={:?}\n",
                    view.network,
                    view.markers.len(),
                    view.center.position.latitude,
                    view.center.position.longitude,
                    view.center.fallback,
                    view.legend.summary_label
                );
                if let Some(report_path) = &args.report {
                    append_report(report_path, &line)?;
                }
            }
            Err(err) => println!("{:#} ({})", err, ctx.status()),
        }
    }

    if args.serve {
        let bridge = GuiBridge::start(ctx, config.bind);
        bridge.publish_status(&bridge.context().status());
        bridge.publish_status(&format!(
            "HTTP bridge on http://{} (Ctrl+C to stop)...",
            config.bind
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

fn append_report(path: &Path, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
