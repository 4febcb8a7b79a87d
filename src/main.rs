use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use dumpscope::aggregate::{AggregateError, Axis, MIN_RECORDS};
use dumpscope::config::FilterConfig;
use dumpscope::engine::{Session, SessionError};
use dumpscope::visualization::{Report, Scene};
use dumpscope::ViewerConfig;

/// Decode a telemetry dump and summarize it as a normalized point cloud
#[derive(Parser, Debug)]
#[command(name = "dumpscope", version)]
struct Args {
    /// Binary dump to decode
    dump: PathBuf,

    /// JSON viewer config (filters, averaging window, bar width)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Average over the configured number of time blocks
    #[arg(long)]
    average: bool,

    /// Override the averaging window (implies --average)
    #[arg(long, value_name = "N")]
    blocks: Option<usize>,

    /// X axis filter as SRC:DST hex bytes
    #[arg(long, value_name = "SRC:DST")]
    x: Option<String>,

    /// Y axis filter as SRC:DST hex bytes
    #[arg(long, value_name = "SRC:DST")]
    y: Option<String>,

    /// Z axis filter as SRC:DST hex bytes
    #[arg(long, value_name = "SRC:DST")]
    z: Option<String>,

    /// Print the first N decoded records
    #[arg(long, default_value_t = 0, value_name = "N")]
    rows: usize,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };

        for (axis, pair) in [(Axis::X, &self.x), (Axis::Y, &self.y), (Axis::Z, &self.z)] {
            if let Some(pair) = pair {
                *config.filter_mut(axis) = FilterConfig::from_pair(pair)
                    .ok_or_else(|| anyhow!("--{} expects SRC:DST, got '{}'", axis, pair))?;
            }
        }
        if let Some(blocks) = self.blocks {
            config.average_blocks = blocks;
        }
        Ok(config)
    }

    fn average(&self) -> bool {
        self.average || self.blocks.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = args.viewer_config()?;

    // Reject malformed filters before spending time on the dump
    config
        .resolve_filters()
        .context("Invalid axis filter configuration")?;

    let mut session = Session::new(config);
    session.load(&args.dump).await?;

    if let Some(stopper) = session.stop_handle() {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Stop requested");
                stopper.stop();
            }
        });
    }

    let summary = session.wait().await?;

    let (scene, notice) = match session.scene(args.average()) {
        Ok(scene) if scene.is_empty() => {
            let notice = if session.records().len() < MIN_RECORDS {
                format!("fewer than {} records decoded", MIN_RECORDS)
            } else {
                "no complete averaging window".to_string()
            };
            (scene, Some(notice))
        }
        Ok(scene) => (scene, None),
        Err(SessionError::Aggregate(AggregateError::DegenerateNormalization)) => {
            log::warn!("All filtered payloads are zero; nothing to normalize");
            (
                Scene::default(),
                Some("every axis average is zero".to_string()),
            )
        }
        Err(e) => return Err(e.into()),
    };

    let report = Report {
        record_count: session.records().len(),
        metrics: session.metrics(),
        rows: session.rows(args.rows),
        summary,
        scene,
        notice,
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
