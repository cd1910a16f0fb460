use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Instant;

mod args;

use args::Args;
use rusty_hands::config::AppConfig;
use rusty_hands::metrics::ProcessMonitor;
use rusty_hands::output::{annotate, TelemetryWriter};
use rusty_hands::pipeline::GesturePipeline;
use rusty_hands::source::{FrameSource, MaskSource, ReplaySource};
use rusty_hands::types::FrameContext;

fn open_source(args: &Args, config: &AppConfig) -> Result<Box<dyn FrameSource>> {
    match (&args.frames, &args.masks) {
        (Some(path), _) => Ok(Box::new(ReplaySource::open(path)?)),
        (None, Some(dir)) => Ok(Box::new(MaskSource::open(dir, config.contour.mask_threshold)?)),
        (None, None) => anyhow::bail!("either --frames or --masks is required"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_hands=info".into()),
        )
        .init();

    let args = Args::parse();

    // 0. Load Config
    let mut config = AppConfig::load(&args.config)?;
    if let Some(dir) = &args.report_dir {
        config.telemetry.report_dir = dir.clone();
    }
    if args.no_telemetry {
        config.telemetry.enabled = false;
    }

    // 1. Setup Source
    let mut source = open_source(&args, &config)?;
    println!("{}", format!("Opened source: {}", source.name()).green());

    // 2. Setup Pipeline
    let pipeline = GesturePipeline::new(&config);
    println!("Active Pipeline: {}", pipeline.name());

    // 3. Setup Telemetry
    let mut telemetry = if config.telemetry.enabled {
        let (writer, path) = TelemetryWriter::create(&config.telemetry.report_dir)?;
        tracing::info!("Writing performance log to {}", path.display());
        Some(writer)
    } else {
        None
    };
    let mut monitor = ProcessMonitor::new();

    // 4. Loop
    let mut ctx = FrameContext::new();
    let mut hands = 0u64;
    while let Some(frame) = source.next_frame()? {
        let started = Instant::now();
        let report = pipeline.process(&ctx, &frame);
        let perf = monitor.sample(started.elapsed());

        if report.result.has_region() {
            hands += 1;
        }
        if !args.quiet {
            println!("{}", annotate(&report));
        }
        if let Some(writer) = telemetry.as_mut() {
            if report.result.has_region() || config.telemetry.log_empty_frames {
                writer.write(&report, &perf)?;
            }
        }

        ctx.advance();
    }

    println!(
        "{}",
        format!("Processed {} frames, hand found in {}", ctx.index, hands).cyan()
    );
    if let Some(writer) = telemetry {
        tracing::info!("Wrote {} telemetry rows", writer.rows());
    }
    Ok(())
}
