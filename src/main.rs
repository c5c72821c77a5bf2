#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod logger;
mod simulation;
mod telemetry;

use crate::config::SimConfig;
use crate::simulation::{Frame, LogFrameSink, OrbitLoop};
use crate::telemetry::{TelemetryFeed, TelemetrySession};
use std::env;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = SimConfig::from_env();
    match env::args().nth(1).as_deref() {
        Some("feed") => run_feed(&config).await,
        Some(other) => fatal!("Unknown mode {other:?}, expected no argument or \"feed\""),
        None => run_sim(&config).await,
    }
}

async fn run_sim(config: &SimConfig) {
    info!("Starting program");
    config.log_summary();
    let session = TelemetrySession::establish(config)
        .await
        .unwrap_or_else(|e| fatal!("Telemetry is required but unavailable: {}", e.describe()));

    let c_tok = CancellationToken::new();
    let c_tok_clone = c_tok.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for quit signal: {e}");
            return;
        }
        c_tok_clone.cancel();
    });

    info!(
        "Rendering headless {}x{} scene",
        Frame::SCENE_SIZE.x(),
        Frame::SCENE_SIZE.y()
    );
    let mut orbit_loop = OrbitLoop::new(session, LogFrameSink::new(), config, c_tok);
    let ticks = orbit_loop.run().await;
    let state = orbit_loop.state();
    info!(
        "Finished after {ticks} ticks, satellite at {} with {}",
        state.position(),
        state.params()
    );
    let sink = orbit_loop.sink();
    if let Some(last) = sink.last() {
        log!(
            "Drew {} frames, last one at tick {} with the satellite at {}, {} occlusions",
            sink.drawn(),
            last.tick(),
            last.satellite().center(),
            sink.occlusions()
        );
    }
    log!("Telemetry link ended as {}", orbit_loop.session().state());
}

async fn run_feed(config: &SimConfig) {
    info!("Starting telemetry feed, enter \"<speed> <altitude>\" per line");
    let mut feed = TelemetryFeed::bind(config.socket_path().clone())
        .unwrap_or_else(|e| fatal!("Could not create feed socket: {e:?}"));
    match feed.run_stdin().await {
        Ok(sent) => info!("Input closed after {sent} parameter sets"),
        Err(e) => error!("Feed stopped: {e:?}"),
    }
}
