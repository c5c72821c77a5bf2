use super::{Frame, FrameSink, LogFrameSink, OrbitLoop, SimState, frame::Disc, vec2d::Vec2D};
use crate::config::SimConfig;
use crate::telemetry::{ParamSet, TelemetrySession};
use rand::Rng;
use std::{path::PathBuf, time::Duration};
use tokio::{io::AsyncWriteExt, net::UnixStream};
use tokio_util::sync::CancellationToken;

const TOL: f64 = 1e-9;

fn tmp_socket_path(tag: &str) -> PathBuf {
    let id: u64 = rand::rng().random();
    std::env::temp_dir().join(format!("orbitsim-sim-{tag}-{id:016x}.sock"))
}

fn loop_config(path: PathBuf, max_ticks: Option<u64>) -> SimConfig {
    SimConfig::with_socket_path(path)
        .timing(Duration::from_millis(10), Duration::from_millis(1))
        .tick_limit(max_ticks)
}

#[test]
fn test_initial_state() {
    let state = SimState::new();
    assert_eq!(state.angle(), 0);
    assert_eq!(state.params(), ParamSet::new(2, 10));
    assert!(state.position().approx_eq(&Vec2D::new(310.0, 300.0), TOL));
}

#[test]
fn test_angle_accumulation_full_turn() {
    let params = ParamSet::new(5, 120);
    let start = SimState::new().retarget(params);
    let mut state = start;
    for _ in 0..72 {
        state = state.advance(params);
    }
    assert_eq!(state.angle(), 360);
    assert!(
        state.position().approx_eq(&start.position(), TOL),
        "{} vs {}",
        state.position(),
        start.position()
    );
}

#[test]
fn test_angle_is_not_reduced() {
    let params = ParamSet::new(90, 100);
    let mut state = SimState::new();
    let expected = [
        Vec2D::new(300.0, 400.0),
        Vec2D::new(200.0, 300.0),
        Vec2D::new(300.0, 200.0),
        Vec2D::new(400.0, 300.0),
        Vec2D::new(300.0, 400.0),
    ];
    for pos in expected {
        state = state.advance(params);
        assert!(state.position().approx_eq(&pos, 1e-6), "angle {} at {}", state.angle(), state.position());
    }
    assert_eq!(state.angle(), 450);
}

#[test]
fn test_position_stays_on_orbit() {
    let mut rng = rand::rng();
    let mut state = SimState::new();
    let mut expected_angle = 0i64;
    for _ in 0..200 {
        let params = ParamSet::new(rng.random_range(-30..30), rng.random_range(0..280));
        state = state.advance(params);
        expected_angle += i64::from(params.orbital_speed());
        let radius = state.position().euclid_distance(&SimState::CENTER);
        assert!((radius - f64::from(params.altitude())).abs() < 1e-6);
    }
    assert_eq!(state.angle(), expected_angle);
}

#[test]
fn test_log_sink_keeps_last_frame() {
    let mut sink = LogFrameSink::new();
    assert!(sink.last().is_none());
    let state = SimState::new();
    for tick in 0..3 {
        sink.draw(&Frame::new(tick, SimState::CENTER, state.position(), state.params()));
    }
    assert_eq!(sink.drawn(), 3);
    let last = sink.last().unwrap();
    assert_eq!(last.tick(), 2);
    assert!((last.body().radius() - 50.0).abs() < TOL);
    assert!((last.satellite().radius() - 10.0).abs() < TOL);
}

#[test]
fn test_disc_overlap() {
    let body = Disc::new(SimState::CENTER, 50.0);
    assert!(Disc::new(Vec2D::new(310.0, 300.0), 10.0).overlaps(&body));
    assert!(Disc::new(Vec2D::new(300.0, 359.0), 10.0).overlaps(&body));
    assert!(!Disc::new(Vec2D::new(300.0, 360.0), 10.0).overlaps(&body));
    assert!(!Disc::new(Vec2D::new(420.0, 300.0), 10.0).overlaps(&body));
}

#[test]
fn test_log_sink_counts_occlusions() {
    let mut sink = LogFrameSink::new();
    let low = SimState::new();
    let high = low.retarget(ParamSet::new(2, 120));
    let states = [high, low, low, high, high, low];
    for (tick, state) in (0..).zip(states) {
        let frame = Frame::new(tick, SimState::CENTER, state.position(), state.params());
        assert_eq!(frame.satellite_occluded(), state.params().altitude() < 60);
        sink.draw(&frame);
    }
    assert_eq!(sink.drawn(), 6);
    assert_eq!(sink.occlusions(), 2);
    assert_eq!(sink.last().unwrap().params(), ParamSet::DEFAULT);
}

#[tokio::test]
async fn test_loop_honours_tick_limit() {
    let config = loop_config(tmp_socket_path("limit"), Some(5));
    let session = TelemetrySession::detached(&config);
    let mut orbit_loop = OrbitLoop::new(session, LogFrameSink::new(), &config, CancellationToken::new());
    assert_eq!(orbit_loop.run().await, 5);
    assert_eq!(orbit_loop.sink().drawn(), 5);
    assert_eq!(orbit_loop.sink().last().unwrap().tick(), 4);
    assert_eq!(orbit_loop.state().angle(), 10);
    assert_eq!(orbit_loop.state().params(), ParamSet::DEFAULT);
    assert_eq!(orbit_loop.sink().occlusions(), 1);
}

#[tokio::test]
async fn test_loop_stops_on_cancel_and_tears_down() {
    let path = tmp_socket_path("cancel");
    std::fs::write(&path, b"").unwrap();
    let config = loop_config(path.clone(), None);
    let c_tok = CancellationToken::new();
    c_tok.cancel();
    let mut orbit_loop = OrbitLoop::new(TelemetrySession::detached(&config), LogFrameSink::new(), &config, c_tok);
    assert_eq!(orbit_loop.run().await, 0);
    assert!(orbit_loop.sink().last().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_loop_cancel_mid_run() {
    let config = loop_config(tmp_socket_path("mid"), None);
    let c_tok = CancellationToken::new();
    let c_tok_clone = c_tok.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        c_tok_clone.cancel();
    });
    let mut orbit_loop = OrbitLoop::new(TelemetrySession::detached(&config), LogFrameSink::new(), &config, c_tok);
    let ticks = tokio::time::timeout(Duration::from_secs(5), orbit_loop.run()).await.unwrap();
    assert!(ticks > 0);
    assert_eq!(orbit_loop.state().angle(), 2 * i64::try_from(ticks).unwrap());
}

#[tokio::test]
async fn test_loop_applies_live_telemetry() {
    let (client, mut peer) = UnixStream::pair().unwrap();
    let config = loop_config(tmp_socket_path("live"), Some(3));
    let session = TelemetrySession::live(client, &config);
    peer.write_all(b"5,120").await.unwrap();

    let mut orbit_loop = OrbitLoop::new(session, LogFrameSink::new(), &config, CancellationToken::new());
    assert_eq!(orbit_loop.run().await, 3);
    assert_eq!(orbit_loop.state().params(), ParamSet::new(5, 120));
    assert_eq!(orbit_loop.state().angle(), 15);
    let last = orbit_loop.sink().last().unwrap();
    // Drawn before the final advance: two steps of 5 degrees at altitude 120.
    let expected = SimState::with(10, ParamSet::new(5, 120)).position();
    assert!(last.satellite().center().approx_eq(&expected, TOL));
    assert!(!orbit_loop.session().is_live());
}
