use super::vec2d::Vec2D;
use crate::event;
use crate::telemetry::ParamSet;

/// A filled circle in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    center: Vec2D<f64>,
    radius: f64,
}

impl Disc {
    pub const fn new(center: Vec2D<f64>, radius: f64) -> Self { Self { center, radius } }
    pub fn center(&self) -> Vec2D<f64> { self.center }
    pub fn radius(&self) -> f64 { self.radius }

    /// Whether the two discs share any area. Touching edges do not count.
    pub fn overlaps(&self, other: &Disc) -> bool {
        self.center().euclid_distance(&other.center()) < self.radius() + other.radius()
    }
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    tick: u64,
    body: Disc,
    satellite: Disc,
    params: ParamSet,
}

impl Frame {
    pub const SCENE_SIZE: Vec2D<u32> = Vec2D::new(600, 600);
    const BODY_RADIUS: f64 = 50.0;
    const SATELLITE_RADIUS: f64 = 10.0;

    pub fn new(tick: u64, body_center: Vec2D<f64>, satellite: Vec2D<f64>, params: ParamSet) -> Self {
        Self {
            tick,
            body: Disc::new(body_center, Self::BODY_RADIUS),
            satellite: Disc::new(satellite, Self::SATELLITE_RADIUS),
            params,
        }
    }

    pub fn tick(&self) -> u64 { self.tick }
    pub fn body(&self) -> &Disc { &self.body }
    pub fn satellite(&self) -> &Disc { &self.satellite }
    pub fn params(&self) -> ParamSet { self.params }

    /// The satellite is drawn over the body, so this is when the two visually merge.
    pub fn satellite_occluded(&self) -> bool { self.satellite().overlaps(self.body()) }
}

/// The drawing side of the render loop. Windowing and rasterization live behind this.
pub trait FrameSink {
    fn draw(&mut self, frame: &Frame);
}

/// Headless sink: reports positions through the event log and remembers the latest frame.
#[derive(Debug, Default)]
pub struct LogFrameSink {
    last: Option<Frame>,
    drawn: u64,
    occluded: bool,
    occlusions: u64,
}

impl LogFrameSink {
    pub fn new() -> Self { Self::default() }
    pub fn last(&self) -> Option<&Frame> { self.last.as_ref() }
    pub fn drawn(&self) -> u64 { self.drawn }
    /// Number of times the satellite moved onto the body.
    pub fn occlusions(&self) -> u64 { self.occlusions }
}

impl FrameSink for LogFrameSink {
    fn draw(&mut self, frame: &Frame) {
        event!(
            "Tick {}: satellite at {} with {}",
            frame.tick(),
            frame.satellite().center(),
            frame.params()
        );
        let occluded = frame.satellite_occluded();
        if occluded != self.occluded {
            if occluded {
                self.occlusions += 1;
                event!("Tick {}: satellite overlaps the body", frame.tick());
            } else {
                event!("Tick {}: satellite clear of the body", frame.tick());
            }
            self.occluded = occluded;
        }
        self.drawn += 1;
        self.last = Some(*frame);
    }
}
