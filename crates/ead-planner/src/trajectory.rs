//! Planned path → speed profile.
//!
//! The trajectory assembler downstream consumes piecewise
//! constant-acceleration segments.  Between two planned states the speed is
//! interpolated so that `v²` varies linearly with distance, which matches
//! both endpoints exactly.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;

use ead_core::Node;

use crate::PlanResult;

/// Constant-acceleration piece between two consecutive planned states.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedSegment {
    pub start:      Node,
    pub end:        Node,
    /// `Δv / Δt`; zero for a zero-duration segment.
    pub accel_mps2: f64,
}

impl SpeedSegment {
    pub fn new(start: Node, end: Node) -> Self {
        let dt = end.time_s() - start.time_s();
        let accel_mps2 = if dt > 0.0 { (end.speed_mps() - start.speed_mps()) / dt } else { 0.0 };
        Self { start, end, accel_mps2 }
    }

    #[inline]
    pub fn length_m(&self) -> f64 {
        self.end.distance_m() - self.start.distance_m()
    }

    #[inline]
    pub fn duration_s(&self) -> f64 {
        self.end.time_s() - self.start.time_s()
    }

    /// `true` if `distance_m` lies on this segment, ends included.
    pub fn contains(&self, distance_m: f64) -> bool {
        distance_m >= self.start.distance_m() && distance_m <= self.end.distance_m()
    }

    fn speed_at(&self, distance_m: f64) -> f64 {
        let length = self.length_m();
        if length <= 0.0 {
            return self.end.speed_mps();
        }
        let frac = ((distance_m - self.start.distance_m()) / length).clamp(0.0, 1.0);
        let v0_sq = self.start.speed_mps().powi(2);
        let v1_sq = self.end.speed_mps().powi(2);
        (v0_sq + frac * (v1_sq - v0_sq)).max(0.0).sqrt()
    }
}

#[derive(Serialize)]
struct Row {
    distance_m: f64,
    time_s:     f64,
    speed_mps:  f64,
}

/// Ordered speed profile built from a planned path.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    points:   Vec<Node>,
    segments: Vec<SpeedSegment>,
}

impl Trajectory {
    pub fn from_path(path: &[Node]) -> Self {
        let segments = path.windows(2).map(|w| SpeedSegment::new(w[0], w[1])).collect();
        Self { points: path.to_vec(), segments }
    }

    pub fn points(&self) -> &[Node] {
        &self.points
    }

    pub fn segments(&self) -> &[SpeedSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Commanded speed at `distance_m`, or `None` outside the path.
    ///
    /// Where the vehicle holds position (a zero-length segment) the speed on
    /// leaving that point is returned.
    pub fn speed_at(&self, distance_m: f64) -> Option<f64> {
        match self.points.as_slice() {
            [] => None,
            [only] => (distance_m == only.distance_m()).then(|| only.speed_mps()),
            _ => self
                .segments
                .iter()
                .rev()
                .find(|s| s.contains(distance_m))
                .map(|s| s.speed_at(distance_m)),
        }
    }

    /// Write `distance_m,time_s,speed_mps` rows, header first.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> PlanResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        for p in &self.points {
            out.serialize(Row {
                distance_m: p.distance_m(),
                time_s:     p.time_s(),
                speed_mps:  p.speed_mps(),
            })?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> PlanResult<()> {
        self.write_csv_to(File::create(path)?)
    }
}
