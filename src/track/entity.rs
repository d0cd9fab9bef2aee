use crate::{geo::mapper::CoordinateMapper, ingest::event::Event};

/// Fading on-screen marker derived from one [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualEntity {
    /// Screen-space centre x.
    pub x: f64,
    /// Screen-space centre y.
    pub y: f64,
    /// Circle radius in pixels (magnitude squared).
    pub radius: f64,
    /// Fill opacity; starts at 1.0 and is not clamped here.
    pub alpha: f64,
    /// Decay steps applied so far.
    pub age: u32,
}

impl VisualEntity {
    /// Fresh, fully visible entity for `event`.
    pub fn spawn(event: &Event, mapper: &CoordinateMapper) -> Self {
        let center = mapper.map(event.longitude, event.latitude);
        Self {
            x: center.x,
            y: center.y,
            radius: event.magnitude * event.magnitude,
            alpha: 1.0,
            age: 0,
        }
    }

    /// Apply one decay step.
    pub(crate) fn step(&mut self, decay_rate: f64) {
        self.alpha -= decay_rate;
        self.age += 1;
    }
}
