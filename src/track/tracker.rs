use crate::{
    foundation::error::{QuakeError, QuakeResult},
    geo::mapper::CoordinateMapper,
    ingest::event::Event,
    track::entity::VisualEntity,
};

/// Owns the set of currently visible entities.
///
/// All mutation goes through [`EntityTracker::add`] and [`EntityTracker::decay`].
#[derive(Clone, Debug)]
pub struct EntityTracker {
    entities: Vec<VisualEntity>,
    duration: u32,
    decay_rate: f64,
}

impl EntityTracker {
    /// Tracker whose entities stay visible for `duration` decay steps.
    pub fn new(duration: u32) -> QuakeResult<Self> {
        if duration == 0 {
            return Err(QuakeError::validation("fade duration must be at least one frame"));
        }
        Ok(Self {
            entities: Vec::new(),
            duration,
            decay_rate: 1.0 / f64::from(duration),
        })
    }

    /// Fade duration in frames.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Per-step alpha reduction (`1 / duration`).
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Start tracking `event` at full visibility. No deduplication.
    pub fn add(&mut self, event: &Event, mapper: &CoordinateMapper) {
        self.entities.push(VisualEntity::spawn(event, mapper));
    }

    /// Age every entity by one step, then drop the ones older than the fade duration.
    ///
    /// Returns how many entities were evicted.
    pub fn decay(&mut self) -> usize {
        for entity in &mut self.entities {
            entity.step(self.decay_rate);
        }
        let before = self.entities.len();
        let duration = self.duration;
        self.entities.retain(|e| e.age <= duration);
        before - self.entities.len()
    }

    /// Currently tracked entities, in insertion order.
    pub fn entities(&self) -> &[VisualEntity] {
        &self.entities
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/tracker.rs"]
mod tests;
