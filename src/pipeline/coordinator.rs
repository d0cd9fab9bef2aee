use crate::{
    config::RunConfig,
    foundation::{
        core::FrameIndex,
        error::{QuakeError, QuakeResult},
    },
    geo::mapper::CoordinateMapper,
    ingest::event::Event,
    render::surface::RenderSurface,
    schedule::window::{AdvancePolicy, Window, WindowScheduler},
    store::frames::ArtifactStore,
    track::tracker::EntityTracker,
};

/// Coordinator lifecycle as seen from outside a `push` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Ready for the next event.
    AwaitingEvent,
    /// The event source is exhausted; no further events are accepted.
    Done,
}

/// Counters for one coordinator run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Events consumed.
    pub events: u64,
    /// Windows closed with a fresh render.
    pub frames_rendered: u64,
    /// Windows closed whose artifact already existed.
    pub frames_skipped: u64,
    /// Entities dropped by decay.
    pub entities_evicted: u64,
}

impl RunStats {
    /// Windows closed, rendered or skipped.
    pub fn frames_closed(&self) -> u64 {
        self.frames_rendered + self.frames_skipped
    }
}

/// Single-pass state machine turning sorted events into per-window frames.
///
/// For each event: while the event lies past the current window's end (once under
/// [`AdvancePolicy::Single`]), emit or skip the current frame, decay the tracker and advance the
/// window. The event is then added to the tracker. Only artifacts are durable; a resumed run
/// replays the whole stream and skips rendering for frames whose artifact exists.
pub struct FrameCoordinator {
    mapper: CoordinateMapper,
    tracker: EntityTracker,
    scheduler: WindowScheduler,
    policy: AdvancePolicy,
    frame: FrameIndex,
    phase: Phase,
    stats: RunStats,
}

impl FrameCoordinator {
    /// Coordinator starting at frame 0 in the scheduler's current window.
    pub fn new(
        mapper: CoordinateMapper,
        tracker: EntityTracker,
        scheduler: WindowScheduler,
        policy: AdvancePolicy,
    ) -> Self {
        Self {
            mapper,
            tracker,
            scheduler,
            policy,
            frame: FrameIndex(0),
            phase: Phase::AwaitingEvent,
            stats: RunStats::default(),
        }
    }

    /// Coordinator for a validated run configuration.
    pub fn from_config(cfg: &RunConfig) -> QuakeResult<Self> {
        cfg.validate()?;
        let scheduler = WindowScheduler::new(cfg.range_start, cfg.window_width()?)?;
        tracing::debug!(
            origin = %scheduler.origin(),
            width_ms = scheduler.width().num_milliseconds(),
            windows = cfg.total_frames()?,
            "window schedule"
        );
        Ok(Self::new(
            CoordinateMapper::new(cfg.render.canvas),
            EntityTracker::new(cfg.fade_frames)?,
            scheduler,
            cfg.advance,
        ))
    }

    /// Index the next closed window will be written under.
    pub fn frame_index(&self) -> FrameIndex {
        self.frame
    }

    /// Window currently accumulating events.
    pub fn current_window(&self) -> Window {
        self.scheduler.current()
    }

    /// Tracked entities.
    pub fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    /// Counters so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consume one event. Events must arrive in non-decreasing timestamp order.
    pub fn push(
        &mut self,
        event: &Event,
        surface: &mut dyn RenderSurface,
        store: &mut dyn ArtifactStore,
    ) -> QuakeResult<()> {
        if self.phase == Phase::Done {
            return Err(QuakeError::validation(
                "coordinator already finished; start a new pass from the beginning",
            ));
        }

        while self.scheduler.current().is_closed_by(event.timestamp) {
            self.close_window(surface, store)?;
            if self.policy == AdvancePolicy::Single {
                break;
            }
        }

        self.tracker.add(event, &self.mapper);
        self.stats.events += 1;
        Ok(())
    }

    /// Mark the source exhausted. The trailing, still-open window is dropped.
    pub fn finish(&mut self) -> RunStats {
        if self.phase != Phase::Done {
            self.phase = Phase::Done;
            tracing::info!(
                events = self.stats.events,
                rendered = self.stats.frames_rendered,
                skipped = self.stats.frames_skipped,
                open_entities = self.tracker.len(),
                "event source exhausted; trailing window dropped"
            );
        }
        self.stats
    }

    /// Drive a whole event stream. Any error aborts the run immediately.
    #[tracing::instrument(skip_all)]
    pub fn run<I>(
        &mut self,
        events: I,
        surface: &mut dyn RenderSurface,
        store: &mut dyn ArtifactStore,
    ) -> QuakeResult<RunStats>
    where
        I: IntoIterator<Item = QuakeResult<Event>>,
    {
        for event in events {
            let event = event?;
            self.push(&event, surface, store)?;
        }
        Ok(self.finish())
    }

    fn close_window(
        &mut self,
        surface: &mut dyn RenderSurface,
        store: &mut dyn ArtifactStore,
    ) -> QuakeResult<()> {
        let window = self.scheduler.current();
        let index = self.frame;

        if store.contains(index)? {
            tracing::info!(
                frame = %index,
                events = self.stats.events,
                "frame already exists; skipping render"
            );
            self.stats.frames_skipped += 1;
        } else {
            let frame = surface.render(self.tracker.entities(), &window_label(&window))?;
            let canvas = surface.canvas();
            if (frame.width, frame.height) != (canvas.width, canvas.height) {
                return Err(QuakeError::render(format!(
                    "surface produced a {}x{} frame for a {}x{} canvas",
                    frame.width, frame.height, canvas.width, canvas.height
                )));
            }
            store.persist(index, &frame)?;
            tracing::info!(
                frame = %index,
                events = self.stats.events,
                entities = self.tracker.len(),
                "wrote frame"
            );
            self.stats.frames_rendered += 1;
        }

        self.scheduler.advance()?;
        self.stats.entities_evicted += self.tracker.decay() as u64;
        self.frame = index.next();
        Ok(())
    }
}

/// On-image label for a window: its start in UTC.
pub fn window_label(window: &Window) -> String {
    window.start.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/coordinator.rs"]
mod tests;
