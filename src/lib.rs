//! quakelapse turns a time-sorted earthquake catalogue into a fading timelapse.
//!
//! The run is a single streaming pass over the catalogue. Events are bucketed into fixed-width,
//! half-open time windows (`[start, end)`). Each closed window becomes one image artifact showing
//! every tracked event as a circle whose opacity decays by one step per window.
//!
//! # Pipeline overview
//!
//! 1. **Fetch** (optional): download the catalogue as CSV, one month range at a time
//!    ([`fetch_all`], [`UsgsSource`]).
//! 2. **Ingest**: parse rows into [`Event`]s ([`EventReader`]).
//! 3. **Coordinate**: [`FrameCoordinator`] closes windows, asks a [`RenderSurface`] for pixels
//!    and hands them to an [`ArtifactStore`].
//! 4. **Encode** (optional): feed `frame-%06d.<ext>` to the system `ffmpeg` binary
//!    ([`encode_frames_dir`]).
//!
//! Resuming is idempotent: a rerun replays the whole stream and only renders frames whose
//! artifact is missing.
//!
//! Pixels are premultiplied RGBA8 until they are encoded to an image file.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod encode;
mod foundation;
mod geo;
mod ingest;
mod pipeline;
mod render;
mod schedule;
mod source;
mod store;
mod track;

pub use config::{FetchSettings, RunConfig, VideoSettings};
pub use encode::ffmpeg::{
    EncodeReport, VideoEncodeOpts, count_input_frames, encode_frames_dir, ensure_parent_dir,
    is_ffmpeg_on_path,
};
pub use foundation::core::{Canvas, FrameIndex, Point, frame_file_name, frame_file_pattern};
pub use foundation::error::{QuakeError, QuakeResult};
pub use geo::mapper::CoordinateMapper;
pub use ingest::event::{Event, parse_row, parse_timestamp};
pub use ingest::reader::{EventReader, open_events};
pub use pipeline::coordinator::{FrameCoordinator, Phase, RunStats, window_label};
pub use render::codec::{encode_frame, format_for_ext};
pub use render::cpu::CpuSurface;
pub use render::surface::{FrameRGBA, LabelStyle, RenderSettings, RenderSurface};
pub use schedule::window::{AdvancePolicy, Window, WindowScheduler, window_width};
pub use source::usgs::{EventSource, FetchStats, UsgsSource, fetch_all, month_ranges};
pub use store::frames::{ArtifactStore, FramesDir, InMemoryStore};
pub use track::entity::VisualEntity;
pub use track::tracker::EntityTracker;
