use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    foundation::error::{QuakeError, QuakeResult},
    render::surface::RenderSettings,
    schedule::window::{AdvancePolicy, window_width},
};

/// Everything one `quakelapse` run needs. Every field has a default; a JSON file may override any
/// subset and CLI flags are applied on top.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Canvas, colours and label style.
    pub render: RenderSettings,
    /// Output video timing. Also fixes the window count.
    pub video: VideoSettings,
    /// Decay steps before an entity disappears.
    pub fade_frames: u32,
    /// Start of window 0.
    pub range_start: DateTime<Utc>,
    /// End of the time range split into windows.
    pub range_end: DateTime<Utc>,
    /// Reaction to events more than one window ahead.
    pub advance: AdvancePolicy,
    /// Fail on out-of-order timestamps instead of accepting them.
    pub strict_order: bool,
    /// Catalogue CSV path.
    pub data_path: PathBuf,
    /// Frame artifact directory.
    pub frames_dir: PathBuf,
    /// Frame artifact extension; selects the image format.
    pub image_ext: String,
    /// Optional background image, resized to the canvas.
    pub background: Option<PathBuf>,
    /// Optional extra font directory for the label.
    pub fonts_dir: Option<PathBuf>,
    /// Catalogue download settings.
    pub fetch: FetchSettings,
}

/// Output video timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoSettings {
    /// Playback length in seconds.
    pub duration_secs: u64,
    /// Frames per second.
    pub fps: u32,
    /// Encoded video path.
    pub out_path: PathBuf,
    /// Replace an existing video file.
    pub overwrite: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            duration_secs: 3600,
            fps: 24,
            out_path: PathBuf::from("video.mp4"),
            overwrite: true,
        }
    }
}

/// Catalogue download settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// FDSN event query endpoint.
    pub endpoint: String,
    /// First range start.
    pub start: DateTime<Utc>,
    /// Last range start bound; `None` means now.
    pub end: Option<DateTime<Utc>>,
    /// Months per request.
    pub step_months: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://earthquake.usgs.gov/fdsnws/event/1/query".to_owned(),
            start: utc_millis(315_532_800_000),
            end: None,
            step_months: 1,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            video: VideoSettings::default(),
            fade_frames: 12,
            range_start: utc_millis(315_555_465_250),
            range_end: utc_millis(1_518_213_709_307),
            advance: AdvancePolicy::default(),
            strict_order: true,
            data_path: PathBuf::from("data.csv"),
            frames_dir: PathBuf::from("frames"),
            image_ext: "png".to_owned(),
            background: None,
            fonts_dir: None,
            fetch: FetchSettings::default(),
        }
    }
}

fn utc_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

impl RunConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> QuakeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Number of windows, one per output video frame.
    pub fn total_frames(&self) -> QuakeResult<u64> {
        self.video
            .duration_secs
            .checked_mul(u64::from(self.video.fps))
            .ok_or_else(|| QuakeError::validation("video duration × fps overflows"))
    }

    /// Width of every window.
    pub fn window_width(&self) -> QuakeResult<TimeDelta> {
        window_width(self.range_start, self.range_end, self.total_frames()?)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> QuakeResult<()> {
        self.render.canvas.validate()?;
        if self.video.fps == 0 {
            return Err(QuakeError::validation("video fps must be non-zero"));
        }
        if self.video.duration_secs == 0 {
            return Err(QuakeError::validation("video duration must be non-zero"));
        }
        if self.fade_frames == 0 {
            return Err(QuakeError::validation("fade_frames must be non-zero"));
        }
        if self.image_ext.trim().is_empty() {
            return Err(QuakeError::validation("image_ext must not be empty"));
        }
        if self.fetch.step_months == 0 {
            return Err(QuakeError::validation("fetch.step_months must be non-zero"));
        }
        self.window_width()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
