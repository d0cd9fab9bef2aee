use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::foundation::{
    core::{FrameIndex, frame_file_name, frame_file_pattern},
    error::{QuakeError, QuakeResult},
};

/// Inputs for turning a frames directory into an MP4.
#[derive(Clone, Debug)]
pub struct VideoEncodeOpts {
    /// Directory holding `frame-NNNNNN.<ext>` artifacts.
    pub frames_dir: PathBuf,
    /// Artifact extension.
    pub ext: String,
    /// Output frame rate; one artifact per video frame.
    pub fps: u32,
    /// Encoded video path.
    pub out_path: PathBuf,
    /// Replace `out_path` if it exists.
    pub overwrite: bool,
}

impl VideoEncodeOpts {
    /// Reject values ffmpeg would choke on.
    pub fn validate(&self) -> QuakeResult<()> {
        if self.fps == 0 {
            return Err(QuakeError::validation("encode fps must be non-zero"));
        }
        if self.ext.trim().is_empty() {
            return Err(QuakeError::validation("frame extension must not be empty"));
        }
        Ok(())
    }
}

/// Summary of a finished encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeReport {
    /// Contiguous artifacts fed to ffmpeg, starting at frame 0.
    pub frames: u64,
    /// Written video path.
    pub out_path: PathBuf,
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> QuakeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Number of consecutive artifacts present from `frame-000000` on.
///
/// ffmpeg's image2 demuxer stops at the first gap, so this is what it will actually read.
pub fn count_input_frames(frames_dir: &Path, ext: &str) -> u64 {
    let mut n = 0u64;
    while frames_dir.join(frame_file_name(FrameIndex(n), ext)).is_file() {
        n += 1;
    }
    n
}

/// Encode `frame-%06d.<ext>` from `opts.frames_dir` with the system ffmpeg (H.264, yuv420p).
#[tracing::instrument(skip_all, fields(frames_dir = %opts.frames_dir.display()))]
pub fn encode_frames_dir(opts: &VideoEncodeOpts) -> QuakeResult<EncodeReport> {
    opts.validate()?;

    let frames = count_input_frames(&opts.frames_dir, &opts.ext);
    if frames == 0 {
        return Err(QuakeError::encode(format!(
            "no '{}' found in '{}'",
            frame_file_name(FrameIndex(0), &opts.ext),
            opts.frames_dir.display()
        )));
    }

    if !opts.overwrite && opts.out_path.exists() {
        return Err(QuakeError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    ensure_parent_dir(&opts.out_path)?;

    if !is_ffmpeg_on_path() {
        return Err(QuakeError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let input = opts.frames_dir.join(frame_file_pattern(&opts.ext));
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.arg(if opts.overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error", "-framerate", &opts.fps.to_string(), "-i"])
        .arg(&input)
        .args([
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&opts.out_path);

    tracing::info!(frames, fps = opts.fps, out = %opts.out_path.display(), "encoding video");

    let child = cmd.spawn().map_err(|e| {
        QuakeError::encode(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;
    let output = child
        .wait_with_output()
        .map_err(|e| QuakeError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(QuakeError::encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    tracing::info!(out = %opts.out_path.display(), "video written");
    Ok(EncodeReport {
        frames,
        out_path: opts.out_path.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
