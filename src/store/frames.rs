use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{FrameIndex, frame_file_name},
        error::{QuakeError, QuakeResult},
    },
    render::{
        codec::{encode_frame, format_for_ext},
        surface::FrameRGBA,
    },
};

/// Where closed-window frames end up.
pub trait ArtifactStore {
    /// `true` when the artifact for `index` already exists.
    fn contains(&self, index: FrameIndex) -> QuakeResult<bool>;

    /// Persist the artifact for `index`. Must not leave a partial artifact behind on failure.
    fn persist(&mut self, index: FrameIndex, frame: &FrameRGBA) -> QuakeResult<()>;
}

/// One encoded image per frame in a directory, named `frame-NNNNNN.<ext>`.
#[derive(Clone, Debug)]
pub struct FramesDir {
    dir: PathBuf,
    ext: String,
    format: image::ImageFormat,
}

impl FramesDir {
    /// Open (creating if needed) a frame directory writing `ext` images.
    pub fn create(dir: impl Into<PathBuf>, ext: &str) -> QuakeResult<Self> {
        let dir = dir.into();
        let format = format_for_ext(ext)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create frame directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            ext: ext.to_string(),
            format,
        })
    }

    /// Directory holding the artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact file extension.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Exact artifact path for `index`.
    pub fn path_for(&self, index: FrameIndex) -> PathBuf {
        self.dir.join(frame_file_name(index, &self.ext))
    }

    /// Number of artifacts present without a gap, starting at frame 0.
    pub fn contiguous_len(&self) -> QuakeResult<u64> {
        let mut n = 0u64;
        while self.contains(FrameIndex(n))? {
            n += 1;
        }
        Ok(n)
    }

    fn partial_path_for(&self, index: FrameIndex) -> PathBuf {
        self.dir
            .join(format!(".{}.partial", frame_file_name(index, &self.ext)))
    }
}

impl ArtifactStore for FramesDir {
    fn contains(&self, index: FrameIndex) -> QuakeResult<bool> {
        let path = self.path_for(index);
        path.try_exists()
            .with_context(|| format!("probe artifact '{}'", path.display()))
            .map_err(QuakeError::from)
    }

    fn persist(&mut self, index: FrameIndex, frame: &FrameRGBA) -> QuakeResult<()> {
        let bytes = encode_frame(frame, self.format)?;
        let partial = self.partial_path_for(index);
        let target = self.path_for(index);

        let written = std::fs::write(&partial, &bytes)
            .and_then(|()| std::fs::rename(&partial, &target));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&partial);
            return Err(QuakeError::render(format!(
                "failed to write frame '{}': {e}",
                target.display()
            )));
        }
        Ok(())
    }
}

/// In-memory store for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    frames: BTreeMap<FrameIndex, FrameRGBA>,
    persisted: Vec<FrameIndex>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an artifact as if a previous run had written it.
    pub fn insert(&mut self, index: FrameIndex, frame: FrameRGBA) {
        self.frames.insert(index, frame);
    }

    /// Stored frame for `index`.
    pub fn get(&self, index: FrameIndex) -> Option<&FrameRGBA> {
        self.frames.get(&index)
    }

    /// Indices stored so far, ascending.
    pub fn indices(&self) -> Vec<FrameIndex> {
        self.frames.keys().copied().collect()
    }

    /// Indices written through [`ArtifactStore::persist`], in call order.
    pub fn persisted(&self) -> &[FrameIndex] {
        &self.persisted
    }
}

impl ArtifactStore for InMemoryStore {
    fn contains(&self, index: FrameIndex) -> QuakeResult<bool> {
        Ok(self.frames.contains_key(&index))
    }

    fn persist(&mut self, index: FrameIndex, frame: &FrameRGBA) -> QuakeResult<()> {
        self.frames.insert(index, frame.clone());
        self.persisted.push(index);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/frames.rs"]
mod tests;
