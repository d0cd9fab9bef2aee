//! Persisted frame artifacts.
//!
//! Artifact presence is the only completion marker a run leaves behind; a resumed run probes it
//! before rendering.

/// Filesystem and in-memory artifact stores.
pub mod frames;
