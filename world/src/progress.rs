//! Level-selection progress and the storage seam it is persisted through.

use path_defence_core::{Event, LevelId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Persisted record of the level the player last reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Identifier of the level to resume.
    #[serde(rename = "levelId")]
    pub level: u32,
}

impl Progress {
    /// Progress pointing at `level`.
    #[must_use]
    pub const fn at(level: LevelId) -> Self {
        Self { level: level.get() }
    }

    /// Level to resume.
    #[must_use]
    pub const fn level_id(&self) -> LevelId {
        LevelId::new(self.level)
    }

    /// Parses a stored record. Malformed data reads as no progress.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(progress) => Some(progress),
            Err(error) => {
                warn!(%error, "ignoring malformed progress record");
                None
            }
        }
    }

    /// Encodes the record for storage.
    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Failures raised by progress storage.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The storage medium could not be read or written.
    #[error("progress storage failed")]
    Io(#[from] std::io::Error),
    /// The record could not be encoded.
    #[error("progress record could not be encoded")]
    Encode(#[from] serde_json::Error),
}

/// Storage for a single progress record.
pub trait ProgressStore {
    /// Loads the stored record, treating missing or corrupt data as `None`.
    fn load(&self) -> Option<Progress>;

    /// Replaces the stored record.
    fn save(&mut self, progress: Progress) -> Result<(), ProgressError>;

    /// Removes the stored record.
    fn clear(&mut self) -> Result<(), ProgressError>;
}

/// In-memory store holding the encoded record.
#[derive(Clone, Debug, Default)]
pub struct MemoryProgressStore {
    raw: Option<String>,
}

impl MemoryProgressStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with raw encoded data.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    /// Encoded data currently held, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Option<Progress> {
        self.raw.as_deref().and_then(Progress::from_json)
    }

    fn save(&mut self, progress: Progress) -> Result<(), ProgressError> {
        self.raw = Some(progress.to_json()?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        self.raw = None;
        Ok(())
    }
}

/// Mirrors level loads and progress resets from `events` into `store`.
///
/// Storage failures are logged and otherwise ignored.
pub fn persist_events<S>(store: &mut S, events: &[Event])
where
    S: ProgressStore + ?Sized,
{
    for event in events {
        let result = match event {
            Event::LevelLoaded { level } => {
                debug!(level = level.get(), "saving progress");
                store.save(Progress::at(*level))
            }
            Event::ProgressCleared => {
                debug!("clearing progress");
                store.clear()
            }
            _ => continue,
        };

        if let Err(error) = result {
            warn!(%error, "progress storage unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_round_trip_through_json() {
        let progress = Progress { level: 3 };
        let raw = progress.to_json().expect("encode");
        assert_eq!(raw, r#"{"levelId":3}"#);
        assert_eq!(Progress::from_json(&raw), Some(progress));
    }

    #[test]
    fn malformed_records_read_as_absent() {
        assert_eq!(Progress::from_json("not json"), None);
        assert_eq!(Progress::from_json(r#"{"levelId":"two"}"#), None);
        assert_eq!(Progress::from_json(r#"{"level":2}"#), None);
        assert_eq!(MemoryProgressStore::with_raw("{").load(), None);
    }

    #[test]
    fn stored_level_id_records_resume_that_level() {
        let store = MemoryProgressStore::with_raw(r#"{"levelId":2}"#);
        assert_eq!(store.load(), Some(Progress { level: 2 }));
        assert_eq!(store.load().map(|progress| progress.level_id()), Some(LevelId::new(2)));
    }

    #[test]
    fn events_drive_saves_and_clears() {
        let mut store = MemoryProgressStore::new();
        persist_events(
            &mut store,
            &[Event::LevelLoaded {
                level: LevelId::new(2),
            }],
        );
        assert_eq!(store.load(), Some(Progress { level: 2 }));

        persist_events(
            &mut store,
            &[
                Event::LevelLoaded {
                    level: LevelId::new(1),
                },
                Event::ProgressCleared,
            ],
        );
        assert_eq!(store.load(), None);
    }
}
