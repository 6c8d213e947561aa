// ── Activity marker ──
//
// A tiny file holding the epoch second of the last successful command.
// Other processes (status widgets, scripts) poll it to learn that device
// state probably changed. Writes are debounced.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ActivityMarker {
    path: PathBuf,
    debounce: Duration,
}

impl ActivityMarker {
    pub fn new(path: impl Into<PathBuf>, debounce: Duration) -> Self {
        Self {
            path: path.into(),
            debounce,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last recorded command time, if any.
    pub fn last(&self) -> Option<DateTime<Utc>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let secs: i64 = raw.trim().parse().ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Record `now` unless the previous write is within the debounce window.
    ///
    /// Returns whether the file was rewritten.
    pub fn touch(&self, now: DateTime<Utc>) -> io::Result<bool> {
        let prev = self.last().map_or(0, |t| t.timestamp());
        let elapsed = now.timestamp() - prev;
        let window = i64::try_from(self.debounce.as_secs()).unwrap_or(i64::MAX);

        if elapsed <= window {
            debug!(elapsed, "activity marker is fresh, skipping write");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, now.timestamp().to_string())?;
        debug!(path = %self.path.display(), ts = now.timestamp(), "activity marker updated");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn first_touch_writes() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ActivityMarker::new(dir.path().join("state/marker"), Duration::from_secs(5));

        assert!(marker.last().is_none());
        assert!(marker.touch(at(1_700_000_000)).unwrap());
        assert_eq!(marker.last(), Some(at(1_700_000_000)));
    }

    #[test]
    fn writes_are_debounced() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ActivityMarker::new(dir.path().join("marker"), Duration::from_secs(5));

        assert!(marker.touch(at(1_700_000_000)).unwrap());
        assert!(!marker.touch(at(1_700_000_003)).unwrap());
        assert!(!marker.touch(at(1_700_000_005)).unwrap());
        assert_eq!(marker.last(), Some(at(1_700_000_000)));

        assert!(marker.touch(at(1_700_000_006)).unwrap());
        assert_eq!(marker.last(), Some(at(1_700_000_006)));
    }

    #[test]
    fn garbage_content_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker");
        std::fs::write(&path, "not a number").unwrap();

        let marker = ActivityMarker::new(&path, Duration::from_secs(10));
        assert!(marker.touch(at(1_700_000_000)).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1700000000");
    }
}
