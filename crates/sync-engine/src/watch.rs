//! Change detection.
//!
//! Two predicates, applied in sequence: [`FileWatch::poll`] decides whether a
//! cycle runs at all (the file's modification time moved forward), and
//! [`content_changed`] decides whether a cycle that ran pushes anything (the
//! extracted state differs from what was last applied).

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::{debug, trace};

use crate::DesiredState;

/// Polls a file's modification time.
#[derive(Debug, Clone)]
pub struct FileWatch {
    /// Watched file.
    path: PathBuf,
    /// Last observed modification time; `UNIX_EPOCH` when the file was missing.
    last_modified: SystemTime,
}

impl FileWatch {
    /// Watch `path`, taking its current modification time as already seen.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_modified = modified_time(&path);
        debug!(path = %path.display(), "Watching data file");
        Self {
            path,
            last_modified,
        }
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the modification time is strictly newer than the last one
    /// observed. A positive result records the new time, so the same
    /// modification fires once.
    pub fn poll(&mut self) -> bool {
        let current = modified_time(&self.path);
        if current > self.last_modified {
            trace!(path = %self.path.display(), "Data file modified");
            self.last_modified = current;
            true
        } else {
            false
        }
    }
}

/// Modification time of `path`, or `UNIX_EPOCH` when it cannot be read.
pub fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// True when `desired` differs from `last_applied` (or nothing was applied yet).
pub fn content_changed(desired: &DesiredState, last_applied: Option<&DesiredState>) -> bool {
    last_applied != Some(desired)
}

#[cfg(test)]
mod tests {
    use std::{fs::File, time::Duration};

    use super::*;
    use crate::TypedValue;

    fn touch(path: &Path, at: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(at)
            .unwrap();
    }

    #[test]
    fn fires_once_per_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a\n1\n").unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(&path, base);

        let mut w = FileWatch::new(&path);
        assert!(!w.poll(), "initial time counts as seen");

        touch(&path, base + Duration::from_secs(1));
        assert!(w.poll());
        assert!(!w.poll(), "same timestamp must not fire twice");

        // Going backwards never fires.
        touch(&path, base);
        assert!(!w.poll());
    }

    #[test]
    fn missing_file_waits_for_reappearance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut w = FileWatch::new(&path);
        assert!(!w.poll());

        fs::write(&path, "a\n1\n").unwrap();
        assert!(w.poll());
    }

    #[test]
    fn content_gate() {
        let mut a = DesiredState::new();
        a.insert("Name".into(), TypedValue::Text("Ada".into()));
        let b = a.clone();
        assert!(content_changed(&a, None));
        assert!(!content_changed(&a, Some(&b)));

        let mut c = a.clone();
        c.insert("Name".into(), TypedValue::Text("Grace".into()));
        assert!(content_changed(&c, Some(&a)));
    }
}
