//! Append-only log file sink.
//!
//! Events are written through a `Mutex<File>`, which implements `MakeWriter`,
//! so concurrent events serialize on the lock.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};

use tracing_subscriber::fmt::{
    self,
    format::{DefaultFields, Format},
};

/// Open `path` for appending, creating it and any missing parent directories.
pub fn open_append(path: &Path) -> io::Result<Mutex<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Mutex::new(file))
}

/// A timestamped `fmt` layer without ANSI colors, writing to the file at `path`.
pub type FileLayer<S> = fmt::Layer<S, DefaultFields, Format, Mutex<File>>;

/// Build a [`FileLayer`] appending to `path`.
pub fn layer<S>(path: &Path) -> io::Result<FileLayer<S>> {
    let writer = open_append(path)?;
    Ok(fmt::layer().with_ansi(false).with_writer(writer))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn open_append_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("csvsync.log");
        {
            let w = open_append(&path).unwrap();
            writeln!(w.lock().unwrap(), "first").unwrap();
        }
        {
            let w = open_append(&path).unwrap();
            writeln!(w.lock().unwrap(), "second").unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }
}
