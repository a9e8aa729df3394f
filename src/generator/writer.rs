use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenError;

/// Destination of rendered artifacts.
pub trait ArtifactWriter {
    /// Persist `contents` at `relative`, replacing anything already there.
    fn write(&mut self, relative: &Path, contents: &[u8]) -> Result<(), GenError>;
}

/// Writes artifacts below a root directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactWriter for FsWriter {
    fn write(&mut self, relative: &Path, contents: &[u8]) -> Result<(), GenError> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| GenError::Write { path, source })
    }
}

/// Keeps artifacts in memory; used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: BTreeMap<PathBuf, Vec<u8>>,
    order: Vec<PathBuf>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(relative.as_ref()).map(Vec::as_slice)
    }

    /// Contents as UTF-8 text, if present and valid.
    pub fn text(&self, relative: impl AsRef<Path>) -> Option<&str> {
        self.get(relative).and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
        &self.files
    }

    /// Paths in the order they were written.
    pub fn written(&self) -> &[PathBuf] {
        &self.order
    }
}

impl ArtifactWriter for MemoryWriter {
    fn write(&mut self, relative: &Path, contents: &[u8]) -> Result<(), GenError> {
        if self
            .files
            .insert(relative.to_path_buf(), contents.to_vec())
            .is_none()
        {
            self.order.push(relative.to_path_buf());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_fs_writer_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FsWriter::new(dir.path());
        let rel = Path::new("internal/provider/shared.go");
        writer.write(rel, b"first").unwrap();
        writer.write(rel, b"second").unwrap();
        assert_eq!(fs::read(dir.path().join(rel)).unwrap(), b"second");
    }

    #[test]
    fn test_fs_writer_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blocker"), b"file").unwrap();
        let mut writer = FsWriter::new(dir.path());
        let err = writer
            .write(Path::new("blocker/inner.go"), b"x")
            .unwrap_err();
        match err {
            GenError::Write { path, .. } => assert!(path.ends_with("blocker")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_memory_writer_tracks_order() {
        let mut writer = MemoryWriter::new();
        writer.write(Path::new("b"), b"1").unwrap();
        writer.write(Path::new("a"), b"2").unwrap();
        writer.write(Path::new("b"), b"3").unwrap();
        assert_eq!(writer.written(), &[PathBuf::from("b"), PathBuf::from("a")]);
        assert_eq!(writer.text("b"), Some("3"));
    }
}
