//! Archive unpacking with traversal and self-reference guards.
//!
//! [`ArchiveReader`] turns an uploaded zip payload into a lazy, finite
//! sequence of [`ArchiveEntry`] values. Entries are staged through a scoped
//! temporary extraction directory owned by the reader; the directory is
//! removed on every exit path when the reader is dropped.
//!
//! Guarded entries are skipped, logged, and never surfaced to the caller:
//!
//! - any entry whose normalized path escapes the extraction root (absolute
//!   paths or `..` segments), and
//! - any entry whose path equals the archive's own file name, since naive
//!   extraction stages the archive inside its own extraction root.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::Path;

use bytes::Bytes;
use tempfile::TempDir;
use tracing::warn;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// One regular file extracted from an uploaded archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path relative to the archive root, using `/` separators.
    pub relative_path: String,
    /// File contents.
    pub content: Bytes,
    /// File size in bytes.
    pub size: u64,
}

/// Lazy reader over the regular files of a zip archive.
///
/// Implements `Iterator`; the sequence is consumed exactly once and is
/// restartable only by constructing a new reader from the same bytes.
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Bytes>>,
    staging: TempDir,
    archive_name: Option<String>,
    next_index: usize,
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("entries", &self.archive.len())
            .field("next_index", &self.next_index)
            .field("archive_name", &self.archive_name)
            .finish_non_exhaustive()
    }
}

impl ArchiveReader {
    /// Open an uploaded archive for reading.
    ///
    /// `archive_name` is the file name the archive was uploaded under; an
    /// entry with that exact path is skipped by the self-reference guard.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Corrupt`] when the bytes are not a valid zip
    /// bundle, or [`ArchiveError::Io`] when the staging directory cannot be
    /// created.
    pub fn new(archive: Bytes, archive_name: Option<&str>) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(archive))
            .map_err(|e| ArchiveError::Corrupt(e.to_string()))?;
        let staging = TempDir::new()?;

        Ok(Self {
            archive,
            staging,
            archive_name: archive_name.map(ToOwned::to_owned),
            next_index: 0,
        })
    }

    /// Stage an entry's contents through the extraction directory and read
    /// them back.
    fn stage(&mut self, index: usize, relative: &Path) -> io::Result<Bytes> {
        let dest = self.staging.path().join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut entry = self
            .archive
            .by_index(index)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
        drop(out);

        Ok(Bytes::from(fs::read(&dest)?))
    }
}

impl Iterator for ArchiveReader {
    type Item = Result<ArchiveEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < self.archive.len() {
            let index = self.next_index;
            self.next_index += 1;

            let (raw_name, relative, size) = {
                let entry = match self.archive.by_index(index) {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(ArchiveError::Corrupt(e.to_string()))),
                };

                if entry.is_dir() {
                    continue;
                }
                (entry.name().to_owned(), entry.enclosed_name(), entry.size())
            };

            // Path traversal guard: `enclosed_name` rejects absolute paths
            // and `..` segments.
            let Some(relative) = relative else {
                warn!(entry = %raw_name, "skipping archive entry that escapes the extraction root");
                continue;
            };

            let relative_path = relative.to_string_lossy().replace('\\', "/");
            if relative_path.is_empty() {
                continue;
            }

            // Self-reference guard: the archive must not deploy itself.
            if self
                .archive_name
                .as_deref()
                .is_some_and(|own| own == relative_path)
            {
                warn!(entry = %relative_path, "skipping archive entry that names the archive itself");
                continue;
            }

            return Some(match self.stage(index, &relative) {
                Ok(content) => Ok(ArchiveEntry {
                    relative_path,
                    content,
                    size,
                }),
                Err(e) => Err(ArchiveError::Io(e)),
            });
        }

        None
    }
}

/// Read every valid entry of an archive into memory.
///
/// # Errors
///
/// Returns an error when the archive is corrupt or an entry cannot be staged;
/// guarded entries are skipped, not errors.
pub fn unpack(archive: Bytes, archive_name: Option<&str>) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    ArchiveReader::new(archive, archive_name)?.collect()
}
