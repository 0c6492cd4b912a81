//! Snapshot extraction
//!
//! Unpacks downloaded snapshot tarballs straight from memory. AUR serves
//! gzip-compressed tarballs; plain tar is accepted as well.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const USTAR_MAGIC: &[u8] = b"ustar";
const USTAR_OFFSET: usize = 257;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported archive format")]
    UnsupportedFormat,

    #[error("Invalid path in archive: {0}")]
    UnsafePath(String),
}

/// Compression wrapped around a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Tar,
}

/// Information about an extracted file
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path relative to extraction root
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Whether this is an executable
    pub is_executable: bool,
}

/// Detect archive format from its leading bytes
pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    if data.starts_with(&GZIP_MAGIC) {
        Some(ArchiveFormat::TarGz)
    } else if data.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC) {
        Some(ArchiveFormat::Tar)
    } else {
        None
    }
}

/// Extract an in-memory archive into `dest_dir`, auto-detecting format.
///
/// Permissions and modification times are restored from the archive.
pub fn extract_archive(data: &[u8], dest_dir: &Path) -> Result<Vec<ExtractedFile>, ExtractError> {
    match detect_format(data) {
        Some(ArchiveFormat::TarGz) => extract_tar(GzDecoder::new(data), dest_dir),
        Some(ArchiveFormat::Tar) => extract_tar(data, dest_dir),
        None => Err(ExtractError::UnsupportedFormat),
    }
}

fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<Vec<ExtractedFile>, ExtractError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);

    let mut extracted_files = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let relative_path = sanitize(&entry.path()?)?;
        let absolute_path = dest_dir.join(&relative_path);
        let kind = entry.header().entry_type();

        if relative_path.as_os_str().is_empty() {
            continue;
        }
        if kind.is_dir() {
            fs::create_dir_all(&absolute_path)?;
            continue;
        }
        // git snapshots carry a pax header with the commit id
        if kind.is_pax_global_extensions() || kind.is_pax_local_extensions() {
            continue;
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&absolute_path)?;

        let is_executable = entry
            .header()
            .mode()
            .map(|m| m & 0o111 != 0)
            .unwrap_or(false);

        debug!(path = %relative_path.display(), "extracted");
        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    Ok(extracted_files)
}

/// Reject absolute paths and `..` so nothing lands outside the destination.
fn sanitize(path: &Path) -> Result<PathBuf, ExtractError> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::UnsafePath(path.display().to_string()));
            }
        }
    }
    Ok(clean)
}
