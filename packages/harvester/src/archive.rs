//! Archive extraction: unpack the single XML document from the zip archive.
//!
//! Downstream stages assume one well-known document, so an archive with any
//! other entry count is rejected outright before any parsing happens.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{HarvesterError, Result};

/// Extract the one document contained in the archive.
///
/// The entry's own filename is preserved; it is echoed, not validated,
/// beyond flattening any directory components the archive might carry.
///
/// # Arguments
/// * `archive_path` - Path of the downloaded zip archive
/// * `staging_dir` - Directory the document is extracted into
///
/// # Returns
/// Path of the extracted document
///
/// # Errors
/// `HarvesterError::ArchiveShape` if the archive does not contain exactly
/// one entry.
pub fn extract_document(archive_path: &Path, staging_dir: &Path) -> Result<PathBuf> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    if archive.len() != 1 {
        return Err(HarvesterError::ArchiveShape {
            expected: 1,
            actual: archive.len(),
        });
    }

    let mut entry = archive.by_index(0)?;

    // Keep only the final path component, dropping any directory prefix.
    let entry_name = Path::new(entry.name())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            HarvesterError::Shape(format!("archive entry has no usable name: {}", entry.name()))
        })?;
    tracing::debug!(entry = %entry_name, "extracting archive entry");

    fs::create_dir_all(staging_dir)?;
    let document_path = staging_dir.join(entry_name);

    let mut output = File::create(&document_path)?;
    io::copy(&mut entry, &mut output)?;

    Ok(document_path)
}
