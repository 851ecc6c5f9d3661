//! Main harvester service that ties all pipeline stages together.

use std::path::PathBuf;

use crate::archive::extract_document;
use crate::config::{validate_source_url, validate_staging_dir, ALWAYS_SEQUENCE_PATHS};
use crate::encoding::decode_file;
use crate::error::Result;
use crate::fetch::{create_client, download_archive};
use crate::records::{extract_records, OutputRecord};
use crate::tree::{parse_document, SequenceRules};

/// Where a run reads from and stages to. Immutable per run.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    /// URL of the published archive.
    pub url: String,
    /// Directory the archive and the extracted document are written into.
    pub staging_dir: PathBuf,
}

impl ArchiveSource {
    pub fn new(url: impl Into<String>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            staging_dir: staging_dir.into(),
        }
    }
}

/// Run the full ingestion pipeline.
///
/// Download the archive, extract the single directory document, decode it
/// from the legacy encoding, parse it, and flatten it into records. Every
/// stage is a pure transformation feeding the next; the first error aborts
/// the run.
///
/// # Arguments
/// * `source` - Archive URL and staging directory
///
/// # Returns
/// The flattened records, in document order
pub fn harvest(source: &ArchiveSource) -> Result<Vec<OutputRecord>> {
    validate_source_url(&source.url)?;
    validate_staging_dir(&source.staging_dir)?;

    let client = create_client()?;

    tracing::info!(url = %source.url, "downloading BIC directory archive");
    let archive_path = download_archive(&client, &source.url, &source.staging_dir)?;

    tracing::info!(archive = %archive_path.display(), "extracting directory document");
    let document_path = extract_document(&archive_path, &source.staging_dir)?;

    tracing::info!(document = %document_path.display(), "decoding and parsing");
    let records = flatten_document(&document_path)?;

    tracing::info!(count = records.len(), "directory flattened");
    Ok(records)
}

/// Decode, parse, and flatten an already-extracted directory document.
pub fn flatten_document(document_path: &std::path::Path) -> Result<Vec<OutputRecord>> {
    let xml = decode_file(document_path)?;
    let rules = SequenceRules::new(ALWAYS_SEQUENCE_PATHS.iter().copied());
    let tree = parse_document(&xml, &rules)?;
    extract_records(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvesterError;

    #[test]
    fn test_harvest_rejects_invalid_url() {
        let source = ArchiveSource::new("not-a-url", "downloads/bik");
        let result = harvest(&source);
        assert!(matches!(result, Err(HarvesterError::InvalidUrl(_))));
    }

    #[test]
    fn test_archive_source_construction() {
        let source = ArchiveSource::new("http://www.cbr.ru/s/newbik", "/tmp/bik");
        assert_eq!(source.url, "http://www.cbr.ru/s/newbik");
        assert_eq!(source.staging_dir, PathBuf::from("/tmp/bik"));
    }
}
