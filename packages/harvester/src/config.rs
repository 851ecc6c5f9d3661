//! Configuration constants and validation functions for the harvester.

use std::path::Path;

use crate::error::{HarvesterError, Result};

/// URL of the periodically published BIC directory archive.
pub const BIC_ARCHIVE_URL: &str = "http://www.cbr.ru/s/newbik";

/// Default staging directory for the downloaded archive and the
/// extracted document, relative to the working directory.
pub const DEFAULT_STAGING_DIR: &str = "downloads/bik";

/// HTTP timeout in seconds.
///
/// The published archive is small (well under 1 MB), but the publisher's
/// server can be slow. A bounded timeout is a hardening addition; the
/// original behavior had none.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Label of the legacy single-byte encoding the publisher uses.
pub const SOURCE_ENCODING: &str = "windows-1251";

/// Top-level keys that denote an XML declaration rather than real content.
///
/// Excluded from candidacy when selecting the document root.
pub const PSEUDO_ROOT_NAMES: &[&str] = &["?xml"];

/// Tag name of one repeating directory entry.
pub const ENTRY_TAG: &str = "BICDirectoryEntry";

/// Tag name of the participant info element nested under an entry.
pub const PARTICIPANT_INFO_TAG: &str = "ParticipantInfo";

/// Tag name of a correspondent account element nested under an entry.
pub const ACCOUNTS_TAG: &str = "Accounts";

/// Attribute carrying the bank identifier code on an entry.
pub const BIC_ATTRIBUTE: &str = "BIC";

/// Attribute carrying the participant name on the participant info element.
pub const NAME_ATTRIBUTE: &str = "NameP";

/// Attribute carrying the correspondent account number on an account element.
pub const ACCOUNT_ATTRIBUTE: &str = "Account";

/// Dotted paths (measured from just below the document root) whose values
/// are always parsed as sequences, regardless of how often they occur.
///
/// The root element's tag name is incidental metadata and is not part of
/// these paths.
pub const ALWAYS_SEQUENCE_PATHS: &[&str] = &["BICDirectoryEntry.Accounts"];

/// Validate a source URL.
///
/// # Arguments
/// * `url` - The URL the archive will be fetched from
///
/// # Returns
/// * `Ok(())` if the URL uses a supported scheme
/// * `Err(HarvesterError::InvalidUrl)` otherwise
///
/// # Examples
/// ```
/// use bic_harvester::config::validate_source_url;
///
/// assert!(validate_source_url("http://www.cbr.ru/s/newbik").is_ok());
/// assert!(validate_source_url("ftp://example.com/bik.zip").is_err());
/// ```
pub fn validate_source_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(HarvesterError::InvalidUrl(url.to_string()))
    }
}

/// Validate a staging directory path.
///
/// The directory itself may not exist yet (it is created idempotently on
/// download), but if the path already exists it must be a directory.
pub fn validate_staging_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Staging path is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_source_url_valid() {
        assert!(validate_source_url("http://www.cbr.ru/s/newbik").is_ok());
        assert!(validate_source_url("https://example.com/archive.zip").is_ok());
    }

    #[test]
    fn test_validate_source_url_invalid() {
        assert!(validate_source_url("").is_err());
        assert!(validate_source_url("ftp://example.com/bik.zip").is_err());
        assert!(validate_source_url("www.cbr.ru/s/newbik").is_err());
        assert!(validate_source_url("file:///tmp/bik.zip").is_err());
    }

    #[test]
    fn test_validate_staging_dir_missing_is_ok() {
        assert!(validate_staging_dir(Path::new("does/not/exist/yet")).is_ok());
    }

    #[test]
    fn test_validate_staging_dir_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_staging_dir(file.path()).is_err());
    }

    #[test]
    fn test_always_sequence_paths_scope() {
        // The coercion rule is scoped to the entry-nested accounts field only.
        assert_eq!(ALWAYS_SEQUENCE_PATHS, &["BICDirectoryEntry.Accounts"]);
    }
}
