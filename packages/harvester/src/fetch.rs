//! Archive retrieval: HTTP download of the published BIC directory archive.
//!
//! The publisher serves the archive behind a redirecting URL and announces
//! the actual filename in the `content-disposition` response header, so the
//! local filename is derived from that header rather than from the URL.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("bic-harvester/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with appropriate timeout and user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download the archive into the staging directory.
///
/// Issues a single GET; any non-success status is fatal. The response body
/// is streamed to disk, never buffered in memory as a whole. The staging
/// directory is created if it does not exist yet.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL of the published archive
/// * `staging_dir` - Directory the archive file is written into
///
/// # Returns
/// Path of the downloaded archive file
pub fn download_archive(client: &Client, url: &str, staging_dir: &Path) -> Result<PathBuf> {
    let mut response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvesterError::Download { status });
    }

    let filename = filename_from_headers(response.headers())?;
    tracing::debug!(%filename, "resolved archive filename from headers");

    fs::create_dir_all(staging_dir)?;
    let archive_path = staging_dir.join(&filename);

    let mut file = File::create(&archive_path)?;
    let bytes = response.copy_to(&mut file)?;
    tracing::debug!(bytes, path = %archive_path.display(), "archive written");

    Ok(archive_path)
}

/// Extract the target filename from the `content-disposition` header.
///
/// The header looks like `attachment; filename=20260830ED01OSBR.zip`.
/// Both a missing header and a missing `filename=` parameter are fatal.
fn filename_from_headers(headers: &HeaderMap) -> Result<String> {
    let disposition = headers
        .get(CONTENT_DISPOSITION)
        .ok_or_else(|| {
            HarvesterError::HeaderParse("response has no content-disposition header".to_string())
        })?
        .to_str()
        .map_err(|_| {
            HarvesterError::HeaderParse(
                "content-disposition header is not valid visible ASCII".to_string(),
            )
        })?;

    disposition
        .split(';')
        .find_map(|part| part.trim().strip_prefix("filename="))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            HarvesterError::HeaderParse(format!(
                "no filename= parameter in content-disposition: {disposition}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_disposition(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_create_client() {
        assert!(create_client().is_ok());
    }

    #[test]
    fn test_filename_from_headers() {
        let headers = headers_with_disposition("attachment; filename=20260830ED01OSBR.zip");
        assert_eq!(
            filename_from_headers(&headers).unwrap(),
            "20260830ED01OSBR.zip"
        );
    }

    #[test]
    fn test_filename_from_headers_trims_whitespace() {
        let headers = headers_with_disposition("attachment; filename= bik.zip ");
        assert_eq!(filename_from_headers(&headers).unwrap(), "bik.zip");
    }

    #[test]
    fn test_filename_from_headers_missing_header() {
        let err = filename_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, HarvesterError::HeaderParse(_)));
        assert!(err.to_string().contains("content-disposition"));
    }

    #[test]
    fn test_filename_from_headers_missing_parameter() {
        let headers = headers_with_disposition("attachment");
        let err = filename_from_headers(&headers).unwrap_err();
        assert!(matches!(err, HarvesterError::HeaderParse(_)));
    }

    #[test]
    fn test_filename_from_headers_empty_parameter() {
        let headers = headers_with_disposition("attachment; filename= ");
        assert!(filename_from_headers(&headers).is_err());
    }
}
