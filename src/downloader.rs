mod archive;
pub mod cooperative;
pub mod downloadresult;
pub mod pooled;

use crate::{ErrorKind, Result};

use bytes::Bytes;
use reqwest::StatusCode;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use url::Url;

#[derive(Debug)]
pub enum Fetched {
    Body(Bytes),
    Rejected(StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Extracted { filename: String },
    Rejected { uri: String, status: StatusCode },
    Errored { uri: String, error: String },
}

impl Outcome {
    pub fn errored(uri: &str, error: &crate::Error) -> Outcome {
        Outcome::Errored {
            uri: uri.to_string(),
            error: error.to_string(),
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Outcome::Extracted { .. })
    }

    pub fn report(&self) {
        println!("{}", self);
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Extracted { filename } => write!(f, "Downloaded and extracted {}", filename),
            Outcome::Rejected { uri, status } => {
                write!(f, "Failed to download {} (HTTP {})", uri, status)
            }
            Outcome::Errored { uri, error } => write!(f, "Error downloading {}: {}", uri, error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Target {
    uri: String,
    filename: String,
    directory: PathBuf,
}

impl Target {
    pub fn new(uri: &str, directory: &Path) -> Result<Target> {
        let filename = file_name(uri)?;

        Ok(Target {
            uri: uri.to_string(),
            filename,
            directory: directory.to_path_buf(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn archive_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// Turns a fetch result into an outcome: store, extract and remove the
    /// archive when there is a body, otherwise report why there isn't.
    ///
    /// Network failures are absorbed into [`Outcome::Errored`]. An error is only
    /// returned when writing or extracting the archive fails; the archive file
    /// is removed either way.
    pub fn settle(&self, fetched: Result<Fetched>) -> Result<Outcome> {
        let content = match fetched {
            Ok(Fetched::Body(content)) => content,
            Ok(Fetched::Rejected(status)) => {
                warn!(uri = %self.uri, %status, "download rejected");
                return Ok(Outcome::Rejected {
                    uri: self.uri.clone(),
                    status,
                });
            }
            Err(e) => {
                warn!(uri = %self.uri, error = %e, "download failed");
                return Ok(Outcome::errored(&self.uri, &e));
            }
        };

        let archive_path = self.archive_path();
        debug!(path = %archive_path.display(), bytes = content.len(), "writing archive");
        fs::write(&archive_path, &content)?;

        let unpacked = archive::unpack(&archive_path, &self.directory);
        let removed = fs::remove_file(&archive_path);
        let entries = unpacked?;
        removed?;

        debug!(filename = %self.filename, entries, "archive extracted");
        Ok(Outcome::Extracted {
            filename: self.filename.clone(),
        })
    }
}

fn file_name(uri: &str) -> Result<String> {
    let url = Url::parse(uri)?;

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .ok_or_else(|| ErrorKind::InvalidUri(uri.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_path_segment() {
        let name = file_name("https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q1.zip");
        assert_eq!(name.unwrap(), "Divvy_Trips_2019_Q1.zip");

        let name = file_name("http://example.com/a/b/test.zip?token=1");
        assert_eq!(name.unwrap(), "test.zip");
    }

    #[test]
    fn file_name_requires_a_segment() {
        assert!(file_name("http://example.com/").is_err());
        assert!(file_name("http://example.com/archives/").is_err());
        assert!(file_name("not a uri").is_err());
    }

    #[test]
    fn target_places_archive_in_directory() {
        let target = Target::new("http://example.com/test.zip", Path::new("downloads")).unwrap();
        assert_eq!(target.uri(), "http://example.com/test.zip");
        assert_eq!(target.filename(), "test.zip");
        assert_eq!(target.archive_path(), Path::new("downloads").join("test.zip"));
    }

    #[test]
    fn outcome_lines() {
        let extracted = Outcome::Extracted {
            filename: "test.zip".to_string(),
        };
        assert_eq!(extracted.to_string(), "Downloaded and extracted test.zip");

        let rejected = Outcome::Rejected {
            uri: "http://example.com/test.zip".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        let line = rejected.to_string();
        assert!(line.contains("Failed to download"));
        assert!(line.contains("http://example.com/test.zip"));
        assert!(line.contains("404"));

        let errored = Outcome::Errored {
            uri: "http://example.com/test.zip".to_string(),
            error: "Network error".to_string(),
        };
        assert_eq!(
            errored.to_string(),
            "Error downloading http://example.com/test.zip: Network error"
        );
    }

    #[test]
    fn settle_reports_rejection_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let target = Target::new("http://example.com/test.zip", dir.path()).unwrap();

        let outcome = target
            .settle(Ok(Fetched::Rejected(StatusCode::NOT_FOUND)))
            .unwrap();

        assert!(!outcome.is_extracted());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn settle_absorbs_fetch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let target = Target::new("http://example.com/test.zip", dir.path()).unwrap();

        let outcome = target.settle(Err("Network error".into())).unwrap();

        assert_eq!(
            outcome,
            Outcome::Errored {
                uri: "http://example.com/test.zip".to_string(),
                error: "Network error".to_string(),
            }
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn settle_removes_archive_even_when_extraction_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = Target::new("http://example.com/test.zip", dir.path()).unwrap();

        let result = target.settle(Ok(Fetched::Body(Bytes::from_static(b"not a zip"))));

        assert!(result.is_err());
        assert!(!target.archive_path().exists());
    }
}
