use super::Outcome;

use std::mem;

/// Tally of one batch run: which URIs did not end up extracted.
#[derive(Debug, PartialEq, Eq)]
pub enum DownloadResult {
    Success,
    Failed(Vec<String>),
    PartiallySuccess(Vec<String>),
}

impl Default for DownloadResult {
    fn default() -> Self {
        DownloadResult::new()
    }
}

impl DownloadResult {
    pub fn new() -> DownloadResult {
        DownloadResult::Success
    }

    pub fn len(&self) -> usize {
        match self {
            DownloadResult::Success => 0,
            DownloadResult::Failed(missing) | DownloadResult::PartiallySuccess(missing) => {
                missing.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record(&mut self, uri: &str, outcome: &Outcome) {
        if !outcome.is_extracted() {
            self.add(uri.to_string());
        }
    }

    pub fn add(&mut self, uri: String) {
        match self {
            DownloadResult::Success => *self = DownloadResult::PartiallySuccess(vec![uri]),
            DownloadResult::Failed(missing) | DownloadResult::PartiallySuccess(missing) => {
                missing.push(uri)
            }
        }
    }

    /// Marks the batch as failed once every one of `total` units is missing.
    pub fn finish(&mut self, total: usize) {
        if total == 0 || self.len() < total {
            return;
        }
        if let DownloadResult::PartiallySuccess(missing) = self {
            let missing = mem::take(missing);
            *self = DownloadResult::Failed(missing);
        }
    }

    pub fn print_result(&self) {
        match self {
            DownloadResult::Success => println!("All archives downloaded and extracted!"),
            DownloadResult::PartiallySuccess(missing) => {
                println!("Download was partially successful");
                DownloadResult::print_missing(missing);
            }
            DownloadResult::Failed(missing) => {
                println!("Every download failed");
                DownloadResult::print_missing(missing);
            }
        }
    }

    fn print_missing(missing: &[String]) {
        println!("These archives are missing:");
        for uri in missing {
            println!("{}", uri);
        }
    }
}
