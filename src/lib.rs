pub mod downloader;
mod threadpool;

pub use downloader::downloadresult::DownloadResult;
pub use downloader::{cooperative, pooled, Fetched, Outcome, Target};
pub use threadpool::ThreadPool;

use error_chain::error_chain;

/// Archives fetched by both workflows.
pub const DOWNLOAD_URIS: &[&str] = &[
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2018_Q4.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q1.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q2.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q3.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q4.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2020_Q1.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2220_Q1.zip",
];

/// Directory under the working directory that receives archives and their contents.
pub const DIR_NAME: &str = "downloads";

/// Worker count of the pooled workflow.
pub const POOL_SIZE: usize = 5;

/// Upper bound on units the cooperative workflow keeps in flight at once.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 10;

error_chain! {
    foreign_links {
        Io(std::io::Error);
        HttpRequest(reqwest::Error);
        Archive(zip::result::ZipError);
        Uri(url::ParseError);
        Join(tokio::task::JoinError);
    }

    errors {
        InvalidUri(uri: String) {
            description("uri has no file name")
            display("{} has no final path segment to name the archive after", uri)
        }
        LimiterClosed {
            description("download limiter closed")
            display("download limiter was closed before every unit started")
        }
    }
}
