use super::{downloadresult::DownloadResult, Fetched, Outcome, Target};
use crate::{Result, ThreadPool};

use reqwest::{blocking::Client, StatusCode};
use std::{fs, path::Path, sync::mpsc, time::Duration};
use tracing::{debug, error, info, warn};

pub fn fetch(client: &Client, uri: &str) -> Result<Fetched> {
    let response = client.get(uri).send()?;

    if response.status() != StatusCode::OK {
        return Ok(Fetched::Rejected(response.status()));
    }

    Ok(Fetched::Body(response.bytes()?))
}

pub fn build_client() -> Result<Client> {
    // the blocking client otherwise cuts every request off after 30s
    Ok(Client::builder().timeout(None::<Duration>).build()?)
}

pub fn download_and_extract(client: &Client, target: &Target) -> Result<Outcome> {
    debug!(uri = target.uri(), "requesting archive");
    let outcome = target.settle(fetch(client, target.uri()))?;
    outcome.report();
    Ok(outcome)
}

fn unit(client: &Client, uri: &str, directory: &Path) -> Result<Outcome> {
    match Target::new(uri, directory) {
        Ok(target) => download_and_extract(client, &target),
        Err(e) => {
            let outcome = Outcome::errored(uri, &e);
            outcome.report();
            Ok(outcome)
        }
    }
}

/// Must not be called from inside an async runtime; the blocking client
/// refuses to start there.
pub fn run(uris: &[&str], directory: &Path, pool_size: usize) -> Result<DownloadResult> {
    fs::create_dir_all(directory)?;

    let client = build_client()?;
    let mut pool = ThreadPool::new(pool_size);
    let (sender, receiver) = mpsc::channel();

    info!(units = uris.len(), workers = pool.size(), "starting pooled downloads");

    for uri in uris {
        let uri = uri.to_string();
        let client = client.clone();
        let directory = directory.to_path_buf();
        let sender = sender.clone();

        pool.execute(move || {
            let result = unit(&client, &uri, &directory);
            // the receiver only hangs up once run() has returned
            let _ = sender.send((uri, result));
        });
    }
    drop(sender);

    let mut status = DownloadResult::new();
    let mut first_error = None;
    let mut pending: Vec<&str> = uris.to_vec();

    for (uri, result) in receiver {
        if let Some(i) = pending.iter().position(|p| *p == uri) {
            pending.swap_remove(i);
        }
        match result {
            Ok(outcome) => status.record(&uri, &outcome),
            Err(e) => {
                error!(uri = %uri, error = %e, "extraction failed");
                status.add(uri);
                first_error.get_or_insert(e);
            }
        }
    }
    pool.join();

    for uri in pending {
        warn!(uri, "unit never reported back");
        status.add(uri.to_string());
    }
    status.finish(uris.len());

    match first_error {
        Some(e) => Err(e),
        None => Ok(status),
    }
}
