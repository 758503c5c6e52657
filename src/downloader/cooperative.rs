use super::{downloadresult::DownloadResult, Fetched, Outcome, Target};
use crate::{Error, ErrorKind, Result};

use reqwest::{Client, StatusCode};
use std::{path::Path, sync::Arc};
use tokio::{fs, sync::Semaphore, task, task::JoinSet};
use tracing::{debug, error, info};

pub async fn fetch(client: &Client, uri: &str) -> Result<Fetched> {
    let response = client.get(uri).send().await?;

    if response.status() != StatusCode::OK {
        return Ok(Fetched::Rejected(response.status()));
    }

    Ok(Fetched::Body(response.bytes().await?))
}

pub async fn download_and_extract(client: &Client, target: Target) -> Result<Outcome> {
    debug!(uri = target.uri(), "requesting archive");
    let fetched = fetch(client, target.uri()).await;

    let outcome = task::spawn_blocking(move || target.settle(fetched)).await??;
    outcome.report();
    Ok(outcome)
}

pub async fn run(uris: &[&str], directory: &Path, limit: usize) -> Result<DownloadResult> {
    fs::create_dir_all(directory).await?;

    let client = Client::new();
    let limiter = Arc::new(Semaphore::new(limit.max(1)));
    let mut units = JoinSet::new();

    info!(units = uris.len(), limit, "starting cooperative downloads");

    for uri in uris {
        let uri = uri.to_string();
        let client = client.clone();
        let limiter = Arc::clone(&limiter);
        let directory = directory.to_path_buf();

        units.spawn(async move {
            let result = match limiter.acquire_owned().await {
                Ok(_permit) => match Target::new(&uri, &directory) {
                    Ok(target) => download_and_extract(&client, target).await,
                    Err(e) => {
                        let outcome = Outcome::errored(&uri, &e);
                        outcome.report();
                        Ok(outcome)
                    }
                },
                Err(_) => Err(Error::from(ErrorKind::LimiterClosed)),
            };
            (uri, result)
        });
    }

    drain(&mut units, uris).await
}

// A failing or panicking unit never cancels the rest; its error surfaces once the set is empty.
async fn drain(
    units: &mut JoinSet<(String, Result<Outcome>)>,
    uris: &[&str],
) -> Result<DownloadResult> {
    let mut status = DownloadResult::new();
    let mut first_error = None;
    let mut pending: Vec<&str> = uris.to_vec();

    while let Some(joined) = units.join_next().await {
        let (uri, result) = match joined {
            Ok(unit) => unit,
            Err(e) => {
                error!(error = %e, "unit task died");
                first_error.get_or_insert(Error::from(e));
                continue;
            }
        };
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

    for uri in pending {
        status.add(uri.to_string());
    }
    status.finish(uris.len());

    match first_error {
        Some(e) => Err(e),
        None => Ok(status),
    }
}
