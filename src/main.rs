use archive_downloader::{
    cooperative, pooled, Result, DIR_NAME, DOWNLOAD_URIS, MAX_CONCURRENT_DOWNLOADS, POOL_SIZE,
};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = env::current_dir()?.join(DIR_NAME);
    info!(directory = %data_dir.display(), "downloading archives");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let status = rt.block_on(cooperative::run(
        DOWNLOAD_URIS,
        &data_dir,
        MAX_CONCURRENT_DOWNLOADS,
    ))?;
    drop(rt);

    println!();
    status.print_result();
    println!();

    let status = pooled::run(DOWNLOAD_URIS, &data_dir, POOL_SIZE)?;

    println!();
    status.print_result();
    Ok(())
}
