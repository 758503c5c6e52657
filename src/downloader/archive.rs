use crate::Result;

use std::{
    fs,
    fs::File,
    io::{copy, BufReader},
    path::Path,
};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extracts every entry of the zip at `archive_path` into `destination`,
/// keeping the relative paths the archive defines. Existing files are
/// overwritten. Returns the number of entries written.
pub fn unpack(archive_path: &Path, destination: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(archive_path)?);
    let mut archive = ZipArchive::new(reader)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                warn!(entry = entry.name(), "skipping entry outside the destination");
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        copy(&mut entry, &mut outfile)?;
        debug!(path = %outpath.display(), size = entry.size(), "entry extracted");
        written += 1;
    }

    Ok(written)
}
