/// Making sure the shape model exists locally before loading it
use std::path::{Path, PathBuf};

use crate::error::{FlybyError, Result};

/// Something that can materialise a remote file at a local path
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Never touches the network; a missing file stays missing
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl Fetcher for LocalOnly {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        tracing::warn!("Not downloading {} (network fetching is disabled)", url);
        Err(FlybyError::NotFound(dest.to_path_buf()))
    }
}

/// Return `dir/filename`, fetching it from `url` first if it is missing
pub fn ensure_local(
    dir: &Path,
    filename: &str,
    url: Option<&str>,
    fetcher: &dyn Fetcher,
) -> Result<PathBuf> {
    let path = dir.join(filename);
    if path.is_file() {
        tracing::debug!("Using local model {}", path.display());
        return Ok(path);
    }

    let Some(url) = url else {
        return Err(FlybyError::NotFound(path));
    };

    tracing::info!("Fetching {} into {}", url, dir.display());
    std::fs::create_dir_all(dir)?;
    fetcher.fetch(url, &path)?;

    if path.is_file() {
        Ok(path)
    } else {
        Err(FlybyError::NotFound(path))
    }
}
