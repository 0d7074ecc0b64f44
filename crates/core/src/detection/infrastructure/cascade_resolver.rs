use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("cascade file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write cascade to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where to look for a cascade before falling back to a download.
pub struct CascadeLookup<'a> {
    pub name: &'a str,
    pub url: &'a str,
    /// User-supplied file; when set, nothing else is consulted.
    pub explicit: Option<&'a Path>,
    pub cache_dir: PathBuf,
    pub bundled_dirs: Vec<PathBuf>,
}

/// Resolve a cascade file, checking local locations before downloading.
///
/// Resolution order:
/// 1. Explicit path (must exist)
/// 2. User cache directory
/// 3. Bundled OpenCV data directories
/// 4. Download from URL to cache
pub fn resolve(
    lookup: &CascadeLookup<'_>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, CascadeResolveError> {
    if let Some(path) = lookup.explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(CascadeResolveError::NotFound(path.to_path_buf()))
        };
    }

    if let Some(found) = find_local(lookup) {
        log::debug!("Using cascade at {}", found.display());
        return Ok(found);
    }

    let cached_path = lookup.cache_dir.join(lookup.name);
    fs::create_dir_all(&lookup.cache_dir).map_err(CascadeResolveError::CacheDir)?;
    log::info!("Downloading {} to {}", lookup.name, cached_path.display());
    download(lookup.url, &cached_path, progress)?;
    Ok(cached_path)
}

/// First existing copy in the cache or a bundled directory, without downloading.
pub fn find_local(lookup: &CascadeLookup<'_>) -> Option<PathBuf> {
    std::iter::once(&lookup.cache_dir)
        .chain(lookup.bundled_dirs.iter())
        .map(|dir| dir.join(lookup.name))
        .find(|candidate| candidate.is_file())
}

/// Platform-specific cascade cache directory.
///
/// - macOS: `~/Library/Application Support/Facecam/models/`
/// - Linux: `$XDG_CACHE_HOME/Facecam/models/` or `~/.cache/Facecam/models/`
/// - Windows: `%LOCALAPPDATA%/Facecam/models/`
pub fn cascade_cache_dir() -> Result<PathBuf, CascadeResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Facecam").join("models"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Facecam").join("models"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), CascadeResolveError> {
    let download_failed = |source| CascadeResolveError::Download {
        url: url.to_string(),
        source,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_failed)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_failed)?;

    // Write next to the destination, then rename so a partial file is never picked up
    let temp_path = dest.with_extension("part");
    let write_failed = |source| CascadeResolveError::Write {
        path: temp_path.clone(),
        source,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_failed)?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(64 * 1024) {
        file.write_all(chunk).map_err(write_failed)?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_failed)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| CascadeResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NAME: &str = "cascade.xml";

    fn lookup<'a>(cache: &Path, bundled: Vec<PathBuf>, explicit: Option<&'a Path>) -> CascadeLookup<'a> {
        CascadeLookup {
            name: NAME,
            url: "http://127.0.0.1:9/unreachable.xml",
            explicit,
            cache_dir: cache.to_path_buf(),
            bundled_dirs: bundled,
        }
    }

    #[test]
    fn test_explicit_path_wins() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.xml");
        fs::write(&explicit, b"<opencv_storage/>").unwrap();
        fs::write(tmp.path().join(NAME), b"cached").unwrap();

        let resolved = resolve(&lookup(tmp.path(), vec![], Some(&explicit)), None).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.xml");
        let result = resolve(&lookup(tmp.path(), vec![], Some(&missing)), None);
        assert!(matches!(result, Err(CascadeResolveError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_cache_checked_before_bundled() {
        let cache = TempDir::new().unwrap();
        let bundled = TempDir::new().unwrap();
        fs::write(cache.path().join(NAME), b"cached").unwrap();
        fs::write(bundled.path().join(NAME), b"bundled").unwrap();

        let l = lookup(cache.path(), vec![bundled.path().to_path_buf()], None);
        assert_eq!(resolve(&l, None).unwrap(), cache.path().join(NAME));
    }

    #[test]
    fn test_falls_back_to_bundled_dirs_in_order() {
        let cache = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join(NAME), b"bundled").unwrap();

        let l = lookup(
            cache.path(),
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            None,
        );
        assert_eq!(find_local(&l), Some(second.path().join(NAME)));
    }

    #[test]
    fn test_find_local_none_when_absent() {
        let cache = TempDir::new().unwrap();
        let l = lookup(cache.path(), vec![PathBuf::from("/nonexistent/dir")], None);
        assert!(find_local(&l).is_none());
    }

    #[test]
    fn test_download_failure_leaves_no_file() {
        let cache = TempDir::new().unwrap();
        let l = lookup(cache.path(), vec![], None);
        let result = resolve(&l, None);
        assert!(matches!(result, Err(CascadeResolveError::Download { .. })));
        assert!(!cache.path().join(NAME).exists());
    }

    #[test]
    fn test_cache_dir_ends_with_models() {
        if let Ok(dir) = cascade_cache_dir() {
            assert!(dir.ends_with("Facecam/models"));
        }
    }
}
