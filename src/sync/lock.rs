//! Advisory lock serializing sync jobs.
//!
//! Two jobs racing on the same target collection could interleave their
//! upserts, so at most one job may hold the lock at a time. The OS releases
//! the lock when the guard (and its file handle) is dropped, including when
//! the process dies.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

/// Errors for lock operations
#[derive(Error, Diagnostic, Debug)]
pub enum LockError {
    #[error("Another sync job is already running (lock held on {path:?})")]
    #[diagnostic(
        code(detail_ops::sync::lock_held),
        help("Wait for the running job to finish, or remove the stale lock file if no job is running.")
    )]
    Held { path: PathBuf },

    #[error("Lock file error for {path:?}: {source}")]
    #[diagnostic(code(detail_ops::sync::lock_io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Guard holding the sync job lock.
#[derive(Debug)]
pub struct JobLock {
    path: PathBuf,
    _file: File,
}

impl JobLock {
    /// Try to take the lock without waiting.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let io_err = |source| LockError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(io_err)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::Held {
                path: path.to_path_buf(),
            });
        }

        // Holder pid is informational only
        file.set_len(0).map_err(io_err)?;
        write!(file, "{}", std::process::id()).map_err(io_err)?;
        debug!(path = %path.display(), "Acquired sync job lock");

        Ok(Self {
            path: path.to_path_buf(),
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
