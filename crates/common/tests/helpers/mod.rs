//! Shared setup and collaborator doubles for publishing integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::TempDir;

use common::prelude::*;

/// A disposable publishing environment:
/// - `<base>/docroot` as the document root
/// - `<base>/storage/userfiles/report.pdf` as a publishable resource
pub struct TestEnv {
    pub base: TempDir,
    pub config: Config,
}

pub fn setup_env() -> TestEnv {
    let base = TempDir::new().unwrap();
    let docroot = base.path().join("docroot");
    let storage = base.path().join("storage");
    fs::create_dir_all(storage.join("userfiles")).unwrap();
    fs::create_dir_all(&docroot).unwrap();
    fs::write(storage.join("userfiles/report.pdf"), b"%PDF report").unwrap();

    let config = Config::new(&docroot, &storage);
    TestEnv { base, config }
}

impl TestEnv {
    pub fn docroot(&self) -> PathBuf {
        self.base.path().join("docroot")
    }

    pub fn storage(&self) -> PathBuf {
        self.base.path().join("storage")
    }

    pub fn report_source(&self) -> PathBuf {
        self.storage().join("userfiles/report.pdf")
    }
}

/// Records every `protect` call, along with whether the directory was still
/// empty when protection was published. An entry linked before protection
/// would show up as a non-empty directory here.
///
/// Cloning shares the call log, so a test can keep one handle and hand the
/// other to the publishing target.
#[derive(Default, Clone)]
pub struct RecordingPublisher {
    calls: std::sync::Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl RecordingPublisher {
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<(PathBuf, bool)> {
        self.calls.lock().clone()
    }
}

impl AccessRestrictionPublisher for RecordingPublisher {
    fn protect(&self, dir: &Path) -> Result<(), ProtectionError> {
        let empty = fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(false);
        self.calls.lock().push((dir.to_path_buf(), empty));
        Ok(())
    }
}

/// Always fails, for exercising the protection-failure path.
pub struct FailingPublisher;

impl AccessRestrictionPublisher for FailingPublisher {
    fn protect(&self, dir: &Path) -> Result<(), ProtectionError> {
        Err(ProtectionError::Io {
            path: dir.join(".htaccess"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}
