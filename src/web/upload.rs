use std::path::{Path, PathBuf};

/// A file path inside the upload directory that is removed when dropped.
///
/// Every upload gets its own random name, so concurrent requests never
/// share a file.
#[derive(Debug)]
pub struct ScopedUpload {
    path: PathBuf,
}

impl ScopedUpload {
    /// Reserve a fresh path in `dir`, keeping `extension` so the decoder can
    /// use it as a format hint.
    pub fn new(dir: &Path, extension: Option<&str>) -> Self {
        let mut name = uuid::Uuid::new_v4().simple().to_string();
        if let Some(ext) = extension.filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric())) {
            name.push('.');
            name.push_str(ext);
        }
        ScopedUpload {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed upload {}", self.path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("failed to remove upload {}: {err}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_removed_on_drop() {
        let dir = std::env::temp_dir();
        let path = {
            let upload = ScopedUpload::new(&dir, Some("wav"));
            std::fs::write(upload.path(), b"RIFF").unwrap();
            assert!(upload.path().exists());
            assert_eq!(upload.path().extension().unwrap(), "wav");
            upload.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn file_removed_when_unwinding() {
        let mut written = None;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let upload = ScopedUpload::new(&std::env::temp_dir(), Some("wav"));
            std::fs::write(upload.path(), b"RIFF").unwrap();
            written = Some(upload.path().to_path_buf());
            if upload.path().exists() {
                panic!("analysis blew up");
            }
        }));
        assert!(result.is_err());
        let path = written.unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn file_removed_after_blocking_task_panics() {
        let runtime = rocket::tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let path = runtime.block_on(async {
            let upload = ScopedUpload::new(&std::env::temp_dir(), Some("wav"));
            std::fs::write(upload.path(), b"RIFF").unwrap();
            let task_path = upload.path().to_path_buf();
            let outcome = rocket::tokio::task::spawn_blocking(move || {
                if task_path.exists() {
                    panic!("analysis blew up");
                }
            })
            .await;
            assert!(outcome.unwrap_err().is_panic());
            assert!(upload.path().exists());
            upload.path().to_path_buf()
        });
        assert!(!path.exists());
    }

    #[test]
    fn never_written_is_fine() {
        let upload = ScopedUpload::new(&std::env::temp_dir(), None);
        assert!(upload.path().extension().is_none());
    }

    #[test]
    fn odd_extensions_dropped() {
        let upload = ScopedUpload::new(&std::env::temp_dir(), Some("../wav"));
        assert!(upload.path().extension().is_none());
        assert_eq!(upload.path().parent(), Some(std::env::temp_dir().as_path()));
    }

    #[test]
    fn paths_are_unique() {
        let dir = std::env::temp_dir();
        let a = ScopedUpload::new(&dir, Some("wav"));
        let b = ScopedUpload::new(&dir, Some("wav"));
        assert_ne!(a.path(), b.path());
    }
}
