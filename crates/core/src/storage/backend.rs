use std::sync::Mutex;

use crate::errors::CoreError;

/// Where the serialized watchlist blob lives.
///
/// One keyed blob, read once at startup, rewritten on every mutation.
/// Implementations stay dumb: encoding, versioning, and the best-effort
/// recovery policy all live in `StorageManager`.
pub trait StorageBackend: Send + Sync {
    /// Read the stored blob. `Ok(None)` means nothing has been stored yet,
    /// which is not an error.
    fn read(&self) -> Result<Option<String>, CoreError>;

    /// Replace the stored blob.
    fn write(&self, blob: &str) -> Result<(), CoreError>;
}

/// Blob stored as a file on disk (native hosts).
#[cfg(not(target_arch = "wasm32"))]
pub struct FileBackend {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, blob: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, blob)?;
        Ok(())
    }
}

/// In-memory blob. Used in tests and by hosts that bridge persistence
/// themselves (e.g., a WASM shell backed by browser local storage).
#[derive(Default)]
pub struct MemoryBackend {
    blob: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed with an existing blob, as a host rehydrating from its own
    /// storage would.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// Current stored blob, if any. Lets a bridging host read back what to
    /// persist on its side.
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().map(|g| g.clone()).unwrap_or(None)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, CoreError> {
        self.blob
            .lock()
            .map(|g| g.clone())
            .map_err(|_| CoreError::FileIO("Memory backend lock poisoned".into()))
    }

    fn write(&self, blob: &str) -> Result<(), CoreError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| CoreError::FileIO("Memory backend lock poisoned".into()))?;
        *guard = Some(blob.to_string());
        Ok(())
    }
}
