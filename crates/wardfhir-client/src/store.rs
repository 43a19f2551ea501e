use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

/// File name of the persisted token entry inside the storage directory.
const TOKEN_FILE: &str = "authToken";

/// Persistent storage for the bearer token.
///
/// The token lives in a single file under a namespaced application directory
/// (`~/.wardfhir` by default) so it survives process restarts. All reads are
/// served from an in-memory cell loaded at construction; writes mirror to
/// disk best-effort. When the backing directory cannot be created the store
/// degrades to in-memory-only (session-scoped) behavior with a warning
/// instead of failing.
#[derive(Debug)]
pub struct TokenStore {
    cached: RwLock<Option<String>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Store backed by the default application directory.
    pub fn new() -> Self {
        match dirs::home_dir() {
            Some(home) => Self::with_dir(home.join(".wardfhir")),
            None => {
                tracing::warn!(
                    "cannot determine home directory, token will not survive this session"
                );
                Self::in_memory()
            }
        }
    }

    /// Store backed by a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(
                "cannot create token storage directory {}: {e}, token will not survive this session",
                dir.display()
            );
            return Self::in_memory();
        }
        let path = dir.join(TOKEN_FILE);
        let cached = match fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => Some(content.trim().to_string()),
            _ => None,
        };
        Self {
            cached: RwLock::new(cached),
            path: Some(path),
        }
    }

    /// Store with no disk backing at all.
    pub fn in_memory() -> Self {
        Self {
            cached: RwLock::new(None),
            path: None,
        }
    }

    /// Whether writes are mirrored to disk.
    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    /// Previously stored token, or `None` if absent or cleared.
    pub fn get(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Store a token; `None` removes the persisted entry.
    ///
    /// Persistence failures degrade to the in-memory value with a warning.
    pub fn set(&self, token: Option<&str>) {
        {
            let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
            *cached = token.map(str::to_string);
        }
        let Some(path) = &self.path else { return };
        let result = match token {
            Some(token) => fs::write(path, token),
            None => match fs::remove_file(path) {
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::warn!("failed to persist token to {}: {e}", path.display());
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
