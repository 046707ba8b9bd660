//! Secure persistence of the token pair
//!
//! The pair is always written as a single record, so a reader never sees a
//! new access token next to a stale refresh token. Backend failures are
//! logged and reported as "no token", which sends the user back to login
//! instead of aborting the command.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use keyring::Entry;
use log::{debug, warn};

use super::token::{CredentialRecord, TokenPair};
use crate::error::CredentialError;

/// Keychain service name
pub const KEYRING_SERVICE: &str = "finport";

/// Keychain account holding the serialized record
const KEYRING_ACCOUNT: &str = "session";

/// Raw storage for one serialized credential record
pub trait SecretBackend: Send + Sync {
    /// Read the record, `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<CredentialRecord>, CredentialError>;

    /// Replace the stored record
    fn store(&self, record: &CredentialRecord) -> Result<(), CredentialError>;

    /// Delete the stored record; deleting nothing is not an error
    fn remove(&self) -> Result<(), CredentialError>;
}

/// OS keychain backend
pub struct KeyringBackend {
    service: String,
    account: String,
}

impl KeyringBackend {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            account: KEYRING_ACCOUNT.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretBackend for KeyringBackend {
    fn load(&self) -> Result<Option<CredentialRecord>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(secret) => serde_json::from_str(&secret)
                .map(Some)
                .map_err(|e| CredentialError::Corrupt(e.to_string())),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, record: &CredentialRecord) -> Result<(), CredentialError> {
        let secret =
            serde_json::to_string(record).map_err(|e| CredentialError::Corrupt(e.to_string()))?;
        self.entry()?.set_password(&secret)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// JSON file backend for machines without a usable keychain
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn file_err(&self, err: std::io::Error) -> CredentialError {
        CredentialError::File(format!("{}: {}", self.path.display(), err))
    }
}

impl SecretBackend for FileBackend {
    fn load(&self) -> Result<Option<CredentialRecord>, CredentialError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.file_err(e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| CredentialError::Corrupt(e.to_string()))
    }

    fn store(&self, record: &CredentialRecord) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.file_err(e))?;
        }

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| CredentialError::Corrupt(e.to_string()))?;

        // Write next to the target and rename over it
        let tmp = self.path.with_extension("json.tmp");
        match std::fs::remove_file(&tmp) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(self.file_err(e)),
            _ => {}
        }
        // 0600 from creation
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp).map_err(|e| self.file_err(e))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| self.file_err(e))?;

        std::fs::rename(&tmp, &self.path).map_err(|e| self.file_err(e))
    }

    fn remove(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.file_err(e)),
        }
    }
}

/// Credential store: the only way tokens are read or written.
///
/// Cloning shares the underlying backend.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn SecretBackend>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn SecretBackend>) -> Self {
        Self { backend }
    }

    /// Persist a pair, or clear both tokens when `pair` is `None`.
    ///
    /// Failures are logged; callers must not treat an unsaved pair as stored.
    pub fn save(&self, pair: Option<&TokenPair>) -> Result<(), CredentialError> {
        let result = match pair {
            Some(pair) => self.backend.store(&CredentialRecord::issue(pair)),
            None => self.backend.remove(),
        };
        match &result {
            Ok(()) if pair.is_some() => debug!("Stored new token pair"),
            Ok(()) => debug!("Cleared stored tokens"),
            Err(e) => warn!("Failed to update stored tokens: {}", e),
        }
        result
    }

    /// Full stored record, `None` when absent, empty or unreadable.
    pub fn record(&self) -> Option<CredentialRecord> {
        match self.backend.load() {
            Ok(Some(record)) if !record.access_token.is_empty() => Some(record),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to read stored tokens: {}", e);
                None
            }
        }
    }

    pub fn read_access_token(&self) -> Option<String> {
        self.record().map(|r| r.access_token)
    }

    pub fn read_refresh_token(&self) -> Option<String> {
        self.record()
            .map(|r| r.refresh_token)
            .filter(|t| !t.is_empty())
    }

    /// Remove both tokens. A failure is logged and otherwise ignored.
    pub fn clear(&self) {
        let _ = self.save(None);
    }
}


#[cfg(test)]
mod tests {
    use super::memory::{BrokenBackend, memory_store};
    use super::*;
    use tempfile::tempdir;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expires_in: 900,
        }
    }

    #[test]
    fn test_save_then_read_returns_saved_values() {
        let store = memory_store();
        store.save(Some(&pair("acc-1", "ref-1"))).unwrap();

        assert_eq!(store.read_access_token().as_deref(), Some("acc-1"));
        assert_eq!(store.read_refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn test_save_overwrites_both_tokens() {
        let store = memory_store();
        store.save(Some(&pair("acc-1", "ref-1"))).unwrap();
        store.save(Some(&pair("acc-2", "ref-2"))).unwrap();

        assert_eq!(store.read_access_token().as_deref(), Some("acc-2"));
        assert_eq!(store.read_refresh_token().as_deref(), Some("ref-2"));
    }

    #[test]
    fn test_save_none_clears_both_tokens() {
        let store = memory_store();
        store.save(Some(&pair("acc-1", "ref-1"))).unwrap();
        store.save(None).unwrap();

        assert!(store.read_access_token().is_none());
        assert!(store.read_refresh_token().is_none());
    }

    #[test]
    fn test_clear_on_empty_store_is_harmless() {
        let store = memory_store();
        store.clear();
        assert!(store.read_access_token().is_none());
    }

    #[test]
    fn test_empty_access_token_counts_as_absent() {
        let store = memory_store();
        store.save(Some(&pair("", "ref-1"))).unwrap();
        assert!(store.read_access_token().is_none());
    }

    #[test]
    fn test_backend_failure_is_treated_as_no_token() {
        let store = CredentialStore::new(Arc::new(BrokenBackend));
        assert!(store.save(Some(&pair("acc-1", "ref-1"))).is_err());
        assert!(store.save(None).is_err());
        store.clear();

        assert!(store.read_access_token().is_none());
        assert!(store.read_refresh_token().is_none());
    }

    #[test]
    fn test_file_backend_round_trip_and_remove() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tokens.json");
        let store = CredentialStore::new(Arc::new(FileBackend::new(path.clone())));

        store.save(Some(&pair("acc-1", "ref-1"))).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.read_access_token().as_deref(), Some("acc-1"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        store.save(Some(&pair("acc-2", "ref-2"))).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
        assert_eq!(store.read_refresh_token().as_deref(), Some("ref-2"));

        store.save(None).unwrap();
        assert!(!path.exists());
        assert!(store.read_refresh_token().is_none());
    }

    #[test]
    fn test_file_backend_corrupt_file_reads_as_absent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let backend = FileBackend::new(path);
        assert!(matches!(backend.load(), Err(CredentialError::Corrupt(_))));

        let store = CredentialStore::new(Arc::new(backend));
        assert!(store.read_access_token().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_backend_replaces_stale_temp_file_with_private_one() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let path = temp.path().join("tokens.json");
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, "leftover").unwrap();
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

        let backend = FileBackend::new(path.clone());
        let record = CredentialRecord::issue(&pair("acc-1", "ref-1"));
        backend.store(&record).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!tmp.exists());
        assert_eq!(backend.load().unwrap(), Some(record));
    }
}
