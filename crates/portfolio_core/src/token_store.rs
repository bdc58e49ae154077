//! Persisted auth token lookup.
//!
//! The file store keeps a flat TOML map so the token sits under a fixed key
//! (`zpt` by default), next to anything else the host stores there.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::error::{PortfolioError, Result};

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn store(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => toml::from_str(&raw).map_err(|err| {
                PortfolioError::TokenStore(format!(
                    "malformed token file '{}': {err}",
                    self.path.display()
                ))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(PortfolioError::TokenStore(format!(
                "failed to read '{}': {err}",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                PortfolioError::TokenStore(format!(
                    "failed to create '{}': {err}",
                    parent.display()
                ))
            })?;
        }
        let raw = toml::to_string(map)
            .map_err(|err| PortfolioError::TokenStore(format!("failed to encode tokens: {err}")))?;
        fs::write(&self.path, raw).map_err(|err| {
            PortfolioError::TokenStore(format!(
                "failed to write '{}': {err}",
                self.path.display()
            ))
        })
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .read_map()?
            .remove(&self.key)
            .filter(|token| !token.trim().is_empty()))
    }

    fn store(&self, token: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), token.to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(&self.key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_root(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("portfolio_token_{label}_{suffix}"))
    }

    #[test]
    fn missing_file_means_no_token() {
        let store = FileTokenStore::new(temp_root("missing").join("token.toml"), "zpt");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn store_keeps_unrelated_keys() {
        let root = temp_root("roundtrip");
        let path = root.join("nested").join("token.toml");
        fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
        fs::write(&path, "theme = \"dark\"\n").expect("seed");

        let store = FileTokenStore::new(&path, "zpt");
        store.store("abc").expect("store");
        assert_eq!(store.load().expect("load").as_deref(), Some("abc"));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("theme"));

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let root = temp_root("malformed");
        fs::create_dir_all(&root).expect("dirs");
        let path = root.join("token.toml");
        fs::write(&path, "zpt = [").expect("seed");

        let store = FileTokenStore::new(&path, "zpt");
        assert!(matches!(store.load(), Err(PortfolioError::TokenStore(_))));

        fs::remove_dir_all(root).expect("cleanup");
    }
}
