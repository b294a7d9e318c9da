//! Store de directorio: un archivo por fingerprint.
//!
//! Layout: `<root>/<hex>` con el JSON canónico del valor como contenido. El
//! conjunto de claves se escanea una sola vez al abrir y se mantiene en
//! memoria; `contains` nunca toca el disco. Escrituras duplicadas con el
//! mismo valor son benignas (mismo contenido, misma clave).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use memo_core::hashing::to_canonical_json;
use memo_core::{CacheStore, CoreError};

use crate::config::DirConfig;
use crate::error::PersistenceError;

pub struct DirStore {
    root: PathBuf,
    files: HashSet<String>,
}

impl DirStore {
    /// Abre el directorio, creándolo si no existe, y escanea las claves ya
    /// persistidas.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        let mut files = HashSet::new();
        if root.exists() {
            for entry in fs::read_dir(&root)? {
                let entry = entry?;
                if let Some(name) = entry.file_name().to_str() {
                    files.insert(name.to_string());
                }
            }
        } else {
            fs::create_dir_all(&root)?;
        }
        log::debug!("dir store opened at {} ({} entries)", root.display(), files.len());
        Ok(Self { root, files })
    }

    /// Abre el store en la raíz configurada por entorno (`MEMO_CACHE_DIR`).
    pub fn from_env() -> Result<Self, PersistenceError> {
        Self::open(DirConfig::from_env().root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn read_entry(&self, key: &str) -> Result<Value, PersistenceError> {
        if !self.files.contains(key) {
            return Err(PersistenceError::NotFound(key.to_string()));
        }
        let text = fs::read_to_string(self.path_for(key))?;
        serde_json::from_str(&text).map_err(|e| PersistenceError::Corrupt { key: key.to_string(),
                                                                            detail: e.to_string() })
    }

    fn write_entry(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        fs::write(self.path_for(key), to_canonical_json(value))?;
        self.files.insert(key.to_string());
        log::debug!("saved entry {key}");
        Ok(())
    }
}

impl CacheStore for DirStore {
    fn contains(&self, key: &str) -> bool {
        self.files.contains(key)
    }

    fn get(&self, key: &str) -> Result<Value, CoreError> {
        Ok(self.read_entry(key)?)
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<(), CoreError> {
        Ok(self.write_entry(key, value)?)
    }
}
