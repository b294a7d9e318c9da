//! Contrato del Cache Store y store en memoria.
//!
//! Las claves son fingerprints en hex. El core no impone orden, evicción ni
//! transaccionalidad: un crash entre la ejecución y `put` pierde esa única
//! entrada, recuperable recomputando en el próximo acceso. Sobrescribir una
//! clave con un valor igual es benigno.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::CoreError;

/// Mapeo externo fingerprint-hex → valor computado. El store sobrevive a
/// cualquier nodo; los nodos no retienen más que la clave.
pub trait CacheStore {
    /// `true` si existe una entrada para la clave.
    fn contains(&self, key: &str) -> bool;

    /// Valor almacenado. Definido sólo cuando `contains(key)`; un fallo de
    /// lectura se propaga, nunca se degrada a miss implícito.
    fn get(&self, key: &str) -> Result<Value, CoreError>;

    /// Registra el valor bajo la clave.
    fn put(&mut self, key: &str, value: &Value) -> Result<(), CoreError>;
}

/// Tabla en memoria sin límite de tamaño. Suficiente para una corrida.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub inner: HashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl CacheStore for InMemoryStore {
    fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn get(&self, key: &str) -> Result<Value, CoreError> {
        self.inner
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::Store(format!("missing entry for key {key}")))
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<(), CoreError> {
        self.inner.insert(key.to_string(), value.clone());
        Ok(())
    }
}
