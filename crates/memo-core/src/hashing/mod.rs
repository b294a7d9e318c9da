//! Módulo de hashing y canonicalización JSON.

pub mod algo;
pub mod canonical_json;

pub use algo::{Blake3Algo, HashAlgo, Hasher, Sha256Algo};
pub use canonical_json::to_canonical_json;

use std::fmt::Write as _;

use serde_json::Value;

/// Codifica bytes a hexadecimal en minúsculas.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Hashea un string con el algoritmo por defecto y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Blake3Algo.begin();
    h.update(input.as_bytes());
    to_hex(&h.finish())
}

/// Hashea la forma canónica de un `Value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
