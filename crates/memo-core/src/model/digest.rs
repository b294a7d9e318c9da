//! Digest de contenido: bytes + forma hexadecimal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Huella estructural de un nodo u operando. Se calcula una sola vez en la
/// construcción del nodo y no cambia durante su vida; la forma hex es la
/// clave bajo la que el store externo guarda el resultado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    bytes: Vec<u8>,
    hex: String,
}

impl Digest {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let hex = crate::hashing::to_hex(&bytes);
        Self { bytes, hex }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}
