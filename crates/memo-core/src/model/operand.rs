//! Operandos de un Call Node.
//!
//! Unión cerrada: el subsistema de fingerprint hace un match exhaustivo sobre
//! estas variantes en lugar de despachar por tipo dinámico. `Custom` es la
//! válvula de extensión; su estrategia se registra explícitamente en el
//! `Fingerprinter`.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{Callable, Node};

#[derive(Debug, Clone)]
pub enum Operand {
    /// Valor plano. Su fingerprint es el texto JSON canónico.
    Value(Value),
    /// Secuencia ordenada; el orden afecta el fingerprint.
    Seq(Vec<Operand>),
    /// Mapeo clave/valor; el fingerprint es independiente del orden de
    /// inserción (pares ordenados por clave).
    Map(BTreeMap<String, Operand>),
    /// Nodo pendiente anidado. Aporta su digest, nunca su valor resuelto.
    Node(Node),
    /// Callable como dato. Fingerprinteable por identidad; no expandible a
    /// valor plano.
    Callable(Callable),
    /// Payload opaco con estrategia de fingerprint registrada aparte. Si la
    /// estrategia no está registrada, el digest cae al JSON canónico del
    /// payload con un warning.
    Custom { strategy: String, payload: Value },
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Node> for Operand {
    fn from(n: Node) -> Self {
        Operand::Node(n)
    }
}

impl From<Callable> for Operand {
    fn from(c: Callable) -> Self {
        Operand::Callable(c)
    }
}

impl From<Vec<Operand>> for Operand {
    fn from(items: Vec<Operand>) -> Self {
        Operand::Seq(items)
    }
}

impl From<BTreeMap<String, Operand>> for Operand {
    fn from(entries: BTreeMap<String, Operand>) -> Self {
        Operand::Map(entries)
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Value(Value::from(v))
    }
}
