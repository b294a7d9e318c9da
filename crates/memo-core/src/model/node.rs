//! Nodo del grafo diferido: Endpoint o Call.
//!
//! Un nodo es inmutable salvo por dos cosas: el slot de valor resuelto (se
//! llena a lo sumo una vez) y los flags de política de cache (toggleables
//! después de la construcción). El modelo es monohilo; `Rc` + celdas
//! interiores son deliberados.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use serde_json::Value;

use super::{Callable, Digest, Operand};

/// Variante estructural del nodo.
pub(crate) enum NodeKind {
    /// Valor ya conocido; terminal para la resolución.
    Endpoint,
    /// Cómputo pendiente: callable + operandos.
    Call {
        callable: Callable,
        args: Vec<Operand>,
        kwargs: BTreeMap<String, Operand>,
    },
}

struct NodeInner {
    fingerprint: Digest,
    kind: NodeKind,
    /// Slot de valor resuelto. Una vez poblado no se recomputa ni se pisa.
    slot: OnceCell<Value>,
    write_enabled: Cell<bool>,
    read_enabled: Cell<bool>,
}

/// Handle compartido de un nodo. Clonar no duplica el nodo: todos los handles
/// ven el mismo slot y las mismas políticas.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

impl Node {
    pub(crate) fn new_endpoint(value: Value, fingerprint: Digest, write: bool, read: bool) -> Self {
        let slot = OnceCell::new();
        let _ = slot.set(value);
        Self { inner: Rc::new(NodeInner { fingerprint,
                                          kind: NodeKind::Endpoint,
                                          slot,
                                          write_enabled: Cell::new(write),
                                          read_enabled: Cell::new(read) }) }
    }

    pub(crate) fn new_call(callable: Callable,
                           args: Vec<Operand>,
                           kwargs: BTreeMap<String, Operand>,
                           fingerprint: Digest,
                           write: bool,
                           read: bool)
                           -> Self {
        Self { inner: Rc::new(NodeInner { fingerprint,
                                          kind: NodeKind::Call { callable, args, kwargs },
                                          slot: OnceCell::new(),
                                          write_enabled: Cell::new(write),
                                          read_enabled: Cell::new(read) }) }
    }

    pub fn fingerprint(&self) -> &Digest {
        &self.inner.fingerprint
    }

    /// Forma hexadecimal del fingerprint: la clave de cache del nodo.
    pub fn hex(&self) -> &str {
        self.inner.fingerprint.hex()
    }

    pub fn is_endpoint(&self) -> bool {
        matches!(self.inner.kind, NodeKind::Endpoint)
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.slot.get().is_some()
    }

    /// Valor resuelto, si el slot ya fue poblado.
    pub fn resolved(&self) -> Option<&Value> {
        self.inner.slot.get()
    }

    /// Puebla el slot si está vacío y devuelve el valor almacenado.
    pub(crate) fn memoize(&self, value: Value) -> &Value {
        self.inner.slot.get_or_init(|| value)
    }

    /// Habilita o deshabilita la escritura del resultado al store externo.
    pub fn set_write(&self, enabled: bool) {
        self.inner.write_enabled.set(enabled);
    }

    /// Habilita o deshabilita la carga del resultado desde el store externo.
    pub fn set_read(&self, enabled: bool) {
        self.inner.read_enabled.set(enabled);
    }

    pub fn write_enabled(&self) -> bool {
        self.inner.write_enabled.get()
    }

    pub fn read_enabled(&self) -> bool {
        self.inner.read_enabled.get()
    }

    pub(crate) fn kind(&self) -> &NodeKind {
        &self.inner.kind
    }
}

// Igualdad y hash reducen al digest: dos nodos estructuralmente idénticos
// son el mismo nodo para cualquier colección.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.inner.fingerprint == other.inner.fingerprint
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.inner.fingerprint.bytes());
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.inner.kind {
            NodeKind::Endpoint => "Endpoint",
            NodeKind::Call { .. } => "Call",
        };
        f.debug_struct("Node")
         .field("kind", &variant)
         .field("fingerprint", &self.hex())
         .field("resolved", &self.is_resolved())
         .finish()
    }
}
