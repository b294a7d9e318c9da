//! Implementación del MemoEngine.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::diag::{DiagSink, DiagTag, MemoryDiagSink, NoopDiagSink};
use crate::errors::CoreError;
use crate::fingerprint::Fingerprinter;
use crate::hashing::Blake3Algo;
use crate::model::node::NodeKind;
use crate::model::{Callable, KwArgs, Node, Operand};
use crate::ops;
use crate::store::{CacheStore, InMemoryStore};

/// Motor de resolución memoizada.
///
/// Construye nodos (el fingerprint se calcula al nacer, el callable nunca se
/// ejecuta en la construcción) y los resuelve bajo el algoritmo de tres
/// niveles: memo en proceso → store externo → ejecutar. Garantiza a lo sumo
/// una ejecución por nodo por proceso vía el slot de valor resuelto.
pub struct MemoEngine<S, D>
    where S: CacheStore,
          D: DiagSink
{
    store: S,
    diag: D,
    fingerprinter: Fingerprinter,
    write_default: bool,
    read_default: bool,
}

impl MemoEngine<InMemoryStore, MemoryDiagSink> {
    /// Engine con store en memoria y sink acumulador. Útil en tests y demos.
    pub fn in_memory() -> Self {
        Self::with_stores(InMemoryStore::new(), MemoryDiagSink::new())
    }
}

impl<S: CacheStore> MemoEngine<S, NoopDiagSink> {
    /// Builder para configurar algoritmo, sink y defaults de política.
    pub fn builder(store: S) -> crate::engine::EngineBuilder<S, NoopDiagSink> {
        crate::engine::EngineBuilder::new(store)
    }
}

impl<S, D> MemoEngine<S, D>
    where S: CacheStore,
          D: DiagSink
{
    /// Crea un engine con los colaboradores dados y defaults de política
    /// habilitados.
    pub fn with_stores(store: S, diag: D) -> Self {
        Self { store,
               diag,
               fingerprinter: Fingerprinter::new(Rc::new(Blake3Algo)),
               write_default: true,
               read_default: true }
    }

    pub(crate) fn with_parts(store: S,
                             diag: D,
                             fingerprinter: Fingerprinter,
                             write_default: bool,
                             read_default: bool)
                             -> Self {
        Self { store, diag, fingerprinter, write_default, read_default }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn diag(&self) -> &D {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut D {
        &mut self.diag
    }

    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    /// Acceso mutable, p.ej. para registrar estrategias `Custom`.
    pub fn fingerprinter_mut(&mut self) -> &mut Fingerprinter {
        &mut self.fingerprinter
    }

    /// Default de política de escritura para nodos nuevos.
    pub fn set_write_default(&mut self, enabled: bool) {
        self.write_default = enabled;
    }

    /// Default de política de lectura para nodos nuevos.
    pub fn set_read_default(&mut self, enabled: bool) {
        self.read_default = enabled;
    }

    // ---------------- construcción de nodos ----------------

    /// Envuelve un valor ya conocido. La política de escritura nace
    /// deshabilitada: nada lo computó.
    pub fn endpoint(&self, value: impl Into<Value>) -> Node {
        self.endpoint_with(value, None, None)
    }

    /// Variante con overrides explícitos de política.
    pub fn endpoint_with(&self, value: impl Into<Value>, write: Option<bool>, read: Option<bool>) -> Node {
        let value = value.into();
        let digest = self.fingerprinter.endpoint_digest(&value);
        Node::new_endpoint(value,
                           digest,
                           write.unwrap_or(false),
                           read.unwrap_or(self.read_default))
    }

    /// Construye un Call Node. Nunca ejecuta el callable.
    pub fn call(&self, callable: Callable, args: Vec<Operand>, kwargs: BTreeMap<String, Operand>) -> Node {
        self.call_with(callable, args, kwargs, None, None)
    }

    /// Variante con overrides explícitos de política.
    pub fn call_with(&self,
                     callable: Callable,
                     args: Vec<Operand>,
                     kwargs: BTreeMap<String, Operand>,
                     write: Option<bool>,
                     read: Option<bool>)
                     -> Node {
        let digest = self.fingerprinter.call_digest(&callable, &args, &kwargs);
        Node::new_call(callable,
                       args,
                       kwargs,
                       digest,
                       write.unwrap_or(self.write_default),
                       read.unwrap_or(self.read_default))
    }

    /// Proyección diferida de un campo. Vista derivada: nace con la política
    /// de cache apagada.
    pub fn get_attr(&self, node: &Node, name: &str) -> Node {
        self.call_with(ops::get_attr(),
                       vec![node.clone().into(), name.into()],
                       BTreeMap::new(),
                       Some(false),
                       Some(false))
    }

    /// Indexación diferida (índice de arreglo o clave de objeto).
    pub fn get_item(&self, node: &Node, key: impl Into<Value>) -> Node {
        self.call_with(ops::get_item(),
                       vec![node.clone().into(), Operand::Value(key.into())],
                       BTreeMap::new(),
                       Some(false),
                       Some(false))
    }

    // ---------------- resolución ----------------

    /// Obtiene el valor concreto del nodo.
    ///
    /// Niveles, en orden: slot ya poblado (memo en proceso), store externo si
    /// la política de lectura lo permite, ejecución del callable con operandos
    /// expandidos. Un fallo del callable se propaga sin tocar el slot: un
    /// `resolve` posterior reintenta desde cero, re-expandiendo operandos.
    pub fn resolve(&mut self, node: &Node) -> Result<Value, CoreError> {
        let mut in_flight = Vec::new();
        self.resolve_inner(node, &mut in_flight)
    }

    /// Fuerza una estructura posiblemente pendiente a valores planos:
    /// resuelve nodos, recorre secuencias y mapeos, deja pasar lo demás.
    pub fn expand(&mut self, operand: &Operand) -> Result<Value, CoreError> {
        let mut in_flight = Vec::new();
        self.expand_inner(operand, &mut in_flight)
    }

    fn resolve_inner(&mut self, node: &Node, in_flight: &mut Vec<String>) -> Result<Value, CoreError> {
        // Nivel 1: memo en proceso. Cubre endpoints y Call Nodes ya
        // resueltos; de acá sale la garantía de a-lo-sumo-una-ejecución.
        if let Some(value) = node.resolved() {
            let value = value.clone();
            let tag = if node.is_endpoint() { DiagTag::Endpoint } else { DiagTag::MemoHit };
            self.diag.emit(tag, node.hex());
            return Ok(value);
        }

        // Nivel 2: store externo, si la política de lectura lo permite. Un
        // fallo de `get` se propaga; no se degrada a recomputar.
        if node.read_enabled() && self.store.contains(node.hex()) {
            let value = self.store.get(node.hex())?;
            self.diag.emit(DiagTag::CacheHit, node.hex());
            return Ok(node.memoize(value).clone());
        }

        // Nivel 3: ejecutar. Un fingerprint ya en vuelo significa grafo
        // cíclico; se corta antes de recursar sin fondo.
        if in_flight.iter().any(|hex| hex == node.hex()) {
            return Err(CoreError::CycleDetected { fingerprint: node.hex().to_string() });
        }

        let NodeKind::Call { callable, args, kwargs } = node.kind() else {
            return Err(CoreError::Internal("endpoint node with an empty slot".into()));
        };

        in_flight.push(node.hex().to_string());
        let executed = self.execute_call(callable, args, kwargs, in_flight);
        in_flight.pop();

        let value = node.memoize(executed?).clone();
        if node.write_enabled() {
            self.store.put(node.hex(), &value)?;
            self.diag.emit(DiagTag::Saved, node.hex());
        } else {
            self.diag.emit(DiagTag::Evaluated, node.hex());
        }
        Ok(value)
    }

    fn execute_call(&mut self,
                    callable: &Callable,
                    args: &[Operand],
                    kwargs: &BTreeMap<String, Operand>,
                    in_flight: &mut Vec<String>)
                    -> Result<Value, CoreError> {
        let mut positional = Vec::with_capacity(args.len());
        for arg in args {
            positional.push(self.expand_inner(arg, in_flight)?);
        }
        let mut named = KwArgs::new();
        for (key, value) in kwargs {
            named.insert(key.clone(), self.expand_inner(value, in_flight)?);
        }
        // El resultado puede ser a su vez un nodo o un contenedor de nodos:
        // se expande para que nunca escape un valor pendiente.
        let outcome = callable.invoke(&positional, &named)?;
        self.expand_inner(&outcome, in_flight)
    }

    fn expand_inner(&mut self, operand: &Operand, in_flight: &mut Vec<String>) -> Result<Value, CoreError> {
        match operand {
            Operand::Value(value) => Ok(value.clone()),
            Operand::Seq(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.expand_inner(item, in_flight)?);
                }
                Ok(Value::Array(out))
            }
            Operand::Map(entries) => {
                let mut out = serde_json::Map::new();
                for (key, value) in entries {
                    out.insert(key.clone(), self.expand_inner(value, in_flight)?);
                }
                Ok(Value::Object(out))
            }
            Operand::Node(node) => self.resolve_inner(node, in_flight),
            Operand::Callable(_) => {
                Err(CoreError::Execution("a callable operand cannot expand to a plain value".into()))
            }
            Operand::Custom { payload, .. } => Ok(payload.clone()),
        }
    }
}
