//! memo-core: motor de evaluación diferida con memoización por fingerprint.
//!
//! Un front-end describe "computar X a partir de Y y Z" como un árbol de
//! nodos pendientes; cada nodo recibe al nacer un fingerprint estructural y
//! se resuelve a demanda consultando el memo en proceso y un store externo
//! antes de ejecutar. Dos cómputos estructuralmente idénticos, en cualquier
//! proceso, apuntan a la misma entrada de cache.
pub mod diag;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod hashing;
pub mod model;
pub mod ops;
pub mod store;
pub mod tree;

pub use diag::{DiagEvent, DiagSink, DiagTag, LogDiagSink, MemoryDiagSink, NoopDiagSink};
pub use engine::{EngineBuilder, MemoEngine};
pub use errors::CoreError;
pub use fingerprint::Fingerprinter;
pub use hashing::{Blake3Algo, HashAlgo, Hasher, Sha256Algo};
pub use model::{CallFn, Callable, CallableIdent, Digest, KwArgs, Node, Operand};
pub use store::{CacheStore, InMemoryStore};
pub use tree::render_tree;

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use serde_json::{json, Value};

    use super::*;

    /// Callable de suma con identidad fija, para no depender de `ops` acá.
    fn plus() -> Callable {
        Callable::named("tests::plus", module_path!(), Rc::new(|args: &[Value], _kw: &KwArgs| {
            let total = args.iter().map(|v| v.as_i64().unwrap_or(0)).sum::<i64>();
            Ok(Operand::Value(Value::from(total)))
        }))
    }

    /// Callable que cuenta sus invocaciones.
    fn counting(counter: Rc<Cell<u32>>) -> Callable {
        Callable::named("tests::counting", module_path!(), Rc::new(move |args: &[Value], _kw: &KwArgs| {
            counter.set(counter.get() + 1);
            let total = args.iter().map(|v| v.as_i64().unwrap_or(0)).sum::<i64>();
            Ok(Operand::Value(Value::from(total)))
        }))
    }

    #[test]
    fn endpoint_resolves_to_wrapped_value() {
        let mut engine = MemoEngine::in_memory();
        let node = engine.endpoint(json!({"x": 1}));
        assert!(node.is_resolved());
        let value = engine.resolve(&node).expect("endpoint should resolve");
        assert_eq!(value, json!({"x": 1}));
        assert_eq!(engine.diag().tags(), vec![DiagTag::Endpoint]);
    }

    #[test]
    fn call_construction_does_not_execute() {
        let counter = Rc::new(Cell::new(0));
        let engine = MemoEngine::in_memory();
        let node = engine.call(counting(counter.clone()), vec![2.into(), 3.into()], BTreeMap::new());
        assert!(!node.is_resolved());
        assert_eq!(counter.get(), 0);
        // El fingerprint sí existe desde la construcción.
        assert_eq!(node.hex().len(), 64);
    }

    #[test]
    fn resolve_executes_once_and_memoizes() {
        let counter = Rc::new(Cell::new(0));
        let mut engine = MemoEngine::in_memory();
        let node = engine.call(counting(counter.clone()), vec![2.into(), 3.into()], BTreeMap::new());

        assert_eq!(engine.resolve(&node).unwrap(), json!(5));
        assert_eq!(engine.resolve(&node).unwrap(), json!(5));
        assert_eq!(counter.get(), 1, "second resolve must hit the memo tier");
        assert_eq!(engine.diag().tags(), vec![DiagTag::Saved, DiagTag::MemoHit]);
    }

    #[test]
    fn nested_node_operand_contributes_its_digest() {
        let engine = MemoEngine::in_memory();
        let inner = engine.call(plus(), vec![1.into(), 2.into()], BTreeMap::new());
        let outer = engine.call(plus(), vec![inner.clone().into(), 10.into()], BTreeMap::new());
        assert_ne!(inner.hex(), outer.hex());
        // Construir el nodo externo no fuerza la resolución del interno.
        assert!(!inner.is_resolved());
    }

    #[test]
    fn expand_flattens_containers_of_nodes() {
        let mut engine = MemoEngine::in_memory();
        let node = engine.call(plus(), vec![3.into(), 4.into()], BTreeMap::new());
        let operand = Operand::Seq(vec![node.into(), Operand::Value(json!("k"))]);
        let value = engine.expand(&operand).unwrap();
        assert_eq!(value, json!([7, "k"]));
    }
}
