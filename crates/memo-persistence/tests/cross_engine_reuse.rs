//! Reuso del cache entre engines: el segundo proceso no ejecuta nada.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{json, Value};

use memo_core::{Callable, DiagTag, KwArgs, MemoEngine, MemoryDiagSink, Operand};
use memo_persistence::DirStore;
use tempfile::tempdir;

fn counting_add(counter: Rc<Cell<u32>>) -> Callable {
    Callable::named("cross::counting_add", module_path!(), Rc::new(move |args: &[Value], _kw: &KwArgs| {
        counter.set(counter.get() + 1);
        let total = args.iter().map(|v| v.as_i64().unwrap_or(0)).sum::<i64>();
        Ok(Operand::Value(Value::from(total)))
    }))
}

#[test]
fn second_engine_hits_the_directory_cache() {
    let dir = tempdir().unwrap();
    let executions = Rc::new(Cell::new(0));

    // Primera "corrida": ejecuta y persiste.
    {
        let store = DirStore::open(dir.path()).unwrap();
        let mut engine = MemoEngine::builder(store).diag(MemoryDiagSink::new()).build();
        let node = engine.call(counting_add(executions.clone()), vec![2.into(), 3.into()], BTreeMap::new());
        assert_eq!(engine.resolve(&node).unwrap(), json!(5));
        assert_eq!(engine.diag().tags(), vec![DiagTag::Saved]);
    }

    // Segunda "corrida": mismo grafo, nuevo engine y nuevo nodo. El
    // fingerprint coincide y el valor sale del directorio sin ejecutar.
    {
        let store = DirStore::open(dir.path()).unwrap();
        let mut engine = MemoEngine::builder(store).diag(MemoryDiagSink::new()).build();
        let node = engine.call(counting_add(executions.clone()), vec![2.into(), 3.into()], BTreeMap::new());
        assert_eq!(engine.resolve(&node).unwrap(), json!(5));
        assert_eq!(engine.diag().tags(), vec![DiagTag::CacheHit]);
    }

    assert_eq!(executions.get(), 1, "the callable must run exactly once across both engines");
}

#[test]
fn write_policy_off_keeps_the_directory_clean() {
    let dir = tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let mut engine = MemoEngine::builder(store).write_default(false)
                                               .diag(MemoryDiagSink::new())
                                               .build();
    let node = engine.call(counting_add(Rc::new(Cell::new(0))), vec![1.into(), 1.into()], BTreeMap::new());
    assert_eq!(engine.resolve(&node).unwrap(), json!(2));
    assert!(engine.store().is_empty());
}
