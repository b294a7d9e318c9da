//! Propiedades del subsistema de fingerprint: determinismo, sensibilidad al
//! orden posicional, insensibilidad al orden de los nombrados.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{json, Value};

use memo_core::hashing::{hash_str, hash_value, to_canonical_json};
use memo_core::{Callable, CoreError, Hasher, MemoEngine, Operand, Sha256Algo};

fn add_args(args: &[Value], _kw: &memo_core::KwArgs) -> Result<Operand, CoreError> {
    let total = args.iter().map(|v| v.as_i64().unwrap_or(0)).sum::<i64>();
    Ok(Operand::Value(Value::from(total)))
}

fn add() -> Callable {
    memo_core::callable!(add_args)
}

#[test]
fn canonical_json_sorts_object_keys() {
    let a = json!({"b": 2, "a": 1});
    let b = json!({"a": 1, "b": 2});
    assert_eq!(to_canonical_json(&a), "{\"a\":1,\"b\":2}");
    assert_eq!(to_canonical_json(&a), to_canonical_json(&b));
    assert_eq!(hash_value(&a), hash_value(&b));
}

#[test]
fn hash_str_is_stable_hex() {
    let h = hash_str("memoflow");
    assert_eq!(h.len(), 64);
    assert_eq!(h, hash_str("memoflow"));
    assert_ne!(h, hash_str("memoflow "));
}

#[test]
fn same_graph_same_fingerprint_across_engines() {
    // Dos engines independientes simulan dos corridas del proceso: la
    // identidad del callable es por nombre, no por dirección.
    let first = MemoEngine::in_memory();
    let second = MemoEngine::in_memory();

    let a = first.call(add(), vec![2.into(), 3.into()], BTreeMap::new());
    let b = second.call(add(), vec![2.into(), 3.into()], BTreeMap::new());
    assert_eq!(a.hex(), b.hex());
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn positional_order_is_significant() {
    let engine = MemoEngine::in_memory();
    let ab = engine.call(add(), vec![2.into(), 3.into()], BTreeMap::new());
    let ba = engine.call(add(), vec![3.into(), 2.into()], BTreeMap::new());
    assert_ne!(ab.hex(), ba.hex());
}

#[test]
fn named_operand_order_is_insignificant() {
    let engine = MemoEngine::in_memory();

    let mut xy = BTreeMap::new();
    xy.insert("x".to_string(), Operand::from(1i64));
    xy.insert("y".to_string(), Operand::from(2i64));

    let mut yx = BTreeMap::new();
    yx.insert("y".to_string(), Operand::from(2i64));
    yx.insert("x".to_string(), Operand::from(1i64));

    let a = engine.call(add(), vec![], xy);
    let b = engine.call(add(), vec![], yx);
    assert_eq!(a.hex(), b.hex());
}

#[test]
fn named_operand_keys_are_significant() {
    let engine = MemoEngine::in_memory();

    let mut xy = BTreeMap::new();
    xy.insert("x".to_string(), Operand::from(1i64));
    let mut zy = BTreeMap::new();
    zy.insert("z".to_string(), Operand::from(1i64));

    let a = engine.call(add(), vec![], xy);
    let b = engine.call(add(), vec![], zy);
    assert_ne!(a.hex(), b.hex());
}

#[test]
fn endpoint_and_call_cannot_collide() {
    let engine = MemoEngine::in_memory();
    let endpoint = engine.endpoint(json!(5));
    let call = engine.call(add(), vec![5.into()], BTreeMap::new());
    assert_ne!(endpoint.hex(), call.hex());
}

#[test]
fn endpoint_fingerprint_ignores_object_insertion_order() {
    let engine = MemoEngine::in_memory();
    let a = engine.endpoint(json!({"p": 1, "q": 2}));
    let b = engine.endpoint(json!({"q": 2, "p": 1}));
    assert_eq!(a.hex(), b.hex());
}

#[test]
fn sequence_nesting_is_part_of_the_fingerprint() {
    let engine = MemoEngine::in_memory();
    let flat = engine.call(add(), vec![1.into(), 2.into()], BTreeMap::new());
    let nested = engine.call(add(),
                             vec![Operand::Seq(vec![1.into(), 2.into()])],
                             BTreeMap::new());
    assert_ne!(flat.hex(), nested.hex());
}

#[test]
fn callable_identity_distinguishes_targets() {
    fn other_args(args: &[Value], kw: &memo_core::KwArgs) -> Result<Operand, CoreError> {
        add_args(args, kw)
    }
    let engine = MemoEngine::in_memory();
    let a = engine.call(add(), vec![1.into()], BTreeMap::new());
    let b = engine.call(memo_core::callable!(other_args), vec![1.into()], BTreeMap::new());
    assert_ne!(a.hex(), b.hex());
}

#[test]
fn anonymous_callables_still_fingerprint() {
    // Hazard de corrección, no error: el digest se construye con la
    // identidad parcial disponible.
    let engine = MemoEngine::in_memory();
    let anon = Callable::anonymous(Rc::new(|_args, _kw| Ok(Operand::Value(json!(0)))));
    let node = engine.call(anon, vec![1.into()], BTreeMap::new());
    assert_eq!(node.hex().len(), 64);
}

#[test]
fn alternative_algo_changes_the_digest() {
    let blake = MemoEngine::in_memory();
    let sha = MemoEngine::builder(memo_core::InMemoryStore::new()).algo(Rc::new(Sha256Algo))
                                                                  .build();
    let a = blake.call(add(), vec![1.into()], BTreeMap::new());
    let b = sha.call(add(), vec![1.into()], BTreeMap::new());
    assert_eq!(b.hex().len(), 64); // SHA-256 también es de 256 bits
    assert_ne!(a.hex(), b.hex());
}

#[test]
fn custom_strategy_controls_the_contribution() {
    let mut with_strategy = MemoEngine::in_memory();
    with_strategy.fingerprinter_mut()
                 .register_strategy("blob", Rc::new(|payload: &Value, h: &mut dyn Hasher| {
                     // Sólo el campo `id` identifica al payload.
                     let id = payload.get("id").and_then(|v| v.as_str()).unwrap_or("");
                     h.update(id.as_bytes());
                 }));
    let plain = MemoEngine::in_memory();

    let operand = Operand::Custom { strategy: "blob".to_string(),
                                    payload: json!({"id": "k1", "noise": 42}) };
    let a = with_strategy.call(add(), vec![operand.clone()], BTreeMap::new());
    let b = plain.call(add(), vec![operand], BTreeMap::new());
    // Sin estrategia registrada cae al JSON canónico del payload: otra
    // contribución, otro digest.
    assert_ne!(a.hex(), b.hex());

    let stripped = Operand::Custom { strategy: "blob".to_string(),
                                     payload: json!({"id": "k1", "noise": 99}) };
    let c = with_strategy.call(add(), vec![stripped], BTreeMap::new());
    assert_eq!(a.hex(), c.hex(), "strategy must ignore the noise field");
}
