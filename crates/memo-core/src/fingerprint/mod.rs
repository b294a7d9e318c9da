//! Subsistema de fingerprint.
//!
//! Calcula un digest determinista para cualquier operando con reglas por
//! variante, en un único match exhaustivo:
//! - nodos anidados aportan su digest ya computado (estructural: jamás fuerza
//!   una resolución sólo para obtener una clave),
//! - secuencias aportan sus elementos en orden,
//! - mapeos aportan pares (clave, valor) ordenados por clave,
//! - callables aportan su identidad estable (nombre + módulo + fuente),
//! - valores planos aportan su texto JSON canónico.
//!
//! Los hazards (callable sin nombre, estrategia no registrada) no son
//! fatales: se reportan por `log::warn!` y el digest se construye con la
//! identidad parcial disponible.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::Value;

use crate::hashing::{to_canonical_json, HashAlgo, Hasher};
use crate::model::{Callable, Digest, Operand};

// Separadores de dominio por variante: un contenedor no puede colisionar con
// su contenido aplanado ni un endpoint con un call del mismo texto.
const TAG_ENDPOINT: &[u8] = b"e:";
const TAG_VALUE: &[u8] = b"v:";
const TAG_SEQ: &[u8] = b"s:";
const TAG_MAP: &[u8] = b"m:";
const TAG_NODE: &[u8] = b"n:";
const TAG_CALLABLE: &[u8] = b"c:";
const TAG_CUSTOM: &[u8] = b"x:";

/// Estrategia registrada para operandos `Custom`.
pub type StrategyFn = dyn Fn(&Value, &mut dyn Hasher);

/// Calculadora de digests sobre operandos.
pub struct Fingerprinter {
    algo: Rc<dyn HashAlgo>,
    strategies: HashMap<String, Rc<StrategyFn>>,
}

impl Fingerprinter {
    pub fn new(algo: Rc<dyn HashAlgo>) -> Self {
        Self { algo, strategies: HashMap::new() }
    }

    pub fn algo_name(&self) -> &'static str {
        self.algo.name()
    }

    /// Registra la estrategia que fingerprinteará `Operand::Custom` con el
    /// tag dado.
    pub fn register_strategy(&mut self, tag: impl Into<String>, f: Rc<StrategyFn>) {
        self.strategies.insert(tag.into(), f);
    }

    /// Digest de un Endpoint: el valor envuelto en forma canónica.
    pub fn endpoint_digest(&self, value: &Value) -> Digest {
        let mut h = self.algo.begin();
        h.update(TAG_ENDPOINT);
        h.update(to_canonical_json(value).as_bytes());
        Digest::from_bytes(h.finish())
    }

    /// Digest de un Call Node: callable, posicionales en orden, nombrados
    /// ordenados por clave.
    pub fn call_digest(&self,
                       callable: &Callable,
                       args: &[Operand],
                       kwargs: &BTreeMap<String, Operand>)
                       -> Digest {
        let mut h = self.algo.begin();
        self.update_callable(&mut *h, callable);
        for arg in args {
            self.update_operand(&mut *h, arg);
        }
        for (key, value) in kwargs {
            // BTreeMap itera ordenado por clave: el orden de inserción del
            // llamador nunca se observa.
            self.update_key(&mut *h, key);
            self.update_operand(&mut *h, value);
        }
        Digest::from_bytes(h.finish())
    }

    fn update_operand(&self, h: &mut dyn Hasher, operand: &Operand) {
        match operand {
            Operand::Value(v) => {
                h.update(TAG_VALUE);
                h.update(to_canonical_json(v).as_bytes());
            }
            Operand::Seq(items) => {
                h.update(TAG_SEQ);
                for item in items {
                    self.update_operand(h, item);
                }
            }
            Operand::Map(entries) => {
                h.update(TAG_MAP);
                for (key, value) in entries {
                    self.update_key(h, key);
                    self.update_operand(h, value);
                }
            }
            Operand::Node(node) => {
                h.update(TAG_NODE);
                h.update(node.fingerprint().bytes());
            }
            Operand::Callable(callable) => self.update_callable(h, callable),
            Operand::Custom { strategy, payload } => self.update_custom(h, strategy, payload),
        }
    }

    fn update_key(&self, h: &mut dyn Hasher, key: &str) {
        // Clave entre comillas JSON: queda delimitada sin ambigüedad frente
        // al valor que la sigue.
        h.update(serde_json::to_string(key).unwrap().as_bytes());
    }

    fn update_callable(&self, h: &mut dyn Hasher, callable: &Callable) {
        if !callable.is_stably_named() {
            log::warn!("fingerprinting a callable without a stable name; the digest may not be \
                        reproducible across process runs");
        }
        let ident = callable.ident();
        h.update(TAG_CALLABLE);
        h.update(ident.qualname.as_bytes());
        if let Some(module) = &ident.module {
            h.update(b"@");
            h.update(module.as_bytes());
        }
        if let Some(source) = &ident.source {
            h.update(b"#");
            h.update(source.as_bytes());
        }
    }

    fn update_custom(&self, h: &mut dyn Hasher, strategy: &str, payload: &Value) {
        h.update(TAG_CUSTOM);
        h.update(strategy.as_bytes());
        match self.strategies.get(strategy) {
            Some(f) => f(payload, h),
            None => {
                log::warn!("no fingerprint strategy registered under '{strategy}'; falling back to \
                            the payload's canonical JSON");
                h.update(to_canonical_json(payload).as_bytes());
            }
        }
    }
}
