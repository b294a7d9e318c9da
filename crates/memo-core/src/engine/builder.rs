//! Builder para `MemoEngine`.
//!
//! Configura store, sink de diagnóstico, algoritmo de digest y defaults de
//! política antes de fijar el engine. Consumir el builder produce el engine
//! final.

use std::rc::Rc;

use crate::diag::{DiagSink, NoopDiagSink};
use crate::engine::MemoEngine;
use crate::fingerprint::Fingerprinter;
use crate::hashing::{Blake3Algo, HashAlgo};
use crate::store::CacheStore;

pub struct EngineBuilder<S: CacheStore, D: DiagSink> {
    store: S,
    diag: D,
    algo: Rc<dyn HashAlgo>,
    write_default: bool,
    read_default: bool,
}

impl<S: CacheStore> EngineBuilder<S, NoopDiagSink> {
    pub fn new(store: S) -> Self {
        Self { store,
               diag: NoopDiagSink,
               algo: Rc::new(Blake3Algo),
               write_default: true,
               read_default: true }
    }
}

impl<S: CacheStore, D: DiagSink> EngineBuilder<S, D> {
    /// Cambia el algoritmo de digest (blake3 por defecto).
    pub fn algo(mut self, algo: Rc<dyn HashAlgo>) -> Self {
        self.algo = algo;
        self
    }

    /// Sink que recibirá los eventos de resolución.
    pub fn diag<D2: DiagSink>(self, diag: D2) -> EngineBuilder<S, D2> {
        EngineBuilder { store: self.store,
                        diag,
                        algo: self.algo,
                        write_default: self.write_default,
                        read_default: self.read_default }
    }

    /// Default de política de escritura para nodos nuevos.
    pub fn write_default(mut self, enabled: bool) -> Self {
        self.write_default = enabled;
        self
    }

    /// Default de política de lectura para nodos nuevos.
    pub fn read_default(mut self, enabled: bool) -> Self {
        self.read_default = enabled;
        self
    }

    pub fn build(self) -> MemoEngine<S, D> {
        MemoEngine::with_parts(self.store,
                               self.diag,
                               Fingerprinter::new(self.algo),
                               self.write_default,
                               self.read_default)
    }
}
