//! Eventos de diagnóstico de la resolución.
//!
//! Cada decisión del algoritmo de resolución emite un tag con el fingerprint
//! del nodo involucrado. Puramente observacional: ningún sink altera el
//! resultado de `resolve`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Desenlace observado para un nodo durante `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagTag {
    /// Endpoint: el valor nació conocido.
    Endpoint,
    /// Call Node ya resuelto antes en este proceso.
    MemoHit,
    /// Cargado desde el store externo.
    CacheHit,
    /// Ejecutado sin persistir (política de escritura apagada).
    Evaluated,
    /// Ejecutado y escrito al store externo.
    Saved,
}

impl DiagTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagTag::Endpoint => "endpoint",
            DiagTag::MemoHit => "memo-hit",
            DiagTag::CacheHit => "cache-hit",
            DiagTag::Evaluated => "evaluated",
            DiagTag::Saved => "saved",
        }
    }
}

/// Evento registrado por `MemoryDiagSink`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagEvent {
    pub seq: u64, // orden de emisión dentro del sink
    pub tag: DiagTag,
    pub fingerprint: String,
    pub ts: DateTime<Utc>, // metadato; nunca entra a ningún fingerprint
}

/// Observador de eventos de resolución.
pub trait DiagSink {
    fn emit(&mut self, tag: DiagTag, fingerprint_hex: &str);
}

/// Descarta todos los eventos.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagSink;

impl DiagSink for NoopDiagSink {
    fn emit(&mut self, _tag: DiagTag, _fingerprint_hex: &str) {}
}

/// Acumula eventos en memoria para inspección posterior.
#[derive(Debug, Default)]
pub struct MemoryDiagSink {
    pub events: Vec<DiagEvent>,
}

impl MemoryDiagSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags en orden de emisión.
    pub fn tags(&self) -> Vec<DiagTag> {
        self.events.iter().map(|e| e.tag).collect()
    }

    /// Eventos de un fingerprint concreto.
    pub fn for_fingerprint(&self, hex: &str) -> Vec<&DiagEvent> {
        self.events.iter().filter(|e| e.fingerprint == hex).collect()
    }
}

impl DiagSink for MemoryDiagSink {
    fn emit(&mut self, tag: DiagTag, fingerprint_hex: &str) {
        let seq = self.events.len() as u64;
        self.events.push(DiagEvent { seq,
                                     tag,
                                     fingerprint: fingerprint_hex.to_string(),
                                     ts: Utc::now() });
    }
}

/// Reenvía cada evento al facade `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagSink;

impl DiagSink for LogDiagSink {
    fn emit(&mut self, tag: DiagTag, fingerprint_hex: &str) {
        log::debug!(target: "memoflow", "{} {}", tag.as_str(), fingerprint_hex);
    }
}
