//! Acumuladores de digest intercambiables.
//!
//! El fingerprint se construye alimentando un acumulador por partes; el
//! algoritmo concreto es reemplazable sin tocar el resto del core. blake3
//! (256 bits) es el default; SHA-256 queda disponible para stores que ya
//! estén poblados con ese algoritmo.

use sha2::{Digest as _, Sha256};

/// Acumulador incremental de un digest.
pub trait Hasher {
    fn update(&mut self, bytes: &[u8]);
    fn finish(self: Box<Self>) -> Vec<u8>;
}

/// Fábrica de acumuladores: el engine abre uno por fingerprint.
pub trait HashAlgo {
    fn begin(&self) -> Box<dyn Hasher>;
    /// Nombre estable del algoritmo. Diagnóstico; no entra al digest.
    fn name(&self) -> &'static str;
}

/// blake3, 256 bits. Algoritmo por defecto.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Algo;

struct Blake3Hasher(blake3::Hasher);

impl Hasher for Blake3Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }
}

impl HashAlgo for Blake3Algo {
    fn begin(&self) -> Box<dyn Hasher> {
        Box::new(Blake3Hasher(blake3::Hasher::new()))
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// SHA-256 vía `sha2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Algo;

struct Sha256Hasher(Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

impl HashAlgo for Sha256Algo {
    fn begin(&self) -> Box<dyn Hasher> {
        Box::new(Sha256Hasher(Sha256::new()))
    }

    fn name(&self) -> &'static str {
        "sha-256"
    }
}
