//! Carga de configuración del store de directorio desde el entorno.
//! Usa convención `MEMO_CACHE_DIR`; sin la variable cae a `.memo-cache`.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct DirConfig {
    pub root: PathBuf,
}

impl DirConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let root = env::var("MEMO_CACHE_DIR").map(PathBuf::from)
                                             .unwrap_or_else(|_| PathBuf::from(".memo-cache"));
        Self { root }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
