//! Identidad estable e invocación de callables.
//!
//! El fingerprint de un Call Node usa la identidad del callable (nombre
//! calificado + módulo + archivo fuente), nunca la dirección del closure: el
//! mismo cómputo apunta a la misma entrada de cache en cualquier corrida del
//! proceso.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Operand;
use crate::errors::CoreError;

/// Argumentos nombrados, ya expandidos, que recibe un callable.
pub type KwArgs = BTreeMap<String, Value>;

/// Firma de invocación: posicionales expandidos + nombrados expandidos. El
/// resultado puede ser a su vez un nodo pendiente; el engine lo expande.
pub type CallFn = dyn Fn(&[Value], &KwArgs) -> Result<Operand, CoreError>;

/// Identidad estable de un callable. Entra al fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableIdent {
    pub qualname: String,
    pub module: Option<String>,
    /// Archivo fuente del módulo, si se conoce. Desambigua módulos homónimos.
    pub source: Option<String>,
}

/// Target invocable de un Call Node.
#[derive(Clone)]
pub struct Callable {
    ident: CallableIdent,
    func: Rc<CallFn>,
}

impl Callable {
    /// Callable con nombre calificado y módulo conocidos.
    pub fn named(qualname: impl Into<String>, module: impl Into<String>, func: Rc<CallFn>) -> Self {
        Self { ident: CallableIdent { qualname: qualname.into(),
                                      module: Some(module.into()),
                                      source: None },
               func }
    }

    /// Variante con archivo fuente; la macro `callable!` captura ambos en el
    /// punto de expansión.
    pub fn with_source(qualname: impl Into<String>,
                       module: impl Into<String>,
                       source: impl Into<String>,
                       func: Rc<CallFn>)
                       -> Self {
        Self { ident: CallableIdent { qualname: qualname.into(),
                                      module: Some(module.into()),
                                      source: Some(source.into()) },
               func }
    }

    /// Callable sin identidad estable. Su fingerprint puede no reproducirse
    /// entre procesos; el subsistema de fingerprint lo reporta como hazard.
    pub fn anonymous(func: Rc<CallFn>) -> Self {
        Self { ident: CallableIdent { qualname: String::new(), module: None, source: None },
               func }
    }

    pub fn ident(&self) -> &CallableIdent {
        &self.ident
    }

    /// `false` cuando el callable no puede nombrarse de forma estable.
    pub fn is_stably_named(&self) -> bool {
        !self.ident.qualname.is_empty()
    }

    /// Invoca el closure con operandos ya expandidos.
    pub fn invoke(&self, args: &[Value], kwargs: &KwArgs) -> Result<Operand, CoreError> {
        (self.func)(args, kwargs)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("ident", &self.ident).finish_non_exhaustive()
    }
}

/// Declara un `Callable` a partir de una función libre, capturando módulo y
/// archivo fuente en el punto de expansión.
///
/// ```ignore
/// fn double(args: &[Value], _kw: &KwArgs) -> Result<Operand, CoreError> { ... }
/// let target = callable!(double);
/// ```
#[macro_export]
macro_rules! callable {
    ($func:path) => {
        $crate::model::Callable::with_source(stringify!($func),
                                             module_path!(),
                                             file!(),
                                             ::std::rc::Rc::new(|args, kwargs| $func(args, kwargs)))
    };
}
