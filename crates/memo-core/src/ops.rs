//! Builtins con identidad estable, usables como targets de Call Nodes.
//!
//! Aritmética sobre `serde_json::Value` (entera mientras ambos operandos sean
//! enteros, flotante si no) y los accesores `get_attr` / `get_item` que usan
//! los atajos del engine. Todos llevan nombre calificado: sus nodos producen
//! el mismo fingerprint en cualquier corrida.

use std::rc::Rc;

use serde_json::Value;

use crate::errors::CoreError;
use crate::model::{Callable, KwArgs, Operand};

/// Suma numérica.
pub fn add() -> Callable {
    binary_numeric("add", i64::checked_add, |x, y| x + y)
}

/// Resta numérica.
pub fn sub() -> Callable {
    binary_numeric("sub", i64::checked_sub, |x, y| x - y)
}

/// Producto numérico.
pub fn mul() -> Callable {
    binary_numeric("mul", i64::checked_mul, |x, y| x * y)
}

/// División; siempre flotante. Dividir por cero es un fallo de ejecución.
pub fn div() -> Callable {
    Callable::with_source("ops::div", module_path!(), file!(), Rc::new(|args: &[Value], _kw: &KwArgs| {
        let (a, b) = two("div", args)?;
        let x = as_f64("div", a)?;
        let y = as_f64("div", b)?;
        if y == 0.0 {
            return Err(CoreError::Execution("div: division by zero".into()));
        }
        Ok(Operand::Value(number_from_f64("div", x / y)?))
    }))
}

/// Proyección de campo sobre un objeto JSON. Posicionales: `[objeto, nombre]`.
pub fn get_attr() -> Callable {
    Callable::with_source("ops::get_attr", module_path!(), file!(), Rc::new(|args: &[Value], _kw: &KwArgs| {
        let (obj, name) = two("get_attr", args)?;
        let key = name.as_str()
                      .ok_or_else(|| CoreError::Execution("get_attr: attribute name must be a string".into()))?;
        obj.get(key)
           .cloned()
           .map(Operand::Value)
           .ok_or_else(|| CoreError::Execution(format!("get_attr: missing attribute '{key}'")))
    }))
}

/// Indexación: índice entero sobre arreglos o clave string sobre objetos.
/// Posicionales: `[contenedor, clave]`.
pub fn get_item() -> Callable {
    Callable::with_source("ops::get_item", module_path!(), file!(), Rc::new(|args: &[Value], _kw: &KwArgs| {
        let (container, key) = two("get_item", args)?;
        let item = match key {
            Value::String(s) => container.get(s.as_str()),
            Value::Number(n) => n.as_u64().and_then(|i| container.get(i as usize)),
            other => {
                return Err(CoreError::Execution(format!("get_item: unsupported key {other}")));
            }
        };
        item.cloned()
            .map(Operand::Value)
            .ok_or_else(|| CoreError::Execution(format!("get_item: missing item {key}")))
    }))
}

fn binary_numeric(name: &'static str,
                  int_op: fn(i64, i64) -> Option<i64>,
                  float_op: fn(f64, f64) -> f64)
                  -> Callable {
    Callable::with_source(format!("ops::{name}"), module_path!(), file!(), Rc::new(move |args: &[Value], _kw: &KwArgs| {
        let (a, b) = two(name, args)?;
        match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => {
                let v = int_op(x, y).ok_or_else(|| CoreError::Execution(format!("{name}: integer overflow")))?;
                Ok(Operand::Value(Value::from(v)))
            }
            _ => {
                let x = as_f64(name, a)?;
                let y = as_f64(name, b)?;
                Ok(Operand::Value(number_from_f64(name, float_op(x, y))?))
            }
        }
    }))
}

fn two<'a>(name: &str, args: &'a [Value]) -> Result<(&'a Value, &'a Value), CoreError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(CoreError::Execution(format!("{name}: expected exactly two positional operands, got {}",
                                              args.len()))),
    }
}

fn as_f64(name: &str, value: &Value) -> Result<f64, CoreError> {
    value.as_f64()
         .ok_or_else(|| CoreError::Execution(format!("{name}: operand is not numeric: {value}")))
}

fn number_from_f64(name: &str, value: f64) -> Result<Value, CoreError> {
    serde_json::Number::from_f64(value).map(Value::Number)
                                       .ok_or_else(|| CoreError::Execution(format!("{name}: non-finite result")))
}
