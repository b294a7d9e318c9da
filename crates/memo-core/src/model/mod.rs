//! Modelo del grafo diferido (Digest, Callable, Operand, Node).

pub mod callable;
pub mod digest;
pub mod node;
pub mod operand;

pub use callable::{CallFn, Callable, CallableIdent, KwArgs};
pub use digest::Digest;
pub use node::Node;
pub use operand::Operand;
