//! Rule validation: the only path from a raw `CorrelationRule` to a
//! `ValidRule` the engine will evaluate.

mod validate;

pub use validate::validate;
