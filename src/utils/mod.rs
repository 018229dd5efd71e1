//! Utility modules: numeric coercion.
pub mod num;
