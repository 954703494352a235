//! Per-type token binding.
//!
//! Each configuration type lists the string fields that may carry
//! indirection tokens and resolves them in place. There is no
//! blanket implementation: a type opts in by writing its own `bind_with`.

use super::resolve::{EnvSource, ProcessEnv, Resolver};
use serde_json::Value;

/// Resolve the indirection tokens held by a configuration value.
pub trait Bind {
    /// Resolve this value's known token fields with `resolver`.
    fn bind_with<E: EnvSource>(&mut self, resolver: &Resolver<E>) -> &mut Self;

    /// Resolve this value's known token fields against the process environment.
    fn bind(&mut self) -> &mut Self {
        self.bind_with(&Resolver::<ProcessEnv>::new())
    }
}

impl<T: Bind> Bind for Option<T> {
    fn bind_with<E: EnvSource>(&mut self, resolver: &Resolver<E>) -> &mut Self {
        if let Some(inner) = self {
            inner.bind_with(resolver);
        }
        self
    }
}

/// Untyped trees have no known token fields.
impl Bind for Value {
    fn bind_with<E: EnvSource>(&mut self, _resolver: &Resolver<E>) -> &mut Self {
        self
    }
}
