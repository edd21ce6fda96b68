//! Bound-context emitters — an origin namespace and fixed fields attached
//! up front.
//!
//! An [`Emitter`] is an immutable decorator over the router: it owns its
//! origin string and a set of bound fields that are merged into every
//! record it constructs (per-call fields win on key collision). Deriving a
//! new emitter with [`Emitter::bind`] or [`Emitter::child`] copies the
//! context; nothing is shared or registered globally.

use std::collections::BTreeMap;
use std::sync::Arc;

use dray_core::{Level, LogRecord};

use crate::router::{Router, RouterError};

/// An emission handle for one origin namespace.
#[derive(Clone)]
pub struct Emitter {
    router: Arc<Router>,
    origin: String,
    bound: BTreeMap<String, serde_json::Value>,
}

impl Emitter {
    pub fn new(router: Arc<Router>, origin: impl Into<String>) -> Self {
        Self {
            router,
            origin: origin.into(),
            bound: BTreeMap::new(),
        }
    }

    /// A new emitter with one more bound field.
    pub fn bind(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let mut next = self.clone();
        next.bound.insert(key.into(), value.into());
        next
    }

    /// A new emitter for a dotted child namespace.
    pub fn child(&self, segment: &str) -> Self {
        let mut next = self.clone();
        next.origin = format!("{}.{segment}", self.origin);
        next
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Emit a record carrying only the bound fields.
    pub fn emit(&self, level: Level, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit_with(
            level,
            message,
            std::iter::empty::<(String, serde_json::Value)>(),
        )
    }

    /// Emit a record with per-call fields merged over the bound fields.
    pub fn emit_with<I, K, V>(
        &self,
        level: Level,
        message: impl Into<String>,
        fields: I,
    ) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        let mut merged = self.bound.clone();
        merged.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.router
            .submit(LogRecord::with_fields(level, self.origin.clone(), message, merged))
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Debug, message)
    }

    pub fn full(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Full, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Error, message)
    }

    pub fn critical(&self, message: impl Into<String>) -> Result<(), RouterError> {
        self.emit(Level::Critical, message)
    }
}
