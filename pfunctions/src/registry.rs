//! Function registry: the authoritative name-to-contract mapping.
//!
//! ```rust
//! use pfunctions::{FunctionRegistry, FunctionSchema, PropertySchema};
//! use serde_json::json;
//!
//! let mut registry = FunctionRegistry::new();
//! registry
//!     .register_sync(
//!         FunctionSchema::new("echo", "Echoes its input")
//!             .property("text", PropertySchema::string())
//!             .required(["text"]),
//!         |args| Ok(json!(args.get("text").cloned())),
//!     )
//!     .expect("registration should succeed");
//!
//! assert!(registry.contains("echo"));
//! ```

use std::future::Future;
use std::sync::Arc;

use pcommon::{BoxFuture, Registry};
use serde_json::{Map, Value};

use crate::{FunctionError, FunctionSchema};

pub type FunctionFuture<'a, T> = BoxFuture<'a, T>;

pub(crate) type HandlerFn =
    dyn Fn(Map<String, Value>) -> FunctionFuture<'static, Result<Value, FunctionError>>
        + Send
        + Sync;

/// One registered capability: schema plus handler, immutable once stored.
pub(crate) struct FunctionRecord {
    pub(crate) schema: FunctionSchema,
    pub(crate) handler: Arc<HandlerFn>,
}

#[derive(Default)]
pub struct FunctionRegistry {
    records: Registry<String, FunctionRecord>,
    order: Vec<String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `schema` to an asynchronous handler, replacing any prior binding
    /// for the same name. The schema is validated here so a malformed
    /// contract never becomes callable.
    pub fn register<F, Fut>(&mut self, schema: FunctionSchema, handler: F) -> Result<(), FunctionError>
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, FunctionError>> + Send + 'static,
    {
        schema.validate()?;

        let name = schema.name.clone();
        let handler: Arc<HandlerFn> = Arc::new(move |args| Box::pin(handler(args)));
        let replaced = self
            .records
            .insert(name.clone(), FunctionRecord { schema, handler });

        if replaced.is_none() {
            self.order.push(name);
        }

        Ok(())
    }

    pub fn register_sync<F>(&mut self, schema: FunctionSchema, handler: F) -> Result<(), FunctionError>
    where
        F: Fn(&Map<String, Value>) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.register(schema, move |args| {
            let output = handler(&args);
            async move { output }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Removes a binding. Removing an unknown name is a no-op returning false.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.records.remove(name).is_some();
        if removed {
            self.order.retain(|entry| entry != name);
        }

        removed
    }

    /// All registered schemas in registration order, for advertising to the
    /// completion endpoint.
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        self.order
            .iter()
            .filter_map(|name| self.records.get(name))
            .map(|record| record.schema.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn record(&self, name: &str) -> Option<&FunctionRecord> {
        self.records.get(name)
    }
}
