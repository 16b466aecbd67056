//! Scheme-to-handler registry.
//!
//! Populated once at load time, read-only afterwards. Host tools register
//! each handler under its scheme prefix and dispatch source URLs through
//! `lookup` instead of mutating a shared table.

use crate::operations::UrlOperations;

/// Registered handler entry: scheme prefix plus the handler itself.
struct Registration {
    scheme_prefix: String,
    handler: Box<dyn UrlOperations>,
}

/// Explicit registry of URL handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<Registration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for URLs whose scheme starts with `scheme_prefix`
    /// (e.g. `publicneuro+`). Later registrations do not shadow earlier ones.
    pub fn register(&mut self, scheme_prefix: impl Into<String>, handler: Box<dyn UrlOperations>) {
        let scheme_prefix = scheme_prefix.into();
        tracing::debug!(prefix = %scheme_prefix, "registered URL handler");
        self.entries.push(Registration {
            scheme_prefix,
            handler,
        });
    }

    /// Finds the handler for `url` by scheme prefix, if any.
    pub fn lookup(&mut self, url: &str) -> Option<&mut (dyn UrlOperations + 'static)> {
        let scheme = url.split("://").next().unwrap_or("");
        self.entries
            .iter_mut()
            .find(|r| scheme.starts_with(&r.scheme_prefix))
            .map(move |r| r.handler.as_mut())
    }
}
