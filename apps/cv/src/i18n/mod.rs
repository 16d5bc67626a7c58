//! Localized string lookup.

pub mod resolver;
pub mod source;

use thiserror::Error;

use crate::models::Language;

pub use resolver::{LoadStatus, Resolver};
pub use source::{BundledLocaleSource, DirLocaleSource, LocaleSource};

/// Cloneable so one in-flight load can hand the same outcome to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("locale file for '{language}' not found at {path}")]
    Missing { language: Language, path: String },

    #[error("failed to read locale file for '{language}': {message}")]
    Io { language: Language, message: String },

    #[error("malformed locale document for '{language}': {message}")]
    Parse { language: Language, message: String },
}

/// A resolver bound to one language; what section renderers receive.
#[derive(Clone)]
pub struct Translator {
    resolver: Resolver,
    language: Language,
}

impl Translator {
    pub fn new(resolver: Resolver, language: Language) -> Self {
        Self { resolver, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t(&self, key: &str) -> String {
        self.resolver.resolve(key, self.language)
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.resolver.resolve_with(key, self.language, params)
    }
}
