//! Credential lookup
//!
//! Sources are consulted in order and the first non-empty value wins. The
//! static source (process configuration) is registered before the session
//! source (a key supplied at runtime). No source is an error; it just means
//! demo mode.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Opaque secret enabling the remote bridge
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key; blank input is no credential at all
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// One place a credential may come from
pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn lookup(&self) -> Option<Credential>;
}

/// Fixed at startup from configuration
pub struct StaticCredential(Option<Credential>);

impl StaticCredential {
    pub fn new(raw: Option<&str>) -> Self {
        Self(raw.and_then(Credential::new))
    }
}

impl CredentialSource for StaticCredential {
    fn name(&self) -> &'static str {
        "static"
    }

    fn lookup(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// Supplied by the user while the process runs
#[derive(Default)]
pub struct SessionCredential(RwLock<Option<Credential>>);

impl SessionCredential {
    /// Store a key; returns false (and clears) when the key is blank
    pub fn set(&self, raw: &str) -> bool {
        let credential = Credential::new(raw);
        let accepted = credential.is_some();
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = credential;
        accepted
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl CredentialSource for SessionCredential {
    fn name(&self) -> &'static str {
        "session"
    }

    fn lookup(&self) -> Option<Credential> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Ordered list of sources
#[derive(Clone, Default)]
pub struct CredentialResolver {
    sources: Vec<Arc<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower priority than those already registered
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// First credential found, with the name of the source that supplied it
    pub fn resolve(&self) -> Option<(Credential, &'static str)> {
        self.sources
            .iter()
            .find_map(|source| source.lookup().map(|credential| (credential, source.name())))
    }
}
