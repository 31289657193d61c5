use std::collections::HashMap;
use std::convert::Infallible;

use crate::Canonical;

/// Storage for published canonical forms, keyed by an opaque binary key.
///
/// Implementations must hand back exactly the bytes they were given. A
/// form that is reordered or re-encoded on the way through no longer
/// matches the signature computed over it.
pub trait Directory {
    type Error;

    /// Adds a form under the key. Keys may hold more than one form.
    fn publish(&mut self, key: &[u8], form: Canonical) -> Result<(), Self::Error>;

    /// Returns every form published under the key, in publish order.
    fn lookup(&self, key: &[u8]) -> Result<Vec<Canonical>, Self::Error>;
}

/// Where a directory service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub host: String,
    pub port: u16,
    /// Name of the collection to publish into.
    pub collection: String,
}

impl DirectoryConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for DirectoryConfig {
    /// The conventional local setup: `localhost:4120`, collection `certs`.
    fn default() -> Self {
        DirectoryConfig {
            host: "localhost".to_string(),
            port: 4120,
            collection: "certs".to_string(),
        }
    }
}

/// In-process [`Directory`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    entries: HashMap<Vec<u8>, Vec<Canonical>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        MemoryDirectory::default()
    }
}

impl Directory for MemoryDirectory {
    type Error = Infallible;

    fn publish(&mut self, key: &[u8], form: Canonical) -> Result<(), Self::Error> {
        self.entries.entry(key.to_vec()).or_default().push(form);
        Ok(())
    }

    fn lookup(&self, key: &[u8]) -> Result<Vec<Canonical>, Self::Error> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }
}
