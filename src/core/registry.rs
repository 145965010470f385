//! Name to backend map

use super::backend::Backend;
use super::error::{LoggerError, Result};
use super::record::Record;
use std::collections::BTreeMap;

/// Backends keyed by the name they were registered under.
///
/// Several instances of the same backend type can be registered with
/// different configurations as long as their names differ.
#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding exactly one backend.
    pub fn single(name: impl Into<String>, backend: Box<dyn Backend>) -> Self {
        let mut backends = BTreeMap::new();
        backends.insert(name.into(), backend);
        Self { backends }
    }

    pub fn add(&mut self, name: impl Into<String>, backend: Box<dyn Backend>) -> Result<()> {
        let name = name.into();
        if self.backends.contains_key(&name) {
            return Err(LoggerError::backend_exists(name));
        }
        self.backends.insert(name, backend);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Box<dyn Backend>> {
        self.backends
            .remove(name)
            .ok_or_else(|| LoggerError::backend_not_found(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut (dyn Backend + 'static)> {
        self.backends
            .get_mut(name)
            .map(|backend| backend.as_mut())
            .ok_or_else(|| LoggerError::backend_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.backends.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Hand the record to every backend, collecting the failures by name.
    pub fn dispatch(&mut self, record: &Record) -> Vec<(String, LoggerError)> {
        let mut failures = Vec::new();
        for (name, backend) in self.backends.iter_mut() {
            if let Err(e) = backend.log(record) {
                failures.push((name.clone(), e));
            }
        }
        failures
    }

    /// Flush every backend, collecting the failures by name.
    pub fn flush_all(&mut self) -> Vec<(String, LoggerError)> {
        let mut failures = Vec::new();
        for (name, backend) in self.backends.iter_mut() {
            if let Err(e) = backend.flush() {
                failures.push((name.clone(), e));
            }
        }
        failures
    }

    /// Remove and return every backend.
    pub fn drain(&mut self) -> Vec<(String, Box<dyn Backend>)> {
        std::mem::take(&mut self.backends).into_iter().collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.backends.keys()).finish()
    }
}
