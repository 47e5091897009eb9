use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Read-only lookup of named configuration variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is not set.
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`EnvSource::var`], but treats an empty value as unset.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

impl<T: EnvSource + ?Sized> EnvSource for Arc<T> {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        ProcessEnv
    }

    /// Loads `.env` from the working directory (or a parent) before reading
    /// the process environment. A missing file is ignored and variables that
    /// are already set are left alone.
    pub fn with_dotenv() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::debug!("[winston_env] could not load .env file: {}", e);
            }
        }
        ProcessEnv
    }

    /// Like [`ProcessEnv::with_dotenv`], reading the given file instead.
    pub fn with_dotenv_from<P: AsRef<Path>>(path: P) -> Self {
        if let Err(e) = dotenvy::from_path(path.as_ref()) {
            if !e.not_found() {
                log::debug!(
                    "[winston_env] could not load {}: {}",
                    path.as_ref().display(),
                    e
                );
            }
        }
        ProcessEnv
    }
}

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory variable set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapEnv {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
