//! Named engine registry
//!
//! A [`Registry`] maps implementation names to engine factories and holds
//! the default name. A façade resolves its implementation once, at
//! construction; changing the default afterwards does not rebind it.
//!
//! [`Registry::global`] is created on first access with the built-in
//! engines registered and `"realfft"` as the default.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

use super::complex_engine::RustFftFactory;
use super::engine::EngineFactory;
use super::real_engine::{RealFftFactory, REALFFT};
use super::FftError;

static GLOBAL_REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

pub struct Registry {
    factories: BTreeMap<String, Arc<dyn EngineFactory>>,
    default: Option<String>,
}

impl Registry {
    /// Empty registry with no default
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            default: None,
        }
    }

    /// Registry holding `"realfft"` (default) and `"rustfft"`
    pub fn with_builtin_engines() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RealFftFactory));
        registry.register(Arc::new(RustFftFactory));
        registry.default = Some(REALFFT.to_string());
        registry
    }

    /// Process-wide registry
    pub fn global() -> &'static Mutex<Registry> {
        GLOBAL_REGISTRY.get_or_init(|| Mutex::new(Registry::with_builtin_engines()))
    }

    /// Lock [`Registry::global`]
    pub fn lock_global() -> Result<MutexGuard<'static, Registry>, FftError> {
        Self::global()
            .lock()
            .map_err(|_| FftError::InternalError("engine registry lock poisoned".to_string()))
    }

    /// Add or replace a factory under its own name.
    ///
    /// The first factory registered into an empty registry becomes the
    /// default.
    pub fn register(&mut self, factory: Arc<dyn EngineFactory>) {
        let name = factory.name().to_string();
        debug!(implementation = %name, "registering transform engine");
        if self.default.is_none() {
            self.default = Some(name.clone());
        }
        self.factories.insert(name, factory);
    }

    /// Registered names, sorted
    pub fn implementations(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn default_implementation(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Make `name` the default for façades constructed from now on
    pub fn set_default_implementation(&mut self, name: &str) -> Result<(), FftError> {
        if !self.factories.contains_key(name) {
            return Err(FftError::InvalidImplementation(name.to_string()));
        }
        debug!(
            previous = ?self.default,
            implementation = name,
            "changing default transform implementation"
        );
        self.default = Some(name.to_string());
        Ok(())
    }

    pub fn factory(&self, name: &str) -> Result<Arc<dyn EngineFactory>, FftError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| FftError::InvalidImplementation(name.to_string()))
    }

    /// Look up `requested`, or the default when `None`
    pub(crate) fn resolve(&self, requested: Option<&str>) -> Result<Arc<dyn EngineFactory>, FftError> {
        match requested.or(self.default.as_deref()) {
            Some(name) => self.factory(name),
            None => Err(FftError::InvalidImplementation(String::new())),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtin_engines()
    }
}

/// Names in [`Registry::global`]
pub fn implementations() -> Result<Vec<String>, FftError> {
    Ok(Registry::lock_global()?.implementations())
}

/// Default name in [`Registry::global`]
pub fn default_implementation() -> Result<Option<String>, FftError> {
    Ok(Registry::lock_global()?
        .default_implementation()
        .map(str::to_string))
}

/// Change the default of [`Registry::global`]
pub fn set_default_implementation(name: &str) -> Result<(), FftError> {
    Registry::lock_global()?.set_default_implementation(name)
}
