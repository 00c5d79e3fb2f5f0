//! Host context for the conversion engine.
//!
//! A `Context` owns one [`ConverterRegistry`] and the modules installed
//! into it. The graph runtime creates one context at startup, installs the
//! modules of every loaded node library, and asks it for converters when
//! edges are built.
//!
//! # Example
//!
//! ```
//! use pinwire::{Context, Value, primitives};
//!
//! let ctx = Context::with_default_modules().unwrap();
//!
//! let edge = ctx.converter(primitives::STRING, primitives::DOUBLE).unwrap();
//! assert_eq!(edge.apply(Value::from("1.5")), Ok(Value::Double(1.5)));
//! ```

use log::debug;
use thiserror::Error;

use pinwire_core::{ConversionError, RegistrationError, TypeHash, Value};
use pinwire_modules::default_modules;
use pinwire_registry::{ConversionEdge, ConverterRegistry, Module, RegistryOptions, Resolver};

/// Owns a converter registry and the modules installed into it.
#[derive(Debug, Clone)]
pub struct Context {
    /// Installed modules, in installation order
    modules: Vec<Module>,
    registry: ConverterRegistry,
}

impl Context {
    /// Create a context with default registry options and no modules.
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            modules: Vec::new(),
            registry: ConverterRegistry::with_options(options),
        }
    }

    /// Create a context with the built-in modules installed.
    ///
    /// Default modules include:
    /// - `numeric` - widening converters between numeric primitives
    /// - `text` - string parsing and double formatting
    /// - `sequence` - the `Sequence<T>` container and its factories
    ///
    /// # Errors
    ///
    /// Returns an error if any default module fails to install.
    pub fn with_default_modules() -> Result<Self, ContextError> {
        let mut ctx = Self::new();
        for module in default_modules() {
            ctx.install(module)?;
        }
        Ok(ctx)
    }

    /// Install a module into the context.
    ///
    /// The module's types, converters and factories become visible to
    /// every converter resolved afterwards.
    ///
    /// # Errors
    ///
    /// - `ContextError::ModuleAlreadyInstalled` if a module with the same
    ///   name was installed before
    /// - `ContextError::InstallFailed` if a registration fails
    pub fn install(&mut self, module: Module) -> Result<(), ContextError> {
        if self.get_module(module.name()).is_some() {
            return Err(ContextError::ModuleAlreadyInstalled(module.name().to_string()));
        }

        module
            .install_into(&mut self.registry)
            .map_err(|source| ContextError::InstallFailed {
                module: module.name().to_string(),
                source,
            })?;

        debug!("installed module '{}'", module.name());
        self.modules.push(module);
        Ok(())
    }

    /// Get the installed modules.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Get an installed module by name.
    pub fn get_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.registry
    }

    /// Snapshot resolver for handing to other threads.
    pub fn resolver(&self) -> Resolver {
        self.registry.snapshot()
    }

    /// Resolve a converter or fail naming both types.
    pub fn converter(
        &self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Result<ConversionEdge, ConversionError> {
        self.registry.get_converter(source, destination)
    }

    pub fn try_converter(&self, source: TypeHash, destination: TypeHash) -> Option<ConversionEdge> {
        self.registry.try_get_converter(source, destination)
    }

    /// Convert a value into `destination`, resolving by its runtime type.
    ///
    /// `Null` passes through unchanged.
    pub fn convert(&self, value: Value, destination: TypeHash) -> Result<Value, ConversionError> {
        self.registry.snapshot().convert(value, destination)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during context operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A module with this name is already installed
    #[error("module '{0}' is already installed")]
    ModuleAlreadyInstalled(String),

    /// Registering part of a module failed
    #[error("failed to install module '{module}': {source}")]
    InstallFailed {
        module: String,
        #[source]
        source: RegistrationError,
    },
}
