use crate::contract::Contract;
use std::error::Error;
use thiserror::Error;

#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = std::rc::Rc<dyn Error + 'static>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = std::sync::Arc<dyn Error + Send + Sync + 'static>;

/// Errors related to resolving contracts and managing service providers.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Could not create dependency with contract: {0}")]
    UnboundContract(Contract),
    #[error("Could not provide argument \"{parameter}\" to {contract}")]
    Resolution {
        contract: Contract,
        parameter: String,
    },
    #[error("Could not instantiate {contract}: {error}")]
    Instantiation {
        contract: Contract,
        error: ErrorPtr,
    },
    #[error("Detected dependency cycle while resolving: {0}")]
    DependencyCycle(Contract),
    #[error("Tried to downcast instance of {actual} to incompatible type: {expected}")]
    IncompatibleInstance {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Service provider {provider} failed: {error}")]
    ProviderLifecycle {
        provider: String,
        error: ErrorPtr,
    },
}

/// Error related to component definition registries.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ComponentDefinitionRegistryError {
    #[error("Attempted to register a duplicated component with name: {0}")]
    DuplicateComponentName(String),
}

/// Converts any error into an [ErrorPtr].
#[cfg(feature = "threadsafe")]
pub fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    std::sync::Arc::new(error) as ErrorPtr
}

/// Converts any error into an [ErrorPtr].
#[cfg(not(feature = "threadsafe"))]
pub fn convert_error<E: Error + 'static>(error: E) -> ErrorPtr {
    std::rc::Rc::new(error) as ErrorPtr
}
