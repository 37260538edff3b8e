//! One of the basic blocks of dependency injection is a [Component]. Components are constructible
//! types which publish their constructor parameters, so the container can satisfy them without any
//! runtime reflection.
//!
//! ## Registering concrete components
//!
//! Any type which wants to be constructed by the container, needs to implement `Component`. For
//! convenience, the trait can be automatically derived with all infrastructure if the `derive`
//! feature is enabled:
//!
//! ```
//! use oak_di::instance::InstancePtr;
//! use oak_di::Component;
//!
//! #[derive(Component)]
//! struct TestDependency;
//!
//! #[derive(Component)]
//! #[component(names = ["test"])]
//! struct TestComponent {
//!     // service parameter - resolved from the container
//!     dependency: InstancePtr<TestDependency>,
//!     // value parameter - must be supplied as an argument
//!     path: String,
//!     #[component(default)]
//!     retries: i8,
//!     #[component(default = "default_timeout")]
//!     timeout: u64,
//! }
//!
//! fn default_timeout() -> u64 {
//!     30
//! }
//! ```
//!
//! Derived components are also registered in the
//! [StaticComponentDefinitionRegistry](crate::component_registry::StaticComponentDefinitionRegistry),
//! which makes them constructible without an explicit binding.
//!
//! ### Supported `#[component]` struct configuration
//!
//! * `names = ["name"]` - use given name list as the symbolic contracts for the component, instead
//! of the auto-generated snake case one
//!
//! ### Supported `#[component]` field configuration
//!
//! * `default` - use `Default::default()` when nothing else satisfies the parameter
//! * `default = "expr"` - call `expr()` when nothing else satisfies the parameter

use crate::contract::Contract;
use crate::error::ContainerError;
use crate::instance::{Injectable, Instance, InstancePtr};
use derivative::Derivative;
use std::collections::VecDeque;

/// Produces the default value of a parameter.
pub type DefaultFunction = fn() -> Instance;

/// Constructor method for type-erased instances.
pub type Constructor = fn(arguments: &mut ResolvedArguments) -> Result<Instance, ContainerError>;

/// How a parameter can be satisfied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParameterKind {
    /// A non-primitive dependency, which can be resolved from the container.
    Service(Contract),
    /// A primitive, which needs to be supplied explicitly or have a default.
    Value(Contract),
}

/// A single constructor parameter.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub kind: ParameterKind,
    #[derivative(Debug = "ignore")]
    pub default: Option<DefaultFunction>,
}

impl ParameterDefinition {
    /// Creates a service parameter of type `T`.
    pub fn service<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Service(Contract::of::<T>()),
            default: None,
        }
    }

    /// Creates a value parameter of type `T`.
    pub fn value<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Value(Contract::of::<T>()),
            default: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: DefaultFunction) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the contract for service parameters.
    pub fn service_contract(&self) -> Option<&Contract> {
        match &self.kind {
            ParameterKind::Service(contract) => Some(contract),
            ParameterKind::Value(_) => None,
        }
    }
}

/// Definition of a constructible type.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentDefinition {
    /// Contract of the concrete type. Stored arguments are looked up by this contract.
    pub contract: Contract,

    /// Symbolic names under which the type can be constructed without a binding.
    pub names: Vec<String>,

    /// Constructor parameters, in declaration order.
    pub parameters: Vec<ParameterDefinition>,

    #[derivative(Debug = "ignore")]
    pub constructor: Constructor,
}

impl ComponentDefinition {
    /// Creates a definition for the given component type.
    pub fn of<T: Component>() -> Self {
        fn construct<T: Component>(
            arguments: &mut ResolvedArguments,
        ) -> Result<Instance, ContainerError> {
            T::create(arguments).map(Instance::of)
        }

        Self {
            contract: Contract::of::<T>(),
            names: T::names(),
            parameters: T::parameters(),
            constructor: construct::<T>,
        }
    }
}

/// Base trait for components constructed by the container.
///
/// Please see the module-level documentation for more information.
pub trait Component: Injectable + Sized {
    /// Symbolic names under which this component is constructible.
    fn names() -> Vec<String> {
        Vec::new()
    }

    /// Constructor parameters, in declaration order.
    fn parameters() -> Vec<ParameterDefinition>;

    /// Creates an instance from resolved parameter values, given in the same order as
    /// [Component::parameters].
    fn create(arguments: &mut ResolvedArguments) -> Result<Self, ContainerError>;
}

/// Resolved parameter values handed to a [Constructor], consumed in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ResolvedArguments {
    values: VecDeque<Instance>,
}

impl ResolvedArguments {
    pub fn new(values: Vec<Instance>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Takes the next value as a pointer to `T`.
    pub fn next<T: ?Sized + 'static>(&mut self) -> Result<InstancePtr<T>, ContainerError> {
        self.values
            .pop_front()
            .ok_or(ContainerError::IncompatibleInstance {
                expected: std::any::type_name::<T>(),
                actual: "()",
            })
            .and_then(|instance| instance.downcast())
    }

    /// Takes the next value and clones it out of its pointer.
    pub fn next_value<T: Clone + 'static>(&mut self) -> Result<T, ContainerError> {
        self.next::<T>().map(|value| T::clone(&value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
