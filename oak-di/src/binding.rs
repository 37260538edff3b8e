//! The binding registry holds everything a container knows about its contracts: bindings,
//! singleton markers, cached instances and stored arguments. It performs no resolution by itself -
//! that's the job of the [resolver](crate::resolver).

use crate::argument::{Argument, ArgumentKey, Arguments};
use crate::component::{Component, ComponentDefinition};
use crate::component_registry::{ComponentDefinitionMap, ComponentDefinitionRegistry};
use crate::container::Container;
use crate::contract::Contract;
use crate::error::ContainerError;
use crate::instance::{Injectable, Instance, InstancePtr};
use derivative::Derivative;
use fxhash::{FxHashMap, FxHashSet};

#[cfg(not(feature = "threadsafe"))]
pub type FactoryPtr =
    InstancePtr<dyn Fn(&mut dyn Container) -> Result<Instance, ContainerError> + 'static>;
#[cfg(feature = "threadsafe")]
pub type FactoryPtr = InstancePtr<
    dyn Fn(&mut dyn Container) -> Result<Instance, ContainerError> + Send + Sync + 'static,
>;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentDefinitionRegistryPtr = Box<dyn ComponentDefinitionRegistry>;
#[cfg(feature = "threadsafe")]
pub type ComponentDefinitionRegistryPtr = Box<dyn ComponentDefinitionRegistry + Send + Sync>;

/// What a contract is bound to.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum Implementation {
    /// A constructible type, built by satisfying its constructor parameters.
    Type(ComponentDefinition),
    /// A function invoked with the container, whose result is returned as is.
    Factory(#[derivative(Debug = "ignore")] FactoryPtr),
    /// A fixed object.
    Instance(Instance),
}

impl Implementation {
    /// Binds to the component type `T`.
    #[inline]
    pub fn component<T: Component>() -> Self {
        Self::Type(ComponentDefinition::of::<T>())
    }

    /// Binds to a factory function.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&mut dyn Container) -> Result<Instance, ContainerError> + Injectable,
    {
        Self::Factory(InstancePtr::new(factory) as FactoryPtr)
    }

    /// Binds to a fixed value.
    #[inline]
    pub fn instance<T: Injectable>(value: T) -> Self {
        Self::Instance(Instance::of(value))
    }
}

impl From<ComponentDefinition> for Implementation {
    #[inline]
    fn from(value: ComponentDefinition) -> Self {
        Self::Type(value)
    }
}

impl From<Instance> for Implementation {
    #[inline]
    fn from(value: Instance) -> Self {
        Self::Instance(value)
    }
}

/// Storage for bindings and everything related to them.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct BindingRegistry {
    #[derivative(Debug = "ignore")]
    definition_registry: ComponentDefinitionRegistryPtr,
    bindings: FxHashMap<Contract, Implementation>,
    singletons: FxHashSet<Contract>,
    instances: FxHashMap<Contract, Instance>,
    arguments: FxHashMap<Contract, Arguments>,
    contracts_under_construction: FxHashSet<Contract>,
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new(Box::<ComponentDefinitionMap>::default())
    }
}

impl BindingRegistry {
    /// Creates an empty registry, which falls back to the given component definitions for unbound
    /// contracts.
    pub fn new(definition_registry: ComponentDefinitionRegistryPtr) -> Self {
        Self {
            definition_registry,
            bindings: Default::default(),
            singletons: Default::default(),
            instances: Default::default(),
            arguments: Default::default(),
            contracts_under_construction: Default::default(),
        }
    }

    /// Installs or replaces a binding.
    #[inline]
    pub fn bind(&mut self, contract: Contract, implementation: Implementation) {
        self.bindings.insert(contract, implementation);
    }

    /// Checks if an explicit binding exists. Component definitions are not taken into account.
    #[inline]
    pub fn is_bound(&self, contract: &Contract) -> bool {
        self.bindings.contains_key(contract)
    }

    /// Returns the bound implementation or, for unbound contracts, the matching component
    /// definition.
    pub fn implementation(&self, contract: &Contract) -> Option<Implementation> {
        self.bindings.get(contract).cloned().or_else(|| {
            self.definition_registry
                .definition(contract)
                .map(Implementation::Type)
        })
    }

    /// Returns the registered component definition matching the contract, ignoring bindings.
    #[inline]
    pub fn definition(&self, contract: &Contract) -> Option<ComponentDefinition> {
        self.definition_registry.definition(contract)
    }

    #[inline]
    pub fn mark_singleton(&mut self, contract: Contract) {
        self.singletons.insert(contract);
    }

    #[inline]
    pub fn is_singleton(&self, contract: &Contract) -> bool {
        self.singletons.contains(contract)
    }

    /// Returns the cached instance for a contract.
    #[inline]
    pub fn cached_instance(&self, contract: &Contract) -> Option<Instance> {
        self.instances.get(contract).cloned()
    }

    #[inline]
    pub fn store_instance(&mut self, contract: Contract, instance: Instance) {
        self.instances.insert(contract, instance);
    }

    /// Stores an argument used whenever the given implementation is constructed.
    pub fn store_argument(
        &mut self,
        implementation: Contract,
        key: ArgumentKey,
        argument: Argument,
    ) {
        self.arguments
            .entry(implementation)
            .or_default()
            .insert(key, argument);
    }

    /// Returns arguments stored for the given implementation.
    pub fn stored_arguments(&self, implementation: &Contract) -> Arguments {
        self.arguments
            .get(implementation)
            .cloned()
            .unwrap_or_default()
    }

    /// Marks the contract as being under construction. Returns `false` if it already was, which
    /// means a dependency cycle.
    #[inline]
    pub fn begin_construction(&mut self, contract: &Contract) -> bool {
        self.contracts_under_construction.insert(contract.clone())
    }

    #[inline]
    pub fn end_construction(&mut self, contract: &Contract) {
        self.contracts_under_construction.remove(contract);
    }
}
