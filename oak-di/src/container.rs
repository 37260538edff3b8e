//! Containers bind [Contracts](Contract) to [Implementations](Implementation) and resolve them
//! into [Instances](Instance).
//!
//! ```
//! use oak_di::container::{Container, ServiceContainer};
//! use oak_di::binding::Implementation;
//! use oak_di::contract::Contract;
//! use oak_di::instance::Instance;
//!
//! let mut container = ServiceContainer::default();
//! container.singleton(
//!     Contract::named("greeting"),
//!     Implementation::factory(|_| Ok(Instance::of("Hello world!".to_string()))),
//! );
//!
//! let greeting = container.get(&Contract::named("greeting")).unwrap();
//! assert_eq!(*greeting.downcast::<String>().unwrap(), "Hello world!");
//! ```

use crate::argument::{Argument, ArgumentKey, Arguments};
use crate::binding::{BindingRegistry, ComponentDefinitionRegistryPtr, Implementation};
use crate::component_registry::StaticComponentDefinitionRegistry;
use crate::contract::Contract;
use crate::error::{ComponentDefinitionRegistryError, ContainerError};
use crate::instance::{Instance, InstancePtr};
use crate::resolver;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

/// Generic container contract, exposed to everything which needs to bind or resolve services.
#[cfg_attr(test, automock)]
pub trait Container {
    /// Installs or replaces a binding. The implementation is not validated - errors surface when
    /// resolving.
    fn set(&mut self, contract: Contract, implementation: Implementation);

    /// Checks if a binding exists. This does not imply the contract is resolvable.
    fn has(&self, contract: &Contract) -> bool;

    /// Binds the contract and marks it for caching, so the first resolved instance is shared.
    fn singleton(&mut self, contract: Contract, implementation: Implementation);

    /// Binds the contract to the type of the given object and caches the object, so it's returned
    /// from every subsequent [Container::get]. [Container::get_with] constructs a new object when
    /// the type is a registered component, and returns the given one otherwise.
    fn instance(&mut self, contract: Contract, instance: Instance);

    /// Stores an argument used whenever `implementation` is constructed. Arguments passed to
    /// [Container::get_with] take precedence.
    fn when_asks_give(&mut self, implementation: Contract, key: ArgumentKey, argument: Argument);

    /// Resolves the contract, reusing cached instances.
    fn get(&mut self, contract: &Contract) -> Result<Instance, ContainerError>;

    /// Resolves the contract using given arguments. The result is never cached.
    fn get_with(
        &mut self,
        contract: &Contract,
        arguments: Arguments,
    ) -> Result<Instance, ContainerError>;
}

/// Helper trait for [Container] providing strongly-typed access.
pub trait TypedContainer {
    /// Typesafe version of [Container::get] for type contracts.
    fn get_typed<T: ?Sized + 'static>(&mut self) -> Result<InstancePtr<T>, ContainerError>;

    /// Typesafe version of [Container::get_with] for type contracts.
    fn get_with_typed<T: ?Sized + 'static>(
        &mut self,
        arguments: Arguments,
    ) -> Result<InstancePtr<T>, ContainerError>;
}

impl<C: Container + ?Sized> TypedContainer for C {
    fn get_typed<T: ?Sized + 'static>(&mut self) -> Result<InstancePtr<T>, ContainerError> {
        self.get(&Contract::of::<T>())
            .and_then(|instance| instance.downcast())
    }

    fn get_with_typed<T: ?Sized + 'static>(
        &mut self,
        arguments: Arguments,
    ) -> Result<InstancePtr<T>, ContainerError> {
        self.get_with(&Contract::of::<T>(), arguments)
            .and_then(|instance| instance.downcast())
    }
}

/// A [Container] with direct access to its [BindingRegistry]. Containers layered on top of a
/// [ServiceContainer] implement this to reuse the [resolver], which routes every nested resolution
/// through their own [Container::get].
pub trait BindingContext: Container {
    fn bindings(&self) -> &BindingRegistry;

    fn bindings_mut(&mut self) -> &mut BindingRegistry;
}

/// Builder for [ServiceContainer] with sensible defaults, for easy construction.
pub struct ServiceContainerBuilder {
    definition_registry: ComponentDefinitionRegistryPtr,
}

impl ServiceContainerBuilder {
    /// Creates a new builder using statically registered components.
    pub fn new() -> Result<Self, ComponentDefinitionRegistryError> {
        Ok(Self {
            definition_registry: Box::new(StaticComponentDefinitionRegistry::new(true)?),
        })
    }

    /// Sets new registry used for unbound contracts.
    pub fn with_definition_registry(
        mut self,
        definition_registry: ComponentDefinitionRegistryPtr,
    ) -> Self {
        self.definition_registry = definition_registry;
        self
    }

    /// Builds resulting [ServiceContainer].
    pub fn build(self) -> ServiceContainer {
        ServiceContainer::new(self.definition_registry)
    }
}

/// Default [Container] implementation. The [Default] instance knows no components, so only bound
/// contracts are resolvable - use [ServiceContainerBuilder] to include statically registered
/// components.
#[derive(Debug, Default)]
pub struct ServiceContainer {
    bindings: BindingRegistry,
}

impl ServiceContainer {
    pub fn new(definition_registry: ComponentDefinitionRegistryPtr) -> Self {
        Self {
            bindings: BindingRegistry::new(definition_registry),
        }
    }
}

impl Container for ServiceContainer {
    fn set(&mut self, contract: Contract, implementation: Implementation) {
        debug!(%contract, "Binding contract.");
        self.bindings.bind(contract, implementation);
    }

    #[inline]
    fn has(&self, contract: &Contract) -> bool {
        self.bindings.is_bound(contract)
    }

    fn singleton(&mut self, contract: Contract, implementation: Implementation) {
        self.set(contract.clone(), implementation);
        self.bindings.mark_singleton(contract);
    }

    fn instance(&mut self, contract: Contract, instance: Instance) {
        let implementation = self
            .bindings
            .definition(&instance.contract())
            .map(Implementation::Type)
            .unwrap_or_else(|| Implementation::Instance(instance.clone()));

        self.set(contract.clone(), implementation);
        self.bindings.store_instance(contract, instance);
    }

    fn when_asks_give(&mut self, implementation: Contract, key: ArgumentKey, argument: Argument) {
        debug!(%implementation, ?key, "Storing contextual argument.");
        self.bindings.store_argument(implementation, key, argument);
    }

    #[inline]
    fn get(&mut self, contract: &Contract) -> Result<Instance, ContainerError> {
        resolver::get(self, contract)
    }

    #[inline]
    fn get_with(
        &mut self,
        contract: &Contract,
        arguments: Arguments,
    ) -> Result<Instance, ContainerError> {
        resolver::get_with(self, contract, arguments)
    }
}

impl BindingContext for ServiceContainer {
    #[inline]
    fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    #[inline]
    fn bindings_mut(&mut self) -> &mut BindingRegistry {
        &mut self.bindings
    }
}

#[cfg(test)]
mod tests {
    use crate::argument::Arguments;
    use crate::binding::Implementation;
    use crate::container::{Container, MockContainer, ServiceContainer, TypedContainer};
    use crate::contract::Contract;
    use crate::error::ContainerError;
    use crate::instance::{Instance, InstancePtr};
    use mockall::predicate::*;

    #[test]
    fn should_report_bindings() {
        let mut container = ServiceContainer::default();
        assert!(!container.has(&Contract::named("a")));

        container.set(Contract::named("a"), Implementation::instance(1u8));
        container.singleton(Contract::named("b"), Implementation::instance(2u8));
        container.instance(Contract::named("c"), Instance::of(3u8));

        assert!(container.has(&Contract::named("a")));
        assert!(container.has(&Contract::named("b")));
        assert!(container.has(&Contract::named("c")));
    }

    #[test]
    fn should_replace_binding() {
        let mut container = ServiceContainer::default();
        container.set(Contract::named("a"), Implementation::instance(1u8));
        container.set(Contract::named("a"), Implementation::instance(2u8));

        assert_eq!(
            *container
                .get(&Contract::named("a"))
                .unwrap()
                .downcast::<u8>()
                .unwrap(),
            2
        );
    }

    #[test]
    fn should_return_bound_instance() {
        let instance = Instance::of(3u8);

        let mut container = ServiceContainer::default();
        container.instance(Contract::of::<u8>(), instance.clone());

        assert!(container.get(&Contract::of::<u8>()).unwrap().ptr_eq(&instance));
        assert!(container.get(&Contract::of::<u8>()).unwrap().ptr_eq(&instance));
    }

    #[test]
    fn should_keep_instance_bound_as_singleton() {
        let instance = Instance::of(3u8);

        let mut container = ServiceContainer::default();
        container.singleton(Contract::named("a"), Implementation::instance(1u8));
        container.get(&Contract::named("a")).unwrap();
        container.instance(Contract::named("a"), instance.clone());

        assert!(container.get(&Contract::named("a")).unwrap().ptr_eq(&instance));
        assert!(container.get(&Contract::named("a")).unwrap().ptr_eq(&instance));
    }

    #[test]
    fn should_downcast_typed_instances() {
        let mut container = MockContainer::new();
        container
            .expect_get()
            .with(eq(Contract::of::<u8>()))
            .times(1)
            .returning(|_| Ok(Instance::of(5u8)));
        container
            .expect_get_with()
            .with(eq(Contract::of::<i8>()), always())
            .times(1)
            .returning(|_, _| Ok(Instance::of(5u8)));

        assert_eq!(*container.get_typed::<u8>().unwrap(), 5);
        assert!(matches!(
            container.get_with_typed::<i8>(Arguments::new()),
            Err(ContainerError::IncompatibleInstance { .. })
        ));
    }

    #[test]
    fn should_work_through_trait_objects() {
        let mut container = ServiceContainer::default();
        let container: &mut dyn Container = &mut container;

        container.singleton(
            Contract::of::<u8>(),
            Implementation::factory(|_| Ok(Instance::of(7u8))),
        );

        let first: InstancePtr<u8> = container.get_typed().unwrap();
        let second: InstancePtr<u8> = container.get_typed().unwrap();
        assert!(InstancePtr::ptr_eq(&first, &second));
    }
}
