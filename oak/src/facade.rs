//! Facades are thin typed wrappers around a single service, resolved once when the facade is
//! composed. There is no global application - the container is always passed explicitly.
//!
//! ```
//! use oak::facade::Facade;
//! use oak_di::binding::Implementation;
//! use oak_di::container::{Container, ServiceContainer};
//! use oak_di::contract::Contract;
//! use oak_di::instance::InstancePtr;
//!
//! struct Clock {
//!     now: u64,
//! }
//!
//! struct ClockFacade(InstancePtr<Clock>);
//!
//! impl Facade for ClockFacade {
//!     type Service = Clock;
//!
//!     fn from_service(service: InstancePtr<Clock>) -> Self {
//!         Self(service)
//!     }
//! }
//!
//! impl ClockFacade {
//!     fn now(&self) -> u64 {
//!         self.0.now
//!     }
//! }
//!
//! let mut container = ServiceContainer::default();
//! container.singleton(Contract::of::<Clock>(), Implementation::instance(Clock { now: 42 }));
//!
//! let clock = ClockFacade::resolve(&mut container).unwrap();
//! assert_eq!(clock.now(), 42);
//! ```

use oak_di::container::Container;
use oak_di::contract::Contract;
use oak_di::error::ContainerError;
use oak_di::instance::InstancePtr;

/// A typed wrapper around a service resolved from a [Container]. Forwarded operations are explicit
/// methods of the implementing type.
pub trait Facade: Sized {
    type Service: ?Sized + 'static;

    /// Contract used to resolve the service.
    fn contract() -> Contract {
        Contract::of::<Self::Service>()
    }

    fn from_service(service: InstancePtr<Self::Service>) -> Self;

    /// Resolves the service and wraps it.
    fn resolve(container: &mut dyn Container) -> Result<Self, ContainerError> {
        container
            .get(&Self::contract())
            .and_then(|instance| instance.downcast::<Self::Service>())
            .map(Self::from_service)
    }
}

#[cfg(test)]
mod tests {
    use crate::facade::Facade;
    use mockall::mock;
    use mockall::predicate::*;
    use oak_di::argument::{Argument, ArgumentKey, Arguments};
    use oak_di::binding::Implementation;
    use oak_di::container::Container;
    use oak_di::contract::Contract;
    use oak_di::error::ContainerError;
    use oak_di::instance::{Instance, InstancePtr};

    mock! {
        Container {}

        impl Container for Container {
            fn set(&mut self, contract: Contract, implementation: Implementation);
            fn has(&self, contract: &Contract) -> bool;
            fn singleton(&mut self, contract: Contract, implementation: Implementation);
            fn instance(&mut self, contract: Contract, instance: Instance);
            fn when_asks_give(
                &mut self,
                implementation: Contract,
                key: ArgumentKey,
                argument: Argument,
            );
            fn get(&mut self, contract: &Contract) -> Result<Instance, ContainerError>;
            fn get_with(
                &mut self,
                contract: &Contract,
                arguments: Arguments,
            ) -> Result<Instance, ContainerError>;
        }
    }

    struct Translator {
        locale: String,
    }

    struct Lang(InstancePtr<Translator>);

    impl Facade for Lang {
        type Service = Translator;

        fn contract() -> Contract {
            Contract::named("translator")
        }

        fn from_service(service: InstancePtr<Translator>) -> Self {
            Self(service)
        }
    }

    #[test]
    fn should_resolve_service_once() {
        let mut container = MockContainer::new();
        container
            .expect_get()
            .with(eq(Contract::named("translator")))
            .times(1)
            .returning(|_| {
                Ok(Instance::of(Translator {
                    locale: "en".to_string(),
                }))
            });

        let lang = Lang::resolve(&mut container).unwrap();
        assert_eq!(lang.0.locale, "en");
    }

    #[test]
    fn should_propagate_resolution_errors() {
        let mut container = MockContainer::new();
        container
            .expect_get()
            .times(1)
            .returning(|contract| Err(ContainerError::UnboundContract(contract.clone())));

        assert!(matches!(
            Lang::resolve(&mut container),
            Err(ContainerError::UnboundContract(_))
        ));
    }

    #[test]
    fn should_reject_incompatible_services() {
        let mut container = MockContainer::new();
        container
            .expect_get()
            .times(1)
            .returning(|_| Ok(Instance::of(5u8)));

        assert!(matches!(
            Lang::resolve(&mut container),
            Err(ContainerError::IncompatibleInstance { .. })
        ));
    }
}
