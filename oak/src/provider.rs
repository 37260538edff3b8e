//! Service providers group related bindings and the side effects needed to make them usable.
//!
//! Every provider goes through two phases: `register`, which only installs bindings, and `boot`,
//! which runs once all eager providers are registered. Lazy providers defer booting until one of
//! the contracts they [provide](ServiceProvider::provides) is first requested from the
//! [Application](crate::application::Application).
//!
//! ```
//! use oak::provider::{BootFlag, ServiceProvider};
//! use oak_di::binding::Implementation;
//! use oak_di::container::Container;
//! use oak_di::contract::Contract;
//! use oak_di::error::ErrorPtr;
//!
//! #[derive(Default)]
//! struct CacheProvider {
//!     boot_flag: BootFlag,
//! }
//!
//! impl ServiceProvider for CacheProvider {
//!     fn register(&self, container: &mut dyn Container) -> Result<(), ErrorPtr> {
//!         container.singleton(Contract::named("cache"), Implementation::instance(16usize));
//!         Ok(())
//!     }
//!
//!     fn is_lazy(&self) -> bool {
//!         true
//!     }
//!
//!     fn provides(&self) -> Vec<Contract> {
//!         vec![Contract::named("cache")]
//!     }
//!
//!     fn boot_flag(&self) -> &BootFlag {
//!         &self.boot_flag
//!     }
//! }
//! ```

use oak_di::binding::Implementation;
use oak_di::component::Component;
use oak_di::container::Container;
use oak_di::contract::Contract;
use oak_di::error::{ContainerError, ErrorPtr};
use oak_di::instance::{Injectable, Instance, InstancePtr};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(feature = "threadsafe"))]
pub type ServiceProviderPtr = InstancePtr<dyn ServiceProvider>;
#[cfg(feature = "threadsafe")]
pub type ServiceProviderPtr = InstancePtr<dyn ServiceProvider + Send + Sync>;

/// Converts an instance resolved from the container into a provider.
pub type CastFunction = fn(instance: Instance) -> Result<ServiceProviderPtr, ContainerError>;

/// Boot guard embedded in providers. Once set, it stays set.
#[derive(Debug, Default)]
pub struct BootFlag(AtomicBool);

impl Clone for BootFlag {
    fn clone(&self) -> Self {
        Self(AtomicBool::new(self.is_set()))
    }
}

impl BootFlag {
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A pluggable unit which installs bindings into a [Container] and optionally performs one-time
/// initialization.
pub trait ServiceProvider {
    /// Installs bindings. Runs exactly once per registered provider.
    fn register(&self, container: &mut dyn Container) -> Result<(), ErrorPtr>;

    /// Performs initialization which needs registered bindings. Runs at most once, guarded by
    /// [ServiceProvider::boot_flag].
    fn boot(&self, _container: &mut dyn Container) -> Result<(), ErrorPtr> {
        Ok(())
    }

    /// Lazy providers boot on first request of any of the [provided](ServiceProvider::provides)
    /// contracts, instead of during bootstrap.
    fn is_lazy(&self) -> bool {
        false
    }

    /// Contracts which trigger booting a lazy provider. A lazy provider which provides nothing is
    /// never booted.
    fn provides(&self) -> Vec<Contract> {
        Vec::new()
    }

    fn boot_flag(&self) -> &BootFlag;

    fn is_booted(&self) -> bool {
        self.boot_flag().is_set()
    }

    fn set_booted(&self) {
        self.boot_flag().set()
    }

    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Anything which can be registered in an [Application](crate::application::Application).
pub enum ProviderRegistration {
    /// An already constructed provider.
    Instance(ServiceProviderPtr),
    /// A provider type, resolved from the container on registration.
    Type {
        contract: Contract,
        implementation: Implementation,
        cast: CastFunction,
    },
    /// Registrations processed in order.
    List(Vec<ProviderRegistration>),
}

impl ProviderRegistration {
    /// Creates a registration of a provider type, which gets constructed by the container.
    pub fn of<P: Component + ServiceProvider>() -> Self {
        fn cast<P: ServiceProvider + Injectable>(
            instance: Instance,
        ) -> Result<ServiceProviderPtr, ContainerError> {
            instance
                .downcast::<P>()
                .map(|provider| provider as ServiceProviderPtr)
        }

        Self::Type {
            contract: Contract::of::<P>(),
            implementation: Implementation::component::<P>(),
            cast: cast::<P>,
        }
    }

    /// Wraps a provider instance.
    #[cfg(feature = "threadsafe")]
    pub fn instance<P: ServiceProvider + Send + Sync + 'static>(provider: P) -> Self {
        Self::Instance(InstancePtr::new(provider))
    }

    /// Wraps a provider instance.
    #[cfg(not(feature = "threadsafe"))]
    pub fn instance<P: ServiceProvider + 'static>(provider: P) -> Self {
        Self::Instance(InstancePtr::new(provider))
    }
}

impl Debug for ProviderRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(provider) => f.debug_tuple("Instance").field(&provider.name()).finish(),
            Self::Type { contract, .. } => {
                f.debug_struct("Type").field("contract", contract).finish()
            }
            Self::List(registrations) => f.debug_tuple("List").field(registrations).finish(),
        }
    }
}

impl From<ServiceProviderPtr> for ProviderRegistration {
    #[inline]
    fn from(value: ServiceProviderPtr) -> Self {
        Self::Instance(value)
    }
}

impl From<Vec<ProviderRegistration>> for ProviderRegistration {
    #[inline]
    fn from(value: Vec<ProviderRegistration>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<ServiceProviderPtr>> for ProviderRegistration {
    fn from(value: Vec<ServiceProviderPtr>) -> Self {
        Self::List(value.into_iter().map(Self::Instance).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::provider::{BootFlag, ProviderRegistration, ServiceProvider, ServiceProviderPtr};
    use oak_di::container::Container;
    use oak_di::contract::Contract;
    use oak_di::error::ErrorPtr;
    use oak_di::instance::InstancePtr;

    #[derive(Default)]
    struct TestProvider {
        boot_flag: BootFlag,
    }

    impl ServiceProvider for TestProvider {
        fn register(&self, _container: &mut dyn Container) -> Result<(), ErrorPtr> {
            Ok(())
        }

        fn boot_flag(&self) -> &BootFlag {
            &self.boot_flag
        }
    }

    #[test]
    fn should_keep_boot_flag_set() {
        let provider = TestProvider::default();
        assert!(!provider.is_booted());

        provider.set_booted();
        provider.set_booted();
        assert!(provider.is_booted());
    }

    #[test]
    fn should_use_eager_defaults() {
        let provider = TestProvider::default();

        assert!(!provider.is_lazy());
        assert!(provider.provides().is_empty());
        assert!(provider.name().ends_with("TestProvider"));
    }

    #[test]
    fn should_flatten_provider_lists() {
        let providers: Vec<ServiceProviderPtr> = vec![
            InstancePtr::new(TestProvider::default()),
            InstancePtr::new(TestProvider::default()),
        ];

        assert!(matches!(
            ProviderRegistration::from(providers),
            ProviderRegistration::List(registrations) if registrations.len() == 2
        ));
    }

    #[test]
    fn should_describe_type_registration() {
        assert!(matches!(
            ProviderRegistration::of::<ComponentProvider>(),
            ProviderRegistration::Type { contract, .. }
                if contract == Contract::of::<ComponentProvider>()
        ));
    }

    #[derive(oak_di::Component)]
    struct ComponentProvider {
        #[component(default)]
        boot_flag: BootFlag,
    }

    impl ServiceProvider for ComponentProvider {
        fn register(&self, _container: &mut dyn Container) -> Result<(), ErrorPtr> {
            Ok(())
        }

        fn boot_flag(&self) -> &BootFlag {
            &self.boot_flag
        }
    }
}
