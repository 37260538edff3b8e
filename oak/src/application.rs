//! Core application framework functionality.
//!
//! [Application] is a [Container] which additionally manages the lifecycle of
//! [ServiceProviders](ServiceProvider): eager providers are booted in registration order by
//! [Application::bootstrap], lazy ones when any contract they provide is first requested.

use crate::config::ApplicationConfig;
use crate::provider::{ProviderRegistration, ServiceProvider, ServiceProviderPtr};
use config::ConfigError;
use fxhash::FxHashMap;
use oak_di::argument::{Argument, ArgumentKey, Arguments};
use oak_di::binding::{BindingRegistry, Implementation};
use oak_di::container::{BindingContext, Container, ServiceContainer, ServiceContainerBuilder};
use oak_di::contract::Contract;
use oak_di::error::{ComponentDefinitionRegistryError, ContainerError, ErrorPtr};
use oak_di::instance::Instance;
use oak_di::resolver;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Error loading configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Error registering components: {0}")]
    ComponentRegistry(#[from] ComponentDefinitionRegistryError),
}

/// Creates an [Application] configured from the environment, using all statically registered
/// components. Installs a default tracing logger, unless disabled in the config.
pub fn create_default() -> Result<Application, ApplicationError> {
    let config = ApplicationConfig::init_from_environment()?;
    if config.install_tracing_logger {
        install_tracing_logger();
    }

    Ok(Application::from_config(config)?)
}

fn install_tracing_logger() {
    // another subscriber might already be installed - keep it in that case
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn lifecycle_error(provider: &ServiceProviderPtr, error: ErrorPtr) -> ContainerError {
    ContainerError::ProviderLifecycle {
        provider: provider.name().to_string(),
        error,
    }
}

/// Main entrypoint for the application. Registers and boots service providers, and resolves
/// services with lazy providers booted on demand.
pub struct Application {
    container: ServiceContainer,
    config: ApplicationConfig,
    is_booted: bool,
    registered_providers: Vec<ServiceProviderPtr>,
    lazy_providers: FxHashMap<Contract, ServiceProviderPtr>,
}

impl Application {
    /// Application version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub fn new(container: ServiceContainer, config: ApplicationConfig) -> Self {
        Self {
            container,
            config,
            is_booted: false,
            registered_providers: Vec::new(),
            lazy_providers: Default::default(),
        }
    }

    /// Creates an application using all statically registered components.
    pub fn from_config(
        config: ApplicationConfig,
    ) -> Result<Self, ComponentDefinitionRegistryError> {
        Ok(Self::new(ServiceContainerBuilder::new()?.build(), config))
    }

    /// Registers a provider, a provider type or a list of them, in order. A failure aborts
    /// processing of the remaining providers.
    ///
    /// Unbound provider types are bound as singletons, so resolving the type later returns the
    /// registered provider.
    pub fn register<R: Into<ProviderRegistration>>(
        &mut self,
        registration: R,
    ) -> Result<(), ContainerError> {
        match registration.into() {
            ProviderRegistration::Instance(provider) => self.register_provider(provider),
            ProviderRegistration::Type {
                contract,
                implementation,
                cast,
            } => {
                if !self.has(&contract) {
                    self.singleton(contract.clone(), implementation);
                }

                let provider = self.get(&contract).and_then(cast)?;
                self.register_provider(provider)
            }
            ProviderRegistration::List(registrations) => registrations
                .into_iter()
                .try_for_each(|registration| self.register(registration)),
        }
    }

    /// Boots all eager providers in registration order. Subsequent calls do nothing.
    pub fn bootstrap(&mut self) -> Result<(), ContainerError> {
        if self.is_booted {
            return Ok(());
        }

        info!("Booting service providers...");

        // providers registered while booting are booted as well
        let mut index = 0;
        while let Some(provider) = self.registered_providers.get(index).cloned() {
            self.boot_provider(&provider)?;
            index += 1;
        }

        self.is_booted = true;

        info!("Application booted.");
        Ok(())
    }

    #[inline]
    pub fn is_booted(&self) -> bool {
        self.is_booted
    }

    #[inline]
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    #[inline]
    pub fn env_path(&self) -> &Path {
        &self.config.paths.env_path
    }

    #[inline]
    pub fn config_path(&self) -> &Path {
        &self.config.paths.config_path
    }

    #[inline]
    pub fn cache_path(&self) -> &Path {
        &self.config.paths.cache_path
    }

    fn register_provider(&mut self, provider: ServiceProviderPtr) -> Result<(), ContainerError> {
        if provider.is_lazy() {
            debug!(provider = provider.name(), "Registering lazy service provider.");

            for contract in provider.provides() {
                self.lazy_providers.insert(contract, provider.clone());
            }

            return provider
                .register(self)
                .map_err(|error| lifecycle_error(&provider, error));
        }

        debug!(provider = provider.name(), "Registering service provider.");

        self.registered_providers.push(provider.clone());
        provider
            .register(self)
            .map_err(|error| lifecycle_error(&provider, error))?;

        if self.is_booted {
            self.boot_provider(&provider)?;
        }

        Ok(())
    }

    fn boot_provider(&mut self, provider: &ServiceProviderPtr) -> Result<(), ContainerError> {
        if provider.is_booted() {
            return Ok(());
        }

        // set before booting, so resolving own contracts while booting doesn't boot again
        provider.set_booted();

        debug!(provider = provider.name(), "Booting service provider.");

        provider
            .boot(self)
            .map_err(|error| lifecycle_error(provider, error))
    }

    fn boot_lazy_provider(&mut self, contract: &Contract) -> Result<(), ContainerError> {
        match self.lazy_providers.remove(contract) {
            Some(provider) => self.boot_provider(&provider),
            None => Ok(()),
        }
    }
}

impl Container for Application {
    #[inline]
    fn set(&mut self, contract: Contract, implementation: Implementation) {
        self.container.set(contract, implementation);
    }

    #[inline]
    fn has(&self, contract: &Contract) -> bool {
        self.container.has(contract)
    }

    #[inline]
    fn singleton(&mut self, contract: Contract, implementation: Implementation) {
        self.container.singleton(contract, implementation);
    }

    #[inline]
    fn instance(&mut self, contract: Contract, instance: Instance) {
        self.container.instance(contract, instance);
    }

    #[inline]
    fn when_asks_give(&mut self, implementation: Contract, key: ArgumentKey, argument: Argument) {
        self.container.when_asks_give(implementation, key, argument);
    }

    fn get(&mut self, contract: &Contract) -> Result<Instance, ContainerError> {
        self.boot_lazy_provider(contract)?;
        resolver::get(self, contract)
    }

    fn get_with(
        &mut self,
        contract: &Contract,
        arguments: Arguments,
    ) -> Result<Instance, ContainerError> {
        self.boot_lazy_provider(contract)?;
        resolver::get_with(self, contract, arguments)
    }
}

impl BindingContext for Application {
    #[inline]
    fn bindings(&self) -> &BindingRegistry {
        self.container.bindings()
    }

    #[inline]
    fn bindings_mut(&mut self) -> &mut BindingRegistry {
        self.container.bindings_mut()
    }
}
