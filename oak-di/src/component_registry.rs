//! Functionality related to registering definitions of components. A
//! [ServiceContainer](crate::container::ServiceContainer) falls back to these definitions when a
//! requested contract has no explicit binding, which makes every registered [Component]
//! constructible by type or by one of its names.

use crate::component::{Component, ComponentDefinition};
use crate::component_registry::internal::ComponentDefinitionRegisterer;
use crate::contract::Contract;
use crate::error::ComponentDefinitionRegistryError;
use fxhash::FxHashMap;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use tracing::debug;

/// A registry of component definitions, which can be used to construct types without an explicit
/// binding.
#[cfg_attr(test, automock)]
pub trait ComponentDefinitionRegistry {
    /// Returns the definition for a type contract or a contract named after a component.
    fn definition(&self, contract: &Contract) -> Option<ComponentDefinition>;

    /// Checks if given contract refers to a registered component.
    fn is_registered(&self, contract: &Contract) -> bool;
}

/// Registry of component definitions which can be modified manually. Definitions are indexed by
/// type and by all names.
#[derive(Clone, Debug, Default)]
pub struct ComponentDefinitionMap {
    definitions: FxHashMap<TypeId, ComponentDefinition>,
    names: FxHashMap<String, TypeId>,
    allow_definition_overriding: bool,
}

impl ComponentDefinitionMap {
    pub fn new(allow_definition_overriding: bool) -> Self {
        Self {
            allow_definition_overriding,
            ..Default::default()
        }
    }

    /// Adds a new definition for a given type.
    #[inline]
    pub fn register_component<T: Component>(
        &mut self,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        self.try_register_definition(ComponentDefinition::of::<T>())
    }

    /// Adds a definition, replacing the previous definition of the same type. Name clashes with
    /// other types fail unless overriding is allowed.
    pub fn try_register_definition(
        &mut self,
        definition: ComponentDefinition,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        let Some(target) = definition.contract.type_id() else {
            return Ok(());
        };

        if !self.allow_definition_overriding {
            if let Some(name) = definition.names.iter().find(|name| {
                self.names
                    .get(*name)
                    .map(|registered| *registered != target)
                    .unwrap_or(false)
            }) {
                return Err(ComponentDefinitionRegistryError::DuplicateComponentName(
                    name.clone(),
                ));
            }
        }

        if let Some(previous) = self.definitions.remove(&target) {
            for name in &previous.names {
                if self.names.get(name) == Some(&target) {
                    self.names.remove(name);
                }
            }
        }

        debug!(contract = %definition.contract, "Registering component definition.");

        self.names.extend(
            definition
                .names
                .iter()
                .map(|name| (name.clone(), target)),
        );
        self.definitions.insert(target, definition);

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn target(&self, contract: &Contract) -> Option<TypeId> {
        match contract {
            Contract::Type { id, .. } => Some(*id),
            Contract::Named(name) => self.names.get(name).copied(),
        }
    }
}

impl ComponentDefinitionRegistry for ComponentDefinitionMap {
    fn definition(&self, contract: &Contract) -> Option<ComponentDefinition> {
        self.target(contract)
            .and_then(|target| self.definitions.get(&target))
            .cloned()
    }

    fn is_registered(&self, contract: &Contract) -> bool {
        self.target(contract)
            .map(|target| self.definitions.contains_key(&target))
            .unwrap_or(false)
    }
}

/// Registry of component definitions initialized from statically registered definitions, i.e.
/// all types deriving [Component].
#[derive(Clone, Debug)]
pub struct StaticComponentDefinitionRegistry {
    definition_map: ComponentDefinitionMap,
}

impl StaticComponentDefinitionRegistry {
    pub fn new(
        allow_definition_overriding: bool,
    ) -> Result<Self, ComponentDefinitionRegistryError> {
        let mut definition_map = ComponentDefinitionMap::new(allow_definition_overriding);

        for definition in inventory::iter::<ComponentDefinitionRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
            .sorted_by(|left, right| left.contract.name().cmp(right.contract.name()))
        {
            definition_map.try_register_definition(definition)?;
        }

        Ok(Self { definition_map })
    }

    /// Adds a new definition for a given type, in addition to the static ones.
    #[inline]
    pub fn register_component<T: Component>(
        &mut self,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        self.definition_map.register_component::<T>()
    }
}

impl ComponentDefinitionRegistry for StaticComponentDefinitionRegistry {
    #[inline]
    fn definition(&self, contract: &Contract) -> Option<ComponentDefinition> {
        self.definition_map.definition(contract)
    }

    #[inline]
    fn is_registered(&self, contract: &Contract) -> bool {
        self.definition_map.is_registered(contract)
    }
}

#[doc(hidden)]
pub mod internal {
    use crate::component::ComponentDefinition;
    use inventory::collect;
    pub use inventory::submit;

    pub struct ComponentDefinitionRegisterer {
        pub register: fn() -> ComponentDefinition,
    }

    collect!(ComponentDefinitionRegisterer);
}

#[cfg(test)]
mod tests {
    use crate::component::{Component, ParameterDefinition, ResolvedArguments};
    use crate::component_registry::{ComponentDefinitionMap, ComponentDefinitionRegistry};
    use crate::contract::Contract;
    use crate::error::{ComponentDefinitionRegistryError, ContainerError};

    struct TestComponent;

    impl Component for TestComponent {
        fn names() -> Vec<String> {
            vec!["name".to_string()]
        }

        fn parameters() -> Vec<ParameterDefinition> {
            vec![]
        }

        fn create(_arguments: &mut ResolvedArguments) -> Result<Self, ContainerError> {
            Ok(Self)
        }
    }

    struct OtherComponent;

    impl Component for OtherComponent {
        fn names() -> Vec<String> {
            vec!["name".to_string()]
        }

        fn parameters() -> Vec<ParameterDefinition> {
            vec![]
        }

        fn create(_arguments: &mut ResolvedArguments) -> Result<Self, ContainerError> {
            Ok(Self)
        }
    }

    #[test]
    fn should_register_definition() {
        let mut registry = ComponentDefinitionMap::default();
        registry.register_component::<TestComponent>().unwrap();

        assert!(registry.is_registered(&Contract::of::<TestComponent>()));
        assert!(registry.is_registered(&Contract::named("name")));
        assert_eq!(
            registry.definition(&Contract::named("name")).unwrap().contract,
            Contract::of::<TestComponent>()
        );
        assert!(!registry.is_registered(&Contract::named("other")));
        assert!(registry.definition(&Contract::of::<u8>()).is_none());
    }

    #[test]
    fn should_allow_re_registering_same_type() {
        let mut registry = ComponentDefinitionMap::default();
        registry.register_component::<TestComponent>().unwrap();
        registry.register_component::<TestComponent>().unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_not_register_duplicate_name() {
        let mut registry = ComponentDefinitionMap::default();
        registry.register_component::<TestComponent>().unwrap();

        assert_eq!(
            registry.register_component::<OtherComponent>().unwrap_err(),
            ComponentDefinitionRegistryError::DuplicateComponentName("name".to_string())
        );
    }

    #[test]
    fn should_override_duplicate_name() {
        let mut registry = ComponentDefinitionMap::new(true);
        registry.register_component::<TestComponent>().unwrap();
        registry.register_component::<OtherComponent>().unwrap();

        assert_eq!(
            registry.definition(&Contract::named("name")).unwrap().contract,
            Contract::of::<OtherComponent>()
        );
    }
}
