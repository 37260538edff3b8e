//! Contracts are the keys under which implementations are bound in a
//! [Container](crate::container::Container). A contract is either a type (concrete or `dyn Trait`)
//! or a symbolic name.

use std::any::{type_name, TypeId};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Identifier used to look up a binding.
#[derive(Clone, Debug)]
pub enum Contract {
    /// A type contract. Only the [TypeId] takes part in comparisons - the name is kept for
    /// diagnostics.
    Type { id: TypeId, name: &'static str },
    /// A symbolic name.
    Named(String),
}

impl Contract {
    /// Creates a contract for the given type, which can also be an unsized `dyn Trait`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Creates a symbolic contract.
    #[inline]
    pub fn named<T: ToString>(name: T) -> Self {
        Self::Named(name.to_string())
    }

    /// Returns the type name or the symbolic name of this contract.
    pub fn name(&self) -> &str {
        match self {
            Self::Type { name, .. } => name,
            Self::Named(name) => name,
        }
    }

    /// Returns the [TypeId] for type contracts.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Self::Type { id, .. } => Some(*id),
            Self::Named(_) => None,
        }
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Type { id: left, .. }, Self::Type { id: right, .. }) => left == right,
            (Self::Named(left), Self::Named(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Contract {}

impl Hash for Contract {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Type { id, .. } => {
                state.write_u8(0);
                id.hash(state);
            }
            Self::Named(name) => {
                state.write_u8(1);
                name.hash(state);
            }
        }
    }
}

impl Display for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Contract {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for Contract {
    #[inline]
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl From<&Contract> for Contract {
    #[inline]
    fn from(value: &Contract) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::contract::Contract;
    use fxhash::FxHashSet;
    use std::any::TypeId;

    trait TestTrait {}

    #[test]
    fn should_compare_type_contracts_by_id() {
        assert_eq!(Contract::of::<u8>(), Contract::of::<u8>());
        assert_ne!(Contract::of::<u8>(), Contract::of::<i8>());
        assert_eq!(
            Contract::of::<dyn TestTrait>().type_id(),
            Some(TypeId::of::<dyn TestTrait>())
        );
    }

    #[test]
    fn should_separate_names_from_types() {
        let name = std::any::type_name::<u8>();
        assert_ne!(Contract::of::<u8>(), Contract::named(name));

        let contracts: FxHashSet<_> = [Contract::of::<u8>(), Contract::named(name)]
            .into_iter()
            .collect();
        assert_eq!(contracts.len(), 2);
    }

    #[test]
    fn should_display_name() {
        assert_eq!(Contract::from("logger").to_string(), "logger");
        assert_eq!(Contract::of::<u8>().to_string(), "u8");
    }
}
