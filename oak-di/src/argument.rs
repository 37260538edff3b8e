//! Explicit constructor arguments, which take precedence over generic resolution. Arguments can be
//! supplied for a single request with [get_with](crate::container::Container::get_with) or
//! stored per implementation with
//! [when_asks_give](crate::container::Container::when_asks_give).

use crate::contract::Contract;
use crate::instance::{Injectable, Instance};
use fxhash::FxHashMap;

/// Identifies the parameter an [Argument] is meant for.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArgumentKey {
    /// Matches service parameters with the given declared type.
    Type(Contract),
    /// Matches parameters with the given name.
    Name(String),
}

impl ArgumentKey {
    /// Creates a key matching parameters of type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(Contract::of::<T>())
    }
}

impl From<&str> for ArgumentKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for ArgumentKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

/// Value given for a parameter.
#[derive(Clone, Debug)]
pub enum Argument {
    /// Injected as is.
    Value(Instance),
    /// Resolved from the container when needed.
    Contract(Contract),
}

impl Argument {
    /// Creates a literal argument.
    #[inline]
    pub fn value<T: Injectable>(value: T) -> Self {
        Self::Value(Instance::of(value))
    }

    /// Creates an argument resolved indirectly through the given contract.
    #[inline]
    pub fn contract<T: Into<Contract>>(contract: T) -> Self {
        Self::Contract(contract.into())
    }
}

impl From<Instance> for Argument {
    #[inline]
    fn from(value: Instance) -> Self {
        Self::Value(value)
    }
}

impl From<Contract> for Argument {
    #[inline]
    fn from(value: Contract) -> Self {
        Self::Contract(value)
    }
}

/// A set of arguments keyed by parameter type or name.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    arguments: FxHashMap<ArgumentKey, Argument>,
}

impl Arguments {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, replacing any previous one for the same key.
    pub fn with<K: Into<ArgumentKey>, A: Into<Argument>>(mut self, key: K, argument: A) -> Self {
        self.insert(key, argument);
        self
    }

    /// Adds an argument for parameters named `name`.
    #[inline]
    pub fn with_name<A: Into<Argument>>(self, name: &str, argument: A) -> Self {
        self.with(ArgumentKey::from(name), argument)
    }

    /// Adds an argument for service parameters of type `T`.
    #[inline]
    pub fn with_type<T: ?Sized + 'static, A: Into<Argument>>(self, argument: A) -> Self {
        self.with(ArgumentKey::of::<T>(), argument)
    }

    pub fn insert<K: Into<ArgumentKey>, A: Into<Argument>>(&mut self, key: K, argument: A) {
        self.arguments.insert(key.into(), argument.into());
    }

    #[inline]
    pub fn get(&self, key: &ArgumentKey) -> Option<&Argument> {
        self.arguments.get(key)
    }

    /// Looks up an argument for a service parameter of the given type.
    pub fn by_type(&self, contract: &Contract) -> Option<&Argument> {
        self.get(&ArgumentKey::Type(contract.clone()))
    }

    /// Looks up an argument for a parameter with the given name.
    pub fn by_name(&self, name: &str) -> Option<&Argument> {
        self.get(&ArgumentKey::Name(name.to_string()))
    }

    /// Combines both argument sets. Arguments from `other` win for keys present in both.
    pub fn merge(mut self, other: Arguments) -> Self {
        self.arguments.extend(other.arguments);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }
}

impl<K: Into<ArgumentKey>, A: Into<Argument>> FromIterator<(K, A)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        Self {
            arguments: iter
                .into_iter()
                .map(|(key, argument)| (key.into(), argument.into()))
                .collect(),
        }
    }
}
