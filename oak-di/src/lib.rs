//! Dependency injection container based on explicit contract bindings and constructor autowiring.
//!
//! A [Container](container::Container) maps [Contracts](contract::Contract) (types or symbolic
//! names) to [Implementations](binding::Implementation): constructible
//! [Components](component::Component), factory functions or fixed instances. Resolving a contract
//! constructs its implementation, recursively satisfying constructor parameters from explicit
//! [Arguments](argument::Arguments), container bindings or parameter defaults.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds
//! * `derive` - automatically derive [Component](component::Component) and register it statically

pub mod argument;
pub mod binding;
pub mod component;
pub mod component_registry;
pub mod container;
pub mod contract;
pub mod error;
pub mod instance;
pub mod resolver;

#[cfg(feature = "derive")]
pub use oak_di_derive::Component;
