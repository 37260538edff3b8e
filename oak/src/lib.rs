//! Application bootstrapping based on [oak_di] dependency injection.
//!
//! Applications register [ServiceProviders](provider::ServiceProvider), which install bindings
//! into the container and perform one-time initialization. The
//! [Application](application::Application) drives their lifecycle: registration, eager booting in
//! registration order, and booting lazy providers only when a service they provide is needed. It
//! also configures supporting infrastructure, e.g. logging and application paths.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds

pub mod application;
pub mod config;
pub mod facade;
pub mod provider;
