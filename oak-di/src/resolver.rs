//! Core functionality for turning contracts into instances.
//!
//! Type implementations are constructed by satisfying each constructor parameter, in declaration
//! order, with the first match of:
//!
//! 1. a supplied argument keyed by the parameter type (service parameters only),
//! 2. a supplied argument keyed by the parameter name,
//! 3. the container binding for the parameter type (service parameters only),
//! 4. the parameter default,
//! 5. resolving the parameter type anyway (service parameters only).
//!
//! Supplied arguments are the ones stored for the implementation with
//! [when_asks_give](crate::container::Container::when_asks_give), overridden by the ones passed to
//! [get_with](crate::container::Container::get_with). Every nested resolution goes through
//! [Container::get] of the container driving the resolution.

use crate::argument::{Argument, Arguments};
use crate::binding::Implementation;
use crate::component::{ComponentDefinition, ParameterDefinition, ParameterKind, ResolvedArguments};
use crate::container::{BindingContext, Container};
use crate::contract::Contract;
use crate::error::{convert_error, ContainerError};
use crate::instance::Instance;
use itertools::Itertools;
use tracing::trace;

/// Resolves the contract, returning the cached instance if present and caching the result for
/// singletons.
pub fn get<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
) -> Result<Instance, ContainerError> {
    if let Some(instance) = container.bindings().cached_instance(contract) {
        trace!(%contract, "Returning cached instance.");
        return Ok(instance);
    }

    if !container.bindings().is_singleton(contract) {
        return create(container, contract, Arguments::default());
    }

    let instance = create(container, contract, Arguments::default())?;
    container
        .bindings_mut()
        .store_instance(contract.clone(), instance.clone());

    Ok(instance)
}

/// Resolves the contract using given arguments, bypassing the instance cache.
#[inline]
pub fn get_with<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
    arguments: Arguments,
) -> Result<Instance, ContainerError> {
    create(container, contract, arguments)
}

fn create<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
    arguments: Arguments,
) -> Result<Instance, ContainerError> {
    if !container.bindings_mut().begin_construction(contract) {
        return Err(ContainerError::DependencyCycle(contract.clone()));
    }

    let instance = construct(container, contract, arguments);
    container.bindings_mut().end_construction(contract);

    instance
}

fn construct<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
    arguments: Arguments,
) -> Result<Instance, ContainerError> {
    let implementation = container
        .bindings()
        .implementation(contract)
        .ok_or_else(|| ContainerError::UnboundContract(contract.clone()))?;

    match implementation {
        Implementation::Factory(factory) => {
            trace!(%contract, "Invoking factory.");
            let container: &mut dyn Container = container;
            (*factory)(container)
        }
        Implementation::Instance(instance) => Ok(instance),
        Implementation::Type(definition) => {
            let arguments = container
                .bindings()
                .stored_arguments(&definition.contract)
                .merge(arguments);

            construct_component(container, contract, &definition, &arguments)
        }
    }
}

fn construct_component<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
    definition: &ComponentDefinition,
    arguments: &Arguments,
) -> Result<Instance, ContainerError> {
    trace!(%contract, implementation = %definition.contract, "Constructing component.");

    let values: Vec<Instance> = definition
        .parameters
        .iter()
        .map(|parameter| resolve_parameter(container, contract, parameter, arguments))
        .try_collect()?;

    (definition.constructor)(&mut ResolvedArguments::new(values)).map_err(|error| match error {
        ContainerError::IncompatibleInstance { .. } => ContainerError::Instantiation {
            contract: contract.clone(),
            error: convert_error(error),
        },
        error => error,
    })
}

fn resolve_parameter<C: BindingContext>(
    container: &mut C,
    contract: &Contract,
    parameter: &ParameterDefinition,
    arguments: &Arguments,
) -> Result<Instance, ContainerError> {
    trace!(%contract, parameter = parameter.name, "Resolving parameter.");

    match &parameter.kind {
        ParameterKind::Service(service) => {
            if let Some(argument) = arguments
                .by_type(service)
                .or_else(|| arguments.by_name(parameter.name))
            {
                return resolve_argument(container, argument);
            }

            if container.has(service) {
                return container.get(service);
            }

            if let Some(default) = parameter.default {
                return Ok(default());
            }

            container.get(service)
        }
        ParameterKind::Value(_) => {
            if let Some(argument) = arguments.by_name(parameter.name) {
                return resolve_argument(container, argument);
            }

            parameter
                .default
                .map(|default| default())
                .ok_or_else(|| ContainerError::Resolution {
                    contract: contract.clone(),
                    parameter: parameter.name.to_string(),
                })
        }
    }
}

fn resolve_argument<C: Container>(
    container: &mut C,
    argument: &Argument,
) -> Result<Instance, ContainerError> {
    match argument {
        Argument::Value(instance) => Ok(instance.clone()),
        Argument::Contract(contract) => container.get(contract),
    }
}
