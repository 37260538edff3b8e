use crate::attributes::{ComponentAttributes, DefaultDefinition, FieldAttributes};
use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Expr, ExprArray, ExprLit, Field, Fields,
    GenericArgument, Lit, PathArguments, Result, Type,
};

const COMPONENT: &str = "component";
const INSTANCE_PTR: &str = "InstancePtr";

// InstancePtr<T> fields are services, everything else is a value
fn service_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };

    let segment = path.path.segments.last()?;
    if segment.ident != INSTANCE_PTR {
        return None;
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };

    arguments.args.iter().find_map(|argument| {
        if let GenericArgument::Type(ty) = argument {
            Some(ty)
        } else {
            None
        }
    })
}

fn extract_field_attributes(field: &Field) -> Result<Option<DefaultDefinition>> {
    for attr in &field.attrs {
        if attr.path().is_ident(COMPONENT) {
            return FieldAttributes::try_from(attr).map(|attributes| attributes.default);
        }
    }

    Ok(None)
}

fn generate_default(field: &Field, service: Option<&Type>) -> Result<Option<TokenStream>> {
    let ty = &field.ty;
    let default = extract_field_attributes(field)?.map(|default| match (default, service) {
        (DefaultDefinition::Expr(path), Some(_)) => quote! {
            oak_di::instance::Instance::new(#path())
        },
        (DefaultDefinition::Expr(path), None) => quote! {
            oak_di::instance::Instance::of::<#ty>(#path())
        },
        (DefaultDefinition::Default, Some(service)) => quote! {
            oak_di::instance::Instance::new(
                <oak_di::instance::InstancePtr<#service> as std::default::Default>::default()
            )
        },
        (DefaultDefinition::Default, None) => quote! {
            oak_di::instance::Instance::of(<#ty as std::default::Default>::default())
        },
    });

    Ok(default)
}

fn generate_parameter(name: &str, field: &Field) -> Result<TokenStream> {
    let service = service_type(&field.ty);
    let definition = if let Some(service) = service {
        quote! {
            oak_di::component::ParameterDefinition::service::<#service>(#name)
        }
    } else {
        let ty = &field.ty;
        quote! {
            oak_di::component::ParameterDefinition::value::<#ty>(#name)
        }
    };

    Ok(match generate_default(field, service)? {
        Some(default) => quote! {
            #definition.with_default(|| #default)
        },
        None => definition,
    })
}

fn generate_construction(field: &Field) -> TokenStream {
    if let Some(service) = service_type(&field.ty) {
        quote! {
            arguments.next::<#service>()?
        }
    } else {
        let ty = &field.ty;
        quote! {
            arguments.next_value::<#ty>()?
        }
    }
}

fn field_name(index: usize, field: &Field) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.to_string())
        .unwrap_or_else(|| index.to_string())
}

fn generate_parameters(fields: &Fields) -> Result<Vec<TokenStream>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| generate_parameter(&field_name(index, field), field))
        .try_collect()
}

fn generate_struct(fields: &Fields) -> TokenStream {
    match fields {
        Fields::Named(fields) => {
            let fields = fields.named.iter().map(|field| {
                let ident = &field.ident;
                let instance = generate_construction(field);
                quote! {
                    #ident: #instance
                }
            });

            quote! {
                Self {
                    #(#fields),*
                }
            }
        }
        Fields::Unnamed(fields) => {
            let fields = fields.unnamed.iter().map(generate_construction);
            quote! {
                Self(#(#fields),*)
            }
        }
        Fields::Unit => quote! { Self },
    }
}

fn extract_component_attributes(attributes: &[Attribute]) -> Result<Option<ComponentAttributes>> {
    attributes
        .iter()
        .filter_map(|attribute| {
            if attribute.path().is_ident(COMPONENT) {
                Some(ComponentAttributes::try_from(attribute))
            } else {
                None
            }
        })
        .next()
        .transpose()
}

fn generate_names(attribute_names: Option<ExprArray>, ident: &Ident) -> Result<Vec<String>> {
    let Some(names) = attribute_names else {
        return Ok(vec![ident.to_string().to_case(Case::Snake)]);
    };

    names
        .elems
        .iter()
        .map(|elem| {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(string),
                ..
            }) = elem
            {
                Ok(string.value())
            } else {
                Err(Error::new(elem.span(), "Component names must be string literals!"))
            }
        })
        .try_collect()
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Cannot derive Component on generic structs!",
        ));
    }

    let ident = &input.ident;
    let generation = generate_struct(fields);
    let parameters = generate_parameters(fields)?;
    let names = extract_component_attributes(&input.attrs)?.and_then(|attributes| attributes.names);
    let names = generate_names(names, ident)?;

    Ok(quote! {
        #[automatically_derived]
        impl oak_di::component::Component for #ident {
            fn names() -> Vec<String> {
                vec![#(#names.to_string()),*]
            }

            fn parameters() -> Vec<oak_di::component::ParameterDefinition> {
                vec![#(#parameters),*]
            }

            #[allow(unused_variables)]
            fn create(
                arguments: &mut oak_di::component::ResolvedArguments,
            ) -> Result<Self, oak_di::error::ContainerError> {
                Ok(#generation)
            }
        }

        const _: () = {
            fn register() -> oak_di::component::ComponentDefinition {
                oak_di::component::ComponentDefinition::of::<#ident>()
            }

            oak_di::component_registry::internal::submit! {
                oak_di::component_registry::internal::ComponentDefinitionRegisterer {
                    register
                }
            };
        };
    })
}
