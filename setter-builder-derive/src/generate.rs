//! Code generation for the builder type.
//!
//! This module classifies the marked items with the shared collector and
//! renders the resulting [`BuilderSpec`] as Rust tokens with `quote`.

use crate::member::{take_marked_items, MarkedItem};
use crate::parse::{qualified_name, validate_impl, BuilderArgs};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use setter_builder::{collect, is_eligible_setter, BuilderSpec};
use syn::{ItemImpl, Visibility};

/// Expands `#[setter_builder]` on `item`: the impl with its markers stripped,
/// followed by the builder if any marked setter qualifies.
pub fn impl_setter_builder(args: &BuilderArgs, mut item: ItemImpl) -> syn::Result<TokenStream> {
    validate_impl(&item)?;
    let enclosing = qualified_name(&item.self_ty)?;
    let marked = take_marked_items(&mut item, &enclosing)?;

    if args.strict {
        reject_ineligible(&marked)?;
    }

    let members: Vec<_> = marked.iter().map(|m| &m.member).collect();
    let builder = match collect(members).remove(&enclosing) {
        Some(setters) => {
            let spec = BuilderSpec::new(&enclosing, setters)
                .map_err(|e| syn::Error::new_spanned(&item.self_ty, e))?;
            generate_builder(&spec, &args.vis, item.self_ty.as_ref())?
        }
        None => TokenStream::new(),
    };

    Ok(quote! {
        #item

        #builder
    })
}

fn reject_ineligible(marked: &[MarkedItem]) -> syn::Result<()> {
    let mut errors = marked
        .iter()
        .filter(|m| !is_eligible_setter(&m.member))
        .map(|m| {
            syn::Error::new(
                m.span,
                "#[builder_property] must be applied to a set* method with a single argument",
            )
        });

    match errors.next() {
        Some(mut first) => {
            for e in errors {
                first.combine(e);
            }
            Err(first)
        }
        None => Ok(()),
    }
}

/// Renders the builder struct, its methods, and `builder()` on the original type.
fn generate_builder(
    spec: &BuilderSpec,
    vis: &Visibility,
    self_ty: &syn::Type,
) -> syn::Result<TokenStream> {
    let object_ty = object_path(spec, self_ty)?;
    let builder_name = format_ident!("{}", spec.builder_simple_class_name);
    let setter_methods = generate_setter_methods(spec, &builder_name, vis)?;

    Ok(quote! {
        #vis struct #builder_name {
            object: #object_ty,
        }

        impl #builder_name {
            #vis fn new() -> #builder_name {
                #builder_name {
                    object: ::core::default::Default::default(),
                }
            }

            #vis fn build(self) -> #object_ty {
                self.object
            }

            #setter_methods
        }

        impl ::core::default::Default for #builder_name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl #object_ty {
            #vis fn builder() -> #builder_name {
                #builder_name::new()
            }
        }
    })
}

/// The original type's path rebuilt from the package and simple name.
fn object_path(spec: &BuilderSpec, self_ty: &syn::Type) -> syn::Result<syn::Path> {
    let path = match &spec.package_name {
        Some(package) => format!("{}::{}", package.replace('.', "::"), spec.simple_class_name),
        None => spec.simple_class_name.clone(),
    };
    syn::parse_str(&path).map_err(|_| syn::Error::new_spanned(self_ty, "unsupported type path"))
}

/// One chaining method per setter, delegating to the original setter.
fn generate_setter_methods(
    spec: &BuilderSpec,
    builder_name: &syn::Ident,
    vis: &Visibility,
) -> syn::Result<TokenStream> {
    let mut methods = TokenStream::new();
    for (name, descriptor) in &spec.setters {
        let method = syn::Ident::new(name, Span::call_site());
        let value_ty: syn::Type = syn::parse_str(descriptor.as_str())?;
        methods.extend(quote! {
            #vis fn #method(mut self, value: #value_ty) -> #builder_name {
                self.object.#method(value);
                self
            }
        });
    }
    Ok(methods)
}
