//! Parsing and validation of the `#[setter_builder]` input.
//!
//! This module reads the macro arguments and checks that the annotated item
//! is an inherent impl of a plain, non-generic type path.

use syn::parse::{Parse, ParseStream};
use syn::{Ident, ItemImpl, PathArguments, Token, Type, Visibility};

/// Arguments of `#[setter_builder(...)]`: an optional visibility for the
/// generated builder, then an optional `strict` flag.
pub struct BuilderArgs {
    pub vis: Visibility,
    /// Reject marked items that are not setter-shaped instead of skipping them
    pub strict: bool,
}

impl Parse for BuilderArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let vis: Visibility = input.parse()?;
        let explicit_vis = !matches!(vis, Visibility::Inherited);
        if explicit_vis && !input.is_empty() {
            input.parse::<Token![,]>()?;
        }

        let mut strict = false;
        if !input.is_empty() {
            let flag: Ident = input.parse()?;
            if flag != "strict" {
                return Err(syn::Error::new_spanned(
                    flag,
                    "expected `strict` or a visibility such as `pub`",
                ));
            }
            strict = true;
        }
        if !input.is_empty() {
            return Err(input.error("unexpected tokens in `#[setter_builder]`"));
        }

        let vis = if explicit_vis {
            vis
        } else {
            syn::parse_quote!(pub(crate))
        };
        Ok(BuilderArgs { vis, strict })
    }
}

/// Validates that the impl block can host a builder.
///
/// Returns an error for:
/// - trait impls
/// - generic impls
pub fn validate_impl(item: &ItemImpl) -> syn::Result<()> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[setter_builder] only works on inherent impl blocks, not trait impls",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[setter_builder] does not support generic impl blocks",
        ));
    }
    Ok(())
}

/// Dotted qualified name of the impl's self type, e.g. `model.Person` for
/// `impl model::Person`.
pub fn qualified_name(self_ty: &Type) -> syn::Result<String> {
    let Type::Path(type_path) = self_ty else {
        return Err(syn::Error::new_spanned(
            self_ty,
            "#[setter_builder] needs a named type such as `Person`",
        ));
    };
    if type_path.qself.is_some() {
        return Err(syn::Error::new_spanned(
            self_ty,
            "#[setter_builder] does not support qualified self types",
        ));
    }

    let mut segments = Vec::with_capacity(type_path.path.segments.len());
    for segment in &type_path.path.segments {
        if !matches!(segment.arguments, PathArguments::None) {
            return Err(syn::Error::new_spanned(
                segment,
                "#[setter_builder] does not support generic types",
            ));
        }
        segments.push(segment.ident.to_string());
    }
    Ok(segments.join("."))
}
