//! Discovery of marked items inside an impl block.
//!
//! Every item carrying `#[builder_property]` is described as an
//! [`AnnotatedMember`] so the shared collector can classify it. The markers
//! are removed from the impl as they are found, since they are inert.
//!
//! Parameter types are recorded as they must be spelled outside the impl:
//! `Self` is replaced by the impl's self type. Methods without a receiver or
//! with their own generic parameters are described as [`ElementKind::Other`],
//! since a builder method can neither call nor declare them.

use proc_macro2::Span;
use quote::ToTokens;
use setter_builder::{AnnotatedMember, ElementKind};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{parse_quote, Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, Meta, Type};

pub const MARKER: &str = "builder_property";

/// A marked impl item and where to point diagnostics about it.
pub struct MarkedItem {
    pub member: AnnotatedMember,
    pub span: Span,
}

/// Strips `#[builder_property]` from every item of `item` and describes the
/// items that carried it.
pub fn take_marked_items(item: &mut ItemImpl, enclosing: &str) -> syn::Result<Vec<MarkedItem>> {
    let mut marked = Vec::new();
    let mut errors: Option<syn::Error> = None;
    let self_ty = item.self_ty.as_ref().clone();

    for impl_item in &mut item.items {
        let Some(attrs) = item_attrs(impl_item) else {
            continue;
        };
        match take_markers(attrs) {
            Ok(true) => marked.push(describe(impl_item, enclosing, &self_ty)),
            Ok(false) => {}
            Err(e) => match &mut errors {
                Some(existing) => existing.combine(e),
                None => errors = Some(e),
            },
        }
    }

    match errors {
        Some(e) => Err(e),
        None => Ok(marked),
    }
}

fn item_attrs(item: &mut ImplItem) -> Option<&mut Vec<Attribute>> {
    match item {
        ImplItem::Const(item) => Some(&mut item.attrs),
        ImplItem::Fn(item) => Some(&mut item.attrs),
        ImplItem::Type(item) => Some(&mut item.attrs),
        ImplItem::Macro(item) => Some(&mut item.attrs),
        _ => None,
    }
}

fn is_marker(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == MARKER)
}

/// Removes marker attributes, reporting whether any were present.
fn take_markers(attrs: &mut Vec<Attribute>) -> syn::Result<bool> {
    let mut found = false;
    let mut error = None;
    attrs.retain(|attr| {
        if !is_marker(attr) {
            return true;
        }
        found = true;
        if !matches!(attr.meta, Meta::Path(_)) {
            error = Some(syn::Error::new_spanned(
                attr,
                "#[builder_property] takes no arguments",
            ));
        }
        false
    });
    match error {
        Some(e) => Err(e),
        None => Ok(found),
    }
}

fn describe(item: &ImplItem, enclosing: &str, self_ty: &Type) -> MarkedItem {
    let (member, span) = match item {
        ImplItem::Fn(method) => (describe_fn(method, enclosing, self_ty), method.sig.ident.span()),
        ImplItem::Const(constant) => (
            AnnotatedMember::other(enclosing, &constant.ident.to_string(), ElementKind::Field),
            constant.ident.span(),
        ),
        ImplItem::Type(alias) => (
            AnnotatedMember::other(enclosing, &alias.ident.to_string(), ElementKind::Type),
            alias.ident.span(),
        ),
        other => (
            AnnotatedMember::other(enclosing, "<macro>", ElementKind::Other),
            other.span(),
        ),
    };
    MarkedItem { member, span }
}

fn describe_fn(method: &ImplItemFn, enclosing: &str, self_ty: &Type) -> AnnotatedMember {
    let name = method.sig.ident.to_string();
    if method.sig.receiver().is_none() || !method.sig.generics.params.is_empty() {
        return AnnotatedMember::other(enclosing, &name, ElementKind::Other);
    }

    let mut resolver = ResolveSelf(self_ty);
    let parameter_types = method.sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => {
            let mut ty = pat_type.ty.as_ref().clone();
            resolver.visit_type_mut(&mut ty);
            Some(ty.to_token_stream().to_string())
        }
        FnArg::Receiver(_) => None,
    });
    AnnotatedMember::method(enclosing, &name, parameter_types)
}

/// Rewrites `Self` to the impl's self type, and `Self::Assoc` to `<T>::Assoc`.
struct ResolveSelf<'a>(&'a Type);

impl VisitMut for ResolveSelf<'_> {
    fn visit_type_mut(&mut self, ty: &mut Type) {
        if let Type::Path(type_path) = ty {
            let starts_with_self = type_path.qself.is_none()
                && type_path.path.leading_colon.is_none()
                && type_path
                    .path
                    .segments
                    .first()
                    .is_some_and(|segment| segment.ident == "Self");
            if starts_with_self {
                let self_ty = self.0;
                let rest: Vec<_> = type_path.path.segments.iter().skip(1).cloned().collect();
                *ty = if rest.is_empty() {
                    self_ty.clone()
                } else {
                    parse_quote!(<#self_ty> #(:: #rest)*)
                };
                return;
            }
        }
        visit_mut::visit_type_mut(self, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn person_impl() -> ItemImpl {
        syn::parse2(quote! {
            impl Person {
                #[builder_property]
                pub fn set_name(&mut self, name: String) {
                    self.name = name;
                }

                #[setter_builder::builder_property]
                pub fn set_tags(&mut self, tags: Vec<String>) {
                    self.tags = tags;
                }

                #[builder_property]
                pub fn age(&self) -> u32 {
                    self.age
                }

                #[builder_property]
                const LIMIT: u32 = 3;

                #[inline]
                pub fn set_id(&mut self, id: u64) {
                    self.id = id;
                }
            }
        })
        .unwrap()
    }

    #[test]
    fn test_marked_items_are_described() {
        let mut item = person_impl();
        let marked = take_marked_items(&mut item, "Person").unwrap();
        let names: Vec<_> = marked
            .iter()
            .map(|m| m.member.simple_name.as_str())
            .collect();
        assert_eq!(names, vec!["set_name", "set_tags", "age", "LIMIT"]);

        let set_name = &marked[0].member;
        assert_eq!(set_name.kind, ElementKind::Method);
        assert_eq!(set_name.parameter_types.len(), 1);
        assert_eq!(set_name.parameter_types[0].as_str(), "String");
        assert_eq!(set_name.enclosing_type.qualified_name(), "Person");

        assert_eq!(marked[1].member.parameter_types[0].as_str(), "Vec < String >");
        assert!(marked[2].member.parameter_types.is_empty());
        assert_eq!(marked[3].member.kind, ElementKind::Field);
    }

    #[test]
    fn test_markers_are_stripped_and_other_attrs_kept() {
        let mut item = person_impl();
        take_marked_items(&mut item, "Person").unwrap();

        let remaining = item.to_token_stream().to_string();
        assert!(!remaining.contains("builder_property"));
        assert!(remaining.contains("inline"));
    }

    fn describe_marked(mut item: ItemImpl) -> Vec<AnnotatedMember> {
        take_marked_items(&mut item, "model.Node")
            .unwrap()
            .into_iter()
            .map(|m| m.member)
            .collect()
    }

    #[test]
    fn test_self_is_resolved_in_parameter_types() {
        let members = describe_marked(syn::parse2(quote! {
            impl model::Node {
                #[builder_property]
                pub fn set_parent(&mut self, parent: Box<Self>) {}

                #[builder_property]
                pub fn set_sibling(&mut self, sibling: Option<&'static Self>) {}

                #[builder_property]
                pub fn set_twin(&mut self, twin: Self) {}

                #[builder_property]
                pub fn set_id(&mut self, id: Self::Id) {}
            }
        })
        .unwrap());

        let types: Vec<String> = members
            .iter()
            .map(|m| m.parameter_types[0].as_str().replace(' ', ""))
            .collect();
        assert_eq!(
            types,
            vec![
                "Box<model::Node>",
                "Option<&'staticmodel::Node>",
                "model::Node",
                "<model::Node>::Id",
            ]
        );
        assert!(members.iter().all(|m| m.kind == ElementKind::Method));
        for member in &members {
            let ty = member.parameter_types[0].as_str();
            assert!(syn::parse_str::<Type>(ty).is_ok(), "{ty}");
        }
    }

    #[test]
    fn test_generic_setter_is_not_a_method() {
        let members = describe_marked(syn::parse2(quote! {
            impl model::Node {
                #[builder_property]
                pub fn set_label<T: Into<String>>(&mut self, label: T) {}

                #[builder_property]
                pub fn set_name<'a>(&mut self, name: &'a str) {}
            }
        })
        .unwrap());

        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.kind == ElementKind::Other));
        assert!(members.iter().all(|m| !setter_builder::is_eligible_setter(m)));
    }

    #[test]
    fn test_associated_fn_without_receiver_is_not_a_method() {
        let members = describe_marked(syn::parse2(quote! {
            impl model::Node {
                #[builder_property]
                pub fn set_default_capacity(capacity: usize) {}
            }
        })
        .unwrap());

        assert_eq!(members[0].simple_name, "set_default_capacity");
        assert_eq!(members[0].kind, ElementKind::Other);
        assert!(!setter_builder::is_eligible_setter(&members[0]));
    }

    #[test]
    fn test_marker_with_arguments_is_rejected() {
        let mut item: ItemImpl = syn::parse2(quote! {
            impl Person {
                #[builder_property(rename = "x")]
                pub fn set_x(&mut self, x: i32) {}
            }
        })
        .unwrap();
        assert!(take_marked_items(&mut item, "Person").is_err());
    }
}
