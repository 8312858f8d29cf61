//! # setter-builder-derive
//!
//! Attribute macros that generate a fluent builder from marked setter methods.
//!
//! ## Example
//!
//! ```rust
//! use setter_builder_derive::setter_builder;
//!
//! #[derive(Default, Debug, PartialEq)]
//! pub struct Person {
//!     name: String,
//!     height: u32,
//! }
//!
//! #[setter_builder]
//! impl Person {
//!     #[builder_property]
//!     pub fn set_name(&mut self, name: String) {
//!         self.name = name;
//!     }
//!
//!     #[builder_property]
//!     pub fn set_height(&mut self, height: u32) {
//!         self.height = height;
//!     }
//! }
//!
//! let person = Person::builder()
//!     .set_name("Ada".to_string())
//!     .set_height(170)
//!     .build();
//!
//! assert_eq!(person, Person { name: "Ada".to_string(), height: 170 });
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemImpl};

mod generate;
mod member;
mod parse;

/// Generates a `{Type}Builder` for the annotated inherent impl block.
///
/// Inside the block, `#[builder_property]` marks candidate setters. A marked
/// method qualifies when it takes a receiver plus exactly one argument, has
/// no generic parameters of its own, and its name starts with `set`. `Self`
/// in the argument type is fine. The macro generates:
/// - A builder struct named `{Type}Builder` holding a default-constructed `Type`
/// - `new()` and `Default`, both starting from `Type::default()`
/// - One chaining method per qualifying setter, forwarding to the original
/// - A `build()` method returning the configured value
/// - A `builder()` constructor on the original type
///
/// Marked items that do not qualify are skipped. Pass `strict` to turn them
/// into errors instead. A visibility for the generated items may be given
/// first; it defaults to `pub(crate)`.
///
/// ## Example
///
/// ```rust
/// use setter_builder_derive::setter_builder;
///
/// #[derive(Default)]
/// pub struct Config {
///     port: u16,
/// }
///
/// #[setter_builder(pub, strict)]
/// impl Config {
///     #[builder_property]
///     pub fn set_port(&mut self, port: u16) {
///         self.port = port;
///     }
/// }
///
/// let config = ConfigBuilder::new().set_port(8080).build();
/// assert_eq!(config.port, 8080);
/// ```
#[proc_macro_attribute]
pub fn setter_builder(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as parse::BuilderArgs);
    let input = parse_macro_input!(input as ItemImpl);

    match generate::impl_setter_builder(&args, input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Marks a setter for `#[setter_builder]`.
///
/// The enclosing `#[setter_builder]` removes this attribute before it is
/// expanded, so reaching this function means the marker is misplaced.
#[proc_macro_attribute]
pub fn builder_property(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut output = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[builder_property] must be used inside a #[setter_builder] impl block",
    )
    .to_compile_error();
    output.extend(proc_macro2::TokenStream::from(input));
    output.into()
}
