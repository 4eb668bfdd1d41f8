//! Derive macros for the todolist reducer architecture
//!
//! # Available Macros
//!
//! - `#[derive(State)]` - Generates revision tracking accessors for state structs
//!
//! # Example
//!
//! ```ignore
//! use todolist_macros::State;
//! use todolist_core::state::Revision;
//!
//! #[derive(State, Clone, Debug, Default)]
//! struct TodoState {
//!     pub items: Vec<TodoItem>,
//!     #[revision]
//!     revision: Revision,
//! }
//!
//! let mut state = TodoState::default();
//! assert_eq!(state.bump_revision(), Revision::new(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput};

/// Derive macro for State structs
///
/// Generates revision accessors when a field of type
/// `todolist_core::state::Revision` is marked with `#[revision]`:
///
/// - `revision()` - the current revision
/// - `bump_revision()` - advance to the next revision and return it
///
/// Structs without a `#[revision]` field derive nothing.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-struct type
/// - More than one field is marked `#[revision]`
/// - The `#[revision]` field is unnamed
///
/// # Example
///
/// ```ignore
/// use todolist_macros::State;
/// use todolist_core::state::Revision;
///
/// #[derive(State, Clone, Debug)]
/// struct TodoState {
///     pub items: Vec<Todo>,
///     #[revision]
///     revision: Revision,
/// }
/// ```
#[proc_macro_derive(State, attributes(revision))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let mut revision_fields = data_struct
        .fields
        .iter()
        .filter(|field| has_attribute(&field.attrs, "revision"));

    let Some(field) = revision_fields.next() else {
        return TokenStream::new();
    };

    if let Some(extra) = revision_fields.next() {
        return syn::Error::new_spanned(extra, "Only one field can be marked #[revision]")
            .to_compile_error()
            .into();
    }

    let Some(field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[revision] requires a named field")
            .to_compile_error()
            .into();
    };

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns the current revision of this state
            #[must_use]
            pub const fn revision(&self) -> ::todolist_core::state::Revision {
                self.#field_name
            }

            /// Advances the revision, marking the state as changed
            pub fn bump_revision(&mut self) -> ::todolist_core::state::Revision {
                self.#field_name = self.#field_name.next();
                self.#field_name
            }
        }
    };

    TokenStream::from(expanded)
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
