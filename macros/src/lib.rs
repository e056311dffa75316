//! Derive macros for NFA module actions
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification and naming helpers for
//!   module action enums
//!
//! # Example
//!
//! ```ignore
//! use nfa_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum PresenceAction {
//!     #[request]
//!     Check { timeout_ms: u32 },
//!
//!     #[notification]
//!     CheckResult { present: bool },
//! }
//!
//! assert!(PresenceAction::Check { timeout_ms: 100 }.is_request());
//! assert_eq!(PresenceAction::CheckResult { present: true }.name(), "CheckResult");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Variant};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_request()` - Returns true if this variant is an API request
/// - `is_notification()` - Returns true if this variant is a notification from
///   a lower layer
/// - `name()` - Returns the variant name, for logs
///
/// # Attributes
///
/// - `#[request]` - Mark a variant as an API request
/// - `#[notification]` - Mark a variant as a notification
///
/// Unmarked variants are internal actions: neither predicate holds for them,
/// but they still have a name.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[request]` and `#[notification]` attributes
#[proc_macro_derive(Action, attributes(request, notification))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut request_arms = Vec::new();
    let mut notification_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_request = has_attribute(&variant.attrs, "request");
        let is_notification = has_attribute(&variant.attrs, "notification");

        if is_request && is_notification {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[request] and #[notification]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);
        let variant_name = variant.ident.to_string();

        if is_request {
            request_arms.push(quote! { #pattern => true, });
        }
        if is_notification {
            notification_arms.push(quote! { #pattern => true, });
        }
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    // An enum with no variants has no values to match on
    let name_body = if name_arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! { match self { #(#name_arms)* } }
    };

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is an API request
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_request(&self) -> bool {
                match self {
                    #(#request_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is a notification from a lower layer
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_notification(&self) -> bool {
                match self {
                    #(#notification_arms)*
                    _ => false,
                }
            }

            /// Variant name, for logs
            #[must_use]
            pub const fn name(&self) -> &'static str {
                #name_body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern that ignores the variant's fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
