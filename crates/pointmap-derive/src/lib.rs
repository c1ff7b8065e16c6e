//! Derive macro for `pointmap::Record`.
//!
//! ```rust
//! use pointmap::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct Sensor {
//!     #[record(column = "Timestamp", timestamp)]
//!     timestamp: i64,
//!     #[record(column = "Temperature", field = "temperature")]
//!     temperature: f64,
//!     #[record(column = "Code", tag = "code")]
//!     code: String,
//!     #[record(field = "battery")]
//!     battery: Option<f64>,
//! }
//!
//! assert_eq!(Sensor::FIELDS.len(), 4);
//! ```
//!
//! Attribute keys inside `#[record(...)]`:
//!
//! - `column = "name"`: decode the field from the column called `name`.
//! - `timestamp`: the field holds the point time in seconds (at most one per struct).
//! - `tag = "name"`: encode the field as the tag `name`.
//! - `field = "name"`: encode the field as the data field `name`.
//!
//! `column` may be combined with one of the other three. Fields without a
//! `#[record]` attribute are left out of the mapping entirely.
//!
//! Tag and field names must be non-empty and unique among the tags or among the
//! fields of one struct:
//!
//! ```compile_fail
//! use pointmap::Record;
//!
//! #[derive(Default, Record)]
//! struct Twice {
//!     #[record(field = "value")]
//!     first: f64,
//!     #[record(field = "value")]
//!     second: f64,
//! }
//! ```
//!
//! ```compile_fail
//! use pointmap::Record;
//!
//! #[derive(Default, Record)]
//! struct Unnamed {
//!     #[record(tag = "")]
//!     site: String,
//! }
//! ```
//!
//! A tag and a field may share a name:
//!
//! ```rust
//! use pointmap::{Record, Role};
//!
//! #[derive(Default, Record)]
//! struct Shared {
//!     #[record(tag = "site")]
//!     site: String,
//!     #[record(field = "site")]
//!     site_id: i64,
//! }
//!
//! assert_eq!(Shared::FIELDS[1].role, Some(Role::Field("site")));
//! ```

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Error, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

enum RoleAttr {
    Timestamp(Span),
    Tag(LitStr),
    Field(LitStr),
}

struct FieldAttrs {
    column: Option<LitStr>,
    role: Option<RoleAttr>,
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<Option<FieldAttrs>> {
    let mut annotated = false;
    let mut column: Option<LitStr> = None;
    let mut role: Option<RoleAttr> = None;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        annotated = true;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                if column.is_some() {
                    return Err(meta.error("duplicate `column` key"));
                }
                let name: LitStr = meta.value()?.parse()?;
                if name.value().is_empty() {
                    return Err(Error::new(name.span(), "column name must not be empty"));
                }
                column = Some(name);
                return Ok(());
            }

            let next = if meta.path.is_ident("timestamp") {
                RoleAttr::Timestamp(meta.path.span())
            } else if meta.path.is_ident("tag") {
                RoleAttr::Tag(output_name(meta.value()?.parse()?)?)
            } else if meta.path.is_ident("field") {
                RoleAttr::Field(output_name(meta.value()?.parse()?)?)
            } else {
                return Err(meta.error(
                    "unsupported record key, expected `column`, `timestamp`, `tag` or `field`",
                ));
            };
            if role.is_some() {
                return Err(meta.error("a field takes at most one of `timestamp`, `tag` or `field`"));
            }
            role = Some(next);
            Ok(())
        })?;
    }

    Ok(annotated.then_some(FieldAttrs { column, role }))
}

fn output_name(name: LitStr) -> syn::Result<LitStr> {
    if name.value().is_empty() {
        return Err(Error::new(name.span(), "output name must not be empty"));
    }
    Ok(name)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    name,
                    "#[derive(Record)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                name,
                "#[derive(Record)] only supports structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut assign_arms = Vec::new();
    let mut value_arms = Vec::new();
    let mut has_timestamp = false;
    let mut tag_names = HashSet::new();
    let mut field_names = HashSet::new();

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let Some(attrs) = parse_field_attrs(field)? else {
            continue;
        };

        let index = descriptors.len();
        let ident_name = ident.unraw().to_string();
        let mut descriptor = quote! { ::pointmap::FieldDescriptor::new(#ident_name) };

        if let Some(column) = &attrs.column {
            descriptor = quote! { #descriptor.column(#column) };
            assign_arms.push(quote! {
                #index => ::pointmap::coerce::assign(&mut self.#ident, value),
            });
        }

        if let Some(role) = &attrs.role {
            let role = match role {
                RoleAttr::Timestamp(span) => {
                    if has_timestamp {
                        return Err(Error::new(*span, "only one field may be the timestamp"));
                    }
                    has_timestamp = true;
                    quote! { ::pointmap::Role::Timestamp }
                }
                RoleAttr::Tag(output) => {
                    if !tag_names.insert(output.value()) {
                        return Err(Error::new(output.span(), "duplicate tag name"));
                    }
                    quote! { ::pointmap::Role::Tag(#output) }
                }
                RoleAttr::Field(output) => {
                    if !field_names.insert(output.value()) {
                        return Err(Error::new(output.span(), "duplicate field name"));
                    }
                    quote! { ::pointmap::Role::Field(#output) }
                }
            };
            descriptor = quote! { #descriptor.role(#role) };
            value_arms.push(quote! {
                #index => ::pointmap::ToFieldValue::to_field_value(&self.#ident),
            });
        }

        descriptors.push(descriptor);
    }

    Ok(quote! {
        impl #impl_generics ::pointmap::Record for #name #ty_generics #where_clause {
            const FIELDS: &'static [::pointmap::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            #[allow(unused_variables)]
            fn assign(&mut self, index: usize, value: &::pointmap::WireValue) -> bool {
                match index {
                    #(#assign_arms)*
                    _ => false,
                }
            }

            #[allow(unused_variables)]
            fn value(&self, index: usize) -> ::core::option::Option<::pointmap::FieldValue> {
                match index {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
