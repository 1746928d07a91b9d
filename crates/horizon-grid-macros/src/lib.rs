//! Procedural macros for Horizon Grid record introspection.
//!
//! This crate provides the `#[derive(Record)]` macro, which implements
//! `horizon_grid_core::record::Record` for a struct with named fields so
//! that it can be shown in a table view.
//!
//! # Type-to-Kind Mapping
//!
//! | Rust Type | Field Kind |
//! |-----------|------------|
//! | `i8`, `i16`, `i32`, `i64`, `isize` | signed integer |
//! | `u8`, `u16`, `u32`, `u64`, `usize` | unsigned integer |
//! | `f32`, `f64` | float |
//! | `String` | string |
//! | `DateTime<Utc>`, `NaiveDateTime`, `SystemTime` | timestamp |
//! | anything else | unsupported |
//!
//! Fields of an unsupported kind still get a column, but they cannot be
//! sorted on or edited.
//!
//! # Attributes
//!
//! ```ignore
//! #[derive(Record, Default)]
//! struct Employee {
//!     #[record(label = "ID")]
//!     id: i64,
//!
//!     name: String,
//!
//!     #[record(skip)]
//!     cached_summary: Option<String>,
//! }
//! ```
//!
//! - `label = "..."`: Header text for the column (defaults to the field name)
//! - `skip`: Excludes the field from the record's descriptors

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Expr, ExprLit, Field, Fields, GenericArgument, Ident, Lit, PathArguments,
    Type, parse_macro_input,
};

/// Derive the `Record` trait for a struct with named fields.
///
/// The struct must also implement `Default`, which provides the zero-valued
/// record inserted by table views.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed information about one described field.
struct FieldInfo {
    ident: Ident,
    ty: Type,
    label: Option<String>,
    primitive: bool,
}

fn impl_derive_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record derive only supports structs",
            ));
        }
    };

    let mut infos = Vec::new();
    for field in fields.iter() {
        if let Some(info) = parse_field(field)? {
            infos.push(info);
        }
    }

    let count = infos.len();
    let descriptors = infos.iter().enumerate().map(|(ordinal, info)| {
        let name = info.ident.to_string();
        let ty = &info.ty;
        let type_name = type_to_string(ty);
        let kind = if info.primitive {
            quote! { <#ty as horizon_grid_core::record::FieldType>::KIND }
        } else {
            quote! { horizon_grid_core::record::FieldKind::Unsupported }
        };
        let label = match &info.label {
            Some(label) => quote! { .with_label(#label) },
            None => quote! {},
        };
        quote! {
            horizon_grid_core::record::FieldDescriptor::new(#name, #ordinal, #kind, #type_name)#label
        }
    });

    let read_arms = infos.iter().enumerate().map(|(ordinal, info)| {
        let ident = &info.ident;
        if info.primitive {
            quote! {
                #ordinal => Some(horizon_grid_core::record::FieldType::to_field_ref(&self.#ident)),
            }
        } else {
            let type_name = type_to_string(&info.ty);
            quote! {
                #ordinal => Some(horizon_grid_core::record::FieldRef::Unsupported(#type_name)),
            }
        }
    });

    let write_arms = infos.iter().enumerate().map(|(ordinal, info)| {
        let ident = &info.ident;
        if info.primitive {
            quote! {
                #ordinal => {
                    self.#ident = horizon_grid_core::record::convert(&fields[#ordinal], value)?;
                    Ok(())
                }
            }
        } else {
            quote! {
                #ordinal => Err(horizon_grid_core::FieldError::Unsupported {
                    field: fields[#ordinal].name,
                    type_name: fields[#ordinal].type_name,
                }),
            }
        }
    });

    Ok(quote! {
        impl horizon_grid_core::record::Record for #struct_name {
            fn fields() -> &'static [horizon_grid_core::record::FieldDescriptor] {
                static FIELDS: [horizon_grid_core::record::FieldDescriptor; #count] = [
                    #(#descriptors),*
                ];
                &FIELDS
            }

            fn field_ref(&self, ordinal: usize) -> Option<horizon_grid_core::record::FieldRef<'_>> {
                match ordinal {
                    #(#read_arms)*
                    _ => None,
                }
            }

            fn set_field(
                &mut self,
                ordinal: usize,
                value: horizon_grid_core::record::FieldValue,
            ) -> horizon_grid_core::FieldResult<()> {
                let fields = <Self as horizon_grid_core::record::Record>::fields();
                match ordinal {
                    #(#write_arms)*
                    _ => Err(horizon_grid_core::FieldError::NoSuchField {
                        ordinal,
                        count: fields.len(),
                    }),
                }
            }
        }
    })
}

/// Parse a field's `#[record(...)]` attributes. Returns `None` for skipped fields.
fn parse_field(field: &Field) -> syn::Result<Option<FieldInfo>> {
    let ident = match &field.ident {
        Some(ident) => ident.clone(),
        None => return Ok(None),
    };

    let mut label = None;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("label") {
                let value: Expr = meta.value()?.parse()?;
                match value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(lit_str),
                        ..
                    }) => {
                        label = Some(lit_str.value());
                        Ok(())
                    }
                    other => Err(syn::Error::new_spanned(other, "label must be a string literal")),
                }
            } else {
                Err(meta.error("unknown record attribute; expected `skip` or `label`"))
            }
        })?;
    }

    if skip {
        return Ok(None);
    }

    Ok(Some(FieldInfo {
        primitive: is_primitive(&field.ty),
        ident,
        ty: field.ty.clone(),
        label,
    }))
}

/// Returns `true` for the types that implement `FieldType` in the core crate.
fn is_primitive(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.qself.is_some() {
        return false;
    }
    let Some(segment) = type_path.path.segments.last() else {
        return false;
    };

    match segment.ident.to_string().as_str() {
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize"
        | "f32" | "f64" | "String" | "NaiveDateTime" | "SystemTime" => {
            matches!(segment.arguments, PathArguments::None)
        }
        // Only the UTC flavour maps onto a timestamp.
        "DateTime" => match &segment.arguments {
            PathArguments::AngleBracketed(args) => {
                args.args.len() == 1
                    && matches!(
                        args.args.first(),
                        Some(GenericArgument::Type(Type::Path(tz)))
                            if tz.path.segments.last().is_some_and(|s| s.ident == "Utc")
                    )
            }
            _ => false,
        },
        _ => false,
    }
}

/// Convert a type to a string representation.
fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}
