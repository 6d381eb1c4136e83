//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates field name constants, the field accessor and the schema for a
//! record struct.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_query_attrs, FieldKind};

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut schema_entries: Vec<TokenStream> = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_query_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Fields without a declared type are not queryable
        let kind = match attrs.kind {
            Some(kind) => kind,
            None if attrs.searchable => {
                return Err(Error::new(
                    attrs.span,
                    "searchable fields must declare a type: Text or TextList",
                ))
            }
            None => continue,
        };

        if attrs.searchable && !kind.is_searchable() {
            return Err(Error::new(
                attrs.span,
                "only Text and TextList fields can be searchable",
            ));
        }

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if !seen.insert(query_name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate query field name '{}'", query_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match kind {
            FieldKind::Text => quote! {
                ::kiln_query::Value::from(::kiln_query::QueryText::query_text(&self.#field_name))
            },
            FieldKind::TextList => quote! {
                ::kiln_query::Value::TextList(
                    ::kiln_query::QueryTextList::query_text_list(&self.#field_name)
                )
            },
            FieldKind::Number => quote! {
                ::kiln_query::Value::from(::kiln_query::QueryNumber::query_number(&self.#field_name))
            },
            FieldKind::Timestamp => quote! {
                ::kiln_query::Value::from(
                    ::kiln_query::QueryTimestamp::query_timestamp(&self.#field_name)
                )
            },
            FieldKind::Enum => quote! {
                ::kiln_query::Value::Enum(
                    ::kiln_query::QueryEnum::query_discriminant(&self.#field_name)
                )
            },
            FieldKind::Bool => quote! { ::kiln_query::Value::Bool(self.#field_name) },
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });

        let field_type = match kind {
            FieldKind::Text => quote! { ::kiln_query::FieldType::Text },
            FieldKind::TextList => quote! { ::kiln_query::FieldType::TextList },
            FieldKind::Number => quote! { ::kiln_query::FieldType::Number },
            FieldKind::Timestamp => quote! { ::kiln_query::FieldType::Timestamp },
            FieldKind::Enum => quote! { ::kiln_query::FieldType::Enum },
            FieldKind::Bool => quote! { ::kiln_query::FieldType::Bool },
        };
        schema_entries.push(if attrs.searchable {
            quote! { .searchable(#query_name, #field_type) }
        } else {
            quote! { .field(#query_name, #field_type) }
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::kiln_query::Queryable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::kiln_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::kiln_query::Value::None,
                }
            }

            fn schema() -> ::kiln_query::Schema {
                ::kiln_query::Schema::new()
                    #(#schema_entries)*
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(src: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(src)?;
        queryable_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("title"), "TITLE");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("lastActivityAt"), "LAST_ACTIVITY_AT");
        assert_eq!(to_screaming_snake_case("entity-title"), "ENTITY_TITLE");
    }

    #[test]
    fn test_generates_constants_and_schema() {
        let out = expand(
            r#"
            struct Work {
                #[query(Text, searchable)]
                title: String,
                #[query(Number, rename = "upvotesCount")]
                upvotes_count: u32,
                internal: u64,
            }
            "#,
        )
        .unwrap();

        assert!(out.contains("pub const TITLE"));
        assert!(out.contains("pub const UPVOTES_COUNT"));
        assert!(out.contains("searchable"));
        assert!(out.contains("\"upvotesCount\""));
        assert!(out.contains("FieldType :: Number"));
        assert!(!out.contains("internal"));
    }

    #[test]
    fn test_rejects_searchable_number() {
        let err = expand(
            r#"
            struct Work {
                #[query(Number, searchable)]
                likes: u32,
            }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("only Text and TextList"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = expand(
            r#"
            struct Post {
                #[query(Number, rename = "likes")]
                like_count: u32,
                #[query(Number)]
                likes: u32,
            }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate query field name 'likes'"));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        assert!(expand("struct Pair(u32, u32);").is_err());
        assert!(expand("enum Kind { A, B }").is_err());
    }
}
