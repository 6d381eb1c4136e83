//! Attribute parsing for the Queryable derive macro.
//!
//! Parses the `#[query(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

const EXPECTED_TYPES: &str = "Text, TextList, Number, Timestamp, Enum, Bool";

/// The declared type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
    Number,
    Timestamp,
    Enum,
    Bool,
}

impl FieldKind {
    /// Parses a field type from a bare identifier such as `Text`.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        FieldKind::from_name(&ident.to_string(), ident.span())
    }

    /// Parses a field type name, accepting both `TextList` and `text_list` spellings.
    pub fn from_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" | "String" | "string" => Ok(FieldKind::Text),
            "TextList" | "text_list" => Ok(FieldKind::TextList),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enum" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown query type: '{}'. Expected one of: {}",
                    other, EXPECTED_TYPES
                ),
            )),
        }
    }

    /// Whether free-text search may look in fields of this type.
    pub fn is_searchable(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::TextList)
    }
}

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    pub searchable: bool,
    /// Field name used in queries (default: the Rust field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            kind: None,
            skip: false,
            searchable: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("searchable") {
                        attr.searchable = true;
                        attr.span = p.span();
                    } else if let Some(ident) = p.get_ident() {
                        set_kind(&mut attr, FieldKind::from_ident(ident)?, ident.span())?;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected a query type ({}), searchable, or skip", EXPECTED_TYPES),
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    let value = match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s,
                        other => {
                            return Err(Error::new(other.span(), "expected a string literal"));
                        }
                    };
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(value.value());
                    } else if nv.path.is_ident("ty") {
                        set_kind(
                            &mut attr,
                            FieldKind::from_name(&value.value(), value.span())?,
                            value.span(),
                        )?;
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected a type, searchable, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn set_kind(attr: &mut QueryAttr, kind: FieldKind, span: Span) -> Result<()> {
    if attr.kind.is_some() {
        return Err(Error::new(span, "query type given more than once"));
    }
    attr.kind = Some(kind);
    attr.span = span;
    Ok(())
}

/// Extracts `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &str) -> Result<QueryAttr> {
        syn::parse_str::<QueryAttr>(tokens)
    }

    #[test]
    fn test_each_type() {
        let cases = [
            ("Text", FieldKind::Text),
            ("TextList", FieldKind::TextList),
            ("Number", FieldKind::Number),
            ("Timestamp", FieldKind::Timestamp),
            ("Enum", FieldKind::Enum),
            ("Bool", FieldKind::Bool),
        ];
        for (tokens, expected) in cases {
            assert_eq!(parse(tokens).unwrap().kind, Some(expected), "{}", tokens);
        }
    }

    #[test]
    fn test_ty_string_form() {
        let attr = parse(r#"ty = "enum""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Enum));

        let attr = parse(r#"ty = "text_list""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::TextList));
    }

    #[test]
    fn test_searchable_and_rename() {
        let attr = parse(r#"Text, searchable, rename = "authorNickname""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Text));
        assert!(attr.searchable);
        assert_eq!(attr.rename.as_deref(), Some("authorNickname"));
    }

    #[test]
    fn test_skip() {
        let attr = parse("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_unknown_type() {
        let err = parse("Money").unwrap_err();
        assert!(err.to_string().contains("unknown query type: 'Money'"));
    }

    #[test]
    fn test_duplicate_type() {
        let err = parse("Text, Number").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_non_string_rename() {
        assert!(parse("rename = 3").is_err());
    }

    #[test]
    fn test_unknown_name_value() {
        let err = parse(r#"alias = "x""#).unwrap_err();
        assert!(err.to_string().contains("Expected: rename or ty"));
    }
}
