//! Attribute parsing for the Record derive macro.
//!
//! Parses the `#[field(...)]` attributes on struct fields.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// The declared kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Free text: `#[field(Text)]`
    Text,
    /// Number: `#[field(Number)]`
    Number,
    /// Date or date-time: `#[field(Date)]`
    Date,
    /// Boolean: `#[field(Bool)]`
    Bool,
    /// Array of strings: `#[field(Tags)]`
    Tags,
}

impl Kind {
    fn parse(s: &str, span: Span) -> Result<Self> {
        match s {
            "Text" | "text" | "String" => Ok(Kind::Text),
            "Number" | "number" => Ok(Kind::Number),
            "Date" | "date" | "Timestamp" => Ok(Kind::Date),
            "Bool" | "boolean" => Ok(Kind::Bool),
            "Tags" | "tags" => Ok(Kind::Tags),
            other => Err(Error::new(
                span,
                format!(
                    "unknown field kind: '{}'. Expected one of: Text, Number, Date, Bool, Tags",
                    other
                ),
            )),
        }
    }

    /// The matching `tanaw_query::FieldKind` variant name.
    pub fn variant(self) -> &'static str {
        match self {
            Kind::Text => "Text",
            Kind::Number => "Number",
            Kind::Date => "Date",
            Kind::Bool => "Bool",
            Kind::Tags => "Tags",
        }
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    pub kind: Option<Kind>,
    pub skip: bool,
    /// Query name, when it differs from the Rust field name.
    pub rename: Option<String>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // field(Text), field(Number), field(skip)
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(kind_from_ident(ident)?);
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected field kind: Text, Number, Date, Bool, Tags, or skip",
                        ));
                    }
                }

                // rename = "custom_name" or kind = "date"
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
                    } else if nv.path.is_ident("kind") {
                        attr.kind = Some(Kind::parse(&value.value(), value.span())?);
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or kind",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown field attribute. Expected: Text, Number, Date, Bool, Tags, skip, rename = \"...\", or kind = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && (attr.kind.is_some() || attr.rename.is_some()) {
            return Err(Error::new(
                input.span(),
                "skip cannot be combined with a kind or rename",
            ));
        }

        Ok(attr)
    }
}

fn kind_from_ident(ident: &Ident) -> Result<Kind> {
    Kind::parse(&ident.to_string(), ident.span())
}

/// Extract `#[field(...)]` attributes from a struct field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}
