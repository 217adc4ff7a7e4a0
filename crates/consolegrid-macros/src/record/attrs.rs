//! Parsing of `#[grid(...)]` field attributes.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone, Default)]
pub struct GridAttr {
    /// Leave the field out of the grid.
    pub skip: bool,
    /// Column name to use instead of the field name.
    pub rename: Option<String>,
}

impl Parse for GridAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = GridAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown grid attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Merges every `#[grid(...)]` attribute on a field.
pub fn parse_grid_attrs(attrs: &[Attribute]) -> Result<GridAttr> {
    let mut merged = GridAttr::default();
    for attr in attrs {
        if attr.path().is_ident("grid") {
            let parsed = attr.parse_args::<GridAttr>()?;
            merged.skip |= parsed.skip;
            if parsed.rename.is_some() {
                merged.rename = parsed.rename;
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_grid(tokens: &str) -> Result<GridAttr> {
        syn::parse_str::<GridAttr>(tokens)
    }

    #[test]
    fn test_grid_skip() {
        let attr = parse_grid("skip").unwrap();
        assert!(attr.skip);
        assert!(attr.rename.is_none());
    }

    #[test]
    fn test_grid_rename() {
        let attr = parse_grid(r#"rename = "Host name""#).unwrap();
        assert_eq!(attr.rename.as_deref(), Some("Host name"));
        assert!(!attr.skip);
    }

    #[test]
    fn test_grid_rename_requires_string() {
        assert!(parse_grid("rename = 3").is_err());
    }

    #[test]
    fn test_grid_unknown_attribute() {
        assert!(parse_grid("width = 10").is_err());
        assert!(parse_grid("hidden").is_err());
    }

    #[test]
    fn test_parse_grid_attrs_merges() {
        let input: syn::DeriveInput = syn::parse_str(
            r#"struct S {
                #[doc = "ignored"]
                #[grid(rename = "A")]
                #[grid(skip)]
                value: u32,
            }"#,
        )
        .unwrap();
        let syn::Data::Struct(data) = input.data else {
            panic!("expected a struct");
        };
        let field = data.fields.iter().next().unwrap();
        let attr = parse_grid_attrs(&field.attrs).unwrap();
        assert!(attr.skip);
        assert_eq!(attr.rename.as_deref(), Some("A"));
    }
}
