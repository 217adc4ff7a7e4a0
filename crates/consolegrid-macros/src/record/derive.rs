//! Code generation for `#[derive(GridRecord)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Type};

use super::attrs::parse_grid_attrs;

/// Main implementation of the GridRecord derive macro.
pub fn grid_record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "GridRecord can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "GridRecord can only be derived for structs",
            ))
        }
    };

    let mut columns: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_grid_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let column_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let type_name = type_name(&field.ty);

        let extract = if is_option(&field.ty) {
            quote! { ::consolegrid::column::CellOption::to_grid_cell(&record.#field_name) }
        } else {
            quote! { ::consolegrid::column::CellDisplay::to_grid_cell(&record.#field_name) }
        };

        columns.push(quote! {
            ::consolegrid::column::Column::new(
                if show_type_names {
                    ::std::format!("{} <{}>", #column_name, #type_name)
                } else {
                    ::std::string::String::from(#column_name)
                },
                |record: &Self| #extract,
            )
            .auto_generated(true)
        });
    }

    Ok(quote! {
        impl #impl_generics ::consolegrid::column::GridRecord for #struct_name #ty_generics #where_clause {
            fn grid_columns(show_type_names: bool) -> ::std::vec::Vec<::consolegrid::column::Column<Self>> {
                ::std::vec![#(#columns),*]
            }
        }
    })
}

/// The field type as written, without whitespace.
fn type_name(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Whether the type's last path segment is `Option`.
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        Type::Group(group) => is_option(&group.elem),
        Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(source: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(source)?;
        grid_record_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_generates_one_column_per_field() {
        let output = derive("struct Task { id: u32, title: String }").unwrap();
        assert!(output.contains("GridRecord for Task"));
        assert!(output.contains("\"id\""));
        assert!(output.contains("\"title\""));
        assert_eq!(output.matches("auto_generated").count(), 2);
    }

    #[test]
    fn test_skip_and_rename() {
        let output = derive(
            r#"struct Task {
                #[grid(rename = "Title")]
                title: String,
                #[grid(skip)]
                secret: String,
            }"#,
        )
        .unwrap();
        assert!(output.contains("\"Title\""));
        assert!(!output.contains("secret"));
    }

    #[test]
    fn test_option_fields_use_cell_option() {
        let output = derive("struct Task { due: Option<String> }").unwrap();
        assert!(output.contains("CellOption"));
        assert!(output.contains("\"Option<String>\""));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        let err = derive("struct Pair(u32, u32);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
        assert!(derive("enum Kind { A, B }").is_err());
    }

    #[test]
    fn test_type_name_strips_whitespace() {
        let ty: Type = syn::parse_str("std::collections::HashMap<String, Vec<u8>>").unwrap();
        assert_eq!(type_name(&ty), "std::collections::HashMap<String,Vec<u8>>");
    }

    #[test]
    fn test_is_option() {
        assert!(is_option(&syn::parse_str("Option<u8>").unwrap()));
        assert!(is_option(&syn::parse_str("std::option::Option<u8>").unwrap()));
        assert!(!is_option(&syn::parse_str("Vec<Option<u8>>").unwrap()));
    }
}
