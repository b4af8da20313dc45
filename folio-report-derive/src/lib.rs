use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro that turns a struct into a typed spreadsheet row.
///
/// Every named field must carry `#[sheet(column = "B")]`. For each field the
/// macro records:
/// - Field name
/// - Column letter and zero-based index
/// - Required (true unless the type is `Option<T>` or `optional` is given)
/// - Description (from doc comments)
///
/// and generates an implementation of `crate::workbook::SheetRow`, providing
/// `schema()` and a `from_row()` constructor that converts each cell through
/// `crate::workbook::FromCell`.
#[proc_macro_derive(SheetRow, attributes(sheet))]
pub fn derive_sheet_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldInfo {
    ident: syn::Ident,
    name: String,
    column: String,
    index: usize,
    required: bool,
    description: String,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "SheetRow only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "SheetRow only supports structs")),
    };

    let mut infos = Vec::new();
    for field in fields {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let (column, optional) = get_sheet_attr(field)?;
        let index = column_index(&column)
            .ok_or_else(|| syn::Error::new_spanned(field, format!("invalid column '{column}'")))?;

        infos.push(FieldInfo {
            name: ident.to_string(),
            ident,
            column,
            index,
            required: !optional && !is_option_type(&field.ty),
            description: get_doc_comment(&field.attrs),
        });
    }

    let schema_entries = infos.iter().map(|f| {
        let FieldInfo {
            name,
            column,
            index,
            required,
            description,
            ..
        } = f;
        quote! {
            crate::workbook::SheetColumn {
                field: #name,
                column: #column,
                index: #index,
                required: #required,
                description: #description,
            }
        }
    });

    let field_inits = infos.iter().map(|f| {
        let FieldInfo { ident, index, .. } = f;
        quote! {
            #ident: crate::workbook::FromCell::from_cell(row.get(#index))
        }
    });

    Ok(quote! {
        impl crate::workbook::SheetRow for #name {
            fn schema() -> &'static [crate::workbook::SheetColumn] {
                static SCHEMA: &[crate::workbook::SheetColumn] = &[
                    #(#schema_entries),*
                ];
                SCHEMA
            }

            fn from_row(row: &crate::workbook::RowCells<'_>) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

/// Reads `#[sheet(column = "X", optional)]`.
fn get_sheet_attr(field: &syn::Field) -> syn::Result<(String, bool)> {
    let mut column = None;
    let mut optional = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("sheet") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                column = Some(lit.value().trim().to_ascii_uppercase());
                Ok(())
            } else if meta.path.is_ident("optional") {
                optional = true;
                Ok(())
            } else {
                Err(meta.error("unsupported sheet attribute"))
            }
        })?;
    }

    match column {
        Some(column) => Ok((column, optional)),
        None => Err(syn::Error::new_spanned(
            field,
            "missing #[sheet(column = \"..\")] attribute",
        )),
    }
}

/// "A" -> 0, "D" -> 3, "AA" -> 26
fn column_index(column: &str) -> Option<usize> {
    if column.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in column.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        index = index * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

/// Doc comment lines joined into one description
fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        let Meta::NameValue(meta) = &attr.meta else {
            continue;
        };
        let syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(text),
            ..
        }) = &meta.value
        else {
            continue;
        };
        lines.push(text.value().trim().to_string());
    }
    lines.join(" ")
}

/// `Option<T>` fields read blank cells as `None` and are never required
fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_to_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("D"), Some(3));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AB"), Some(27));
    }

    #[test]
    fn invalid_column_letters() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("a"), None);
        assert_eq!(column_index("A1"), None);
    }
}
