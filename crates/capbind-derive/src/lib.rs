//! `#[derive(Record)]` for capbind.

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, LitStr, Visibility};

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    decode: bool,
    from_str: bool,
    rename: Option<LitStr>,
}

impl FieldAttrs {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut attrs = FieldAttrs::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("capbind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("decode") {
                    attrs.decode = true;
                } else if meta.path.is_ident("from_str") {
                    attrs.from_str = true;
                } else if meta.path.is_ident("rename") {
                    attrs.rename = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error(
                        "unknown capbind attribute, expected `skip`, `decode`, `from_str` or `rename`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(attrs)
    }
}

#[proc_macro_derive(Record, attributes(capbind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "#[derive(Record)] does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    data.fields.span(),
                    "#[derive(Record)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "#[derive(Record)] can only be used on structs",
            ))
        }
    };

    let mut descriptors = Vec::new();
    for field in fields {
        descriptors.push(descriptor(name, field)?);
    }

    Ok(quote! {
        impl ::capbind::Record for #name {
            fn fields() -> ::std::vec::Vec<::capbind::FieldDescriptor<Self>> {
                let mut fields = ::std::vec::Vec::new();
                #(#descriptors)*
                fields
            }
        }
    })
}

fn descriptor(record: &syn::Ident, field: &Field) -> syn::Result<proc_macro2::TokenStream> {
    let attrs = FieldAttrs::parse(field)?;
    // Named fields always carry an ident.
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new(field.span(), "field has no name"));
    };
    let ty = &field.ty;
    let field_name = ident.unraw().to_string();
    let label = match &attrs.rename {
        Some(rename) => rename.value(),
        None => field_name.clone(),
    };

    // In-place decoding wins when both are requested.
    let descriptor = if attrs.decode || attrs.from_str {
        let call = if attrs.decode {
            quote! { ::capbind::DecodeText::decode_text(&mut record.#ident, text) }
        } else {
            quote! { ::capbind::decode_from_str(&mut record.#ident, text) }
        };
        quote! {
            fn decode(
                record: &mut #record,
                text: &[u8],
            ) -> ::std::result::Result<(), ::capbind::DecodeError> {
                #call
            }
            let field = ::capbind::FieldDescriptor::<#record>::decode::<#ty>(#field_name, decode);
        }
    } else {
        quote! {
            fn slot(record: &mut #record) -> &mut dyn ::std::any::Any {
                &mut record.#ident
            }
            let field = ::capbind::FieldDescriptor::<#record>::value::<#ty>(#field_name, slot);
        }
    };

    let hidden = attrs.skip || matches!(field.vis, Visibility::Inherited);
    let hide = if hidden {
        quote! { let field = field.hidden(); }
    } else {
        quote! {}
    };

    Ok(quote! {
        {
            #descriptor
            let field = field.label(#label);
            #hide
            fields.push(field);
        }
    })
}
