use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

struct ExposedField {
    ident: Ident,
    name: String,
}

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Document derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Document derive: only structs are supported",
            ))
        }
    };

    let mut exposed = Vec::new();
    let mut persisted: Option<Ident> = None;

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };

        let mut skip = false;
        let mut is_persisted = false;
        let mut rename = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("document") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("persisted") {
                    is_persisted = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip`, `persisted` or `rename = \"...\"`"))
                }
            })?;
        }

        if is_persisted {
            if persisted.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[document(persisted)]",
                ));
            }
            persisted = Some(ident);
            continue;
        }

        if skip {
            continue;
        }

        let name = rename.unwrap_or_else(|| ident.unraw().to_string());
        exposed.push(ExposedField { ident, name });
    }

    let read_arms = exposed.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        quote! {
            #name => ::autonumber_rust::FieldValue::to_field_value(&self.#ident),
        }
    });

    let set_arms = exposed.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        quote! {
            #name => ::autonumber_rust::FieldValue::is_set(&self.#ident),
        }
    });

    let write_arms = exposed.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        quote! {
            #name => match ::autonumber_rust::FieldValue::from_field_value(value.clone()) {
                ::core::option::Option::Some(parsed) => {
                    self.#ident = parsed;
                    ::core::result::Result::Ok(())
                }
                ::core::option::Option::None => ::core::result::Result::Err(
                    ::autonumber_rust::DocumentError::InvalidValue {
                        field: ::std::string::ToString::to_string(name),
                        value,
                    },
                ),
            },
        }
    });

    let lifecycle = persisted.map(|flag| {
        quote! {
            fn is_new(&self) -> bool {
                !self.#flag
            }

            fn mark_persisted(&mut self) {
                self.#flag = true;
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::autonumber_rust::Document for #name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::std::string::String> {
                match name {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_is_set(&self, name: &str) -> bool {
                match name {
                    #(#set_arms)*
                    _ => false,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: ::std::string::String,
            ) -> ::core::result::Result<(), ::autonumber_rust::DocumentError> {
                match name {
                    #(#write_arms)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Err(
                            ::autonumber_rust::DocumentError::UnknownField(
                                ::std::string::ToString::to_string(name),
                            ),
                        )
                    }
                }
            }

            #lifecycle
        }
    })
}
