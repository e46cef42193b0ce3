use proc_macro::TokenStream;
use quote::quote;

use syn::spanned::Spanned as _;
use syn::{Attribute, Data, DeriveInput, Error, GenericArgument, PathArguments, Type};

const INJECT_ATTR: &str = "inject";

fn extract_rc_type(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Rc"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner.clone());
    }
    None
}

fn has_default_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident(INJECT_ATTR)
            && attr
                .parse_args::<syn::Ident>()
                .map(|ident| ident == "default")
                .unwrap_or(false)
    })
}

/// Derive macro for Injectable trait
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    handle_derive_injectable(input)
}

fn handle_derive_injectable(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        _ => {
            return TokenStream::from(
                Error::new(name.span(), "Only structs are supported").to_compile_error(),
            );
        }
    };

    let mut field_lets = Vec::new();
    let mut field_inits = Vec::new();

    match fields {
        syn::Fields::Named(fields) => {
            for field in &fields.named {
                let field_ident = field.ident.as_ref().unwrap();
                let field_ty = &field.ty;

                if has_default_attr(&field.attrs) {
                    field_lets.push(quote! {
                        let #field_ident: #field_ty = ::std::default::Default::default();
                    });
                } else if extract_rc_type(field_ty).is_some() {
                    field_lets.push(quote! {
                        let #field_ident: #field_ty = cx.resolve()?;
                    });
                } else {
                    return TokenStream::from(
                        Error::new(
                            field_ty.span(),
                            format!(
                                "Injectable fields must be of type Rc<T> or use #[{INJECT_ATTR}(default)]",
                            ),
                        )
                        .to_compile_error(),
                    );
                }

                field_inits.push(quote! { #field_ident: #field_ident });
            }
        }
        syn::Fields::Unnamed(_) => {
            return TokenStream::from(
                Error::new(
                    proc_macro2::Span::call_site(),
                    "Tuple structs are not supported",
                )
                .to_compile_error(),
            );
        }
        syn::Fields::Unit => {}
    }

    quote! {
        impl ::solder::Injectable for #name {
            fn inject(
                cx: &::solder::ResolveContext<'_>,
            ) -> Result<Self, ::solder::ResolveError> {
                #(#field_lets)*
                Ok(Self {
                    #(#field_inits,)*
                })
            }
        }
    }
    .into()
}
