use syn::{
    __private::Span, parse_quote, Ident, ItemImpl, ItemStruct, Signature, Stmt, Type as SynType,
};

use relay_bindings::{Type, TypeError, TypeRef, TypeSystem};

use super::common::{method_name, ClientHeader, ClientTemplate};
use crate::{
    args::{arg_name, ArgumentRenderer},
    generator::GenerationContext,
    GenerateError,
};

use check_keyword::CheckKeyword;
use heck::ToPascalCase;

fn name_to_ident(name: &str) -> Result<Ident, syn::Error> {
    if ["crate", "self", "super", "Self"].contains(&name) {
        // These are keywords that are not allowed as raw identifiers
        syn::parse_str(&format!("{}_", name))
    } else if name.is_keyword() {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        syn::parse_str(name)
    }
}

fn builtin_rust_type(name: &str) -> Option<&'static str> {
    Some(match name {
        "string" => "String",
        "bool" => "bool",
        "int" | "int64" => "i64",
        "int32" => "i32",
        "uint" => "u64",
        "float32" => "f32",
        "float64" => "f64",
        "bytes" => "Vec<u8>",
        _ => return None,
    })
}

/// Renders `arg0: T0, arg1: T1` with Rust spellings of the parameter types.
#[derive(Copy, Clone, Debug, Default)]
pub struct RustArgumentRenderer;

impl RustArgumentRenderer {
    fn rust_type(
        types: &TypeSystem,
        ref_: TypeRef,
        stack: &mut Vec<TypeRef>,
    ) -> Result<String, GenerateError> {
        if stack.contains(&ref_) {
            return Err(TypeError::CycleDetected { start: ref_ }.into());
        }
        stack.push(ref_);
        let rendered = match types.get(ref_)? {
            Type::Primitive(name) => match builtin_rust_type(name) {
                Some(builtin) => builtin.to_owned(),
                None => name.to_pascal_case(),
            },
            Type::Alias { name, .. } => name.to_pascal_case(),
            Type::Record(record) => record.name.to_pascal_case(),
            Type::Reference { target, .. } => {
                format!("&{}", Self::rust_type(types, *target, stack)?)
            }
            Type::List(element) => format!("Vec<{}>", Self::rust_type(types, *element, stack)?),
            Type::Map { key, value } => format!(
                "std::collections::HashMap<{}, {}>",
                Self::rust_type(types, *key, stack)?,
                Self::rust_type(types, *value, stack)?
            ),
            Type::Tuple(members) => {
                let rendered = Self::join(types, members, stack)?;
                if members.len() == 1 {
                    format!("({rendered},)")
                } else {
                    format!("({rendered})")
                }
            }
            Type::Function(function) => {
                let inputs = Self::join(types, &function.inputs, stack)?;
                let outputs = Self::join(types, &function.outputs, stack)?;
                match function.num_outputs() {
                    0 => format!("fn({inputs})"),
                    1 => format!("fn({inputs}) -> {outputs}"),
                    _ => format!("fn({inputs}) -> ({outputs})"),
                }
            }
        };
        stack.pop();
        Ok(rendered)
    }

    fn join(
        types: &TypeSystem,
        refs: &[TypeRef],
        stack: &mut Vec<TypeRef>,
    ) -> Result<String, GenerateError> {
        let rendered = refs
            .iter()
            .map(|ref_| Self::rust_type(types, *ref_, stack))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join(", "))
    }
}

impl ArgumentRenderer for RustArgumentRenderer {
    fn render(
        &self,
        types: &TypeSystem,
        inputs: &[TypeRef],
        with_names: bool,
    ) -> Result<String, GenerateError> {
        let mut stack = Vec::new();
        let rendered = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let type_ = Self::rust_type(types, *input, &mut stack)?;
                Ok(if with_names {
                    format!("{}: {type_}", arg_name(index))
                } else {
                    type_
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;
        Ok(rendered.join(", "))
    }
}

pub(super) struct RustTemplate;

impl ClientTemplate for RustTemplate {
    fn default_transport_request(&self) -> &'static str {
        "reqwest::blocking::Request"
    }

    fn render_client(&self, header: &ClientHeader) -> Result<String, GenerateError> {
        let client = name_to_ident(header.client_name)?;
        let request: SynType = syn::parse_str(header.transport_request)?;

        let doc_comment = format!(
            "Generated by {} {} for package `{}`",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            header.package
        );
        let client_doc = format!(
            "Sends the operations of `{}` as HTTP requests.",
            header.service_name
        );
        let client_struct: ItemStruct = parse_quote! {
            #[doc = #client_doc]
            #[derive(Default)]
            pub struct #client {
                /// Applied to each request before it is sent.
                pub request_decorator: Option<Box<dyn Fn(#request) -> Result<#request, Box<dyn std::error::Error>>>>,
            }
        };
        let root = syn::File {
            shebang: None,
            attrs: vec![
                parse_quote!(#![doc = #doc_comment]),
                parse_quote!(#![allow(non_snake_case, dead_code, unused_mut)]),
            ],
            items: vec![client_struct.into()],
        };
        Ok(prettyplease::unparse(&root))
    }

    fn render_method(&self, context: &GenerationContext) -> Result<String, GenerateError> {
        let client = name_to_ident(context.client_name)?;
        let method = name_to_ident(&method_name(context.op_name))?;
        let signature: Signature =
            syn::parse_str(&format!("fn {method}(&self, {})", context.arg_list))?;
        let inputs = signature.inputs;

        let body = &context.body;
        let mut writes: Vec<Stmt> = Vec::new();
        if body.is_bracketed() {
            writes.push(parse_quote!(body.push(b'[');));
        }
        for (index, call) in body.calls().iter().enumerate() {
            if index > 0 && body.is_bracketed() {
                writes.push(parse_quote!(body.push(b',');));
            }
            let writer = name_to_ident(&call.writer)?;
            let arg = name_to_ident(&call.arg)?;
            writes.push(parse_quote!(#writer(&mut body, &#arg)?;));
        }
        if body.is_bracketed() {
            writes.push(parse_quote!(body.push(b']');));
        }

        let http_method = Ident::new(context.binding.method.as_str(), Span::call_site());
        let endpoint = context.binding.endpoint.as_str();
        let doc = format!(
            " Calls `{}.{}`. Binding: {} {}, parameters in the {}.",
            context.service.name,
            context.op_name,
            context.binding.method,
            context.binding.endpoint,
            context.binding.placement
        );
        let item: ItemImpl = parse_quote! {
            impl #client {
                #[doc = #doc]
                pub fn #method(#inputs) -> Result<reqwest::blocking::Response, Box<dyn std::error::Error>> {
                    let mut body: Vec<u8> = Vec::new();
                    #(#writes)*
                    let client = reqwest::blocking::Client::new();
                    let mut request = client
                        .request(reqwest::Method::#http_method, #endpoint)
                        .header("Content-Type", "application/json")
                        .body(body)
                        .build()?;
                    if let Some(decorate) = &self.request_decorator {
                        request = decorate(request)?;
                    }
                    Ok(client.execute(request)?)
                }
            }
        };
        let root = syn::File {
            shebang: None,
            attrs: vec![],
            items: vec![item.into()],
        };
        Ok(prettyplease::unparse(&root))
    }
}
