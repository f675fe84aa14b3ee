use relay_bindings::{TypeError, TypeKind, TypeName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error("{0} is not a record type and cannot describe a service")]
    NotARecord(TypeName),
    #[error("{kind} types have no generated writer")]
    UnsupportedType { kind: TypeKind },
    #[error("field {field:?} of service {service} is not an operation")]
    NotAnOperation { service: TypeName, field: String },
    #[error("no service selected, the client class has to be emitted first")]
    NoServiceSelected,
    #[cfg(feature = "generator-go")]
    #[error("failed to render template")]
    Template(#[from] tera::Error),
    #[cfg(feature = "generator-rust")]
    #[error("generated code is not valid Rust")]
    Syntax(#[from] syn::Error),
    #[error("failed to write generated code")]
    Io(#[from] std::io::Error),
}
