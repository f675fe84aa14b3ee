//! Generates REST client stubs from the service records of a [`TypeSystem`].
//!
//! [`TypeSystem`]: relay_bindings::TypeSystem

pub mod args;
pub mod binding;
pub mod config;
mod error;
pub mod generator;
pub mod manifest;
pub mod targets;
pub mod writer;

pub use args::{ArgumentRenderer, SignatureArgumentRenderer};
pub use binding::{BindingTable, HttpBinding, HttpMethod, ParameterPlacement, UNRESOLVED_ENDPOINT};
pub use config::GeneratorConfig;
pub use error::GenerateError;
pub use generator::{Generator, ServiceReport};
pub use manifest::{Manifest, ManifestError};
pub use targets::Target;
pub use writer::writer_name_for;
