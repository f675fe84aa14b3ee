//! Type model and type system consumed by the binding generators.
//!
//! A [`TypeSystem`] owns every [`Type`] node in an arena and hands out [`TypeRef`] handles.
//! Composite types refer to their children through these handles, which is what allows
//! alias and reference chains to be built in any order (and to be detected when they loop).

pub mod builtins;
pub mod error;
pub mod names;
pub mod types;

mod type_system;

pub use error::TypeError;
pub use names::TypeName;
pub use type_system::{TypeRef, TypeSystem};
pub use types::{Field, FunctionType, RecordType, Type, TypeKind};
