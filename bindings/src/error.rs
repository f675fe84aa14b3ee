use thiserror::Error;

use crate::{TypeName, TypeRef};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unknown type {0}")]
    UnknownType(TypeName),
    #[error("type {0} is already registered")]
    DuplicateType(TypeName),
    #[error("cycle detected while resolving {start:?}")]
    CycleDetected { start: TypeRef },
    #[error("type reference {0:?} does not point to a populated type")]
    Dangling(TypeRef),
}
