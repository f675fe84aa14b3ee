use relay_bindings::{Type, TypeRef, TypeSystem};

use crate::GenerateError;

pub const MAP_WRITER: &str = "Write_Map";
pub const LIST_WRITER: &str = "Write_List";

/// Name of the routine that writes a value of type `ref_` into a request body.
///
/// Maps and lists share one generic writer each; their element types are not part of the
/// name. Tuples and functions have no writer in the JSON binding.
pub fn writer_name_for(types: &TypeSystem, ref_: TypeRef) -> Result<String, GenerateError> {
    let name = match types.resolved(ref_)? {
        Type::Primitive(name) => format!("Write_{name}"),
        Type::Record(record) => format!("Write_{}", record.name),
        Type::Map { .. } => MAP_WRITER.to_owned(),
        Type::List(_) => LIST_WRITER.to_owned(),
        unsupported @ (Type::Tuple(_) | Type::Function(_)) => {
            return Err(GenerateError::UnsupportedType {
                kind: unsupported.kind(),
            })
        }
        Type::Alias { .. } | Type::Reference { .. } => {
            unreachable!("resolution strips aliases and references")
        }
    };
    Ok(name)
}
