use crate::{names::BUILTIN_NAMESPACE, Type, TypeError, TypeName, TypeSystem};

/// Scalars that service descriptions may use without declaring them.
pub const BUILTIN_PRIMITIVES: &[&str] = &[
    "string", "bool", "int", "int32", "int64", "uint", "float32", "float64", "bytes",
];

pub fn register_builtins(types: &mut TypeSystem) -> Result<(), TypeError> {
    for name in BUILTIN_PRIMITIVES.iter().copied() {
        types.register(BUILTIN_NAMESPACE, name, Type::Primitive(name.into()))?;
    }
    Ok(())
}

pub fn is_builtin_name(name: &TypeName) -> bool {
    name.is_builtin() && BUILTIN_PRIMITIVES.contains(&name.name.as_str())
}
