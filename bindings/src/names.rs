use std::fmt;

/// Namespace of the [builtin](crate::builtins) primitives.
pub const BUILTIN_NAMESPACE: &str = "";

/// The (namespace, name) key under which a type is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_builtin() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(BUILTIN_NAMESPACE, name)
    }

    pub fn is_builtin(&self) -> bool {
        self.namespace == BUILTIN_NAMESPACE
    }

    /// Splits `ns.Name` at the last dot. Returns `None` for unqualified names.
    pub fn parse_qualified(source: &str) -> Option<Self> {
        source
            .rsplit_once('.')
            .map(|(namespace, name)| Self::new(namespace, name))
    }
}
