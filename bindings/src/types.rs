use std::fmt;

use crate::TypeRef;

/// The variant of a [`Type`], without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Alias,
    Reference,
    Record,
    Tuple,
    Map,
    List,
    Function,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Alias => "alias",
            Self::Reference => "reference",
            Self::Record => "record",
            Self::Tuple => "tuple",
            Self::Map => "map",
            Self::List => "list",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_: TypeRef,
}

impl Field {
    pub fn new(name: impl Into<String>, type_: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_,
        }
    }
}

/// A named structure. Services are records whose fields are [functions](FunctionType).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, type_: TypeRef) -> Self {
        self.fields.push(Field::new(name, type_));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// An operation signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionType {
    pub inputs: Vec<TypeRef>,
    pub outputs: Vec<TypeRef>,
}

impl FunctionType {
    pub fn new(inputs: Vec<TypeRef>, outputs: Vec<TypeRef>) -> Self {
        Self { inputs, outputs }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// A named scalar; the name doubles as its writer key.
    Primitive(String),
    Alias { name: String, target: TypeRef },
    Reference { name: String, target: TypeRef },
    Record(RecordType),
    Tuple(Vec<TypeRef>),
    Map { key: TypeRef, value: TypeRef },
    List(TypeRef),
    Function(FunctionType),
}

impl Type {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Alias { .. } => TypeKind::Alias,
            Self::Reference { .. } => TypeKind::Reference,
            Self::Record(_) => TypeKind::Record,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::Map { .. } => TypeKind::Map,
            Self::List(_) => TypeKind::List,
            Self::Function(_) => TypeKind::Function,
        }
    }

    /// The declared name, for the variants that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Primitive(name) | Self::Alias { name, .. } | Self::Reference { name, .. } => {
                Some(name.as_str())
            }
            Self::Record(record) => Some(record.name.as_str()),
            Self::Tuple(_) | Self::Map { .. } | Self::List(_) | Self::Function(_) => None,
        }
    }

    /// The target of an alias or reference; `None` for every other variant.
    pub fn wrapped(&self) -> Option<TypeRef> {
        match self {
            Self::Alias { target, .. } | Self::Reference { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }
}
