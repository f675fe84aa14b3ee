//! TOML description of a type catalog and its HTTP bindings.
//!
//! ```toml
//! [[types]]
//! namespace = "msg"
//! name = "TeamService"
//! kind = "record"
//! fields = [
//!   { name = "CreateTeam", type = { function = { inputs = ["Team"], outputs = ["Team"] } } },
//! ]
//!
//! [bindings.CreateTeam]
//! method = "POST"
//! endpoint = "/teams/"
//! ```

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use relay_bindings::{
    names::BUILTIN_NAMESPACE, FunctionType, RecordType, Type, TypeError, TypeName, TypeRef,
    TypeSystem,
};

use crate::binding::BindingTable;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Type(#[from] TypeError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
    #[serde(default)]
    pub bindings: BindingTable,
}

#[derive(Debug, Deserialize)]
pub struct TypeDeclaration {
    pub namespace: String,
    pub name: String,
    #[serde(flatten)]
    pub definition: Definition,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Primitive,
    Alias { target: TypeExpr },
    Reference { target: TypeExpr },
    Record { fields: Vec<FieldDeclaration> },
}

#[derive(Debug, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeExpr,
}

/// A type name or an anonymous structural type.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Named(String),
    Compound(CompoundExpr),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundExpr {
    List(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Tuple(Vec<TypeExpr>),
    Function {
        #[serde(default)]
        inputs: Vec<TypeExpr>,
        #[serde(default)]
        outputs: Vec<TypeExpr>,
    },
}

impl Manifest {
    pub fn from_toml(source: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(source)?)
    }

    /// Registers every declared type in `types`.
    ///
    /// Declarations may refer to each other in any order. On error `types` is left unchanged.
    pub fn populate(&self, types: &mut TypeSystem) -> Result<(), ManifestError> {
        let mut staged = types.clone();
        let mut reserved = Vec::with_capacity(self.types.len());
        for declaration in &self.types {
            let ref_ = staged.reserve();
            staged.register_ref(&declaration.namespace, &declaration.name, ref_)?;
            reserved.push(ref_);
        }

        for (declaration, ref_) in self.types.iter().zip(reserved) {
            let value = declaration.to_type(&mut staged)?;
            staged.insert(ref_, value);
            debug!(
                name = %TypeName::new(&declaration.namespace, &declaration.name),
                "declared type"
            );
        }
        *types = staged;
        Ok(())
    }
}

impl TypeDeclaration {
    fn to_type(&self, types: &mut TypeSystem) -> Result<Type, TypeError> {
        let namespace = self.namespace.as_str();
        Ok(match &self.definition {
            Definition::Primitive => Type::Primitive(self.name.clone()),
            Definition::Alias { target } => Type::Alias {
                name: self.name.clone(),
                target: target.to_ref(namespace, types)?,
            },
            Definition::Reference { target } => Type::Reference {
                name: target.type_name().unwrap_or(&self.name).to_owned(),
                target: target.to_ref(namespace, types)?,
            },
            Definition::Record { fields } => {
                let mut record = RecordType::new(self.name.as_str());
                for field in fields {
                    let type_ = field.type_.to_ref(namespace, types)?;
                    record = record.with_field(field.name.as_str(), type_);
                }
                Type::Record(record)
            }
        })
    }
}

impl TypeExpr {
    /// The unqualified name of a named type.
    fn type_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(
                name.rsplit_once('.')
                    .map_or(name.as_str(), |(_, name)| name),
            ),
            Self::Compound(_) => None,
        }
    }

    fn to_ref(&self, namespace: &str, types: &mut TypeSystem) -> Result<TypeRef, TypeError> {
        let compound = match self {
            Self::Named(name) => return lookup(namespace, name, types),
            Self::Compound(compound) => compound,
        };
        let value = match compound {
            CompoundExpr::List(element) => Type::List(element.to_ref(namespace, types)?),
            CompoundExpr::Map { key, value } => Type::Map {
                key: key.to_ref(namespace, types)?,
                value: value.to_ref(namespace, types)?,
            },
            CompoundExpr::Tuple(members) => Type::Tuple(to_refs(members, namespace, types)?),
            CompoundExpr::Function { inputs, outputs } => Type::Function(FunctionType::new(
                to_refs(inputs, namespace, types)?,
                to_refs(outputs, namespace, types)?,
            )),
        };
        Ok(types.create(value))
    }
}

fn to_refs(
    exprs: &[TypeExpr],
    namespace: &str,
    types: &mut TypeSystem,
) -> Result<Vec<TypeRef>, TypeError> {
    exprs
        .iter()
        .map(|expr| expr.to_ref(namespace, types))
        .collect()
}

/// Looks up `ns.Name` as written, or a bare name in `namespace` and then among the builtins.
fn lookup(namespace: &str, name: &str, types: &TypeSystem) -> Result<TypeRef, TypeError> {
    if let Some(qualified) = TypeName::parse_qualified(name) {
        return types.lookup_name(&qualified);
    }
    types
        .lookup(namespace, name)
        .or_else(|_| types.lookup(BUILTIN_NAMESPACE, name))
        .map_err(|_| TypeError::UnknownType(TypeName::new(namespace, name)))
}
