use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};

use tracing::trace;

use crate::{builtins, Type, TypeError, TypeName};

/// A reference to a [`Type`] stored in a [`TypeSystem`].
///
/// Two handles are equal exactly when they point to the same node, so the handle is also the
/// node's identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(NonZeroU32);

impl TypeRef {
    const fn from_inner(inner: NonZeroU32) -> Self {
        Self(inner)
    }

    fn index(self) -> usize {
        let size: NonZeroUsize = self
            .0
            .try_into()
            .expect("Could not convert type reference to usize index");
        usize::from(size) - 1
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<Type #{}>", self.0)
    }
}

/// Arena of [`Type`] nodes plus the (namespace, name) registry pointing into it.
///
/// Nodes are stored wrapped in `Option`s: a slot can be [reserved](TypeSystem::reserve) before
/// its node exists, so that self-referencing and mutually referencing types can be built.
#[derive(Clone, Default)]
pub struct TypeSystem {
    types: Vec<Option<Type>>,
    names: HashMap<TypeName, TypeRef>,
}

impl TypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A type system with the [builtin primitives](builtins::BUILTIN_PRIMITIVES) registered.
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        builtins::register_builtins(&mut types).expect("Builtin names collide in empty system");
        types
    }

    /// Creates a [`TypeRef`] which points to an absent, reserved slot.
    pub fn reserve(&mut self) -> TypeRef {
        self.types.push(None);

        // The length doubles as the ID and is non-zero after the push
        let size = NonZeroUsize::new(self.types.len()).unwrap();
        let id: NonZeroU32 = size.try_into().expect("ID did not fit into 32-bit integer");

        TypeRef::from_inner(id)
    }

    /// Fills the slot pointed to by `ref_`. Returns `ref_` for convenience.
    pub fn insert(&mut self, ref_: TypeRef, value: Type) -> TypeRef {
        let slot = self
            .types
            .get_mut(ref_.index())
            .expect("Invalid type reference (out-of-bounds)");
        *slot = Some(value);
        ref_
    }

    /// Shorthand for `insert(reserve(), value)`
    pub fn create(&mut self, value: Type) -> TypeRef {
        let ref_ = self.reserve();
        self.insert(ref_, value)
    }

    pub fn is_present(&self, ref_: TypeRef) -> bool {
        matches!(self.types.get(ref_.index()), Some(Some(_)))
    }

    /// Creates `value` and registers it under (`namespace`, `name`).
    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: Type,
    ) -> Result<TypeRef, TypeError> {
        let name = TypeName::new(namespace, name);
        if self.names.contains_key(&name) {
            return Err(TypeError::DuplicateType(name));
        }
        let ref_ = self.create(value);
        trace!(%name, ?ref_, "registered type");
        self.names.insert(name, ref_);
        Ok(ref_)
    }

    /// Registers an existing (possibly still reserved) node under (`namespace`, `name`).
    pub fn register_ref(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        ref_: TypeRef,
    ) -> Result<(), TypeError> {
        match self.names.entry(TypeName::new(namespace, name)) {
            Entry::Occupied(entry) => Err(TypeError::DuplicateType(entry.key().clone())),
            Entry::Vacant(entry) => {
                trace!(name = %entry.key(), ?ref_, "registered type");
                entry.insert(ref_);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, namespace: &str, name: &str) -> Result<TypeRef, TypeError> {
        self.lookup_name(&TypeName::new(namespace, name))
    }

    pub fn lookup_name(&self, name: &TypeName) -> Result<TypeRef, TypeError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| TypeError::UnknownType(name.clone()))
    }

    pub fn get(&self, ref_: TypeRef) -> Result<&Type, TypeError> {
        self.types
            .get(ref_.index())
            .and_then(Option::as_ref)
            .ok_or(TypeError::Dangling(ref_))
    }

    /// Follows alias and reference wrappers until a node that is neither.
    ///
    /// A chain of `L` wrappers takes `L + 1` steps. Revisiting a node fails with
    /// [`TypeError::CycleDetected`].
    pub fn resolve(&self, ref_: TypeRef) -> Result<TypeRef, TypeError> {
        let mut seen = HashSet::new();
        let mut current = ref_;
        loop {
            if !seen.insert(current) {
                return Err(TypeError::CycleDetected { start: ref_ });
            }
            match self.get(current)?.wrapped() {
                Some(target) => current = target,
                None => return Ok(current),
            }
        }
    }

    /// [`resolve()`](Self::resolve) followed by [`get()`](Self::get).
    pub fn resolved(&self, ref_: TypeRef) -> Result<&Type, TypeError> {
        self.get(self.resolve(ref_)?)
    }

    /// Renders a type signature such as `map[string][]*Team`.
    ///
    /// Named types render as their name without looking further; structural types recurse
    /// into their children.
    pub fn signature(&self, ref_: TypeRef) -> Result<String, TypeError> {
        self.signature_inner(ref_, &mut Vec::new())
    }

    fn signature_inner(
        &self,
        ref_: TypeRef,
        stack: &mut Vec<TypeRef>,
    ) -> Result<String, TypeError> {
        if stack.contains(&ref_) {
            return Err(TypeError::CycleDetected { start: ref_ });
        }
        stack.push(ref_);
        let signature = match self.get(ref_)? {
            Type::Primitive(name) | Type::Alias { name, .. } => name.clone(),
            Type::Reference { name, .. } => format!("*{name}"),
            Type::Record(record) => record.name.clone(),
            Type::Tuple(elements) => format!("({})", self.signature_list(elements, stack)?),
            Type::Map { key, value } => format!(
                "map[{}]{}",
                self.signature_inner(*key, stack)?,
                self.signature_inner(*value, stack)?
            ),
            Type::List(element) => format!("[]{}", self.signature_inner(*element, stack)?),
            Type::Function(function) => {
                let inputs = self.signature_list(&function.inputs, stack)?;
                match function.outputs.as_slice() {
                    [] => format!("func({inputs})"),
                    [output] => format!("func({inputs}) {}", self.signature_inner(*output, stack)?),
                    outputs => format!(
                        "func({inputs}) ({})",
                        self.signature_list(outputs, stack)?
                    ),
                }
            }
        };
        stack.pop();
        Ok(signature)
    }

    fn signature_list(
        &self,
        refs: &[TypeRef],
        stack: &mut Vec<TypeRef>,
    ) -> Result<String, TypeError> {
        let signatures = refs
            .iter()
            .map(|ref_| self.signature_inner(*ref_, stack))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(signatures.join(", "))
    }
}
