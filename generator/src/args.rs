use relay_bindings::{TypeRef, TypeSystem};

use crate::GenerateError;

/// Renders the parameter list of a generated method.
///
/// With `with_names` every parameter is prefixed by its [`arg_name()`]; without, only the
/// type signatures are joined. Any `Fn(&TypeSystem, &[TypeRef], bool)` closure is a renderer.
pub trait ArgumentRenderer {
    fn render(
        &self,
        types: &TypeSystem,
        inputs: &[TypeRef],
        with_names: bool,
    ) -> Result<String, GenerateError>;
}

impl<F> ArgumentRenderer for F
where
    F: Fn(&TypeSystem, &[TypeRef], bool) -> Result<String, GenerateError>,
{
    fn render(
        &self,
        types: &TypeSystem,
        inputs: &[TypeRef],
        with_names: bool,
    ) -> Result<String, GenerateError> {
        self(types, inputs, with_names)
    }
}

/// Name of the generated parameter at `index`.
pub fn arg_name(index: usize) -> String {
    format!("arg{index}")
}

/// Renders `arg0 T0, arg1 T1` using [`TypeSystem::signature()`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SignatureArgumentRenderer;

impl ArgumentRenderer for SignatureArgumentRenderer {
    fn render(
        &self,
        types: &TypeSystem,
        inputs: &[TypeRef],
        with_names: bool,
    ) -> Result<String, GenerateError> {
        let mut out = String::new();
        for (index, input) in inputs.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            if with_names {
                out.push_str(&arg_name(index));
                out.push(' ');
            }
            out.push_str(&types.signature(*input)?);
        }
        Ok(out)
    }
}
