use crate::{generator::GenerationContext, GenerateError};

/// Values interpolated into the client class header.
#[derive(Copy, Clone, Debug)]
pub struct ClientHeader<'a> {
    pub client_name: &'a str,
    pub service_name: &'a str,
    pub package: &'a str,
    pub transport_request: &'a str,
}

/// Renders generated client code for one output language.
pub trait ClientTemplate {
    /// Request type handed to the request decorator when none is configured.
    fn default_transport_request(&self) -> &'static str;

    fn render_client(&self, header: &ClientHeader) -> Result<String, GenerateError>;

    fn render_method(&self, context: &GenerationContext) -> Result<String, GenerateError>;
}

/// Name of the generated method sending `op_name`.
pub fn method_name(op_name: &str) -> String {
    format!("Send{op_name}Request")
}
