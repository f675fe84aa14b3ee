/// Naming and type choices for a generated client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Package (Go) or module documentation name of the generated client.
    pub package: String,
    pub client_prefix: String,
    pub client_suffix: String,
    /// The request type handed to the request decorator. `None` selects the target's default.
    ///
    /// Only the decorator's declared type changes. Generated method bodies still build the
    /// target's own request (`*http.Request` for Go, `reqwest::blocking::Request` for Rust),
    /// so an override must name that type or one it converts to.
    pub transport_request_type: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: "restclient".into(),
            client_prefix: String::new(),
            client_suffix: "Client".into(),
            transport_request_type: None,
        }
    }
}

impl GeneratorConfig {
    pub fn client_name(&self, service_name: &str) -> String {
        format!("{}{}{}", self.client_prefix, service_name, self.client_suffix)
    }
}
