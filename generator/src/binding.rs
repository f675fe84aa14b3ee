use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use tracing::warn;

/// Endpoint of the default binding, marking an operation whose binding is not configured yet.
pub const UNRESOLVED_ENDPOINT: &str = "__UNRESOLVED_ENDPOINT__";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an operation's arguments travel in the request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterPlacement {
    Path,
    Query,
    #[default]
    Body,
}

impl ParameterPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ParameterPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport metadata of one service operation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HttpBinding {
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(alias = "endpoint_template")]
    pub endpoint: String,
    #[serde(default)]
    pub placement: ParameterPlacement,
}

impl HttpBinding {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            placement: ParameterPlacement::Body,
        }
    }

    pub fn with_placement(mut self, placement: ParameterPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// `GET` to [`UNRESOLVED_ENDPOINT`] with the arguments in the body.
    pub fn unresolved() -> Self {
        Self::new(HttpMethod::Get, UNRESOLVED_ENDPOINT)
    }

    pub fn is_unresolved(&self) -> bool {
        self.endpoint == UNRESOLVED_ENDPOINT
    }
}

/// HTTP bindings keyed by operation name. Partial tables are expected.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct BindingTable {
    entries: HashMap<String, HttpBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        operation: impl Into<String>,
        binding: HttpBinding,
    ) -> Option<HttpBinding> {
        self.entries.insert(operation.into(), binding)
    }

    pub fn with(mut self, operation: impl Into<String>, binding: HttpBinding) -> Self {
        self.insert(operation, binding);
        self
    }

    pub fn get(&self, operation: &str) -> Option<&HttpBinding> {
        self.entries.get(operation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured binding, or [`HttpBinding::unresolved()`] if there is none.
    pub fn binding_for(&self, operation: &str) -> HttpBinding {
        match self.entries.get(operation) {
            Some(binding) => binding.clone(),
            None => {
                warn!(operation, "no HTTP binding configured, using {UNRESOLVED_ENDPOINT}");
                HttpBinding::unresolved()
            }
        }
    }
}

impl FromIterator<(String, HttpBinding)> for BindingTable {
    fn from_iter<I: IntoIterator<Item = (String, HttpBinding)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
