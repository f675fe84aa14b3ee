use tera::{Context, Tera};

use super::common::{method_name, ClientHeader, ClientTemplate};
use crate::{
    generator::{GenerationContext, RequestBody},
    GenerateError,
};

const CLIENT_TEMPLATE: &str = r#"// Code generated by relay-rest-generator. DO NOT EDIT.

package {{ Package }}

import (
	"bytes"
	"net/http"
)

// {{ ClientName }} sends the operations of {{ ServiceName }} as HTTP requests.
type {{ ClientName }} struct {
	// RequestDecorator, if set, may modify or replace each request before it is sent.
	RequestDecorator func({{ TransportRequest }}) ({{ TransportRequest }}, error)
}
"#;

const METHOD_TEMPLATE: &str = r#"
// {{ MethodName }} calls {{ ServiceName }}.{{ OpName }} {{ OpType }}.
// Binding: {{ OpMethod }} {{ OpEndpoint }}, parameters in the {{ OpPlacement }}.
func (svc *{{ ClientName }}) {{ MethodName }}({{ ArgList }}) (*http.Response, error) {
	body := bytes.NewBuffer(nil)
{% for line in BodyLines %}	{{ line }}
{% endfor %}	httpreq, err := http.NewRequest("{{ OpMethod }}", "{{ OpEndpoint }}", body)
	if err != nil {
		return nil, err
	}
	httpreq.Header.Set("Content-Type", "application/json")
	if svc.RequestDecorator != nil {
		httpreq, err = svc.RequestDecorator(httpreq)
		if err != nil {
			return nil, err
		}
	}
	c := http.Client{}
	return c.Do(httpreq)
}
"#;

pub(super) struct GoTemplate;

impl ClientTemplate for GoTemplate {
    fn default_transport_request(&self) -> &'static str {
        "*http.Request"
    }

    fn render_client(&self, header: &ClientHeader) -> Result<String, GenerateError> {
        let mut context = Context::new();
        context.insert("Package", header.package);
        context.insert("ClientName", header.client_name);
        context.insert("ServiceName", header.service_name);
        context.insert("TransportRequest", header.transport_request);
        Ok(Tera::one_off(CLIENT_TEMPLATE, &context, false)?)
    }

    fn render_method(&self, generation: &GenerationContext) -> Result<String, GenerateError> {
        let mut context = Context::new();
        context.insert("ClientName", generation.client_name);
        context.insert("ServiceName", &generation.service.name);
        context.insert("OpName", generation.op_name);
        context.insert("MethodName", &method_name(generation.op_name));
        context.insert("OpType", &function_type(generation));
        context.insert("OpMethod", generation.binding.method.as_str());
        context.insert("OpEndpoint", &escape_string(&generation.binding.endpoint));
        context.insert("OpPlacement", generation.binding.placement.as_str());
        context.insert("ArgList", &generation.arg_list);
        context.insert("BodyLines", &body_lines(&generation.body));
        Ok(Tera::one_off(METHOD_TEMPLATE, &context, false)?)
    }
}

fn function_type(generation: &GenerationContext) -> String {
    let inputs = &generation.input_types;
    let outputs = &generation.output_types;
    match generation.op_type.num_outputs() {
        0 => format!("func({inputs})"),
        1 => format!("func({inputs}) {outputs}"),
        _ => format!("func({inputs}) ({outputs})"),
    }
}

fn body_lines(body: &RequestBody) -> Vec<String> {
    let mut lines = Vec::new();
    if body.is_bracketed() {
        lines.push(r#"body.WriteString("[")"#.to_owned());
    }
    for (index, call) in body.calls().iter().enumerate() {
        if index > 0 && body.is_bracketed() {
            lines.push(r#"body.WriteString(",")"#.to_owned());
        }
        lines.push(format!("{}(body, {})", call.writer, call.arg));
    }
    if body.is_bracketed() {
        lines.push(r#"body.WriteString("]")"#.to_owned());
    }
    lines
}

/// Escapes `value` for use inside a Go interpreted string literal.
fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
