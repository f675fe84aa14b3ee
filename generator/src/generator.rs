use std::io::Write;

use tracing::{debug, warn};

use relay_bindings::{Field, FunctionType, RecordType, TypeName, TypeRef, TypeSystem};

use crate::{
    args::{arg_name, ArgumentRenderer},
    binding::{BindingTable, HttpBinding},
    config::GeneratorConfig,
    targets::{ClientHeader, ClientTemplate, Target},
    writer::writer_name_for,
    GenerateError,
};

/// Serialization of one argument into the request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterCall {
    pub writer: String,
    pub arg: String,
}

/// The writer calls filling the request body of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Single(WriterCall),
    /// Several arguments, written as the elements of a JSON array.
    Sequence(Vec<WriterCall>),
}

impl RequestBody {
    pub fn assemble(types: &TypeSystem, inputs: &[TypeRef]) -> Result<Self, GenerateError> {
        let mut calls = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                Ok(WriterCall {
                    writer: writer_name_for(types, *input)?,
                    arg: arg_name(index),
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;

        Ok(match calls.len() {
            0 => Self::Empty,
            1 => Self::Single(calls.remove(0)),
            _ => Self::Sequence(calls),
        })
    }

    pub fn calls(&self) -> &[WriterCall] {
        match self {
            Self::Empty => &[],
            Self::Single(call) => std::slice::from_ref(call),
            Self::Sequence(calls) => calls,
        }
    }

    pub fn is_bracketed(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}

/// Everything a template needs to render one operation method.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    pub client_name: &'a str,
    pub service: &'a RecordType,
    pub op_name: &'a str,
    pub op_type: &'a FunctionType,
    pub binding: HttpBinding,
    /// Parameter list with names, as rendered by the argument renderer.
    pub arg_list: String,
    pub input_types: String,
    pub output_types: String,
    pub body: RequestBody,
}

/// Outcome of [`Generator::emit_service()`].
#[derive(Debug, Default)]
pub struct ServiceReport {
    pub emitted: Vec<String>,
    pub failed: Vec<(String, GenerateError)>,
}

impl ServiceReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

struct SelectedService<'t> {
    name: TypeName,
    client_name: String,
    record: &'t RecordType,
}

/// Emits REST client stubs for services of a [`TypeSystem`].
pub struct Generator<'t> {
    types: &'t TypeSystem,
    bindings: BindingTable,
    config: GeneratorConfig,
    template: Box<dyn ClientTemplate>,
    arg_renderer: Box<dyn ArgumentRenderer>,
    service: Option<SelectedService<'t>>,
}

impl<'t> Generator<'t> {
    pub fn new(
        types: &'t TypeSystem,
        bindings: BindingTable,
        config: GeneratorConfig,
        target: Target,
    ) -> Self {
        Self {
            types,
            bindings,
            config,
            template: target.template(),
            arg_renderer: target.argument_renderer(),
            service: None,
        }
    }

    pub fn with_argument_renderer(mut self, renderer: impl ArgumentRenderer + 'static) -> Self {
        self.arg_renderer = Box::new(renderer);
        self
    }

    /// Name of the client class emitted last.
    pub fn client_name(&self) -> Option<&str> {
        self.service
            .as_ref()
            .map(|service| service.client_name.as_str())
    }

    /// Writes the client class for the service `namespace.name` and selects it for
    /// [`Self::emit_operation_method()`].
    ///
    /// The previous selection is dropped even if this call fails.
    pub fn emit_client_class(
        &mut self,
        namespace: &str,
        name: &str,
        output: &mut dyn Write,
    ) -> Result<(), GenerateError> {
        self.service = None;
        let types = self.types;
        let service_name = TypeName::new(namespace, name);
        let service_ref = types.lookup_name(&service_name)?;
        let record = types
            .resolved(service_ref)?
            .as_record()
            .ok_or_else(|| GenerateError::NotARecord(service_name.clone()))?;

        let client_name = self.config.client_name(name);
        let default_request = self.template.default_transport_request();
        let transport_request = match &self.config.transport_request_type {
            Some(request) => {
                if request != default_request {
                    warn!(
                        request = %request,
                        built = default_request,
                        "decorator request type differs from the request the client builds"
                    );
                }
                request.as_str()
            }
            None => default_request,
        };
        let rendered = self.template.render_client(&ClientHeader {
            client_name: &client_name,
            service_name: name,
            package: &self.config.package,
            transport_request,
        })?;
        output.write_all(rendered.as_bytes())?;
        debug!(service = %service_name, client = %client_name, "emitted client class");

        self.service = Some(SelectedService {
            name: service_name,
            client_name,
            record,
        });
        Ok(())
    }

    /// Writes the method sending `op_name` for the selected service.
    ///
    /// Nothing is written if generation fails.
    pub fn emit_operation_method(
        &self,
        op_name: &str,
        op_type: &FunctionType,
        output: &mut dyn Write,
    ) -> Result<(), GenerateError> {
        let service = self
            .service
            .as_ref()
            .ok_or(GenerateError::NoServiceSelected)?;

        let body = RequestBody::assemble(self.types, &op_type.inputs)?;
        let arg_list = self.arg_renderer.render(self.types, &op_type.inputs, true)?;
        let input_types = self.arg_renderer.render(self.types, &op_type.inputs, false)?;
        let output_types = self.arg_renderer.render(self.types, &op_type.outputs, false)?;
        let context = GenerationContext {
            client_name: &service.client_name,
            service: service.record,
            op_name,
            op_type,
            binding: self.bindings.binding_for(op_name),
            arg_list,
            input_types,
            output_types,
            body,
        };

        let rendered = self.template.render_method(&context)?;
        output.write_all(rendered.as_bytes())?;
        debug!(
            operation = op_name,
            method = %context.binding.method,
            endpoint = %context.binding.endpoint,
            "emitted operation method"
        );
        Ok(())
    }

    /// The operations of the selected service, in declaration order.
    pub fn operations(&self) -> Result<Vec<(&'t str, &'t FunctionType)>, GenerateError> {
        let service = self
            .service
            .as_ref()
            .ok_or(GenerateError::NoServiceSelected)?;
        let record: &'t RecordType = service.record;
        record
            .fields
            .iter()
            .map(|field| self.operation(&service.name, field))
            .collect()
    }

    fn operation(
        &self,
        service: &TypeName,
        field: &'t Field,
    ) -> Result<(&'t str, &'t FunctionType), GenerateError> {
        match self.types.resolved(field.type_)?.as_function() {
            Some(op_type) => Ok((field.name.as_str(), op_type)),
            None => Err(GenerateError::NotAnOperation {
                service: service.clone(),
                field: field.name.clone(),
            }),
        }
    }

    /// Emits the client class and every operation of the service.
    ///
    /// Failing operations are recorded in the report and skipped. Errors of the client class
    /// and of the output stream end the run.
    pub fn emit_service(
        &mut self,
        namespace: &str,
        name: &str,
        output: &mut dyn Write,
    ) -> Result<ServiceReport, GenerateError> {
        self.emit_client_class(namespace, name, output)?;
        let (service_name, record) = match &self.service {
            Some(service) => (service.name.clone(), service.record),
            None => return Err(GenerateError::NoServiceSelected),
        };

        let mut report = ServiceReport::default();
        for field in &record.fields {
            let result = self
                .operation(&service_name, field)
                .and_then(|(op_name, op_type)| {
                    self.emit_operation_method(op_name, op_type, output)
                });
            match result {
                Ok(()) => report.emitted.push(field.name.clone()),
                Err(GenerateError::Io(error)) => return Err(GenerateError::Io(error)),
                Err(error) => {
                    warn!(
                        service = %service_name,
                        operation = %field.name,
                        %error,
                        "skipping operation"
                    );
                    report.failed.push((field.name.clone(), error));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(all(test, feature = "generator-go"))]
mod tests {
    use relay_bindings::{Type, TypeError, TypeKind};

    use super::*;
    use crate::binding::{HttpMethod, UNRESOLVED_ENDPOINT};

    struct Catalog {
        types: TypeSystem,
    }

    /// `msg.Team`, `msg.Greeter` and `msg.TeamService`.
    fn catalog() -> Catalog {
        let mut types = TypeSystem::with_builtins();
        let string = types.lookup("", "string").unwrap();
        let int64 = types.lookup("", "int64").unwrap();

        let team = types
            .register(
                "msg",
                "Team",
                Type::Record(RecordType::new("Team").with_field("Id", string)),
            )
            .unwrap();
        let team_ref = types.create(Type::Reference {
            name: "Team".into(),
            target: team,
        });
        let pair = types.create(Type::Tuple(vec![string, int64]));
        let teams = types.create(Type::List(team_ref));

        let say_hello = types.create(Type::Function(FunctionType::new(vec![string], vec![string])));
        types
            .register(
                "msg",
                "Greeter",
                Type::Record(RecordType::new("Greeter").with_field("SayHello", say_hello)),
            )
            .unwrap();

        let create = types.create(Type::Function(FunctionType::new(vec![team], vec![team])));
        let pairing = types.create(Type::Function(FunctionType::new(vec![pair], vec![])));
        let list = types.create(Type::Function(FunctionType::new(vec![], vec![teams])));
        let rename = types.create(Type::Function(FunctionType::new(
            vec![team_ref, string, int64],
            vec![team],
        )));
        types
            .register(
                "msg",
                "TeamService",
                Type::Record(
                    RecordType::new("TeamService")
                        .with_field("CreateTeam", create)
                        .with_field("PairTeams", pairing)
                        .with_field("ListTeams", list)
                        .with_field("RenameTeam", rename),
                ),
            )
            .unwrap();

        Catalog { types }
    }

    fn generator(catalog: &Catalog, bindings: BindingTable) -> Generator<'_> {
        Generator::new(
            &catalog.types,
            bindings,
            GeneratorConfig::default(),
            Target::Go,
        )
    }

    fn operation<'t>(generator: &Generator<'t>, name: &str) -> &'t FunctionType {
        generator
            .operations()
            .unwrap()
            .into_iter()
            .find(|(op_name, _)| *op_name == name)
            .map(|(_, op_type)| op_type)
            .unwrap()
    }

    #[test]
    fn greeter_round_trip() {
        let catalog = catalog();
        let bindings = BindingTable::new().with(
            "SayHello",
            HttpBinding::new(HttpMethod::Post, "https://greeter.example/hello"),
        );
        let mut generator = generator(&catalog, bindings);
        let mut out = Vec::new();

        generator.emit_client_class("msg", "Greeter", &mut out).unwrap();
        let op_type = operation(&generator, "SayHello");
        generator
            .emit_operation_method("SayHello", op_type, &mut out)
            .unwrap();

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("type GreeterClient struct"));
        assert!(code.contains(
            "func (svc *GreeterClient) SendSayHelloRequest(arg0 string) (*http.Response, error)"
        ));
        assert_eq!(code.matches("Write_").count(), 1);
        assert!(code.contains("Write_string(body, arg0)"));
        assert!(code.contains(r#"http.NewRequest("POST", "https://greeter.example/hello", body)"#));
        assert!(code.contains(r#"httpreq.Header.Set("Content-Type", "application/json")"#));
        assert!(!code.contains("body.WriteString"));
    }

    #[test]
    fn missing_binding_uses_sentinel() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        generator.emit_client_class("msg", "TeamService", &mut out).unwrap();
        let op_type = operation(&generator, "CreateTeam");
        generator
            .emit_operation_method("CreateTeam", op_type, &mut out)
            .unwrap();

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains(&format!(
            r#"http.NewRequest("GET", "{UNRESOLVED_ENDPOINT}", body)"#
        )));
        assert!(code.contains("SendCreateTeamRequest(arg0 Team)"));
        assert!(code.contains("Write_Team(body, arg0)"));
    }

    #[test]
    fn tuple_argument_fails_without_output() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut header = Vec::new();
        generator
            .emit_client_class("msg", "TeamService", &mut header)
            .unwrap();

        let mut out = Vec::new();
        let op_type = operation(&generator, "PairTeams");
        let result = generator.emit_operation_method("PairTeams", op_type, &mut out);

        assert!(matches!(
            result,
            Err(GenerateError::UnsupportedType {
                kind: TypeKind::Tuple
            })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn no_inputs_write_an_empty_body() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut header = Vec::new();
        generator
            .emit_client_class("msg", "TeamService", &mut header)
            .unwrap();

        let mut out = Vec::new();
        let op_type = operation(&generator, "ListTeams");
        generator
            .emit_operation_method("ListTeams", op_type, &mut out)
            .unwrap();

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("SendListTeamsRequest()"));
        assert!(code.contains("body := bytes.NewBuffer(nil)"));
        assert!(!code.contains("Write_"));
    }

    #[test]
    fn several_inputs_are_bracketed_in_order() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut header = Vec::new();
        generator
            .emit_client_class("msg", "TeamService", &mut header)
            .unwrap();

        let mut out = Vec::new();
        let op_type = operation(&generator, "RenameTeam");
        generator
            .emit_operation_method("RenameTeam", op_type, &mut out)
            .unwrap();

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("SendRenameTeamRequest(arg0 *Team, arg1 string, arg2 int64)"));
        let positions: Vec<usize> = [
            r#"body.WriteString("[")"#,
            "Write_Team(body, arg0)",
            "Write_string(body, arg1)",
            "Write_int64(body, arg2)",
            r#"body.WriteString("]")"#,
        ]
        .iter()
        .map(|needle| code.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(code.matches(r#"body.WriteString(",")"#).count(), 2);
    }

    #[test]
    fn request_body_assembly() {
        let catalog = catalog();
        let types = &catalog.types;
        let string = types.lookup("", "string").unwrap();
        let team = types.lookup("msg", "Team").unwrap();

        assert_eq!(RequestBody::assemble(types, &[]).unwrap(), RequestBody::Empty);
        assert_eq!(
            RequestBody::assemble(types, &[team]).unwrap(),
            RequestBody::Single(WriterCall {
                writer: "Write_Team".into(),
                arg: "arg0".into()
            })
        );
        let body = RequestBody::assemble(types, &[string, team]).unwrap();
        assert!(body.is_bracketed());
        assert_eq!(
            body.calls()
                .iter()
                .map(|call| (call.writer.as_str(), call.arg.as_str()))
                .collect::<Vec<_>>(),
            [("Write_string", "arg0"), ("Write_Team", "arg1")]
        );
    }

    #[test]
    fn unknown_service_is_reported() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        assert!(matches!(
            generator.emit_client_class("msg", "Nope", &mut out),
            Err(GenerateError::Type(TypeError::UnknownType(name)))
                if name == TypeName::new("msg", "Nope")
        ));
        assert!(matches!(
            generator.emit_client_class("", "string", &mut out),
            Err(GenerateError::NotARecord(_))
        ));
        assert!(out.is_empty());
        assert_eq!(generator.client_name(), None);
    }

    #[test]
    fn methods_need_a_selected_service() {
        let catalog = catalog();
        let generator = generator(&catalog, BindingTable::new());
        let op_type = FunctionType::new(vec![], vec![]);
        let mut out = Vec::new();

        assert!(matches!(
            generator.emit_operation_method("Ping", &op_type, &mut out),
            Err(GenerateError::NoServiceSelected)
        ));
        assert!(matches!(
            generator.operations(),
            Err(GenerateError::NoServiceSelected)
        ));
    }

    #[test]
    fn failed_selection_clears_previous_service() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        generator
            .emit_client_class("msg", "Greeter", &mut Vec::new())
            .unwrap();
        let op_type = operation(&generator, "SayHello");
        assert_eq!(generator.client_name(), Some("GreeterClient"));

        assert!(generator
            .emit_client_class("msg", "Nope", &mut Vec::new())
            .is_err());
        assert_eq!(generator.client_name(), None);
        let mut out = Vec::new();
        assert!(matches!(
            generator.emit_operation_method("SayHello", op_type, &mut out),
            Err(GenerateError::NoServiceSelected)
        ));
        assert!(out.is_empty());

        generator
            .emit_client_class("msg", "Greeter", &mut Vec::new())
            .unwrap();
        assert!(generator
            .emit_client_class("", "string", &mut Vec::new())
            .is_err());
        assert_eq!(generator.client_name(), None);
    }

    #[test]
    fn emit_service_continues_after_failures() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        let report = generator
            .emit_service("msg", "TeamService", &mut out)
            .unwrap();

        assert_eq!(report.emitted, ["CreateTeam", "ListTeams", "RenameTeam"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "PairTeams");
        assert!(!report.is_complete());

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("SendRenameTeamRequest"));
        assert!(!code.contains("SendPairTeamsRequest"));
    }

    #[test]
    fn fields_must_be_operations() {
        let mut types = TypeSystem::with_builtins();
        let string = types.lookup("", "string").unwrap();
        let ping = types.create(Type::Function(FunctionType::new(vec![], vec![])));
        types
            .register(
                "msg",
                "Mixed",
                Type::Record(
                    RecordType::new("Mixed")
                        .with_field("Version", string)
                        .with_field("Ping", ping),
                ),
            )
            .unwrap();
        let catalog = Catalog { types };
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        generator.emit_client_class("msg", "Mixed", &mut out).unwrap();
        assert!(matches!(
            generator.operations(),
            Err(GenerateError::NotAnOperation { field, .. }) if field == "Version"
        ));

        let report = generator.emit_service("msg", "Mixed", &mut Vec::new()).unwrap();
        assert_eq!(report.emitted, ["Ping"]);
        assert!(matches!(
            &report.failed[..],
            [(field, GenerateError::NotAnOperation { .. })] if field == "Version"
        ));
    }

    #[test]
    fn client_name_and_decorator_follow_config() {
        let catalog = catalog();
        let config = GeneratorConfig {
            package: "teams".into(),
            client_prefix: "Api".into(),
            client_suffix: "Stub".into(),
            transport_request_type: Some("*CustomRequest".into()),
        };
        let mut generator = Generator::new(&catalog.types, BindingTable::new(), config, Target::Go);
        let mut out = Vec::new();

        generator.emit_client_class("msg", "Greeter", &mut out).unwrap();
        assert_eq!(generator.client_name(), Some("ApiGreeterStub"));

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("package teams"));
        assert!(code.contains("type ApiGreeterStub struct"));
        assert!(code.contains("RequestDecorator func(*CustomRequest) (*CustomRequest, error)"));
    }

    #[test]
    fn default_decorator_takes_http_requests() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        generator.emit_client_class("msg", "Greeter", &mut out).unwrap();
        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("package restclient"));
        assert!(code.contains("RequestDecorator func(*http.Request) (*http.Request, error)"));
    }

    #[test]
    fn custom_argument_renderer() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new()).with_argument_renderer(
            |_: &TypeSystem, _: &[TypeRef], _: bool| Ok::<_, GenerateError>("custom".to_owned()),
        );
        let mut out = Vec::new();

        generator.emit_client_class("msg", "Greeter", &mut out).unwrap();
        let op_type = operation(&generator, "SayHello");
        generator
            .emit_operation_method("SayHello", op_type, &mut out)
            .unwrap();

        let code = String::from_utf8(out).unwrap();
        assert!(code.contains("SendSayHelloRequest(custom)"));
    }

    #[test]
    fn operations_keep_declaration_order() {
        let catalog = catalog();
        let mut generator = generator(&catalog, BindingTable::new());
        generator
            .emit_client_class("msg", "TeamService", &mut Vec::new())
            .unwrap();

        let names: Vec<&str> = generator
            .operations()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["CreateTeam", "PairTeams", "ListTeams", "RenameTeam"]);
    }

    #[test]
    fn aliased_service_is_a_record() {
        let mut catalog = catalog();
        let greeter = catalog.types.lookup("msg", "Greeter").unwrap();
        catalog
            .types
            .register(
                "msg",
                "Hello",
                Type::Alias {
                    name: "Hello".into(),
                    target: greeter,
                },
            )
            .unwrap();
        let mut generator = generator(&catalog, BindingTable::new());
        let mut out = Vec::new();

        let report = generator.emit_service("msg", "Hello", &mut out).unwrap();
        assert_eq!(report.emitted, ["SayHello"]);
        assert!(String::from_utf8(out).unwrap().contains("type HelloClient struct"));
    }
}
