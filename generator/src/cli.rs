use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use relay_rest_generator::{GeneratorConfig, Target};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(help = "The service manifest, as a file path or http(s) URL")]
    pub input: String,

    #[arg(long, help = "Namespace of the service type")]
    pub namespace: String,

    #[arg(long, help = "Name of the service type")]
    pub service: String,

    #[arg(long, value_enum, help = "Language of the generated client [default: first enabled]")]
    pub target: Option<Target>,

    #[arg(long, default_value = "")]
    pub client_prefix: String,

    #[arg(long, default_value = "Client")]
    pub client_suffix: String,

    #[arg(long, default_value = "restclient", help = "Package of the generated client")]
    pub package: String,

    #[arg(
        long,
        help = "Request type handed to the request decorator; must match the built request"
    )]
    pub transport_request: Option<String>,

    #[arg(short, long, help = "Write to this file instead of stdout")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn target(&self) -> Target {
        self.target.unwrap_or(Target::value_variants()[0])
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            package: self.package.clone(),
            client_prefix: self.client_prefix.clone(),
            client_suffix: self.client_suffix.clone(),
            transport_request_type: self.transport_request.clone(),
        }
    }
}
