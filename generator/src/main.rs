mod cli;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use relay_bindings::TypeSystem;
use relay_rest_generator::{Generator, Manifest};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn read_input(input: &str) -> Result<String> {
    if input.starts_with("http://") || input.starts_with("https://") {
        info!(url = input, "fetching manifest");
        let response = reqwest::blocking::get(input)
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("failed to fetch {input}"))?;
        Ok(response.text()?)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::Cli::parse();

    let manifest = Manifest::from_toml(&read_input(&cli.input)?)
        .with_context(|| format!("failed to load {}", cli.input))?;
    let mut types = TypeSystem::with_builtins();
    manifest.populate(&mut types)?;

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut generator = Generator::new(&types, manifest.bindings, cli.config(), cli.target());
    let report = generator.emit_service(&cli.namespace, &cli.service, &mut output)?;
    output.flush()?;

    for (operation, err) in &report.failed {
        error!(operation, "failed to generate: {err}");
    }
    if !report.is_complete() {
        bail!(
            "{} of {} operations could not be generated",
            report.failed.len(),
            report.failed.len() + report.emitted.len()
        );
    }
    Ok(())
}
