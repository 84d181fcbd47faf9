//! # Terraform provider source generator
//!
//! '''bash
//! cargo run --bin providergen -- --help
//! '''

use providergen::config::CodeGeneratorConfig;
use providergen::descriptor::Catalog;
use providergen::format::CommandFormatter;
use providergen::output::generate_provider;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "providergen",
    about = "Generate Terraform Plugin Framework data sources and resources from descriptors"
)]
struct Options {
    /// Generate only the data source or resource with this name.
    #[structopt(long)]
    filter: Option<String>,
}

fn run(options: Options) -> providergen::error::Result<()> {
    let catalog = Catalog::builtin()?;
    let config = CodeGeneratorConfig::default();

    let written = generate_provider(
        &catalog,
        &config,
        options.filter.as_deref(),
        &CommandFormatter::new(&config),
    )?;
    tracing::info!(files = written.len(), "done");
    Ok(())
}

fn main() {
    let options = Options::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PROVIDERGEN_LOG"))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(options) {
        let mut error: Option<&dyn std::error::Error> = Some(&e);
        while let Some(cause) = error {
            eprintln!("{}", cause);
            error = cause.source();
        }
        std::process::exit(1);
    }
}
