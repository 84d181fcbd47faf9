use std::path::PathBuf;

/// External command run on every generated file; the file path is appended
/// as the last argument.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FormatterCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Command line without the file argument, for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Code generation options.
#[derive(Clone, Debug)]
pub struct CodeGeneratorConfig {
    pub(crate) package_name: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) apiclient_import: String,
    pub(crate) generator_name: String,
    pub(crate) formatters: Vec<FormatterCommand>,
}

impl Default for CodeGeneratorConfig {
    fn default() -> Self {
        Self::new("provider".to_owned())
    }
}

impl CodeGeneratorConfig {
    /// Default config for the given Go package name.
    pub fn new(package_name: String) -> Self {
        Self {
            package_name,
            output_dir: PathBuf::from("internal/provider"),
            apiclient_import: "github.com/jianyuan/terraform-provider-openai/internal/apiclient"
                .to_owned(),
            generator_name: "providergen".to_owned(),
            formatters: vec![
                FormatterCommand::new("go", &["fmt"]),
                FormatterCommand::new("go", &["tool", "goimports", "-w"]),
            ],
        }
    }

    /// Directory receiving the generated files.
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Import path of the generated API client package.
    pub fn with_apiclient_import(mut self, apiclient_import: String) -> Self {
        self.apiclient_import = apiclient_import;
        self
    }

    /// Commands run, in order, on each written file.
    pub fn with_formatters(mut self, formatters: Vec<FormatterCommand>) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn formatters(&self) -> &[FormatterCommand] {
        &self.formatters
    }
}
