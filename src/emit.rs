//! Indentation-aware writer for Go source files.
//!
//! Fragments produced by the translators carry their own relative
//! indentation; the emitter prefixes each of their lines with the current
//! block depth.
use crate::config::CodeGeneratorConfig;
use serde_generate::indent::{IndentConfig, IndentedWriter};
use std::io::{Result, Write};

pub const FRAMEWORK: &str = "github.com/hashicorp/terraform-plugin-framework";
pub const SUPERTYPES: &str = "github.com/orange-cloudavenue/terraform-plugin-framework-supertypes";
pub const PTR: &str = "github.com/jianyuan/go-utils/ptr";

/// Shared state for the code generation of one Go source file.
pub struct GoEmitter<'a, T> {
    /// Writer.
    out: IndentedWriter<T>,
    /// Generator options.
    config: &'a CodeGeneratorConfig,
}

impl<'a, T> GoEmitter<'a, T>
where
    T: Write,
{
    pub fn new(out: T, config: &'a CodeGeneratorConfig) -> Self {
        Self {
            out: IndentedWriter::new(out, IndentConfig::Tab),
            config,
        }
    }

    /// Generated-code marker, package clause and import block.
    ///
    /// `framework_packages` are relative to the plugin framework module.
    /// Unused imports are pruned later by the post-processor.
    pub fn output_preamble(&mut self, framework_packages: &[&str]) -> Result<()> {
        writeln!(
            self.out,
            "// Code generated by {}. DO NOT EDIT.\n",
            self.config.generator_name
        )?;
        writeln!(self.out, "package {}\n", self.config.package_name)?;
        self.open("import (")?;
        for std_package in &["context", "fmt", "net/http"] {
            writeln!(self.out, "\"{}\"", std_package)?;
        }
        writeln!(self.out)?;
        for package in framework_packages {
            writeln!(self.out, "\"{}/{}\"", FRAMEWORK, package)?;
        }
        writeln!(self.out, "\"{}\"", PTR)?;
        writeln!(self.out, "\"{}\"", self.config.apiclient_import)?;
        writeln!(self.out, "supertypes \"{}\"", SUPERTYPES)?;
        self.close(")")?;
        writeln!(self.out)
    }

    /// `// ` comment block, one comment line per text line.
    pub fn output_comment(&mut self, text: &str) -> Result<()> {
        let text = textwrap::indent(text.trim(), "// ").replace("\n\n", "\n//\n");
        write!(self.out, "{}", text)?;
        if !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.out)
    }

    /// Write `header` and indent what follows.
    pub fn open(&mut self, header: &str) -> Result<()> {
        writeln!(self.out, "{}", header)?;
        self.out.indent();
        Ok(())
    }

    /// Unindent and write `footer`.
    pub fn close(&mut self, footer: &str) -> Result<()> {
        self.out.unindent();
        writeln!(self.out, "{}", footer)
    }

    /// Close the current block and open a sibling, e.g. `} else {`.
    pub fn branch(&mut self, text: &str) -> Result<()> {
        self.out.unindent();
        writeln!(self.out, "{}", text)?;
        self.out.indent();
        Ok(())
    }

    /// Multi-line text, each line at the current depth.
    pub fn fragment(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// Splice a caller-provided hook verbatim, normalizing only its margin.
    pub fn hook(&mut self, hook: Option<&str>) -> Result<()> {
        match hook {
            Some(text) if !text.trim().is_empty() => {
                let text = textwrap::dedent(text);
                self.fragment(text.trim_matches('\n'))?;
                self.blank()
            }
            _ => Ok(()),
        }
    }
}
