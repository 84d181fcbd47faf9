//! Post-processing of written files.

use crate::config::{CodeGeneratorConfig, FormatterCommand};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Invoked once per written file, after every file has been written.
pub trait PostProcessor {
    fn process(&self, path: &Path) -> Result<()>;
}

/// Runs the configured formatter commands, in order, on each file.
#[derive(Clone, Debug)]
pub struct CommandFormatter {
    commands: Vec<FormatterCommand>,
}

impl CommandFormatter {
    pub fn new(config: &CodeGeneratorConfig) -> Self {
        Self {
            commands: config.formatters().to_vec(),
        }
    }
}

impl PostProcessor for CommandFormatter {
    fn process(&self, path: &Path) -> Result<()> {
        for command in &self.commands {
            tracing::debug!(command = %command.display(), path = %path.display(), "formatting");
            let status = Command::new(&command.program)
                .args(&command.args)
                .arg(path)
                .status()
                .map_err(|source| Error::FormatterSpawn {
                    command: command.display(),
                    path: path.to_owned(),
                    source,
                })?;
            if !status.success() {
                return Err(Error::Formatter {
                    command: command.display(),
                    path: path.to_owned(),
                    status,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn formatter(commands: Vec<FormatterCommand>) -> CommandFormatter {
        CommandFormatter::new(&CodeGeneratorConfig::default().with_formatters(commands))
    }

    #[test]
    fn test_default_commands() {
        let commands = CodeGeneratorConfig::default().formatters().to_vec();

        assert_eq!(
            commands.iter().map(FormatterCommand::display).collect::<Vec<_>>(),
            vec!["go fmt", "go tool goimports -w"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_commands_receive_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource_group.go");
        fs::write(&path, "package provider\n").unwrap();

        formatter(vec![FormatterCommand::new("sh", &["-c", "echo '// formatted' >> \"$0\""])])
            .process(&path)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package provider\n// formatted\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource_group.go");

        let err = formatter(vec![FormatterCommand::new("false", &[])])
            .process(&path)
            .unwrap_err();

        assert!(matches!(err, Error::Formatter { command, .. } if command == "false"));
    }

    #[test]
    fn test_missing_program_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource_group.go");

        let err = formatter(vec![FormatterCommand::new("providergen-no-such-formatter", &[])])
            .process(&path)
            .unwrap_err();

        assert!(matches!(err, Error::FormatterSpawn { .. }));
    }
}
