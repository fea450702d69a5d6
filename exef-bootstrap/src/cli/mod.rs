// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Module
//!
//! Ties [`parser`] (the clap surface) to [`validator`] (security validation)
//! so that nothing reaches the application layer without first passing
//! through [`SecureArgParser`]. `parse_and_validate` is the single entry
//! point: parse with clap, then re-check every string and path argument
//! before handing back a [`ValidatedCli`].

pub mod parser;
pub mod validator;

pub use parser::{Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// CLI arguments after clap parsing and [`SecureArgParser`] validation.
///
/// Holds the same shape as [`Cli`] but every user-supplied string has passed
/// [`SecureArgParser::validate_argument`] and every path has been checked
/// for traversal and protected-directory attempts.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub cpu_threads: Option<usize>,
    pub io_threads: Option<usize>,
    pub storage_type: Option<String>,
    pub channel_depth: usize,
}

/// Validated mirror of [`Commands`]. Field shapes match one-for-one; only
/// the validation performed to construct them differs.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Import {
        source: String,
        task: String,
        triggered_by: String,
    },
    Export {
        source: String,
        task: String,
        triggered_by: String,
        documents: Vec<String>,
        output: Option<PathBuf>,
    },
    UploadCsv {
        task: String,
        file: PathBuf,
    },
    TestConnection {
        source: String,
    },
    ProjectFromTemplate {
        entity: String,
        template: String,
        year: i32,
        period_start: Option<String>,
        period_end: Option<String>,
        name: Option<String>,
    },
    Migrate,
    DescribeDocument {
        document: String,
        editor: String,
        category: Option<String>,
        description: Option<String>,
        tags: Option<String>,
    },
    ApproveDocument {
        document: String,
        approver: String,
    },
    Duplicates {
        task: String,
    },
}

/// Validates an output path that need not already exist: the path itself
/// skips canonicalization (it may be about to be created), but its parent
/// directory must exist and must not be a protected system directory.
fn validate_output_path(path: &str) -> Result<PathBuf, ParseError> {
    SecureArgParser::validate_argument(path)?;

    let path_obj = PathBuf::from(path);
    let parent = path_obj
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));

    let canonical_parent = parent
        .canonicalize()
        .map_err(|_| ParseError::PathNotFound(parent.display().to_string()))?;

    const PROTECTED_DIRS: &[&str] = &["/etc", "/bin", "/sbin", "/usr/bin", "/usr/sbin", "/boot", "/sys", "/proc", "/dev"];
    for protected in PROTECTED_DIRS {
        if canonical_parent.starts_with(protected) {
            return Err(ParseError::ProtectedDirectory(canonical_parent.display().to_string()));
        }
    }

    Ok(canonical_parent.join(path_obj.file_name().unwrap_or_default()))
}

fn validate_id(name: &str, value: &str) -> Result<String, ParseError> {
    SecureArgParser::validate_argument(value).map_err(|e| match e {
        ParseError::DangerousPattern { pattern, arg } => ParseError::InvalidValue {
            arg: name.to_string(),
            reason: format!("contains disallowed pattern '{}' in '{}'", pattern, arg),
        },
        other => other,
    })?;
    Ok(value.to_string())
}

fn validate_optional(name: &str, value: Option<String>) -> Result<Option<String>, ParseError> {
    match value {
        Some(v) => validate_id(name, &v).map(Some),
        None => Ok(None),
    }
}

fn validate_command(command: Commands) -> Result<ValidatedCommand, ParseError> {
    Ok(match command {
        Commands::Import { source, task, triggered_by } => ValidatedCommand::Import {
            source: validate_id("source", &source)?,
            task: validate_id("task", &task)?,
            triggered_by: validate_id("triggered_by", &triggered_by)?,
        },
        Commands::Export {
            source,
            task,
            triggered_by,
            documents,
            output,
        } => ValidatedCommand::Export {
            source: validate_id("source", &source)?,
            task: validate_id("task", &task)?,
            triggered_by: validate_id("triggered_by", &triggered_by)?,
            documents: documents
                .iter()
                .map(|d| validate_id("document", d))
                .collect::<Result<Vec<_>, _>>()?,
            output: output
                .map(|p| validate_output_path(&p.to_string_lossy()))
                .transpose()?,
        },
        Commands::UploadCsv { task, file } => ValidatedCommand::UploadCsv {
            task: validate_id("task", &task)?,
            file: SecureArgParser::validate_path(&file.to_string_lossy())?,
        },
        Commands::TestConnection { source } => ValidatedCommand::TestConnection {
            source: validate_id("source", &source)?,
        },
        Commands::ProjectFromTemplate {
            entity,
            template,
            year,
            period_start,
            period_end,
            name,
        } => ValidatedCommand::ProjectFromTemplate {
            entity: validate_id("entity", &entity)?,
            template: validate_id("template", &template)?,
            year,
            period_start: validate_optional("period_start", period_start)?,
            period_end: validate_optional("period_end", period_end)?,
            name: validate_optional("name", name)?,
        },
        Commands::Migrate => ValidatedCommand::Migrate,
        Commands::DescribeDocument {
            document,
            editor,
            category,
            description,
            tags,
        } => ValidatedCommand::DescribeDocument {
            document: validate_id("document", &document)?,
            editor: validate_id("editor", &editor)?,
            category: validate_optional("category", category)?,
            description: validate_optional("description", description)?,
            tags: validate_optional("tags", tags)?,
        },
        Commands::ApproveDocument { document, approver } => ValidatedCommand::ApproveDocument {
            document: validate_id("document", &document)?,
            approver: validate_id("approver", &approver)?,
        },
        Commands::Duplicates { task } => ValidatedCommand::Duplicates {
            task: validate_id("task", &task)?,
        },
    })
}

/// Parses CLI arguments with clap, then re-validates every string and path
/// through [`SecureArgParser`]. Clap already handles `--help`/`--version`
/// and exits the process on malformed flags; this pass guards against the
/// values clap happily accepts but which would be unsafe to hand to a
/// filesystem path or a shell-adjacent adapter (path traversal, injection
/// characters, access to protected directories).
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parser::parse_cli();

    if let Some(config_path) = &cli.config {
        SecureArgParser::validate_path(&config_path.to_string_lossy())?;
    }

    Ok(ValidatedCli {
        command: validate_command(cli.command)?,
        verbose: cli.verbose,
        config: cli.config,
        cpu_threads: cli.cpu_threads,
        io_threads: cli.io_threads,
        storage_type: cli.storage_type,
        channel_depth: cli.channel_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_id_accepts_ulid_like_strings() {
        assert_eq!(validate_id("task", "01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }

    #[test]
    fn validate_id_rejects_dangerous_patterns() {
        assert!(validate_id("task", "../etc/passwd").is_err());
        assert!(validate_id("task", "$(whoami)").is_err());
    }

    #[test]
    fn validate_command_migrate_has_no_arguments_to_check() {
        assert!(matches!(validate_command(Commands::Migrate).unwrap(), ValidatedCommand::Migrate));
    }

    #[test]
    fn validate_command_rejects_dangerous_document_id() {
        let result = validate_command(Commands::ApproveDocument {
            document: "doc;rm -rf /".to_string(),
            approver: "ident-1".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn validate_output_path_rejects_protected_directory() {
        assert!(validate_output_path("/etc/passwd.csv").is_err());
    }
}
