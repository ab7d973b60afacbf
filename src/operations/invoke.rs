//! Invocation of the external prompt generator (`code2prompt`)

use crate::error::PromptError;
use crate::system::{CommandSpec, StdioMode, System};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Default name of the prompt generator binary
pub const DEFAULT_GENERATOR: &str = "code2prompt";

/// Tokenizer encodings understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[value(name = "cl100k")]
    Cl100k,
    #[value(name = "p50k")]
    P50k,
    #[value(name = "p50k_edit")]
    P50kEdit,
    #[value(name = "r50k_base")]
    R50kBase,
    #[value(name = "o200k_base")]
    O200kBase,
}

impl Encoding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cl100k => "cl100k",
            Self::P50k => "p50k",
            Self::P50kEdit => "p50k_edit",
            Self::R50kBase => "r50k_base",
            Self::O200kBase => "o200k_base",
        }
    }
}

/// Output formats the generator can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// How the generator's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Output stays connected to our own stdout/stderr
    Streaming,
    /// Stdout is captured and parsed as JSON
    Structured,
}

impl OutputMode {
    const fn stdio(self) -> StdioMode {
        match self {
            Self::Streaming => StdioMode::Inherit,
            Self::Structured => StdioMode::Capture,
        }
    }
}

/// Options passed through to the generator, one external flag each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    pub template: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub tokens: bool,
    pub encoding: Option<Encoding>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub diff: bool,
    pub line_number: bool,
    pub no_codeblock: bool,
    pub hidden: bool,
    pub no_ignore: bool,
    pub git_diff_branch: Option<String>,
    pub git_log_branch: Option<String>,
}

impl InvocationOptions {
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        match self.output_format {
            Some(OutputFormat::Json) => OutputMode::Structured,
            None => OutputMode::Streaming,
        }
    }

    /// Translate the options into generator flags
    ///
    /// Glob lists are comma-joined in their original order.
    #[must_use]
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        if let Some(template) = self.template.as_ref() {
            flags.push("--template".to_owned());
            flags.push(template.clone());
        }

        if !self.include.is_empty() {
            flags.push("--include".to_owned());
            flags.push(self.include.join(","));
        }

        if !self.exclude.is_empty() {
            flags.push("--exclude".to_owned());
            flags.push(self.exclude.join(","));
        }

        if self.tokens {
            flags.push("--tokens".to_owned());
        }

        if let Some(encoding) = self.encoding {
            flags.push("--encoding".to_owned());
            flags.push(encoding.as_str().to_owned());
        }

        if let Some(output) = self.output.as_ref() {
            flags.push("--output".to_owned());
            flags.push(output.clone());
        }

        if let Some(format) = self.output_format {
            flags.push("-O".to_owned());
            flags.push(format.as_str().to_owned());
        }

        let switches = [
            (self.diff, "--diff"),
            (self.line_number, "--line-number"),
            (self.no_codeblock, "--no-codeblock"),
            (self.hidden, "--hidden"),
            (self.no_ignore, "--no-ignore"),
        ];
        flags.extend(
            switches
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, flag)| flag.to_owned()),
        );

        if let Some(branch) = self.git_diff_branch.as_ref() {
            flags.push("--git-diff-branch".to_owned());
            flags.push(branch.clone());
        }

        if let Some(branch) = self.git_log_branch.as_ref() {
            flags.push("--git-log-branch".to_owned());
            flags.push(branch.clone());
        }

        flags
    }
}

/// Outcome of a successful generator run
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// Parsed JSON printed by the generator
    Structured(Value),
    /// The generator wrote straight to the terminal and exited cleanly
    Streamed,
}

impl Generation {
    /// JSON view of the outcome; streamed runs become `{"status": "success"}`
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Structured(value) => value,
            Self::Streamed => serde_json::json!({ "status": "success" }),
        }
    }
}

/// The external prompt generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub program: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATOR)
    }
}

impl Generator {
    #[must_use]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build `code2prompt <path> <flags...>`
    #[must_use]
    pub fn command(&self, path: &str, options: &InvocationOptions) -> CommandSpec {
        CommandSpec::new(self.program.as_str())
            .arg(path)
            .args(options.to_flags())
    }

    /// Run the generator on `path`
    ///
    /// # Errors
    ///
    /// Returns an invocation error if:
    /// - The generator cannot be started
    /// - The generator exits with a failure
    /// - In structured mode, stdout is not valid JSON
    pub fn invoke(
        &self,
        system: &dyn System,
        path: &Path,
        options: &InvocationOptions,
    ) -> Result<Generation> {
        let path_str = path
            .to_str()
            .ok_or_else(|| {
            PromptError::invocation(format!(
                "Target path is not valid UTF-8: {}",
                path.display()
            ))
        })?;
        let command = self.command(path_str, options);
        let mode = options.output_mode();

        debug!("Running {:?} in {mode:?} mode", command.argv());

        let output = system.run_command(&command, mode.stdio()).map_err(|e| {
            PromptError::invocation(format!("Failed to execute {}: {e}", self.program))
        })?;

        if !output.is_success() {
            let status = output
                .code
                .map_or_else(|| "a signal".to_owned(), |code| format!("status {code}"));
            let stderr = output.stderr_text();
            let message = if stderr.is_empty() {
                format!("{} exited with {status}", self.program)
            } else {
                format!("{} exited with {status}: {stderr}", self.program)
            };
            return Err(PromptError::invocation(message).into());
        }

        match mode {
            OutputMode::Streaming => Ok(Generation::Streamed),
            OutputMode::Structured => {
                let value = serde_json::from_slice(&output.stdout).map_err(|e| {
                    PromptError::invocation(format!(
                        "Failed to parse {} JSON output: {e}",
                        self.program
                    ))
                })?;
                Ok(Generation::Structured(value))
            }
        }
    }

    /// Check that the generator can be started
    ///
    /// # Errors
    ///
    /// Returns an installation error with setup guidance if
    /// `<generator> --version` cannot be run or fails.
    pub fn check_installed(&self, system: &dyn System) -> Result<()> {
        let command = CommandSpec::new(self.program.as_str()).arg("--version");
        let installed = system
            .run_command(&command, StdioMode::Capture)
            .is_ok_and(|output| output.is_success());

        if !installed {
            return Err(PromptError::installation(format!(
                "{} is not installed or not in PATH.\n\
                Please install code2prompt using cargo:\n    \
                cargo install code2prompt\n\
                For more information, visit: https://github.com/mufeedvh/code2prompt",
                self.program
            ))
            .into());
        }

        debug!("{} is available", self.program);
        Ok(())
    }
}
