//! Dry-run rendering of the commands a request would run

use crate::error::PromptError;
use crate::git::{GitClient, parse_repo_coordinates, validate_github_url};
use crate::operations::generate::GenerateRequest;
use crate::operations::invoke::Generator;
use anyhow::Result;
use core::fmt::Write as _;

/// Placeholder for the temporary clone directory, unknown before cloning
pub const CLONE_DIR_PLACEHOLDER: &str = "<clone-dir>";

/// Describe the clone and generator commands for `request` without running them
///
/// # Errors
///
/// Returns a validation error if the URL is not a GitHub repository URL.
pub fn render_plan(
    request: &GenerateRequest,
    git: &GitClient,
    generator: &Generator,
) -> Result<String> {
    if !validate_github_url(&request.url) {
        return Err(PromptError::validation(format!(
            "Invalid GitHub repository URL: {}",
            request.url
        ))
        .into());
    }
    let coordinates = parse_repo_coordinates(&request.url)?;

    let clone = git.clone_command(
        &request.url,
        request.branch.as_deref(),
        CLONE_DIR_PLACEHOLDER,
    );

    let target = request.subdirectory.as_ref().map_or_else(
        || CLONE_DIR_PLACEHOLDER.to_owned(),
        |sub| format!("{CLONE_DIR_PLACEHOLDER}/{sub}"),
    );
    let invoke = generator.command(&target, &request.options);

    let mut plan = String::new();
    writeln!(plan, "# Dry run for {coordinates}, nothing will be cloned")?;
    writeln!(plan, "{}", format_as_shell(&clone.argv()))?;
    writeln!(plan, "{}", format_as_shell(&invoke.argv()))?;
    Ok(plan)
}

/// Format arguments as a shell command with proper escaping
fn format_as_shell(args: &[String]) -> String {
    let mut output = String::new();

    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            output.push_str(" \\\n  ");
        }
        output.push_str(&shell_escape(arg));
    }

    output
}

/// Escape a string for shell execution
/// Uses double quotes for safety, escaping special characters inside
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | ',' | '=')
        })
    {
        return s.to_owned();
    }

    let mut result = String::from('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str(r#"\""#),
            '\\' => result.push_str(r"\\"),
            '$' => result.push_str(r"\$"),
            '`' => result.push_str(r"\`"),
            '!' => result.push_str(r"\!"),
            _ => result.push(ch),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::invoke::InvocationOptions;

    #[test]
    fn shell_escape_simple() {
        assert_eq!(shell_escape("simple"), "simple");
        assert_eq!(shell_escape("path/to/file"), "path/to/file");
        assert_eq!(shell_escape("https://github.com/acme/widget"), "https://github.com/acme/widget");
        assert_eq!(shell_escape("--line-number"), "--line-number");
    }

    #[test]
    fn shell_escape_special_chars() {
        assert_eq!(shell_escape("has space"), r#""has space""#);
        assert_eq!(shell_escape("*.py,*.md"), r#""*.py,*.md""#);
        assert_eq!(shell_escape("has$dollar"), r#""has\$dollar""#);
        assert_eq!(shell_escape(""), r#""""#);
    }

    #[test]
    fn plan_lists_both_commands() {
        let request = GenerateRequest {
            url: "https://github.com/acme/widget".to_owned(),
            subdirectory: Some("src".to_owned()),
            branch: Some("main".to_owned()),
            options: InvocationOptions {
                include: vec!["*.py".to_owned(), "*.md".to_owned()],
                tokens: true,
                ..InvocationOptions::default()
            },
        };

        let plan = render_plan(&request, &GitClient::default(), &Generator::default()).unwrap();

        assert!(plan.starts_with("# Dry run for acme/widget"));
        assert!(plan.contains("git \\\n  clone \\\n  --branch \\\n  main"));
        assert!(plan.contains("code2prompt \\\n  \"<clone-dir>/src\""));
        assert!(plan.contains("--include \\\n  \"*.py,*.md\""));
        assert!(plan.contains("--tokens"));
    }

    #[test]
    fn plan_rejects_non_github_url() {
        let request = GenerateRequest {
            url: "https://gitlab.com/acme/widget".to_owned(),
            ..GenerateRequest::default()
        };

        let err = render_plan(&request, &GitClient::default(), &Generator::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PromptError>(),
            Some(PromptError::Validation { .. })
        ));
    }
}
