use crate::config::OptionDefaults;
use crate::operations::generate::GenerateRequest;
use crate::operations::invoke::{Encoding, InvocationOptions, OutputFormat};
use clap::Parser;

/// Command-line arguments for repo2prompt
#[derive(Parser, Debug, Clone)]
#[command(name = "repo2prompt")]
#[command(about = "Generate LLM prompts from GitHub repositories using code2prompt")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// URL of the GitHub repository
    #[arg(value_name = "GITHUB_URL")]
    pub github_url: String,

    /// Path to a subdirectory within the repository
    #[arg(short, long, value_name = "PATH")]
    pub subdirectory: Option<String>,

    /// Repository branch to clone
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Path to a custom Handlebars template file
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<String>,

    /// Comma-separated list of glob patterns to include files
    #[arg(short, long, value_name = "GLOBS", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Comma-separated list of glob patterns to exclude files
    #[arg(short, long, value_name = "GLOBS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Count tokens in the generated prompt
    #[arg(long)]
    pub tokens: bool,

    /// Tokenizer encoding
    #[arg(long, value_enum, value_name = "ENCODING")]
    pub encoding: Option<Encoding>,

    /// Path to save the generated prompt
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Output format
    #[arg(short = 'O', long = "output-format", value_enum, value_name = "FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Include Git diff output in the generated prompt
    #[arg(long)]
    pub diff: bool,

    /// Add line numbers to source code blocks
    #[arg(long)]
    pub line_number: bool,

    /// Disable wrapping code inside markdown code blocks
    #[arg(long)]
    pub no_codeblock: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Skip .gitignore rules
    #[arg(long)]
    pub no_ignore: bool,

    /// Branch to compare for Git diff
    #[arg(long, value_name = "BRANCH")]
    pub git_diff_branch: Option<String>,

    /// Branch to get Git log from
    #[arg(long, value_name = "BRANCH")]
    pub git_log_branch: Option<String>,

    /// Configuration file path (defaults to ./repo2prompt.yaml when present)
    #[arg(long, value_name = "PATH", env = "REPO2PROMPT_CONFIG")]
    pub config: Option<String>,

    /// Print the commands that would run without cloning anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merge CLI arguments over configured defaults into generator options
    ///
    /// Values given on the command line win; glob lists replace rather than
    /// extend the configured ones; switches are enabled by either source.
    #[must_use]
    pub fn invocation_options(&self, defaults: &OptionDefaults) -> InvocationOptions {
        InvocationOptions {
            template: self.template.clone().or_else(|| defaults.template.clone()),
            include: pick_list(&self.include, &defaults.include),
            exclude: pick_list(&self.exclude, &defaults.exclude),
            tokens: self.tokens || defaults.tokens,
            encoding: self.encoding.or(defaults.encoding),
            output: self.output.clone(),
            output_format: self.output_format,
            diff: self.diff,
            line_number: self.line_number || defaults.line_number,
            no_codeblock: self.no_codeblock || defaults.no_codeblock,
            hidden: self.hidden || defaults.hidden,
            no_ignore: self.no_ignore || defaults.no_ignore,
            git_diff_branch: self.git_diff_branch.clone(),
            git_log_branch: self.git_log_branch.clone(),
        }
    }

    /// Build the generation request these arguments describe
    #[must_use]
    pub fn to_request(&self, defaults: &OptionDefaults) -> GenerateRequest {
        GenerateRequest {
            url: self.github_url.clone(),
            subdirectory: self.subdirectory.clone(),
            branch: self.branch.clone(),
            options: self.invocation_options(defaults),
        }
    }
}

fn pick_list(cli: &[String], configured: &[String]) -> Vec<String> {
    let source = if cli.is_empty() { configured } else { cli };
    source
        .iter()
        .map(|pattern| pattern.trim())
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["repo2prompt", "https://github.com/acme/widget"]);
        assert_eq!(args.github_url, "https://github.com/acme/widget");
        assert!(args.subdirectory.is_none());
        assert_eq!(
            args.invocation_options(&OptionDefaults::default()),
            InvocationOptions::default()
        );
    }

    #[test]
    fn test_comma_separated_globs() {
        let args = parse(&[
            "repo2prompt",
            "https://github.com/acme/widget",
            "-i",
            "*.py,*.md",
            "--exclude",
            "tests/*",
        ]);
        assert_eq!(args.include, ["*.py", "*.md"]);
        assert_eq!(args.exclude, ["tests/*"]);
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&[
            "repo2prompt",
            "https://github.com/acme/widget",
            "-s",
            "src",
            "-b",
            "main",
            "-t",
            "tpl.hbs",
            "-o",
            "out.md",
            "-O",
            "json",
        ]);
        assert_eq!(args.subdirectory.as_deref(), Some("src"));
        assert_eq!(args.branch.as_deref(), Some("main"));
        assert_eq!(args.template.as_deref(), Some("tpl.hbs"));
        assert_eq!(args.output.as_deref(), Some("out.md"));
        assert_eq!(args.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_rejects_unknown_encoding_and_format() {
        assert!(
            Args::try_parse_from(["repo2prompt", "https://github.com/a/b", "--encoding", "gpt2"])
                .is_err()
        );
        assert!(Args::try_parse_from(["repo2prompt", "https://github.com/a/b", "-O", "xml"]).is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let defaults = OptionDefaults {
            template: Some("default.hbs".to_owned()),
            include: vec!["*.rs".to_owned()],
            exclude: vec!["target/*".to_owned()],
            encoding: Some(Encoding::Cl100k),
            hidden: true,
            ..OptionDefaults::default()
        };

        let args = parse(&[
            "repo2prompt",
            "https://github.com/acme/widget",
            "-i",
            "*.py",
            "--encoding",
            "o200k_base",
        ]);
        let options = args.invocation_options(&defaults);

        assert_eq!(options.template.as_deref(), Some("default.hbs"));
        assert_eq!(options.include, ["*.py"]);
        assert_eq!(options.exclude, ["target/*"]);
        assert_eq!(options.encoding, Some(Encoding::O200kBase));
        assert!(options.hidden);
        assert!(!options.tokens);
    }

    #[test]
    fn test_to_request() {
        let args = parse(&[
            "repo2prompt",
            "https://github.com/acme/widget",
            "--subdirectory",
            "src",
            "--branch",
            "dev",
        ]);
        let request = args.to_request(&OptionDefaults::default());
        assert_eq!(request.url, "https://github.com/acme/widget");
        assert_eq!(request.subdirectory.as_deref(), Some("src"));
        assert_eq!(request.branch.as_deref(), Some("dev"));
    }
}
