//! Lifecycle tests for scoped generation using the mock system

use repo2prompt::error::PromptError;
use repo2prompt::git::GitClient;
use repo2prompt::operations::{
    GenerateRequest, Generation, Generator, InvocationOptions, OutputFormat, RepoScope,
};
use repo2prompt::system::{CommandOutput, CommandSpec, MockSystem, StdioMode, System};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const URL: &str = "https://github.com/acme/widget";

/// git handler that checks out `src/main.py` into the clone destination
fn successful_clone(system: &MockSystem, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
    let destination = PathBuf::from(spec.args.last().unwrap());
    system.create_dir_all(&destination.join(".git"))?;
    system.create_dir_all(&destination.join("src"))?;
    system.write(&destination.join("src/main.py"), b"print('hi')\n")?;
    Ok(CommandOutput::success(b""))
}

fn mock_with_generator_output(stdout: &'static [u8]) -> MockSystem {
    MockSystem::new()
        .with_command("git", successful_clone)
        .unwrap()
        .with_command("code2prompt", move |_, _| Ok(CommandOutput::success(stdout)))
        .unwrap()
}

fn json_request(subdirectory: Option<&str>) -> GenerateRequest {
    GenerateRequest {
        url: URL.to_owned(),
        subdirectory: subdirectory.map(str::to_owned),
        branch: Some("main".to_owned()),
        options: InvocationOptions {
            output_format: Some(OutputFormat::Json),
            ..InvocationOptions::default()
        },
    }
}

fn scope(system: &MockSystem) -> RepoScope<'_> {
    RepoScope::new(system, GitClient::default(), Generator::default())
}

fn error_kind(err: &anyhow::Error) -> &PromptError {
    err.downcast_ref::<PromptError>()
        .expect("error should be a PromptError")
}

#[test]
fn end_to_end_structured_generation() {
    let system = mock_with_generator_output(br#"{"status":"success"}"#);

    let result = scope(&system).generate(&json_request(Some("src"))).unwrap();

    assert_eq!(result, Generation::Structured(json!({"status": "success"})));
    assert!(system.live_temp_dirs().is_empty());

    let commands = system.commands_run();
    assert_eq!(commands.len(), 2);

    let (clone, clone_stdio) = &commands[0];
    assert_eq!(clone.program, "git");
    assert_eq!(clone.args[..4], ["clone", "--branch", "main", URL]);
    assert_eq!(*clone_stdio, StdioMode::Capture);

    let clone_root = PathBuf::from(&clone.args[4]);
    assert!(
        clone_root
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("repo2prompt_")
    );

    let (invoke, invoke_stdio) = &commands[1];
    assert_eq!(invoke.program, "code2prompt");
    assert_eq!(
        invoke.args,
        [
            clone_root.join("src").to_string_lossy().into_owned(),
            "-O".to_owned(),
            "json".to_owned()
        ]
    );
    assert_eq!(*invoke_stdio, StdioMode::Capture);
}

#[test]
fn clone_exists_while_generator_runs() {
    let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let system = MockSystem::new()
        .with_command("git", successful_clone)
        .unwrap()
        .with_command("code2prompt", move |sys, spec| {
            let target = Path::new(&spec.args[0]);
            recorder.lock().unwrap().push(sys.is_dir(target));
            Ok(CommandOutput::success(b"{}"))
        })
        .unwrap();

    scope(&system).generate(&json_request(None)).unwrap();

    assert_eq!(*seen.lock().unwrap(), [true]);
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn streaming_mode_inherits_output() {
    let system = mock_with_generator_output(b"ignored");
    let request = GenerateRequest {
        url: URL.to_owned(),
        ..GenerateRequest::default()
    };

    let result = scope(&system).generate(&request).unwrap();

    assert_eq!(result, Generation::Streamed);
    let (invoke, stdio) = system.commands_run().pop().unwrap();
    assert_eq!(invoke.args.len(), 1);
    assert_eq!(stdio, StdioMode::Inherit);
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn non_github_url_fails_before_any_io() {
    let system = mock_with_generator_output(b"{}");

    for url in [
        "https://gitlab.com/acme/widget",
        "https://bitbucket.org/acme/widget",
        "git@github.com:acme/widget.git",
        "not a url",
    ] {
        let request = GenerateRequest {
            url: url.to_owned(),
            ..GenerateRequest::default()
        };
        let err = scope(&system).generate(&request).unwrap_err();
        assert!(matches!(error_kind(&err), PromptError::Validation { .. }));
        assert!(err.to_string().contains(url));
    }

    assert!(system.commands_run().is_empty());
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn github_url_without_repository_is_rejected() {
    let system = mock_with_generator_output(b"{}");
    let request = GenerateRequest {
        url: "https://github.com/acme".to_owned(),
        ..GenerateRequest::default()
    };

    let err = scope(&system).generate(&request).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Validation { .. }));
    assert!(system.commands_run().is_empty());
}

#[test]
fn clone_failure_carries_git_diagnostics() {
    let system = MockSystem::new()
        .with_command("git", |sys, spec| {
            // git may leave partial state behind before failing
            let destination = PathBuf::from(spec.args.last().unwrap());
            sys.create_dir_all(&destination.join(".git"))?;
            Ok(CommandOutput::failure(
                128,
                b"fatal: Remote branch nope not found in upstream origin\n",
            ))
        })
        .unwrap()
        .with_command("code2prompt", |_, _| Ok(CommandOutput::success(b"{}")))
        .unwrap();

    let request = GenerateRequest {
        branch: Some("nope".to_owned()),
        ..json_request(None)
    };
    let err = scope(&system).generate(&request).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Clone { .. }));
    assert!(err.to_string().contains("Remote branch nope not found"));
    assert_eq!(system.commands_run().len(), 1);
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn missing_git_is_a_clone_error() {
    let system = MockSystem::new();

    let err = scope(&system).generate(&json_request(None)).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Clone { .. }));
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn missing_subdirectory_is_not_found_and_cleaned_up() {
    let system = mock_with_generator_output(b"{}");

    let err = scope(&system)
        .generate(&json_request(Some("missing/path")))
        .unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::NotFound { .. }));
    assert!(err.to_string().contains("missing/path"));
    assert_eq!(system.commands_run().len(), 1, "generator must not run");
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn generator_failure_is_invocation_error_and_cleaned_up() {
    let system = MockSystem::new()
        .with_command("git", successful_clone)
        .unwrap()
        .with_command("code2prompt", |_, _| {
            Ok(CommandOutput::failure(2, b"error: invalid template\n"))
        })
        .unwrap();

    let err = scope(&system).generate(&json_request(None)).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Invocation { .. }));
    assert!(err.to_string().contains("invalid template"));
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn streaming_failure_is_invocation_error() {
    let system = MockSystem::new()
        .with_command("git", successful_clone)
        .unwrap()
        .with_command("code2prompt", |_, _| Ok(CommandOutput::failure(1, b"")))
        .unwrap();
    let request = GenerateRequest {
        url: URL.to_owned(),
        ..GenerateRequest::default()
    };

    let err = scope(&system).generate(&request).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Invocation { .. }));
    assert!(err.to_string().contains("exited with status 1"));
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn malformed_json_is_invocation_error() {
    let system = mock_with_generator_output(b"{\"status\": \"succ");

    let err = scope(&system).generate(&json_request(None)).unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::Invocation { .. }));
    assert!(err.to_string().contains("JSON"));
    assert!(system.live_temp_dirs().is_empty());
}

#[test]
fn cleanup_failure_does_not_mask_success() {
    let system = MockSystem::new()
        .with_command("git", |sys, spec| {
            let destination = PathBuf::from(spec.args.last().unwrap());
            sys.create_dir_all(&destination.join(".git/objects"))?;
            sys.lock_path(&destination.join(".git/objects"))?;
            Ok(CommandOutput::success(b""))
        })
        .unwrap()
        .with_command("code2prompt", |_, _| {
            Ok(CommandOutput::success(br#"{"prompt":"ok"}"#))
        })
        .unwrap();

    let result = scope(&system).generate(&json_request(None)).unwrap();

    assert_eq!(result, Generation::Structured(json!({"prompt": "ok"})));
    assert_eq!(system.live_temp_dirs().len(), 1);
}

#[test]
fn cleanup_failure_does_not_mask_error() {
    let system = MockSystem::new()
        .with_command("git", |sys, spec| {
            let destination = PathBuf::from(spec.args.last().unwrap());
            sys.lock_path(&destination)?;
            Ok(CommandOutput::success(b""))
        })
        .unwrap();

    let err = scope(&system)
        .generate(&json_request(Some("src")))
        .unwrap_err();

    assert!(matches!(error_kind(&err), PromptError::NotFound { .. }));
}

#[test]
fn each_request_gets_its_own_clone() {
    let system = mock_with_generator_output(b"{}");
    let scope = scope(&system);

    scope.generate(&json_request(None)).unwrap();
    scope.generate(&json_request(None)).unwrap();

    let clones: Vec<String> = system
        .commands_run()
        .into_iter()
        .filter(|(spec, _)| spec.program == "git")
        .map(|(spec, _)| spec.args.last().unwrap().clone())
        .collect();
    assert_eq!(clones.len(), 2);
    assert_ne!(clones[0], clones[1]);
}
