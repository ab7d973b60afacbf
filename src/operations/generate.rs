//! Repository acquisition and scoped generation

use crate::error::PromptError;
use crate::git::{
    GitClient, ScopedClone, parse_repo_coordinates, resolve_subdirectory, validate_github_url,
};
use crate::operations::invoke::{Generation, Generator, InvocationOptions};
use crate::system::System;
use anyhow::Result;
use tracing::{debug, info};

/// One prompt generation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub url: String,
    pub subdirectory: Option<String>,
    pub branch: Option<String>,
    pub options: InvocationOptions,
}

/// Clones a repository, narrows to a subdirectory and runs the generator on it
///
/// Each call to [`RepoScope::generate`] owns its own temporary clone, which
/// is removed before the call returns on every path.
pub struct RepoScope<'sys> {
    system: &'sys dyn System,
    git: GitClient,
    generator: Generator,
}

impl<'sys> RepoScope<'sys> {
    #[must_use]
    pub fn new(system: &'sys dyn System, git: GitClient, generator: Generator) -> Self {
        Self {
            system,
            git,
            generator,
        }
    }

    #[must_use]
    pub const fn git(&self) -> &GitClient {
        &self.git
    }

    #[must_use]
    pub const fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Validate, clone, resolve and invoke, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns a validation, clone, not-found or invocation error
    /// depending on which step failed. Failure to remove the temporary
    /// clone is never reported.
    pub fn generate(&self, request: &GenerateRequest) -> Result<Generation> {
        if !validate_github_url(&request.url) {
            return Err(PromptError::validation(format!(
                "Invalid GitHub repository URL: {}",
                request.url
            ))
            .into());
        }
        let coordinates = parse_repo_coordinates(&request.url)?;

        info!("Cloning {coordinates}...");
        let mut scoped = ScopedClone::new(&request.url, request.branch.as_deref());
        let root = scoped.clone_repository(self.system, &self.git)?.to_path_buf();

        let target = resolve_subdirectory(self.system, &root, request.subdirectory.as_deref())?;
        debug!("Generating prompt for {}", target.display());

        let generation = self
            .generator
            .invoke(self.system, &target, &request.options)?;

        info!("Prompt generated for {coordinates}");
        Ok(generation)
    }
}
