//! Project to directory bindings
//!
//! The registry is the host-facing entry point: a project is registered
//! with a directory once, then committed or opened by identity. Callers must
//! serialize commit/open calls for the same directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use modelx_core::Project;
use modelx_core_types::{ProjectId, RequestContext};

use crate::commit::{self, CommitReport};
use crate::config::StoreOptions;
use crate::errors::{not_registered, Result};
use crate::open::{self, OpenReport};

#[derive(Debug, Default)]
pub struct ProjectRegistry {
    options: StoreOptions,
    directories: HashMap<ProjectId, PathBuf>,
}

impl ProjectRegistry {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            directories: HashMap::new(),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Bind a project to a directory, returning the previous binding
    pub fn add(&mut self, project: &Project, directory: impl Into<PathBuf>) -> Option<PathBuf> {
        let directory = directory.into();
        tracing::debug!(
            project_id = project.id().as_str(),
            directory = %directory.display(),
            "project registered"
        );
        self.directories.insert(project.id().clone(), directory)
    }

    /// Drop a project's binding
    pub fn remove(&mut self, project: &Project) -> Option<PathBuf> {
        self.directories.remove(project.id())
    }

    pub fn directory(&self, project: &Project) -> Option<&Path> {
        self.directories.get(project.id()).map(PathBuf::as_path)
    }

    /// Commit a registered project to its directory
    ///
    /// # Errors
    /// * `NotRegistered` - the project has no directory
    /// * `Commit` - see [`commit::commit`]
    pub async fn commit(&self, project: &Project) -> Result<CommitReport> {
        let ctx = RequestContext::new().for_project(project.id().clone());
        let directory = self.require(project.id(), &ctx)?;
        commit::commit(project, directory, &self.options, &ctx).await
    }

    /// Rebuild a registered project from its directory
    ///
    /// # Errors
    /// * `NotRegistered` - the project has no directory
    /// * `Open` - see [`open::open`]
    pub async fn open(&self, project: &mut Project) -> Result<OpenReport> {
        let ctx = RequestContext::new().for_project(project.id().clone());
        let directory = self.require(project.id(), &ctx)?;
        open::open(project, directory, &self.options, &ctx).await
    }

    fn require(&self, project_id: &ProjectId, ctx: &RequestContext) -> Result<&Path> {
        self.directories
            .get(project_id)
            .map(PathBuf::as_path)
            .ok_or_else(|| not_registered(project_id).with_request_id(ctx.request_id.clone()))
    }
}
