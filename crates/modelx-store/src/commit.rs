//! Commit coordinator
//!
//! Ordering:
//! 1. render every document; their paths form the desired set
//! 2. ensure the project directory exists
//! 3. snapshot the store files already present
//! 4. write all documents concurrently, joined all-or-error
//! 5. only after every write succeeded, delete store files outside the desired set
//!
//! A failed commit never deletes anything, so the directory always holds a
//! superset of the live entities' documents. A value that cannot be encoded
//! fails the commit before the directory is touched.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use modelx_core::{log_op_end, log_op_error, log_op_start, Project};
use modelx_core_types::{ProjectId, RequestContext};
use tokio::fs;

use crate::config::StoreOptions;
use crate::documents::instance_doc::write_instance;
use crate::documents::model_doc::write_model;
use crate::documents::TableOfContents;
use crate::errors::{commit_error, delete_error, directory_error, Result};
use crate::fs::{atomic_write, prune_empty_parents, snapshot_files};
use crate::path_mapper::{path_for, toc_path, EntityKind};
use crate::xml;

pub const OP_COMMIT: &str = "commit";

/// Outcome of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Documents written (table of contents included)
    pub written: usize,
    /// Orphan documents removed, relative to the project directory
    pub deleted: Vec<PathBuf>,
}

/// Persist `project` into `directory`
///
/// Only store files are orphan candidates: `*.xml` documents and the
/// `*.xml.tmp` leftovers of an interrupted write. Any other file in the
/// directory is left alone.
///
/// # Errors
/// * `Commit` - wrapping the first failure (`Directory`, `Write`, `Delete`,
///   `TypeMismatch`, `InvalidInput`, ...) as its source
pub async fn commit(
    project: &Project,
    directory: &Path,
    options: &StoreOptions,
    ctx: &RequestContext,
) -> Result<CommitReport> {
    log_op_start!(
        OP_COMMIT,
        request_id = ctx.request_id.as_str(),
        project_id = ctx.project_id.as_ref().map(ProjectId::as_str),
        directory = %directory.display()
    );
    let start = Instant::now();

    let report = commit_impl(project, directory, options)
        .await
        .map_err(|e| {
            let err = commit_error(e).with_request_id(ctx.request_id.clone());
            log_op_error!(
                OP_COMMIT,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
                cause = err.root_cause().code()
            );
            err
        })?;

    log_op_end!(
        OP_COMMIT,
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        written = report.written,
        deleted = report.deleted.len()
    );

    Ok(report)
}

async fn commit_impl(
    project: &Project,
    directory: &Path,
    options: &StoreOptions,
) -> Result<CommitReport> {
    let documents = render_documents(project, options)?;
    let desired: BTreeSet<PathBuf> = documents.iter().map(|(path, _)| path.clone()).collect();

    fs::create_dir_all(directory)
        .await
        .map_err(|e| directory_error(directory, e))?;

    let existing: BTreeSet<PathBuf> = snapshot_files(directory)
        .await?
        .into_iter()
        .filter(|path| is_store_file(path))
        .collect();

    write_all(directory, documents, options.concurrency()).await?;

    let mut deleted = Vec::new();
    for orphan in existing.difference(&desired) {
        let path = directory.join(orphan);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(delete_error(&path, e)),
        }
        tracing::debug!(path = %orphan.display(), "deleted orphan document");

        if options.prune_empty_dirs {
            prune_empty_parents(directory, orphan).await;
        }
        deleted.push(orphan.clone());
    }

    Ok(CommitReport {
        written: desired.len(),
        deleted,
    })
}

/// Documents and temp files this store writes
fn is_store_file(relative: &Path) -> bool {
    relative
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".xml") || name.ends_with(".xml.tmp"))
}

/// Render the table of contents and every Model and Instance document
fn render_documents(project: &Project, options: &StoreOptions) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    let indent = options.indent;
    let max_depth = options.max_value_depth;
    let models = project.models();
    let instances = project.instances();
    let mut documents = Vec::with_capacity(1 + models.len() + instances.len());

    let toc = TableOfContents::from_project(project).to_element();
    documents.push((toc_path(), xml::render(&toc, indent)?));

    for model in models {
        let path = path_for(EntityKind::Model, &model.qualified_name);
        let bytes = write_model(model, max_depth)
            .and_then(|doc| xml::render(&doc, indent))
            .map_err(|e| e.with_path(&path))?;
        documents.push((path, bytes));
    }

    for instance in instances {
        let path = path_for(EntityKind::Instance, &instance.qualified_name);
        let bytes = write_instance(instance, max_depth)
            .and_then(|doc| xml::render(&doc, indent))
            .map_err(|e| e.with_path(&path).with_qualified_name(&instance.qualified_name))?;
        documents.push((path, bytes));
    }

    Ok(documents)
}

/// Write every document, then report the first failure if any
///
/// All writes are awaited even after a failure so that no write is still in
/// flight when the caller decides what to do next.
async fn write_all(
    directory: &Path,
    documents: Vec<(PathBuf, Vec<u8>)>,
    concurrency: usize,
) -> Result<()> {
    let results: Vec<Result<()>> = stream::iter(documents)
        .map(|(relative, bytes)| async move {
            atomic_write(&directory.join(&relative), &bytes)
                .await
                .map(|()| {
                    tracing::debug!(
                        path = %relative.display(),
                        bytes = bytes.len(),
                        "wrote document"
                    );
                })
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    results.into_iter().collect()
}
