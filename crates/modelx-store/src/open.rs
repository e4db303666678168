//! Open coordinator
//!
//! Three strictly sequential phases, each depending on the previous one:
//! the table of contents builds the skeleton tree, Model documents add
//! Members, Instance documents overwrite Field values. Within a phase
//! documents are read concurrently but applied in table-of-contents order.
//!
//! A failed open leaves the tree partially populated.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use modelx_core::{log_op_end, log_op_error, log_op_start, Project};
use modelx_core_types::{ProjectId, RequestContext};

use crate::config::StoreOptions;
use crate::documents::instance_doc::read_instance;
use crate::documents::model_doc::read_model;
use crate::documents::TableOfContents;
use crate::errors::{open_error, read_error, Result};
use crate::path_mapper::{path_for, toc_path, EntityKind};
use crate::xml::{self, Element};

pub const OP_OPEN: &str = "open";
pub const PHASE_TOC: &str = "open.toc";
pub const PHASE_MODELS: &str = "open.models";
pub const PHASE_INSTANCES: &str = "open.instances";

/// Counts of entities restored by a successful open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenReport {
    pub namespaces: usize,
    pub models: usize,
    pub instances: usize,
}

/// Rebuild `project` from the documents in `directory`
///
/// `project` is expected to be fresh; Models and Instances already present
/// cause an `AlreadyExists` failure.
///
/// # Errors
/// * `Open` - wrapping the first failure (`Read`, `Parse`, `Integrity`,
///   `UnsupportedType`, ...) whose `op` names the failed phase
pub async fn open(
    project: &mut Project,
    directory: &Path,
    options: &StoreOptions,
    ctx: &RequestContext,
) -> Result<OpenReport> {
    log_op_start!(
        OP_OPEN,
        request_id = ctx.request_id.as_str(),
        project_id = ctx.project_id.as_ref().map(ProjectId::as_str),
        directory = %directory.display()
    );
    let start = Instant::now();

    let report = open_impl(project, directory, options, ctx)
        .await
        .map_err(|e| {
            let err = open_error(e).with_request_id(ctx.request_id.clone());
            log_op_error!(
                OP_OPEN,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
                cause = err.root_cause().code()
            );
            err
        })?;

    log_op_end!(
        OP_OPEN,
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        models = report.models,
        instances = report.instances
    );

    Ok(report)
}

async fn open_impl(
    project: &mut Project,
    directory: &Path,
    options: &StoreOptions,
    ctx: &RequestContext,
) -> Result<OpenReport> {
    let toc = phase(PHASE_TOC, ctx, restore_skeleton(project, directory)).await?;
    let models = phase(
        PHASE_MODELS,
        ctx,
        restore_models(project, directory, &toc, options),
    )
    .await?;
    let instances = phase(
        PHASE_INSTANCES,
        ctx,
        restore_instances(project, directory, &toc, options),
    )
    .await?;

    Ok(OpenReport {
        namespaces: toc.namespaces.len(),
        models,
        instances,
    })
}

/// Bracket one open phase with start/end events and tag its error
async fn phase<T>(
    name: &'static str,
    ctx: &RequestContext,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    log_op_start!(name, request_id = ctx.request_id.as_str());
    let start = Instant::now();

    match work.await {
        Ok(value) => {
            log_op_end!(
                name,
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str()
            );
            Ok(value)
        }
        Err(e) => {
            let err = e.with_op(name);
            log_op_error!(
                name,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str()
            );
            Err(err)
        }
    }
}

async fn restore_skeleton(project: &mut Project, directory: &Path) -> Result<TableOfContents> {
    let path = toc_path();
    let root = read_document(directory, &path).await?;
    let toc = TableOfContents::from_element(&root).map_err(|e| e.with_path(&path))?;
    toc.apply(project)?;
    Ok(toc)
}

async fn restore_models(
    project: &mut Project,
    directory: &Path,
    toc: &TableOfContents,
    options: &StoreOptions,
) -> Result<usize> {
    let paths: Vec<PathBuf> = toc
        .models
        .iter()
        .map(|qn| path_for(EntityKind::Model, qn))
        .collect();
    let documents = read_all(directory, &paths, options.concurrency()).await?;

    for ((qn, path), root) in toc.models.iter().zip(&paths).zip(&documents) {
        let members = read_model(project, qn, root, options.max_value_depth)
            .map_err(|e| e.with_path(path))?;
        tracing::debug!(qualified_name = %qn, members, "restored model");
    }
    Ok(documents.len())
}

async fn restore_instances(
    project: &mut Project,
    directory: &Path,
    toc: &TableOfContents,
    options: &StoreOptions,
) -> Result<usize> {
    let paths: Vec<PathBuf> = toc
        .instances
        .iter()
        .map(|(qn, _)| path_for(EntityKind::Instance, qn))
        .collect();
    let documents = read_all(directory, &paths, options.concurrency()).await?;

    for (((qn, _), path), root) in toc.instances.iter().zip(&paths).zip(&documents) {
        let fields = read_instance(project, qn, root, options.max_value_depth)
            .map_err(|e| e.with_path(path))?;
        tracing::debug!(qualified_name = %qn, fields, "restored instance");
    }
    Ok(documents.len())
}

/// Read documents concurrently, returned in the order of `paths`
async fn read_all(directory: &Path, paths: &[PathBuf], concurrency: usize) -> Result<Vec<Element>> {
    stream::iter(paths)
        .map(|path| read_document(directory, path))
        .buffered(concurrency)
        .try_collect()
        .await
}

async fn read_document(directory: &Path, relative: &Path) -> Result<Element> {
    let bytes = tokio::fs::read(directory.join(relative))
        .await
        .map_err(|e| read_error(relative, e))?;
    tracing::debug!(path = %relative.display(), bytes = bytes.len(), "read document");
    xml::parse(&bytes).map_err(|e| e.with_path(relative))
}
