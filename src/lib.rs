// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configure Jira installations from a single parameter file.
//!
//! Jiraconf turns a sparse set of installation parameters into the files that
//! a Jira server reads at startup: `setenv.sh`, `user.sh`, `server.xml`,
//! `context.xml`, `dbconfig.xml`, `jira-config.properties`, and optionally
//! `check-java.sh` and `cluster.properties`. The work happens in three steps:
//!
//! 1. [`resolve`] merges the parameters with their defaults.
//! 2. [`render`] substitutes resolved parameters into embedded templates.
//! 3. [`resource`] declares the results and converges them onto a host.
//!
//! [`catalog`] runs the first two steps plus declaration in one go.

pub mod config;
pub mod path;
pub mod render;
pub mod resolve;
pub mod resource;
pub mod version;

use crate::{
    config::{Facts, JiraConfig},
    render::Renderer,
    resource::Catalog,
};

use tracing::{debug, instrument};

/// Build resource catalog for an installation.
///
/// # Errors
///
/// - Return [`Error::Resolve`] if parameters are invalid.
/// - Return [`Error::Render`] if a template fails to render.
#[instrument(skip(config, facts), level = "debug")]
pub fn catalog(config: &JiraConfig, facts: &Facts) -> Result<Catalog> {
    let params = resolve::resolve(config, facts)?;
    let artifacts = Renderer::new()?.render_all(&params)?;
    let catalog = Catalog::declare(&params, artifacts);
    debug!("declared {} resources", catalog.len());

    Ok(catalog)
}

/// All possible error types of catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parameter resolution fails.
    #[error(transparent)]
    Resolve(#[from] resolve::ResolveError),

    /// Template rendering fails.
    #[error(transparent)]
    Render(#[from] render::RenderError),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
