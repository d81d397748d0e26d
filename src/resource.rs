// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Resource declaration and convergence.
//!
//! Rendered artifacts are not written directly. Instead they are declared as
//! __resources__ in a [`Catalog`] that describes the desired end state of the
//! host. A [`Converge`] implementation then moves the host towards that state.
//!
//! # Idempotence
//!
//! Convergence only touches what differs from the desired state. A file is
//! written if it is missing or its content differs, its mode is fixed if it
//! differs, and it is otherwise left alone. Applying the same catalog twice therefore reports every file as
//! [`Outcome::Unchanged`] the second time around.
//!
//! # Packages
//!
//! The Java runtime is declared as a package resource so that it shows up in
//! the plan, but installing packages is the host package manager's business.
//! Package resources always converge to [`Outcome::Deferred`].

use crate::{
    render::{Artifact, ArtifactKind},
    resolve::Params,
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{create_dir_all, read},
    path::{Component, Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Desired state of a single thing on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Regular file with exact content.
    File(FileResource),

    /// System package that must be installed.
    Package(PackageResource),
}

impl Resource {
    /// Title of the resource, unique within a catalog.
    pub fn title(&self) -> String {
        match self {
            Self::File(file) => format!("file:{}", file.path.display()),
            Self::Package(package) => format!("package:{}", package.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
    pub owner: String,
    pub group: String,
    pub mode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageResource {
    pub name: String,
}

/// Ordered set of resources describing a whole installation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalog {
    resources: Vec<Resource>,
}

impl Catalog {
    /// Declare resources for resolved parameters and rendered artifacts.
    ///
    /// The Java package comes first, since every file only matters once a
    /// runtime exists to read it.
    pub fn declare(params: &Params, artifacts: impl IntoIterator<Item = Artifact>) -> Self {
        let mut resources = Vec::new();
        if let Some(name) = &params.java_package {
            resources.push(Resource::Package(PackageResource { name: name.clone() }));
        }

        resources.extend(artifacts.into_iter().map(|artifact| {
            Resource::File(FileResource {
                kind: artifact.kind,
                path: artifact.path,
                content: artifact.content,
                owner: params.user.clone(),
                group: params.group.clone(),
                mode: artifact.mode,
            })
        }));

        Self { resources }
    }

    /// Iterate over resources in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Look up file resource by its absolute path.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileResource> {
        self.resources.iter().find_map(|resource| match resource {
            Resource::File(file) if file.path == path.as_ref() => Some(file),
            _ => None,
        })
    }

    /// Look up package resource by name.
    pub fn package(&self, name: impl AsRef<str>) -> Option<&PackageResource> {
        self.resources.iter().find_map(|resource| match resource {
            Resource::Package(package) if package.name == name.as_ref() => Some(package),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Result of converging a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Resource did not exist and was created.
    Created,

    /// Resource existed with different state and was updated.
    Updated,

    /// Resource already matched desired state.
    Unchanged,

    /// Resource is handled by someone else.
    Deferred,
}

impl Display for Outcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Created => "create",
            Self::Updated => "update",
            Self::Unchanged => "unchanged",
            Self::Deferred => "deferred",
        })
    }
}

/// Outcome of converging one resource of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub outcome: Outcome,
}

/// Move the host towards the state described by resources.
pub trait Converge {
    /// Converge file resource.
    fn converge_file(&self, file: &FileResource) -> Result<Outcome>;

    /// Converge package resource.
    fn converge_package(&self, package: &PackageResource) -> Result<Outcome>;

    /// Converge every resource of catalog in declaration order.
    ///
    /// Stops at the first failing resource.
    fn converge(&self, catalog: &Catalog) -> Result<Vec<Report>> {
        catalog
            .iter()
            .map(|resource| -> Result<Report> {
                let outcome = match resource {
                    Resource::File(file) => self.converge_file(file)?,
                    Resource::Package(package) => self.converge_package(package)?,
                };

                Ok(Report {
                    title: resource.title(),
                    outcome,
                })
            })
            .collect()
    }
}

/// Convergence onto a local filesystem.
///
/// Absolute resource paths are placed beneath a root directory, which is "/"
/// for a real host, but can be any staging directory. A dry run computes
/// outcomes without touching anything.
#[derive(Debug, Clone)]
pub struct FsConverger {
    root: PathBuf,
    dry_run: bool,
}

impl FsConverger {
    /// Construct new filesystem converger rooted at given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Compute outcomes without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Location of resource path beneath root.
    pub fn target(&self, path: impl AsRef<Path>) -> PathBuf {
        // INVARIANT: Only keep normal components, so resources never escape root.
        let relative = path
            .as_ref()
            .components()
            .filter(|component| matches!(component, Component::Normal(_)))
            .collect::<PathBuf>();
        self.root.join(relative)
    }
}

impl Converge for FsConverger {
    #[instrument(skip(self, file), fields(path = %file.path.display()), level = "debug")]
    fn converge_file(&self, file: &FileResource) -> Result<Outcome> {
        let target = self.target(&file.path);
        let current = match read(&target) {
            Ok(current) => Some(current),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(ResourceError::ReadFile {
                    source: err,
                    path: target,
                })
            }
        };

        let content_matches = current.as_deref() == Some(file.content.as_bytes());
        let mode_matches = match current {
            Some(_) => current_mode(&target)?.map_or(true, |mode| mode == file.mode),
            None => false,
        };
        let outcome = match current {
            None => Outcome::Created,
            Some(_) if content_matches && mode_matches => Outcome::Unchanged,
            Some(_) => Outcome::Updated,
        };

        if self.dry_run {
            debug!("dry run, would {outcome} {}", target.display());
            return Ok(outcome);
        }

        if !content_matches {
            if let Some(parent) = target.parent() {
                create_dir_all(parent).map_err(|err| ResourceError::CreateDir {
                    source: err,
                    path: parent.to_path_buf(),
                })?;
            }

            write_file(&target, file.content.as_bytes(), file.mode)?;
        } else if !mode_matches {
            set_mode(&target, file.mode)?;
        }

        if outcome != Outcome::Unchanged {
            info!("{outcome} {}", target.display());
        }

        Ok(outcome)
    }

    fn converge_package(&self, package: &PackageResource) -> Result<Outcome> {
        warn!(
            "package {:?} must be installed by the host package manager",
            package.name
        );
        Ok(Outcome::Deferred)
    }
}

/// Write file content, with the file never being wider than `mode`.
#[cfg(unix)]
fn write_file(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    use std::{
        fs::{OpenOptions, Permissions},
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let write_error = |err| ResourceError::WriteFile {
        source: err,
        path: path.to_path_buf(),
    };
    let mut handle = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
        .map_err(write_error)?;

    // INVARIANT: Narrow existing files before new content lands in them.
    handle
        .set_permissions(Permissions::from_mode(mode))
        .map_err(|err| ResourceError::SetMode {
            source: err,
            path: path.to_path_buf(),
        })?;
    handle.write_all(content).map_err(write_error)
}

#[cfg(not(unix))]
fn write_file(path: &Path, content: &[u8], _mode: u32) -> Result<()> {
    std::fs::write(path, content).map_err(|err| ResourceError::WriteFile {
        source: err,
        path: path.to_path_buf(),
    })
}

/// Permission bits of existing file, if the platform has any.
#[cfg(unix)]
fn current_mode(path: &Path) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|err| ResourceError::ReadFile {
        source: err,
        path: path.to_path_buf(),
    })?;

    Ok(Some(metadata.permissions().mode() & 0o7777))
}

#[cfg(not(unix))]
fn current_mode(_path: &Path) -> Result<Option<u32>> {
    Ok(None)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::{fs::set_permissions, os::unix::fs::PermissionsExt};

    set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|err| {
        ResourceError::SetMode {
            source: err,
            path: path.to_path_buf(),
        }
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Resource convergence error types.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Current file content cannot be read.
    #[error("failed to read file at {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Parent directory cannot be created.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written.
    #[error("failed to write file at {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File permissions cannot be set.
    #[error("failed to set mode of file at {:?}", path.display())]
    SetMode {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ResourceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{env::current_dir, fs::read_to_string};

    fn file(path: &str, content: &str) -> FileResource {
        FileResource {
            kind: ArtifactKind::User,
            path: path.into(),
            content: content.into(),
            owner: "jira".into(),
            group: "jira".into(),
            mode: 0o644,
        }
    }

    #[test]
    fn target_stays_below_root() {
        let converger = FsConverger::new("/stage");
        assert_eq!(
            converger.target("/home/jira/dbconfig.xml"),
            PathBuf::from("/stage/home/jira/dbconfig.xml")
        );
        assert_eq!(
            converger.target("/home/../../etc/passwd"),
            PathBuf::from("/stage/home/etc/passwd")
        );
    }

    #[sealed_test]
    fn converge_file_is_idempotent() -> anyhow::Result<()> {
        let converger = FsConverger::new(current_dir()?);
        let resource = file("/home/jira/user.sh", "JIRA_USER=\"jira\"\n");

        assert_eq!(converger.converge_file(&resource)?, Outcome::Created);
        assert_eq!(converger.converge_file(&resource)?, Outcome::Unchanged);
        assert_eq!(
            read_to_string(converger.target("/home/jira/user.sh"))?,
            "JIRA_USER=\"jira\"\n"
        );

        let resource = file("/home/jira/user.sh", "JIRA_USER=\"atlassian\"\n");
        assert_eq!(converger.converge_file(&resource)?, Outcome::Updated);
        assert_eq!(
            read_to_string(converger.target("/home/jira/user.sh"))?,
            "JIRA_USER=\"atlassian\"\n"
        );

        Ok(())
    }

    #[sealed_test]
    fn dry_run_writes_nothing() -> anyhow::Result<()> {
        let converger = FsConverger::new(current_dir()?).dry_run(true);
        let resource = file("/opt/jira/conf/server.xml", "<Server/>\n");

        assert_eq!(converger.converge_file(&resource)?, Outcome::Created);
        assert!(!converger.target("/opt/jira/conf/server.xml").exists());

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn converge_applies_mode() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let converger = FsConverger::new(current_dir()?);
        let mut resource = file("/home/jira/dbconfig.xml", "<x/>\n");
        resource.mode = 0o600;
        converger.converge_file(&resource)?;

        let mode = std::fs::metadata(converger.target("/home/jira/dbconfig.xml"))?
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn mode_drift_is_reported_and_fixed() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = current_dir()?;
        let mut resource = file("/home/jira/dbconfig.xml", "<x/>\n");
        assert_eq!(FsConverger::new(&root).converge_file(&resource)?, Outcome::Created);

        resource.mode = 0o600;
        let mode = || -> anyhow::Result<u32> {
            Ok(std::fs::metadata(root.join("home/jira/dbconfig.xml"))?
                .permissions()
                .mode()
                & 0o777)
        };

        let plan = FsConverger::new(&root).dry_run(true);
        assert_eq!(plan.converge_file(&resource)?, Outcome::Updated);
        assert_eq!(mode()?, 0o644);

        let apply = FsConverger::new(&root);
        assert_eq!(apply.converge_file(&resource)?, Outcome::Updated);
        assert_eq!(mode()?, 0o600);
        assert_eq!(apply.converge_file(&resource)?, Outcome::Unchanged);

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn rewrite_narrows_wide_file() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = current_dir()?;
        let wide = file("/home/jira/dbconfig.xml", "<old/>\n");
        FsConverger::new(&root).converge_file(&wide)?;

        let mut narrow = file("/home/jira/dbconfig.xml", "<new password=\"x\"/>\n");
        narrow.mode = 0o600;
        assert_eq!(FsConverger::new(&root).converge_file(&narrow)?, Outcome::Updated);

        let path = root.join("home/jira/dbconfig.xml");
        assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
        assert_eq!(read_to_string(&path)?, "<new password=\"x\"/>\n");

        Ok(())
    }

    #[test]
    fn packages_are_deferred() -> anyhow::Result<()> {
        let converger = FsConverger::new("/nonexistent");
        let outcome = converger.converge_package(&PackageResource {
            name: "java-11-openjdk-headless".into(),
        })?;
        assert_eq!(outcome, Outcome::Deferred);

        Ok(())
    }
}
