// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT


use anyhow::{anyhow, Result};
use jiraconf::{
    config::{Facts, JiraConfig},
    resource::Catalog,
};
use std::path::Path;

pub(crate) const WEBAPP: &str = "/opt/jira/atlassian-jira-software-8.13.5-standalone";

/// Catalog built from parameter file contents on a host named "jira1".
pub(crate) struct CatalogFixture {
    catalog: Catalog,
}

impl CatalogFixture {
    pub(crate) fn new(data: impl AsRef<str>) -> Result<Self> {
        let config: JiraConfig = data.as_ref().parse()?;
        let catalog = jiraconf::catalog(&config, &Facts::new("jira1"))?;

        Ok(Self { catalog })
    }

    pub(crate) fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.catalog.file(path).is_some()
    }

    pub(crate) fn content(&self, path: impl AsRef<Path>) -> Result<FileContent> {
        self.catalog
            .file(path.as_ref())
            .map(|file| FileContent(file.content.clone()))
            .ok_or_else(|| anyhow!("no file resource for {:?}", path.as_ref().display()))
    }
}

/// Rendered file content with chainable content assertions.
#[derive(Debug, Clone)]
pub(crate) struct FileContent(pub(crate) String);

impl FileContent {
    /// Assert that content contains given text.
    pub(crate) fn with(&self, needle: &str) -> &Self {
        assert!(
            self.0.contains(needle),
            "expected {needle:?} in content:\n{}",
            self.0
        );
        self
    }

    /// Assert that content does not contain given text.
    pub(crate) fn without(&self, needle: &str) -> &Self {
        assert!(
            !self.0.contains(needle),
            "unexpected {needle:?} in content:\n{}",
            self.0
        );
        self
    }

    /// Assert that content contains each text in order, anything in between.
    pub(crate) fn with_sequence(&self, needles: &[&str]) -> &Self {
        let mut rest = self.0.as_str();
        for needle in needles {
            match rest.find(needle) {
                Some(at) => rest = &rest[at + needle.len()..],
                None => panic!("expected {needles:?} in order in content:\n{}", self.0),
            }
        }
        self
    }

    /// Assert that content contains given text, any whitespace run matching
    /// any other whitespace run.
    pub(crate) fn with_spaced(&self, needle: &str) -> &Self {
        let squash = |data: &str| data.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(
            squash(&self.0).contains(&squash(needle)),
            "expected {needle:?} modulo whitespace in content:\n{}",
            self.0
        );
        self
    }

    /// Assert that some line starts with given text.
    pub(crate) fn with_line_starting(&self, prefix: &str) -> &Self {
        assert!(
            self.0.lines().any(|line| line.starts_with(prefix)),
            "expected line starting with {prefix:?} in content:\n{}",
            self.0
        );
        self
    }
}
