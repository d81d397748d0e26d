// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for external files that need to be
//! interacted with, and gather the host facts that rendering depends on.

use crate::config::Facts;

use std::{env, fs::read_to_string, path::PathBuf};

/// Determine default absolute path to the parameter file.
///
/// Uses XDG Base Directory path `$XDG_CONFIG_HOME/jiraconf/jira.toml` as the
/// default absolute path. Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoConfigDir`] if configuration directory cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join("jiraconf").join("jira.toml"))
        .ok_or(NoConfigDir)
}

/// Gather host facts.
///
/// The host name comes from `$HOSTNAME` if set, or from `/etc/hostname`
/// otherwise. Only the short name is kept, so "jira1.example.com" becomes
/// "jira1". An unknown host name is left empty.
pub fn host_facts() -> Facts {
    let hostname = env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| read_to_string("/etc/hostname").ok())
        .map(|name| short_hostname(&name))
        .unwrap_or_default();

    Facts::new(hostname)
}

fn short_hostname(name: &str) -> String {
    name.trim().split('.').next().unwrap_or_default().to_string()
}

/// No way to determine user's configuration directory.
///
/// # See Also
///
/// - [`dirs::config_dir`](https://docs.rs/dirs/latest/dirs/fn.config_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's configuration directory")]
pub struct NoConfigDir;

/// Friendly result alias :3
pub type Result<T, E = NoConfigDir> = std::result::Result<T, E>;
