// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template rendering.
//!
//! Every managed file is produced from a template that ships inside the
//! binary. Templates only substitute resolved [`Params`], all decisions about
//! defaults are made beforehand in [`crate::resolve`]. Rendering is therefore
//! a pure function of the resolved parameters.
//!
//! # Conditional Files
//!
//! Not every file is wanted for every installation:
//!
//! - `bin/check-java.sh` only exists if the Java check script is managed.
//! - `cluster.properties` only exists if Data Center clustering is enabled.
//!
//! # Escaping
//!
//! Auto escaping is disabled. XML templates pipe values through the `xml`
//! filter, shell templates through the `shell` filter, which quotes a value
//! so that it is taken as one literal word. Properties files take values
//! verbatim, [`crate::resolve`] rejects entries that would break them.
//!
//! Booleans go through the `flag` filter, since Tomcat and Jira expect
//! lowercase "true" and "false".

use crate::resolve::Params;

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use std::{borrow::Cow, path::PathBuf};
use tracing::{debug, instrument};

/// Kinds of files that jiraconf manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    SetEnv,
    User,
    CheckJava,
    Server,
    Context,
    DbConfig,
    JiraConfigProperties,
    ClusterProperties,
}

impl ArtifactKind {
    /// All artifact kinds in declaration order.
    pub const ALL: [ArtifactKind; 8] = [
        Self::SetEnv,
        Self::User,
        Self::CheckJava,
        Self::Server,
        Self::Context,
        Self::DbConfig,
        Self::JiraConfigProperties,
        Self::ClusterProperties,
    ];

    /// Name of backing template.
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::SetEnv => "setenv.sh",
            Self::User => "user.sh",
            Self::CheckJava => "check-java.sh",
            Self::Server => "server.xml",
            Self::Context => "context.xml",
            Self::DbConfig => "dbconfig.xml",
            Self::JiraConfigProperties => "jira-config.properties",
            Self::ClusterProperties => "cluster.properties",
        }
    }

    fn template_source(&self) -> &'static str {
        match self {
            Self::SetEnv => include_str!("templates/setenv.sh.j2"),
            Self::User => include_str!("templates/user.sh.j2"),
            Self::CheckJava => include_str!("templates/check-java.sh.j2"),
            Self::Server => include_str!("templates/server.xml.j2"),
            Self::Context => include_str!("templates/context.xml.j2"),
            Self::DbConfig => include_str!("templates/dbconfig.xml.j2"),
            Self::JiraConfigProperties => include_str!("templates/jira-config.properties.j2"),
            Self::ClusterProperties => include_str!("templates/cluster.properties.j2"),
        }
    }

    /// Absolute path that the artifact is installed to.
    pub fn path(&self, params: &Params) -> PathBuf {
        let name = self.template_name();
        match self {
            Self::SetEnv | Self::User | Self::CheckJava => {
                params.paths.webappdir.join("bin").join(name)
            }
            Self::Server | Self::Context => params.paths.webappdir.join("conf").join(name),
            Self::DbConfig | Self::JiraConfigProperties | Self::ClusterProperties => {
                params.paths.homedir.join(name)
            }
        }
    }

    /// Permission bits of installed file.
    pub fn mode(&self) -> u32 {
        match self {
            Self::SetEnv | Self::User | Self::CheckJava => 0o755,
            _ => 0o600,
        }
    }

    /// Whether the artifact belongs to the installation described by params.
    pub fn is_wanted(&self, params: &Params) -> bool {
        match self {
            Self::CheckJava => params.jvm.check_java,
            Self::ClusterProperties => params.cluster.is_some(),
            _ => true,
        }
    }
}

/// Rendered file ready to be declared as a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
    pub mode: u32,
}

/// Template renderer for managed files.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Construct new renderer with every template loaded.
    ///
    /// # Errors
    ///
    /// - Return [`RenderError::Template`] if a template fails to parse.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("xml", xml_filter);
        env.add_filter("shell", shell_filter);
        env.add_filter("flag", flag_filter);

        for kind in ArtifactKind::ALL {
            env.add_template(kind.template_name(), kind.template_source())
                .map_err(|err| RenderError::Template {
                    name: kind.template_name(),
                    source: err,
                })?;
        }

        Ok(Self { env })
    }

    /// Render single artifact regardless of whether it is wanted.
    ///
    /// # Errors
    ///
    /// - Return [`RenderError::Template`] if the template fails to render.
    pub fn render(&self, kind: ArtifactKind, params: &Params) -> Result<Artifact> {
        let name = kind.template_name();
        let template = self
            .env
            .get_template(name)
            .map_err(|err| RenderError::Template { name, source: err })?;
        let content = template
            .render(params)
            .map_err(|err| RenderError::Template { name, source: err })?;

        Ok(Artifact {
            kind,
            path: kind.path(params),
            content,
            mode: kind.mode(),
        })
    }

    /// Render every artifact wanted by the installation.
    ///
    /// # Errors
    ///
    /// - Return [`RenderError::Template`] if a template fails to render.
    #[instrument(skip(self, params), level = "debug")]
    pub fn render_all(&self, params: &Params) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        for kind in ArtifactKind::ALL {
            if !kind.is_wanted(params) {
                debug!("skip {}", kind.template_name());
                continue;
            }

            let artifact = self.render(kind, params)?;
            debug!("rendered {}", artifact.path.display());
            artifacts.push(artifact);
        }

        Ok(artifacts)
    }
}

/// Escape text for use in XML element content and attribute values.
pub fn xml_escape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for ch in data.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }

    out
}

/// Quote text as a single literal shell word.
///
/// Text made only of safe characters is left alone, anything else is wrapped
/// in single quotes.
pub fn shell_escape(data: &str) -> String {
    ::shell_escape::unix::escape(Cow::Borrowed(data)).into_owned()
}

fn xml_filter(value: Value) -> String {
    xml_escape(&value.to_string())
}

fn shell_filter(value: Value) -> String {
    shell_escape(&value.to_string())
}

fn flag_filter(value: bool) -> String {
    value.to_string()
}

/// Rendering error types.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template cannot be loaded or rendered.
    #[error("failed to render template {name}")]
    Template {
        name: &'static str,
        #[source]
        source: minijinja::Error,
    },
}

/// Friendly result alias :3
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Facts, JiraConfig},
        resolve::resolve,
    };
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn params(config: JiraConfig) -> Params {
        resolve(
            &JiraConfig {
                javahome: Some("/opt/java".into()),
                ..config
            },
            &Facts::new("node1"),
        )
        .unwrap()
    }

    #[test]
    fn escape_helpers() {
        assert_eq!(
            xml_escape(r#"a&b <c> "d" 'e'"#),
            "a&amp;b &lt;c&gt; &quot;d&quot; &apos;e&apos;"
        );
        assert_eq!(shell_escape("it's"), r"'it'\''s'");
        assert_eq!(shell_escape("/opt/java"), "/opt/java");
        assert_eq!(shell_escape(""), "''");
        assert_eq!(
            shell_escape("ji\"ra; rm -rf /tmp/x"),
            r#"'ji"ra; rm -rf /tmp/x'"#
        );
    }

    #[test]
    fn every_template_parses() {
        assert!(Renderer::new().is_ok());
    }

    #[test]
    fn render_user_script() -> anyhow::Result<()> {
        let renderer = Renderer::new()?;
        let result = renderer.render(
            ArtifactKind::User,
            &params(JiraConfig {
                user: Some("atlassian".into()),
                ..Default::default()
            }),
        )?;
        let expect = indoc! {r#"
            # Managed by jiraconf, local changes will be overwritten.
            #
            # User that the Jira service runs as.
            JIRA_USER=atlassian
            export JIRA_USER
        "#};

        assert_eq!(result.content, expect);
        assert_eq!(
            result.path,
            PathBuf::from("/opt/jira/atlassian-jira-software-8.13.5-standalone/bin/user.sh")
        );
        assert_eq!(result.mode, 0o755);

        Ok(())
    }

    #[test]
    fn render_jira_config_properties() -> anyhow::Result<()> {
        let mut config = JiraConfig {
            enable_secure_admin_sessions: Some(false),
            ..Default::default()
        };
        config
            .jira_config_properties
            .insert("ops.bar.group.size.opsbar-transitions".into(), 4.into());
        config
            .jira_config_properties
            .insert("jira.projectkey.pattern".into(), "([A-Z][A-Z]+)".into());

        let result = Renderer::new()?.render(ArtifactKind::JiraConfigProperties, &params(config))?;
        let expect = indoc! {r#"
            # Managed by jiraconf, local changes will be overwritten.
            jira.websudo.is.disabled = true
            jira.projectkey.pattern = ([A-Z][A-Z]+)
            ops.bar.group.size.opsbar-transitions = 4
        "#};

        assert_eq!(result.content, expect);
        assert_eq!(result.path, PathBuf::from("/home/jira/jira-config.properties"));

        Ok(())
    }

    #[test]
    fn render_cluster_properties() -> anyhow::Result<()> {
        let result = Renderer::new()?.render(
            ArtifactKind::ClusterProperties,
            &params(JiraConfig {
                datacenter: Some(true),
                shared_homedir: Some("/mnt/jira_shared_home_dir".into()),
                ehcache_listener_port: Some(42),
                ..Default::default()
            }),
        )?;
        let expect = indoc! {r#"
            # Managed by jiraconf, local changes will be overwritten.
            #
            # Data Center node settings.
            jira.node.id = node1
            jira.shared.home = /mnt/jira_shared_home_dir
            ehcache.listener.port = 42
        "#};

        assert_eq!(result.content, expect);

        Ok(())
    }

    #[test]
    fn render_dbconfig_escapes_values() -> anyhow::Result<()> {
        let result = Renderer::new()?.render(
            ArtifactKind::DbConfig,
            &params(JiraConfig {
                db: Some(crate::config::DbVendor::Mysql),
                dbpassword: Some("p<&>ss".into()),
                ..Default::default()
            }),
        )?;
        let expect = indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <!-- Managed by jiraconf, local changes will be overwritten. -->
            <jira-database-config>
              <name>defaultDS</name>
              <delegator-name>default</delegator-name>
              <database-type>mysql8</database-type>
              <jdbc-datasource>
                <url>jdbc:mysql://localhost:3306/jira?useUnicode=true&amp;characterEncoding=UTF8&amp;sessionVariables=default_storage_engine=InnoDB</url>
                <driver-class>com.mysql.cj.jdbc.Driver</driver-class>
                <username>jiraadm</username>
                <password>p&lt;&amp;&gt;ss</password>
              </jdbc-datasource>
            </jira-database-config>
        "#};

        assert_eq!(result.content, expect);

        Ok(())
    }

    #[test]
    fn render_all_skips_unwanted() -> anyhow::Result<()> {
        let renderer = Renderer::new()?;
        let kinds = renderer
            .render_all(&params(JiraConfig::default()))?
            .into_iter()
            .map(|artifact| artifact.kind)
            .collect::<Vec<_>>();

        assert_eq!(
            kinds,
            vec![
                ArtifactKind::SetEnv,
                ArtifactKind::User,
                ArtifactKind::Server,
                ArtifactKind::Context,
                ArtifactKind::DbConfig,
                ArtifactKind::JiraConfigProperties,
            ]
        );

        Ok(())
    }

    #[test]
    fn render_is_deterministic() -> anyhow::Result<()> {
        let renderer = Renderer::new()?;
        let params = params(JiraConfig::default());
        assert_eq!(renderer.render_all(&params)?, renderer.render_all(&params)?);

        Ok(())
    }
}
