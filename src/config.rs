// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the installation parameter file that jiraconf reads
//! to simplify the process of serialization and deserialization. File I/O is
//! left to the caller to figure out.
//!
//! # General Layout
//!
//! The parameter file is a flat TOML table. Every key is optional except
//! `javahome`. Keys that are left out fall back to per-field, per-database
//! vendor, or per-JVM defaults during resolution. Hash-valued parameters like
//! `proxy`, `ajp`, `resources`, or `tomcat_additional_connectors` are plain
//! TOML tables whose values may be strings, integers, or booleans.
//!
//! ```toml
//! version = "8.13.5"
//! javahome = "/usr/lib/jvm/jre-11-openjdk"
//! java_package = "java-11-openjdk-headless"
//! db = "mysql"
//!
//! [proxy]
//! scheme = "https"
//! proxyName = "jira.example.com"
//! proxyPort = 443
//! ```

use crate::version::Version;

use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Installation parameters for a Jira instance.
///
/// Each field mirrors one installation parameter. `None` means "use the
/// default", which is decided by [`crate::resolve`], never here.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct JiraConfig {
    /// Jira release to configure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// Jira product flavour, decides the name of the extracted directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,

    /// Directory that holds extracted Jira releases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installdir: Option<PathBuf>,

    /// Jira home directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homedir: Option<PathBuf>,

    /// Override for the extracted release directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webappdir: Option<PathBuf>,

    /// Owner of managed files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Group of managed files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Java runtime to start Jira with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javahome: Option<PathBuf>,

    /// Package that provides the Java runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_package: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_xms: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_xmx: Option<String>,

    /// Java runtime flavour, selects default JVM arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_type: Option<JvmType>,

    /// Extra JVM options, rendered as `JVM_SUPPORT_RECOMMENDED_ARGS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_opts: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_gc_args: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_code_cache_args: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_extra_args: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalina_opts: Option<String>,

    /// Disable outgoing and incoming mail at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notifications: Option<bool>,

    /// Plugin system startup timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_startup_timeout: Option<u32>,

    /// Manage a startup script that verifies the Java runtime version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_check_java_manage: Option<bool>,

    /// Database vendor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<DbVendor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbuser: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbpassword: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbserver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbport: Option<Port>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbdriver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbtype: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbschema: Option<String>,

    /// Full JDBC URL, replaces the vendor URL template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dburl: Option<String>,

    /// Connect to Oracle by SID instead of by service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_use_sid: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_settings: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_min_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_max_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_max_wait: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_max_idle: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_remove_abandoned: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_remove_abandoned_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_test_while_idle: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_test_on_borrow: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_evictable_idle_time: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_between_eviction_runs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_query_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_shutdown_port: Option<u16>,

    /// Bind address of the HTTP connectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_max_threads: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_min_spare_threads: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_accept_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_connection_timeout: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_max_http_header_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_enable_lookups: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_use_body_encoding_for_uri: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_disable_upload_timeout: Option<bool>,

    /// Render the stock HTTP connector on `tomcat_port`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_default_connector: Option<bool>,

    /// Extra connectors keyed by port number.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tomcat_additional_connectors: BTreeMap<String, Attributes>,

    /// Render a TLS connector terminated by Tomcat itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_native_ssl: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_https_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_redirect_https_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_protocol_ssl: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_key_alias: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_keystore_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_keystore_pass: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_keystore_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_accesslog_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_accesslog_enable_xforwarded_for: Option<bool>,

    /// Web application context path, e.g., "/jira".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextpath: Option<String>,

    /// Reverse proxy attributes merged into the default connector.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub proxy: Attributes,

    /// AJP connector attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub ajp: Attributes,

    /// Tomcat context resources keyed by resource name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Attributes>,

    /// Require re-authentication for administrative actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_secure_admin_sessions: Option<bool>,

    /// Additional entries for jira-config.properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub jira_config_properties: Attributes,

    /// Enable Data Center clustering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_homedir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ehcache_listener_host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ehcache_listener_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ehcache_object_port: Option<u16>,
}

impl JiraConfig {
    /// Starting point for a new parameter file.
    pub fn template(javahome: impl Into<PathBuf>) -> Self {
        Self {
            version: Some(Version::default()),
            javahome: Some(javahome.into()),
            db: Some(DbVendor::default()),
            jvm_type: Some(JvmType::default()),
            ..Default::default()
        }
    }
}

impl FromStr for JiraConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: JiraConfig = toml::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on every path-valued field.
        for path in [
            &mut config.installdir,
            &mut config.homedir,
            &mut config.webappdir,
            &mut config.javahome,
            &mut config.shared_homedir,
            &mut config.tomcat_keystore_file,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_path(path)?;
        }

        Ok(config)
    }
}

impl Display for JiraConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Jira product flavour.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    #[default]
    Jira,
    JiraSoftware,
    JiraCore,
    Servicedesk,
}

impl Product {
    /// Name used by Atlassian for the extracted release directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Jira | Self::JiraSoftware => "jira-software",
            Self::JiraCore => "jira-core",
            Self::Servicedesk => "servicedesk",
        }
    }
}

/// Supported database vendors.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbVendor {
    #[default]
    Postgresql,
    Mysql,
    Oracle,
    Sqlserver,
    H2,
}

impl Display for DbVendor {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::Sqlserver => "sqlserver",
            Self::H2 => "h2",
        })
    }
}

/// Java runtime flavours with known default JVM arguments.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
pub enum JvmType {
    #[serde(rename = "oracle-jdk-1.8")]
    OracleJdk8,

    #[serde(rename = "openjdk-1.8")]
    OpenJdk8,

    #[default]
    #[serde(rename = "openjdk-11")]
    OpenJdk11,

    /// No defaults, every JVM argument must be given explicitly.
    #[serde(rename = "custom")]
    Custom,
}

impl JvmType {
    /// Java major version expected by this runtime flavour.
    pub fn java_major(&self) -> Option<u32> {
        match self {
            Self::OracleJdk8 | Self::OpenJdk8 => Some(8),
            Self::OpenJdk11 => Some(11),
            Self::Custom => None,
        }
    }
}

/// Free-form attribute table, e.g., connector or resource attributes.
pub type Attributes = BTreeMap<String, Scalar>;

/// Scalar value of an attribute table.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl Display for Scalar {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Bool(value) => write!(fmt, "{value}"),
            Self::Integer(value) => write!(fmt, "{value}"),
            Self::String(value) => fmt.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Network port that may be written as an integer or as a string.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Port(pub u16);

impl Display for Port {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}", self.0)
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PortVisitor;

        impl Visitor<'_> for PortVisitor {
            type Value = Port;

            fn expecting(&self, fmt: &mut Formatter) -> FmtResult {
                fmt.write_str("a port number as integer or string")
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Port, E> {
                u16::try_from(value)
                    .map(Port)
                    .map_err(|_| E::custom(format!("port {value} out of range")))
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Port, E> {
                u16::try_from(value)
                    .map(Port)
                    .map_err(|_| E::custom(format!("port {value} out of range")))
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Port, E> {
                value
                    .trim()
                    .parse()
                    .map(Port)
                    .map_err(|_| E::custom(format!("invalid port {value:?}")))
            }
        }

        deserializer.deserialize_any(PortVisitor)
    }
}

/// Host facts that rendering may depend on.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Facts {
    /// Short host name, the default cluster node id.
    pub hostname: String,
}

impl Facts {
    /// Construct new set of facts.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
