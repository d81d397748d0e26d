// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Parameter resolution.
//!
//! Turns a sparse [`JiraConfig`] into a fully populated [`Params`] set that
//! templates can consume without any further decision making. Resolution
//! merges three layers, from weakest to strongest:
//!
//! 1. Per-field defaults, e.g., Tomcat listens on port 8080.
//! 2. Per-database vendor and per-JVM defaults, e.g., PostgreSQL listens on
//!    port 5432 and uses the "public" schema, OpenJDK 11 runs with G1.
//! 3. Whatever the user supplied.
//!
//! Derived values such as the JDBC URL or the extracted release directory are
//! computed from the merged result. Resolution also validates combinations
//! that cannot produce a working Jira, e.g., clustering without a shared home
//! directory.

use crate::{
    config::{Attributes, DbVendor, Facts, JiraConfig, JvmType, Product},
    version::Version,
};

use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};
use tracing::{debug, instrument};

/// Arguments every Jira startup needs regardless of runtime flavour.
pub const JVM_REQUIRED_ARGS: &str = "-Djava.awt.headless=true \
    -Datlassian.standalone=JIRA \
    -Dorg.apache.jasper.runtime.BodyContentImpl.LIMIT_BUFFER=true \
    -Dmail.mime.decodeparameters=true \
    -Dorg.dom4j.factory=com.atlassian.core.xml.InterningDocumentFactory";

/// Property that jiraconf derives from `enable_secure_admin_sessions`.
pub const WEBSUDO_PROPERTY: &str = "jira.websudo.is.disabled";

/// Stock Jira access log pattern.
pub const ACCESSLOG_FORMAT: &str = "%a %{jira.request.id}r %{jira.request.username}r %t \
    \"%m %U%q %H\" %s %b %D \"%{Referer}i\" \"%{User-Agent}i\" \"%{jira.request.assession.id}r\"";

/// Fully resolved installation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Params {
    pub version: Version,
    pub paths: Paths,
    pub user: String,
    pub group: String,
    pub java_package: Option<String>,
    pub jvm: JvmParams,
    pub db: DbParams,
    pub tomcat: TomcatParams,
    pub resources: Vec<Named>,
    pub jira_config: JiraConfigParams,
    pub cluster: Option<ClusterParams>,
}

/// Filesystem locations that managed files live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paths {
    pub installdir: PathBuf,
    pub homedir: PathBuf,
    pub webappdir: PathBuf,
    pub javahome: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JvmParams {
    pub jvm_type: JvmType,
    pub java_major: Option<u32>,
    pub xms: String,
    pub xmx: String,
    pub support_args: String,
    pub gc_args: String,
    pub code_cache_args: String,
    pub extra_args: String,
    pub required_args: String,
    pub catalina_opts: Option<String>,
    pub disable_notifications: bool,
    pub plugin_startup_timeout: Option<u32>,
    pub check_java: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbParams {
    pub vendor: DbVendor,
    pub dbtype: String,
    pub driver: String,
    pub url: String,
    pub user: String,
    pub password: String,
    pub schema: Option<String>,
    pub connection_settings: Option<String>,
    pub pool_elements: Vec<Attr>,
}

/// Optional connection pool tuning, every unset entry is left out of
/// dbconfig.xml so that Jira applies its own defaults.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolParams {
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    pub max_wait: Option<u64>,
    pub max_idle: Option<u32>,
    pub remove_abandoned: Option<bool>,
    pub remove_abandoned_timeout: Option<u64>,
    pub test_while_idle: Option<bool>,
    pub test_on_borrow: Option<bool>,
    pub min_evictable_idle_time: Option<u64>,
    pub time_between_eviction_runs: Option<u64>,
    pub validation_query: Option<String>,
    pub validation_query_timeout: Option<u64>,
}

impl PoolParams {
    /// Pool settings that are set, as dbconfig.xml element name and value.
    pub fn elements(&self) -> Vec<Attr> {
        fn attr(key: &str, value: Option<impl ToString>) -> Option<Attr> {
            value.map(|value| Attr {
                key: key.into(),
                value: value.to_string(),
            })
        }

        [
            attr("pool-min-size", self.min_size),
            attr("pool-max-size", self.max_size),
            attr("pool-max-wait", self.max_wait),
            attr("pool-max-idle", self.max_idle),
            attr("pool-remove-abandoned", self.remove_abandoned),
            attr("pool-remove-abandoned-timeout", self.remove_abandoned_timeout),
            attr("pool-test-while-idle", self.test_while_idle),
            attr("pool-test-on-borrow", self.test_on_borrow),
            attr("min-evictable-idle-time-millis", self.min_evictable_idle_time),
            attr("time-between-eviction-runs-millis", self.time_between_eviction_runs),
            attr("validation-query", self.validation_query.as_ref()),
            attr("validation-query-timeout", self.validation_query_timeout),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TomcatParams {
    pub port: u16,
    pub shutdown_port: u16,
    pub address: Option<String>,
    pub max_threads: u32,
    pub min_spare_threads: u32,
    pub accept_count: u32,
    pub connection_timeout: u32,
    pub max_http_header_size: u32,
    pub enable_lookups: bool,
    pub protocol: String,
    pub use_body_encoding_for_uri: bool,
    pub disable_upload_timeout: bool,
    pub redirect_port: u16,
    pub default_connector: bool,
    pub native_ssl: Option<SslParams>,
    pub proxy: Vec<Attr>,
    pub ajp: Vec<Attr>,
    pub additional_connectors: Vec<Connector>,
    pub accesslog_format: String,
    pub accesslog_xforwarded_for: bool,
    pub contextpath: String,
    pub memory_leak_listener: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SslParams {
    pub port: u16,
    pub protocol: String,
    pub key_alias: String,
    pub keystore_file: PathBuf,
    pub keystore_pass: String,
    pub keystore_type: String,
}

/// Extra Tomcat connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    pub port: u16,
    pub attributes: Vec<Attr>,
}

/// Named attribute table, e.g., a context resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Named {
    pub name: String,
    pub attributes: Vec<Attr>,
}

/// Single key/value attribute in rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JiraConfigParams {
    pub websudo_disabled: bool,
    pub properties: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterParams {
    pub node_id: String,
    pub shared_home: PathBuf,
    pub ehcache_listener_host: Option<String>,
    pub ehcache_listener_port: Option<u16>,
    pub ehcache_object_port: Option<u16>,
}

/// Defaults that depend on the database vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorDefaults {
    pub port: Option<u16>,
    pub driver: &'static str,
    pub dbtype: &'static str,
    pub schema: Option<&'static str>,
}

impl VendorDefaults {
    /// Look up defaults for database vendor on a given Jira release.
    pub fn lookup(vendor: DbVendor, version: Version) -> Self {
        match vendor {
            DbVendor::Postgresql => Self {
                port: Some(5432),
                driver: "org.postgresql.Driver",
                dbtype: "postgres72",
                schema: Some("public"),
            },
            DbVendor::Mysql if version.major >= 8 => Self {
                port: Some(3306),
                driver: "com.mysql.cj.jdbc.Driver",
                dbtype: "mysql8",
                schema: None,
            },
            DbVendor::Mysql => Self {
                port: Some(3306),
                driver: "com.mysql.jdbc.Driver",
                dbtype: "mysql",
                schema: None,
            },
            DbVendor::Oracle => Self {
                port: Some(1521),
                driver: "oracle.jdbc.OracleDriver",
                dbtype: "oracle10g",
                schema: None,
            },
            DbVendor::Sqlserver => Self {
                port: Some(1433),
                driver: "com.microsoft.sqlserver.jdbc.SQLServerDriver",
                dbtype: "mssql",
                schema: Some("dbo"),
            },
            DbVendor::H2 => Self {
                port: None,
                driver: "org.h2.Driver",
                dbtype: "h2",
                schema: Some("PUBLIC"),
            },
        }
    }
}

/// Defaults that depend on the Java runtime flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JvmDefaults {
    pub gc_args: &'static str,
    pub code_cache_args: &'static str,
    pub extra_args: &'static str,
}

impl JvmDefaults {
    /// Look up default JVM arguments for runtime flavour.
    pub fn lookup(jvm_type: JvmType) -> Self {
        match jvm_type {
            JvmType::OracleJdk8 | JvmType::OpenJdk8 => Self {
                gc_args: "-XX:+ExplicitGCInvokesConcurrent",
                code_cache_args: "-XX:InitialCodeCacheSize=32m -XX:ReservedCodeCacheSize=512m",
                extra_args: "-XX:-OmitStackTraceInFastThrow",
            },
            JvmType::OpenJdk11 => Self {
                gc_args: "-XX:+UseG1GC -XX:+ExplicitGCInvokesConcurrent",
                code_cache_args: "-XX:InitialCodeCacheSize=32m -XX:ReservedCodeCacheSize=512m",
                extra_args: "-XX:-OmitStackTraceInFastThrow -Djava.locale.providers=COMPAT",
            },
            JvmType::Custom => Self {
                gc_args: "",
                code_cache_args: "",
                extra_args: "",
            },
        }
    }
}

/// Build JDBC URL from connection fields.
///
/// Oracle can be addressed by SID (`@host:port:sid`) or by service name
/// (`@host:port/service`). H2 is file based and lives in the Jira home.
pub fn jdbc_url(
    vendor: DbVendor,
    server: &str,
    port: Option<u16>,
    name: &str,
    oracle_use_sid: bool,
    homedir: &std::path::Path,
) -> String {
    let port = port.map(|port| port.to_string()).unwrap_or_default();
    match vendor {
        DbVendor::Postgresql => format!("jdbc:postgresql://{server}:{port}/{name}"),
        DbVendor::Mysql => format!(
            "jdbc:mysql://{server}:{port}/{name}?useUnicode=true&characterEncoding=UTF8\
            &sessionVariables=default_storage_engine=InnoDB"
        ),
        DbVendor::Oracle if oracle_use_sid => format!("jdbc:oracle:thin:@{server}:{port}:{name}"),
        DbVendor::Oracle => format!("jdbc:oracle:thin:@{server}:{port}/{name}"),
        DbVendor::Sqlserver => {
            format!("jdbc:sqlserver://{server}:{port};databaseName={name}")
        }
        DbVendor::H2 => format!("jdbc:h2:file:{}/database/{name}", homedir.display()),
    }
}

/// Resolve installation parameters.
///
/// # Errors
///
/// - Return [`ResolveError::MissingJavaHome`] if `javahome` is not set.
/// - Return [`ResolveError::MissingSharedHome`] if clustering is enabled
///   without a shared home directory.
/// - Return [`ResolveError::InvalidConnectorPort`] if an additional connector
///   is not keyed by a port number.
/// - Return [`ResolveError::InvalidConnectorPort`] if the AJP port is not a
///   port number.
/// - Return [`ResolveError::PortConflict`] if two Tomcat listeners share a
///   port.
/// - Return [`ResolveError::InvalidAttributeName`] if an attribute table key is
///   not a valid XML name or property key.
/// - Return [`ResolveError::MultilineProperty`] or
///   [`ResolveError::ManagedProperty`] if a jira-config property would
///   override managed settings.
/// - Return [`ResolveError::UnknownJavaVersion`] if the Java check script is
///   requested for a custom runtime.
#[instrument(skip(config, facts), level = "debug")]
pub fn resolve(config: &JiraConfig, facts: &Facts) -> Result<Params> {
    let version = config.version.unwrap_or_default();
    let product = config.product.unwrap_or_default();
    let javahome = config
        .javahome
        .clone()
        .ok_or(ResolveError::MissingJavaHome)?;
    let installdir = config
        .installdir
        .clone()
        .unwrap_or_else(|| PathBuf::from("/opt/jira"));
    let homedir = config
        .homedir
        .clone()
        .unwrap_or_else(|| PathBuf::from("/home/jira"));
    let webappdir = config
        .webappdir
        .clone()
        .unwrap_or_else(|| installdir.join(extracted_dir_name(product, version)));
    debug!("resolved webappdir {}", webappdir.display());

    let jvm = resolve_jvm(config)?;
    let db = resolve_db(config, version, &homedir);
    let tomcat = resolve_tomcat(config, version, &homedir)?;
    let cluster = resolve_cluster(config, facts)?;
    let mut resources = Vec::new();
    for (name, attributes) in &config.resources {
        resources.push(Named {
            name: name.clone(),
            attributes: to_xml_attrs("resources", attributes)?,
        });
    }

    Ok(Params {
        version,
        paths: Paths {
            installdir,
            homedir,
            webappdir,
            javahome,
        },
        user: config.user.clone().unwrap_or_else(|| "jira".into()),
        group: config.group.clone().unwrap_or_else(|| "jira".into()),
        java_package: config.java_package.clone(),
        jvm,
        db,
        tomcat,
        resources,
        jira_config: JiraConfigParams {
            websudo_disabled: !config.enable_secure_admin_sessions.unwrap_or(true),
            properties: to_properties(&config.jira_config_properties)?,
        },
        cluster,
    })
}

/// Name of the directory a Jira release archive extracts into.
pub fn extracted_dir_name(product: Product, version: Version) -> String {
    format!("atlassian-{}-{version}-standalone", product.dir_name())
}

fn resolve_jvm(config: &JiraConfig) -> Result<JvmParams> {
    let jvm_type = config.jvm_type.unwrap_or_default();
    let defaults = JvmDefaults::lookup(jvm_type);
    let check_java = config.script_check_java_manage.unwrap_or(false);
    if check_java && jvm_type.java_major().is_none() {
        return Err(ResolveError::UnknownJavaVersion);
    }

    Ok(JvmParams {
        jvm_type,
        java_major: jvm_type.java_major(),
        xms: config.jvm_xms.clone().unwrap_or_else(|| "256m".into()),
        xmx: config.jvm_xmx.clone().unwrap_or_else(|| "1024m".into()),
        support_args: config.java_opts.clone().unwrap_or_default(),
        gc_args: or_default(&config.jvm_gc_args, defaults.gc_args),
        code_cache_args: or_default(&config.jvm_code_cache_args, defaults.code_cache_args),
        extra_args: or_default(&config.jvm_extra_args, defaults.extra_args),
        required_args: JVM_REQUIRED_ARGS.into(),
        catalina_opts: config.catalina_opts.clone(),
        disable_notifications: config.disable_notifications.unwrap_or(false),
        plugin_startup_timeout: config.plugin_startup_timeout,
        check_java,
    })
}

fn resolve_db(config: &JiraConfig, version: Version, homedir: &std::path::Path) -> DbParams {
    let vendor = config.db.unwrap_or_default();
    let defaults = VendorDefaults::lookup(vendor, version);
    let server = config.dbserver.as_deref().unwrap_or("localhost");
    let name = config.dbname.as_deref().unwrap_or("jira");
    let port = config.dbport.map(|port| port.0).or(defaults.port);

    // INVARIANT: Explicit URL always wins over the vendor template.
    let url = match &config.dburl {
        Some(url) => url.clone(),
        None => jdbc_url(
            vendor,
            server,
            port,
            name,
            config.oracle_use_sid.unwrap_or(true),
            homedir,
        ),
    };
    debug!("resolved {vendor} datasource {url}");

    let pool = PoolParams {
        min_size: config.pool_min_size,
        max_size: config.pool_max_size,
        max_wait: config.pool_max_wait,
        max_idle: config.pool_max_idle,
        remove_abandoned: config.pool_remove_abandoned,
        remove_abandoned_timeout: config.pool_remove_abandoned_timeout,
        test_while_idle: config.pool_test_while_idle,
        test_on_borrow: config.pool_test_on_borrow,
        min_evictable_idle_time: config.min_evictable_idle_time,
        time_between_eviction_runs: config.time_between_eviction_runs,
        validation_query: config.validation_query.clone(),
        validation_query_timeout: config.validation_query_timeout,
    };

    DbParams {
        vendor,
        dbtype: or_default(&config.dbtype, defaults.dbtype),
        driver: or_default(&config.dbdriver, defaults.driver),
        url,
        user: config.dbuser.clone().unwrap_or_else(|| "jiraadm".into()),
        password: config
            .dbpassword
            .clone()
            .unwrap_or_else(|| "mypassword".into()),
        schema: config
            .dbschema
            .clone()
            .or_else(|| defaults.schema.map(Into::into)),
        connection_settings: config.connection_settings.clone(),
        pool_elements: pool.elements(),
    }
}

fn resolve_tomcat(
    config: &JiraConfig,
    version: Version,
    homedir: &std::path::Path,
) -> Result<TomcatParams> {
    let port = config.tomcat_port.unwrap_or(8080);
    let https_port = config.tomcat_https_port.unwrap_or(8443);
    let default_connector = config.tomcat_default_connector.unwrap_or(true);

    let mut connectors = BTreeMap::new();
    for (key, attributes) in &config.tomcat_additional_connectors {
        let connector_port: u16 =
            key.trim()
                .parse()
                .map_err(|_| ResolveError::InvalidConnectorPort {
                    key: key.clone(),
                })?;
        connectors.insert(
            connector_port,
            to_xml_attrs("tomcat_additional_connectors", attributes)?,
        );
    }

    let native_ssl = config.tomcat_native_ssl.unwrap_or(false).then(|| SslParams {
        port: https_port,
        protocol: config
            .tomcat_protocol_ssl
            .clone()
            .unwrap_or_else(|| "org.apache.coyote.http11.Http11NioProtocol".into()),
        key_alias: config
            .tomcat_key_alias
            .clone()
            .unwrap_or_else(|| "jira".into()),
        keystore_file: config
            .tomcat_keystore_file
            .clone()
            .unwrap_or_else(|| homedir.join("jira.jks")),
        keystore_pass: config
            .tomcat_keystore_pass
            .clone()
            .unwrap_or_else(|| "changeit".into()),
        keystore_type: config
            .tomcat_keystore_type
            .clone()
            .unwrap_or_else(|| "JKS".into()),
    });

    let ajp_port = match config.ajp.get("port") {
        Some(value) => Some(value.to_string().trim().parse::<u16>().map_err(|_| {
            ResolveError::InvalidConnectorPort {
                key: "ajp.port".into(),
            }
        })?),
        None => None,
    };
    let shutdown_port = config.tomcat_shutdown_port.unwrap_or(8005);

    // INVARIANT: No two ports that Tomcat binds may be the same.
    let mut taken = vec![shutdown_port];
    taken.extend(ajp_port);
    if default_connector {
        taken.push(port);
    }
    if let Some(ssl) = &native_ssl {
        taken.push(ssl.port);
    }
    taken.extend(connectors.keys().copied());
    taken.sort_unstable();
    if let Some(pair) = taken.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(ResolveError::PortConflict { port: pair[0] });
    }

    Ok(TomcatParams {
        port,
        shutdown_port,
        address: config.tomcat_address.clone(),
        max_threads: config.tomcat_max_threads.unwrap_or(150),
        min_spare_threads: config.tomcat_min_spare_threads.unwrap_or(25),
        accept_count: config.tomcat_accept_count.unwrap_or(100),
        connection_timeout: config.tomcat_connection_timeout.unwrap_or(20000),
        max_http_header_size: config.tomcat_max_http_header_size.unwrap_or(8192),
        enable_lookups: config.tomcat_enable_lookups.unwrap_or(false),
        protocol: config
            .tomcat_protocol
            .clone()
            .unwrap_or_else(|| "HTTP/1.1".into()),
        use_body_encoding_for_uri: config.tomcat_use_body_encoding_for_uri.unwrap_or(true),
        disable_upload_timeout: config.tomcat_disable_upload_timeout.unwrap_or(true),
        redirect_port: config.tomcat_redirect_https_port.unwrap_or(https_port),
        default_connector,
        native_ssl,
        proxy: to_xml_attrs("proxy", &config.proxy)?,
        ajp: to_xml_attrs("ajp", &config.ajp)?,
        additional_connectors: connectors
            .into_iter()
            .map(|(port, attributes)| Connector { port, attributes })
            .collect(),
        accesslog_format: config
            .tomcat_accesslog_format
            .clone()
            .unwrap_or_else(|| ACCESSLOG_FORMAT.into()),
        accesslog_xforwarded_for: config
            .tomcat_accesslog_enable_xforwarded_for
            .unwrap_or(false),
        contextpath: config.contextpath.clone().unwrap_or_default(),
        memory_leak_listener: version.major >= 8,
    })
}

fn resolve_cluster(config: &JiraConfig, facts: &Facts) -> Result<Option<ClusterParams>> {
    if !config.datacenter.unwrap_or(false) {
        return Ok(None);
    }

    let shared_home = config
        .shared_homedir
        .clone()
        .ok_or(ResolveError::MissingSharedHome)?;
    let node_id = match &config.node_id {
        Some(node_id) => node_id.clone(),
        None if !facts.hostname.is_empty() => facts.hostname.clone(),
        None => return Err(ResolveError::MissingNodeId),
    };

    Ok(Some(ClusterParams {
        node_id,
        shared_home,
        ehcache_listener_host: config.ehcache_listener_host.clone(),
        ehcache_listener_port: config.ehcache_listener_port,
        ehcache_object_port: config.ehcache_object_port,
    }))
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.into())
}

/// Attribute table rendered as XML attributes, values are escaped later.
fn to_xml_attrs(table: &'static str, attributes: &Attributes) -> Result<Vec<Attr>> {
    attributes
        .iter()
        .map(|(key, value)| {
            if !is_xml_name(key) {
                return Err(ResolveError::InvalidAttributeName {
                    table,
                    key: key.clone(),
                });
            }

            Ok(Attr {
                key: key.clone(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Extra jira-config.properties entries, each kept to exactly one line.
fn to_properties(properties: &Attributes) -> Result<Vec<Attr>> {
    properties
        .iter()
        .map(|(key, value)| {
            if key == WEBSUDO_PROPERTY {
                return Err(ResolveError::ManagedProperty { key: key.clone() });
            }

            if !is_property_key(key) {
                return Err(ResolveError::InvalidAttributeName {
                    table: "jira_config_properties",
                    key: key.clone(),
                });
            }

            let value = value.to_string();
            if value.contains(['\n', '\r']) {
                return Err(ResolveError::MultilineProperty { key: key.clone() });
            }

            Ok(Attr {
                key: key.clone(),
                value,
            })
        })
        .collect()
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '-' | '.'))
}

fn is_property_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(['#', '!'])
        && !key
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '=' | ':' | '\\'))
}

/// Parameter resolution error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No Java runtime location given.
    #[error("javahome must be set")]
    MissingJavaHome,

    /// Clustering requested without a shared home directory.
    #[error("datacenter requires shared_homedir to be set")]
    MissingSharedHome,

    /// Clustering requested, but no node id could be determined.
    #[error("datacenter requires node_id when the host name is unknown")]
    MissingNodeId,

    /// Additional connector key is not a port number.
    #[error("additional connector key {key:?} is not a port number")]
    InvalidConnectorPort { key: String },

    /// Two connectors, or a connector and the shutdown port, share a port.
    #[error("more than one Tomcat listener binds port {port}")]
    PortConflict { port: u16 },

    /// Attribute or property key would break out of the rendered file.
    #[error("{table} key {key:?} is not a valid name")]
    InvalidAttributeName { table: &'static str, key: String },

    /// Property value spans more than one line.
    #[error("jira_config_properties value of {key:?} must be a single line")]
    MultilineProperty { key: String },

    /// Property is derived from another parameter.
    #[error("jira_config_properties cannot set {key:?}, use enable_secure_admin_sessions")]
    ManagedProperty { key: String },

    /// Java check script requested without a known Java major version.
    #[error("script_check_java_manage needs a jvm_type other than custom")]
    UnknownJavaVersion,
}

/// Friendly result alias :3
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
