//! Server configuration: a TOML file with command-line and environment
//! overrides.

use std::path::{Path, PathBuf};

use aduan_auth::{AuthConfig, BootstrapAdmin};
use aduan_core::policy::AccessPolicy;
use aduan_db::DbConfig;
use aduan_notify::NotifyConfig;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

/// Aduan complaint tracking API server.
#[derive(Parser, Debug)]
#[command(name = "aduan-server")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "ADUAN_CONFIG", default_value = "aduan.toml")]
    pub config: PathBuf,

    /// Listen address, overriding `bind` in the file
    #[arg(long, env = "ADUAN_BIND")]
    pub bind: Option<String>,

    /// SurrealDB endpoint (`mem://` or `ws://host:port`)
    #[arg(long, env = "ADUAN_DB_URL")]
    pub db_url: Option<String>,

    /// Log filter directive, e.g. `aduan=debug,tower_http=info`
    #[arg(long, env = "ADUAN_LOG", default_value = "aduan=info,tower_http=info")]
    pub log: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DbConfig::default();
        Self {
            url: db.url,
            namespace: db.namespace,
            database: db.database,
            username: db.username,
            password: db.password,
        }
    }
}

impl From<DatabaseSection> for DbConfig {
    fn from(section: DatabaseSection) -> Self {
        Self {
            url: section.url,
            namespace: section.namespace,
            database: section.database,
            username: section.username,
            password: section.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// PEM file holding the Ed25519 signing key.
    pub private_key_path: PathBuf,
    /// PEM file holding the matching public key.
    pub public_key_path: PathBuf,
    pub issuer: String,
    pub session_lifetime_secs: u64,
    pub pepper: Option<String>,
    pub min_password_length: usize,
}

impl Default for AuthSection {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            private_key_path: PathBuf::from("keys/jwt_ed25519.pem"),
            public_key_path: PathBuf::from("keys/jwt_ed25519.pub.pem"),
            issuer: auth.jwt_issuer,
            session_lifetime_secs: auth.session_lifetime_secs,
            pepper: auth.pepper,
            min_password_length: auth.min_password_length,
        }
    }
}

impl AuthSection {
    /// Read the key files and build the auth service configuration.
    pub fn load(&self) -> anyhow::Result<AuthConfig> {
        let read = |path: &Path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("reading JWT key {}", path.display()))
        };
        Ok(AuthConfig {
            jwt_private_key_pem: read(&self.private_key_path)?,
            jwt_public_key_pem: read(&self.public_key_path)?,
            session_lifetime_secs: self.session_lifetime_secs,
            jwt_issuer: self.issuer.clone(),
            pepper: self.pepper.clone(),
            min_password_length: self.min_password_length,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    pub citizen_priority_updates: bool,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            citizen_priority_updates: AccessPolicy::default().citizen_priority_updates,
        }
    }
}

impl From<PolicySection> for AccessPolicy {
    fn from(section: PolicySection) -> Self {
        Self {
            citizen_priority_updates: section.citizen_priority_updates,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    /// Allowed browser origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Everything the server reads from its configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub database: DatabaseSection,
    pub auth: AuthSection,
    pub notify: NotifyConfig,
    pub policy: PolicySection,
    pub cors: CorsSection,
    /// Administrator created at startup if its email is not registered.
    pub admin: Option<BootstrapAdmin>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".into(),
            database: DatabaseSection::default(),
            auth: AuthSection::default(),
            notify: NotifyConfig::default(),
            policy: PolicySection::default(),
            cors: CorsSection::default(),
            admin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("parsing configuration")
    }

    /// Load the file named by `args` (defaults when it does not exist) and
    /// apply the command-line overrides.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = if args.config.exists() {
            let raw = std::fs::read_to_string(&args.config)
                .with_context(|| format!("reading {}", args.config.display()))?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };

        if let Some(bind) = &args.bind {
            config.bind = bind.clone();
        }
        if let Some(url) = &args.db_url {
            config.database.url = url.clone();
        }
        Ok(config)
    }
}
