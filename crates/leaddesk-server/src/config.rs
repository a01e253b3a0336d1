//! Server configuration for `LeadDesk`.
//!
//! Loads configuration from environment variables. Defaults exist only so a
//! developer can start the server locally; every production deployment is
//! expected to set the database, admin key, and mail variables explicitly.

use std::net::SocketAddr;
use std::path::PathBuf;

use leaddesk_core::admin_key::AdminKey;
use leaddesk_core::notify::MailConfig;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/leaddesk";
const DEFAULT_DATABASE: &str = "leaddesk";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Lead storage backend.
    pub storage_backend: StorageBackendType,
    /// Admin secret; `None` makes every admin route answer 500.
    pub admin_key: Option<AdminKey>,
    /// SMTP settings; `None` disables notifications.
    pub mail: Option<MailConfig>,
    /// HTTP-layer settings used when building the router.
    pub http: HttpOptions,
    /// Fixed `<scheme>://<host>` for resume URLs, instead of the request's.
    pub public_base_url: Option<String>,
    /// Directory holding uploaded resumes.
    pub upload_dir: PathBuf,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

/// Router-level settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Origins allowed by CORS. `["*"]` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Request body limit for the submission endpoint.
    pub max_upload_bytes: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            allowed_origins: split_list(DEFAULT_ORIGINS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// `MongoDB` collection.
    Mongo { uri: String, database: String },
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `LEADDESK_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:5000`)
    /// - `LEADDESK_STORAGE` — `mongo` or `memory` (default: `mongo`)
    /// - `MONGO_URI` — `MongoDB` connection string
    /// - `MONGO_DATABASE` — database name when the URI names none (default: `leaddesk`)
    /// - `ADMIN_API_KEY` — admin shared secret (unset: admin routes answer 500)
    /// - `EMAIL_USER`, `EMAIL_PASS`, `ADMIN_EMAIL`, `SMTP_HOST` — mail notification settings
    /// - `ALLOWED_ORIGINS` — comma-separated CORS allow-list
    /// - `UPLOAD_DIR` — resume directory (default: `uploads`)
    /// - `PUBLIC_BASE_URL` — fixed base for resume download URLs
    /// - `MAX_UPLOAD_BYTES` — submission body limit (default: 10 MiB)
    /// - `LEADDESK_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

        // Priority: LEADDESK_BIND_ADDR > PORT > default 127.0.0.1:5000
        let bind_addr = if let Some(addr) = var("LEADDESK_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port) = var("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            default_addr
        };

        let storage_backend = match var("LEADDESK_STORAGE")
            .unwrap_or_else(|| "mongo".to_owned())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackendType::Memory,
            _ => StorageBackendType::Mongo {
                uri: var("MONGO_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.to_owned()),
                database: var("MONGO_DATABASE")
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_owned()),
            },
        };

        let admin_key = var("ADMIN_API_KEY").and_then(AdminKey::new);

        let mail = match (var("EMAIL_USER"), var("EMAIL_PASS"), var("ADMIN_EMAIL")) {
            (Some(user), Some(pass), Some(to))
                if !user.is_empty() && !pass.is_empty() && !to.is_empty() =>
            {
                Some(MailConfig {
                    relay_host: var("SMTP_HOST")
                        .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
                    from: user.clone(),
                    username: user,
                    password: pass,
                    to,
                })
            }
            _ => None,
        };

        let http = HttpOptions {
            allowed_origins: split_list(
                &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ORIGINS.to_owned()),
            ),
            max_upload_bytes: var("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let public_base_url = var("PUBLIC_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty());

        let upload_dir = PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_owned()));

        let log_level = var("LEADDESK_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        Self {
            bind_addr,
            storage_backend,
            admin_key,
            mail,
            http,
            public_base_url,
            upload_dir,
            log_level,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_are_local_development() {
        let cfg = load(&[]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 5000)));
        assert_eq!(
            cfg.storage_backend,
            StorageBackendType::Mongo {
                uri: DEFAULT_MONGO_URI.to_owned(),
                database: "leaddesk".to_owned(),
            }
        );
        assert!(cfg.admin_key.is_none());
        assert!(cfg.mail.is_none());
        assert_eq!(cfg.upload_dir, PathBuf::from("uploads"));
        assert_eq!(
            cfg.http.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
    }

    #[test]
    fn port_binds_all_interfaces() {
        let cfg = load(&[("PORT", "8080")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn bind_addr_overrides_port() {
        let cfg = load(&[("PORT", "8080"), ("LEADDESK_BIND_ADDR", "10.0.0.2:9000")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([10, 0, 0, 2], 9000)));
    }

    #[test]
    fn empty_admin_key_counts_as_unset() {
        assert!(load(&[("ADMIN_API_KEY", "")]).admin_key.is_none());
        assert!(load(&[("ADMIN_API_KEY", "k")]).admin_key.is_some());
    }

    #[test]
    fn mail_needs_user_password_and_recipient() {
        assert!(load(&[("EMAIL_USER", "bot@x.io"), ("EMAIL_PASS", "pw")]).mail.is_none());

        let cfg = load(&[
            ("EMAIL_USER", "bot@x.io"),
            ("EMAIL_PASS", "pw"),
            ("ADMIN_EMAIL", "boss@x.io"),
        ]);
        let mail = cfg.mail.unwrap();
        assert_eq!(mail.relay_host, "smtp.gmail.com");
        assert_eq!(mail.from, "bot@x.io");
        assert_eq!(mail.to, "boss@x.io");
    }

    #[test]
    fn origins_and_limits_are_parsed() {
        let cfg = load(&[
            ("ALLOWED_ORIGINS", " https://a.com , ,https://b.com"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("PUBLIC_BASE_URL", "https://api.example.com/"),
            ("LEADDESK_STORAGE", "memory"),
        ]);
        assert_eq!(cfg.http.allowed_origins, vec!["https://a.com", "https://b.com"]);
        assert_eq!(cfg.http.max_upload_bytes, 2048);
        assert_eq!(
            cfg.public_base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(cfg.storage_backend, StorageBackendType::Memory);
    }
}
