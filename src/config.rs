use std::{fmt, net::SocketAddr, str::FromStr};

use anyhow::{Context, bail};

/// What to do when the database cannot be reached at startup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StartupPolicy {
    /// Refuse to start listening until the connection is established.
    #[default]
    FailFast,
    /// Listen right away; requests answer 500 while the store is unavailable.
    ServeDegraded,
}

impl FromStr for StartupPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "serve-degraded" | "serve_degraded" => Ok(Self::ServeDegraded),
            other => bail!("unknown startup policy {other:?}"),
        }
    }
}

impl fmt::Display for StartupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::ServeDegraded => f.write_str("serve-degraded"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub startup_policy: StartupPolicy,
    pub expose_store_errors: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3001".to_string()).parse().context("PORT")?;

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => match var("DB_SERVER") {
                Some(server) => compose_postgres_url(
                    &server,
                    var("DB_USER").as_deref(),
                    var("DB_PASS").as_deref(),
                    var("DB_NAME").as_deref(),
                    flag(&var, "DB_ENCRYPT", true)?,
                    flag(&var, "DB_TRUST_SERVER_CERTIFICATE", true)?,
                ),
                None => "sqlite://cartelera.db?mode=rwc".to_string(),
            },
        };

        let max_connections = var("DB_MAX_CONNECTIONS")
            .map(|s| s.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS")?
            .unwrap_or(10);

        let startup_policy = var("STARTUP_POLICY")
            .map(|s| s.parse::<StartupPolicy>())
            .transpose()
            .context("STARTUP_POLICY")?
            .unwrap_or_default();

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            max_connections,
            run_migrations: flag(&var, "RUN_MIGRATIONS", true)?,
            startup_policy,
            expose_store_errors: flag(&var, "EXPOSE_STORE_ERRORS", true)?,
        })
    }

    /// The database URL with any password replaced, for logging.
    pub fn redacted_database_url(&self) -> String {
        redact_password(&self.database_url)
    }
}

fn flag(var: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = var(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key}: expected a boolean, got {other:?}"),
    }
}

fn compose_postgres_url(
    server: &str,
    user: Option<&str>,
    password: Option<&str>,
    database: Option<&str>,
    encrypt: bool,
    trust_server_certificate: bool,
) -> String {
    let credentials = match (user, password) {
        (Some(user), Some(password)) => format!("{user}:{password}@"),
        (Some(user), None) => format!("{user}@"),
        _ => String::new(),
    };
    let sslmode = match (encrypt, trust_server_certificate) {
        (false, _) => "disable",
        (true, true) => "require",
        (true, false) => "verify-full",
    };
    let database = database.unwrap_or_default();
    format!("postgres://{credentials}{server}/{database}?sslmode={sslmode}")
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}
