use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; UnfurlBot/1.0)";

/// Settings for the HTML page extractor.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Page bodies are cut off after this many bytes before parsing.
    pub max_body_bytes: usize,
    /// Skip the private/loopback address check. Only for local testing.
    pub allow_private_hosts: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 1024 * 1024,
            allow_private_hosts: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    /// Upper bound on a whole request, extraction included.
    pub request_timeout: Duration,
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Read configuration from the process environment (and `.env`, if any).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Missing or
    /// unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ExtractorConfig::default();

        Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080),
            is_dev: lookup("APP_ENV").as_deref() != Some("production"),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)),
            extractor: ExtractorConfig {
                fetch_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "FETCH_TIMEOUT_SECS",
                    defaults.fetch_timeout.as_secs(),
                )),
                user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
                max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes),
                allow_private_hosts: parse_or(
                    &lookup,
                    "ALLOW_PRIVATE_HOSTS",
                    defaults.allow_private_hosts,
                ),
            },
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config value");
            default
        }),
        None => default,
    }
}
