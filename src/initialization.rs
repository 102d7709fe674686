use std::{env, fs};
use std::path::PathBuf;
use log::{info, LevelFilter};
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize)]
pub struct DBParameters {
    pub db_path: String,
}

#[derive(Deserialize)]
pub struct TelegramParameters {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

#[derive(Deserialize)]
pub struct WeatherParameters {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Deserialize)]
pub struct LLMParameters {
    pub api_key: Option<String>,
    #[serde(default = "default_llm_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub proxy_url: Option<String>,
}

impl Default for LLMParameters {
    fn default() -> Self {
        LLMParameters {
            api_key: None,
            base_url: default_llm_url(),
            model: default_model(),
            proxy_url: None,
        }
    }
}

#[derive(Deserialize)]
pub struct Config {
    pub general: General,
    pub web_server: WebServer,
    pub db: DBParameters,
    pub telegram: TelegramParameters,
    pub weather: WeatherParameters,
    #[serde(default)]
    pub llm: LLMParameters,
}

fn default_poll_timeout() -> u64 { 30 }
fn default_weather_url() -> String { "https://api.openweathermap.org".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_llm_url() -> String { "https://api.groq.com/openai/v1".to_string() }
fn default_model() -> String { "groq/compound".to_string() }

/// Loads configuration, applies environment overrides and sets up logging.
///
/// The configuration file is given as first argument, or in CONFIG_PATH,
/// and defaults to config.toml in the working directory.
pub fn config() -> Result<Config, ConfigError> {
    // a missing .env is fine, plain environment variables are used then
    let dotenv = dotenvy::dotenv();

    let config_path = env::args().nth(1)
        .or_else(|| env::var("CONFIG_PATH").ok())
        .unwrap_or_else(|| "config.toml".to_string());

    let mut config = load_config(&config_path)?;
    apply_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    info!("ridecheck version: {}", env!("CARGO_PKG_VERSION"));
    info!("{}", describe_dotenv(&dotenv));
    info!("configuration loaded from {}", config_path);

    Ok(config)
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    Ok(config)
}

/// Overrides secrets and deployment specific items from the environment
///
/// # Arguments
///
/// * 'config' - configuration to update
/// * 'lookup' - environment lookup
fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("TELEGRAM_TOKEN") {
        config.telegram.token = token;
    }
    if let Some(api_key) = lookup("WEATHER_API_KEY") {
        config.weather.api_key = api_key;
    }
    if let Some(api_key) = lookup("GROQ_API_KEY") {
        config.llm.api_key = Some(api_key);
    }
    if let Some(proxy_url) = lookup("PROXY_URL") {
        config.llm.proxy_url = Some(proxy_url);
    }
    if let Some(db_path) = lookup("DATABASE_PATH") {
        config.db.db_path = db_path;
    }
    if let Some(port) = lookup("PORT") {
        config.web_server.bind_port = port.parse()
            .map_err(|_| ConfigError(format!("invalid PORT: {}", port)))?;
    }

    // empty values count as not given
    config.llm.api_key = config.llm.api_key.take().filter(|k| !k.is_empty());
    config.llm.proxy_url = config.llm.proxy_url.take().filter(|p| !p.is_empty());

    Ok(())
}

fn describe_dotenv(result: &Result<PathBuf, dotenvy::Error>) -> String {
    match result {
        Ok(path) => format!("environment loaded from {}", path.display()),
        Err(e) if e.not_found() => "no .env file found, using environment variables".to_string(),
        Err(e) => format!("failed to load .env file, using environment variables: {}", e),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.telegram.token.is_empty() || config.weather.api_key.is_empty() {
        return Err(ConfigError::from("telegram token or weather api key not set"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL: &str = r#"
        [general]
        log_path = "ridecheck.log"
        log_level = "info"
        log_to_stdout = true

        [web_server]
        bind_address = "0.0.0.0"
        bind_port = 8080

        [db]
        db_path = "locations.db"

        [telegram]

        [weather]
    "#;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config: Config = toml::from_str(MINIMAL).unwrap();

        assert_eq!(config.general.log_level, LevelFilter::Info);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.weather.language, "en");
        assert_eq!(config.llm.model, "groq/compound");
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn environment_overrides_file() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        let env = env_of(&[
            ("TELEGRAM_TOKEN", "123:abc"),
            ("WEATHER_API_KEY", "owm"),
            ("GROQ_API_KEY", ""),
            ("PROXY_URL", "socks5://127.0.0.1:1080"),
            ("PORT", "9090"),
        ]);

        apply_overrides(&mut config, env).unwrap();

        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.weather.api_key, "owm");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.proxy_url.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.web_server.bind_port, 9090);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        assert!(apply_overrides(&mut config, env_of(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn missing_secrets_fail_validation() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        apply_overrides(&mut config, env_of(&[("TELEGRAM_TOKEN", "123:abc")])).unwrap();

        assert!(validate(&config).is_err());
    }

    #[test]
    fn dotenv_outcome_is_described() {
        let loaded = describe_dotenv(&Ok(PathBuf::from("/srv/ridecheck/.env")));
        assert_eq!(loaded, "environment loaded from /srv/ridecheck/.env");

        let missing = dotenvy::Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
        assert_eq!(describe_dotenv(&Err(missing)), "no .env file found, using environment variables");

        let broken = dotenvy::Error::LineParse("KEY VALUE".to_string(), 3);
        assert!(describe_dotenv(&Err(broken)).starts_with("failed to load .env file"));
    }
}
