use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config/climate";
const ENV_PREFIX: &str = "CLIMATE";
const CONFIG_PATH_ENV: &str = "CLIMATE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct ClimateConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5000)?
        .set_default("database.path", "Resources/hawaii.sqlite")?)
}

/// Defaults, then the config file, then `CLIMATE__*` env vars.
///
/// The file is `$CLIMATE_CONFIG` when set, else the optional `config/climate.*`.
pub fn load_climate_config() -> anyhow::Result<ClimateConfig> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => load_climate_config_from(Path::new(&path)),
        None => load(config::File::with_name(CONFIG_FILE).required(false)),
    }
}

pub fn load_climate_config_from(path: &Path) -> anyhow::Result<ClimateConfig> {
    load(config::File::from(path))
}

fn load(
    file: config::File<config::FileSourceFile, config::FileFormat>,
) -> anyhow::Result<ClimateConfig> {
    let settings = with_defaults()?
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let file = write_toml("");
        let config = load_climate_config_from(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.database.path,
            PathBuf::from("Resources/hawaii.sqlite")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            path = "/data/hawaii.sqlite"
            "#,
        );
        let config = load_climate_config_from(file.path()).unwrap();

        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.database.path, PathBuf::from("/data/hawaii.sqlite"));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let file = write_toml("[server]\nhost = \"not a host\"\n");
        let config = load_climate_config_from(file.path()).unwrap();
        assert!(config.server.socket_addr().is_err());
    }
}
