use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // in bytes
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub entries_file: String,
    pub users_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8084)?
            .set_default("server.max_body_size", 64 * 1024)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.entries_file", "entries.csv")?
            .set_default("storage.users_file", "users.csv")?
            .set_default("session.cookie_name", "ledger_session")?
            .set_default("session.secure", false)?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("web.templates_dir", "templates")?
            .set_default("web.static_dir", "static")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("APP").prefix_separator("_").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
pub fn test_config(data_dir: &std::path::Path) -> Config {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            max_body_size: 64 * 1024,
        },
        storage: StorageConfig {
            data_dir: data_dir.to_path_buf(),
            entries_file: "entries.csv".into(),
            users_file: "users.csv".into(),
        },
        session: SessionConfig {
            cookie_name: "ledger_session".into(),
            secure: false,
        },
        // Minimum cost bcrypt accepts; keeps the tests fast.
        auth: AuthConfig { bcrypt_cost: 4 },
        web: WebConfig {
            templates_dir: root.join("templates"),
            static_dir: root.join("static"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_uses_defaults() {
        let config = Config::load().unwrap();
        assert_eq!(config.server.port, 8084);
        assert_eq!(config.storage.entries_file, "entries.csv");
        assert_eq!(config.storage.users_file, "users.csv");
    }
}
