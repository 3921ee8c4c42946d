use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editions: EditionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 本地存储根目录
    pub root_dir: String,
    /// 对外访问地址前缀, 文件 URL = public_base_url + "/" + key
    pub public_base_url: String,
    /// 本服务直接提供 root_dir 的路由前缀, 为空时不挂载 (由外部 CDN 提供)
    #[serde(default = "default_serve_path")]
    pub serve_path: String,
    /// 单张横幅图片大小上限 (字节)
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

fn default_serve_path() -> String {
    "/uploads".to_string()
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: "./uploads".to_string(),
            public_base_url: "http://localhost:8080/uploads".to_string(),
            serve_path: default_serve_path(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditionsConfig {
    /// false: 已存在票据按名称全局匹配 (跨期次);
    /// true: 只匹配当前期次下的票据
    #[serde(default)]
    pub scope_titles_to_edition: bool,
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)
                .with_context(|| format!("Failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no config file was found at {config_path}")
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    storage: StorageConfig::default(),
                    editions: EditionsConfig::default(),
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config file {config_path}"));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    // 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("STORAGE_ROOT_DIR") {
            self.storage.root_dir = v;
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }
        if let Ok(v) = env::var("STORAGE_SERVE_PATH") {
            self.storage.serve_path = v;
        }
        if let Ok(v) = env::var("STORAGE_MAX_IMAGE_BYTES")
            && let Ok(n) = v.parse()
        {
            self.storage.max_image_bytes = n;
        }
        if let Ok(v) = env::var("EDITIONS_SCOPE_TITLES_TO_EDITION")
            && let Ok(b) = v.parse()
        {
            self.editions.scope_titles_to_edition = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [database]
            url = "postgres://localhost/editions"
            max_connections = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.root_dir, "./uploads");
        assert_eq!(config.storage.serve_path, "/uploads");
        assert_eq!(config.storage.max_image_bytes, 5 * 1024 * 1024);
        assert!(!config.editions.scope_titles_to_edition);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/editions"
            max_connections = 10

            [storage]
            root_dir = "/var/lib/editions"
            public_base_url = "https://cdn.example.com/banners"
            serve_path = ""

            [editions]
            scope_titles_to_edition = true
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.public_base_url, "https://cdn.example.com/banners");
        assert!(config.storage.serve_path.is_empty());
        assert_eq!(config.storage.max_image_bytes, 5 * 1024 * 1024);
        assert!(config.editions.scope_titles_to_edition);
    }
}
