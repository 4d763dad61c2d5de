use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_first, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_events::CloudinaryConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    /// `None` when no Cloudinary credentials are set; uploads then fail
    pub cloudinary: Option<CloudinaryConfig>,
    pub server: ServerConfig,
    /// Public origin used for canonical links (`APP_BASE_URL`)
    pub base_url: String,
    /// Allowed CORS origins (`CORS_ALLOWED_ORIGIN`, comma-separated)
    pub cors_origins: Vec<String>,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let cloudinary = match CloudinaryConfig::from_env() {
            Ok(config) => Some(config),
            Err(ConfigError::MissingEnvVar(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let base_url = env_first(&["APP_BASE_URL"])
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", server.port));

        let cors_origins = env_first(&["CORS_ALLOWED_ORIGIN"])
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec![base_url.clone()]);

        Ok(Self {
            app: app_info!(),
            mongodb: mongodb.with_app_name(env!("CARGO_PKG_NAME")),
            cloudinary,
            server,
            base_url,
            cors_origins,
            environment,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 10] = [
        "APP_BASE_URL",
        "CORS_ALLOWED_ORIGIN",
        "PORT",
        "MONGODB_URI",
        "MONGODB_URL",
        "MONGO_URL",
        "CLOUDINARY_URL",
        "CLOUDINARY_CLOUD_NAME",
        "CLOUDINARY_API_KEY",
        "CLOUDINARY_API_SECRET",
    ];

    #[test]
    fn test_defaults_without_environment() {
        temp_env::with_vars_unset(VARS, || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.base_url, "http://localhost:8080");
            assert_eq!(config.cors_origins, vec!["http://localhost:8080"]);
            assert!(config.cloudinary.is_none());
            assert!(!config.mongodb.is_configured());
            assert_eq!(config.mongodb.app_name.as_deref(), Some("evently_api"));
            assert_eq!(config.app.name, "evently_api");
        });
    }

    #[test]
    fn test_explicit_settings() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_vars(
                [
                    ("APP_BASE_URL", Some("https://evently.dev/")),
                    ("CORS_ALLOWED_ORIGIN", Some("https://a.dev, https://b.dev/ ,")),
                    ("MONGODB_URI", Some("mongodb://db:27017/evently")),
                    ("CLOUDINARY_URL", Some("cloudinary://k:s@demo")),
                ],
                || {
                    let config = Config::from_env().unwrap();

                    assert_eq!(config.base_url, "https://evently.dev");
                    assert_eq!(config.cors_origins, vec!["https://a.dev", "https://b.dev"]);
                    assert!(config.mongodb.is_configured());
                    assert_eq!(config.cloudinary.unwrap().cloud_name, "demo");
                },
            );
        });
    }

    #[test]
    fn test_malformed_cloudinary_url_is_an_error() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_var("CLOUDINARY_URL", Some("https://nope"), || {
                assert!(Config::from_env().is_err());
            });
        });
    }

    #[test]
    fn test_partial_cloudinary_credentials_disable_uploads() {
        temp_env::with_vars_unset(VARS, || {
            temp_env::with_var("CLOUDINARY_CLOUD_NAME", Some("demo"), || {
                assert!(Config::from_env().unwrap().cloudinary.is_none());
            });
        });
    }
}
