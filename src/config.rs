use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
    pub frontend_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        let upload_url_prefix =
            env::var("UPLOAD_URL_PREFIX").unwrap_or_else(|_| "/uploads".to_string());
        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            upload_dir,
            upload_url_prefix,
            frontend_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_falls_back_to_defaults() {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/shoes");
            env::remove_var("APP_HOST");
            env::remove_var("APP_PORT");
            env::remove_var("UPLOAD_DIR");
            env::remove_var("UPLOAD_URL_PREFIX");
            env::remove_var("FRONTEND_ORIGIN");
        }

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.upload_url_prefix, "/uploads");
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/shoes");
            env::set_var("APP_HOST", "0.0.0.0");
            env::set_var("APP_PORT", "8088");
            env::set_var("UPLOAD_DIR", "/srv/uploads");
        }

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8088);
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));

        unsafe {
            env::remove_var("APP_HOST");
            env::remove_var("APP_PORT");
            env::remove_var("UPLOAD_DIR");
        }
    }
}
