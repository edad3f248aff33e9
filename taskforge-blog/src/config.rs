/// Configuration management for the blog server
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `BLOG_HOST`: Host to bind to (default: 0.0.0.0)
/// - `BLOG_PORT`: Port to bind to (default: 8090)
/// - `JWT_SECRET`: Secret key for the session cookie (required, min 32 chars)
/// - `RUST_LOG`: Log level (default: info)

use std::env;

/// Blog server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// PostgreSQL connection URL
    pub database_url: String,

    /// Secret key for signing the session cookie
    pub jwt_secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// have invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("BLOG_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BLOG_PORT")
            .unwrap_or_else(|_| "8090".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8090,
            database_url: "postgresql://localhost/test".to_string(),
            jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
        };

        assert_eq!(config.bind_address(), "127.0.0.1:8090");
    }
}
