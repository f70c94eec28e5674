use dotenvy::dotenv;
use std::env;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
}

impl Config {
    /// All required settings are read here, so a missing variable aborts
    /// startup instead of a request.
    pub fn from_env() -> Self {
        let _ = dotenv().is_ok();

        let port = env::var("PORT")
            .expect("PORT missing, it is required")
            .parse()
            .expect("PORT must be a valid u16 number");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL missing, it is required");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET missing, it is required");

        Self {
            port,
            database_url,
            jwt_secret,
        }
    }

    pub fn addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        env::set_var("PORT", "8080");
        env::set_var("DATABASE_URL", "postgres://localhost/todo");
        env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.jwt_secret, "test-secret");
    }
}
