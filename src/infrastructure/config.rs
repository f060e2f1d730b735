use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://foodglobal.db?mode=rwc";
const DEFAULT_PORT: u16 = 3001;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` wins over the deployment variable `DB_DEPLOY`; without
    /// either a local SQLite file is used. Whichever is picked must be a
    /// `sqlite:` URL: only the SQLite driver is built in, and `init_db`
    /// refuses anything else at startup.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DB_DEPLOY"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
