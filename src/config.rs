use dotenvy::dotenv;
use std::env;

use crate::auth::password::hash_password;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub jwt_secret: String,

    /// Seconds a session token stays valid after login.
    pub session_ttl: usize,

    pub api_prefix: String,

    pub admin_username: String,
    /// Argon2 hash of the configured admin password, computed once at
    /// startup so the plaintext never sits in the config struct.
    pub admin_password_hash: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let admin_password = env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://hrms.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            session_ttl: env::var("SESSION_TTL")
                .unwrap_or_else(|_| "3600".to_string()) // default 1 hour
                .parse()
                .expect("SESSION_TTL must be a number of seconds"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            admin_username: env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME must be set"),
            admin_password_hash: hash_password(&admin_password),
        }
    }
}
