use std::env;

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const DEFAULT_PORT: u16 = 8080;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and shared through
/// `AppState`, from which middleware and handlers pull it via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which secrets are mandatory.
    pub env: Env,
    // Postgres connection string. `None` in local mode selects the in-memory store.
    pub db_url: Option<String>,
    // Shared HS256 secret used to verify bearer tokens.
    pub jwt_secret: String,
    // TCP port the HTTP server binds on.
    pub port: u16,
    // When true, role create/update/delete sit behind authentication and the admin role.
    pub protect_role_routes: bool,
}

/// Env
///
/// Runtime context: `Local` favours developer convenience (pretty logs, in-memory store,
/// fallback secret); `Production` demands every secret explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests: local mode, in-memory store.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            port: DEFAULT_PORT,
            protect_role_routes: false,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// load
    ///
    /// Reads configuration from environment variables at startup.
    ///
    /// # Panics
    /// Panics in `production` when `JWT_SECRET` or `DATABASE_URL` is missing, and in any
    /// environment when `PORT` is set but not a valid port number.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|_| panic!("FATAL: PORT must be a valid port number, got '{raw}'")),
            Err(_) => DEFAULT_PORT,
        };

        let protect_role_routes = env::var("PROTECT_ROLE_ROUTES")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            env,
            db_url,
            jwt_secret,
            port,
            protect_role_routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_truthy_spellings() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v} should be truthy");
        }
        for v in ["0", "false", "", "nope"] {
            assert!(!parse_flag(v), "{v} should be falsy");
        }
    }
}
