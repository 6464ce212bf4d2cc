use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Every field except the JWT secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from the comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after the server drains.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub reminders: ReminderConfig,
}

/// Reminder scheduler settings.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Seconds between scheduler polls.
    pub check_interval_secs: u64,
    /// Minutes after `time_of_day` during which a reminder may still fire.
    pub catch_up_mins: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            catch_up_mins: habitforge_core::reminders::DEFAULT_CATCH_UP_MINUTES,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `REMINDER_CHECK_INTERVAL_SECS`| `60`                    |
    /// | `REMINDER_CATCH_UP_MINS`      | `10`                    |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values and when `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = ReminderConfig::default();
        let reminders = ReminderConfig {
            check_interval_secs: env_or("REMINDER_CHECK_INTERVAL_SECS", defaults.check_interval_secs)
                .max(1),
            catch_up_mins: env_or("REMINDER_CATCH_UP_MINS", defaults.catch_up_mins).max(1),
        };

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            reminders,
        }
    }
}
