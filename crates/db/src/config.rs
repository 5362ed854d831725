use todolist_core::error::CoreError;

/// Connection parameters for the PostgreSQL backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Full URL override; wins over the individual parts when set.
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "todolist".into(),
            password: "todolist".into(),
            host: "localhost".into(),
            port: 5432,
            name: "todolist".into(),
            url: None,
        }
    }
}

impl DatabaseConfig {
    /// Load connection parameters from environment variables with defaults.
    ///
    /// | Env Var        | Default     |
    /// |----------------|-------------|
    /// | `DB_USER`      | `todolist`  |
    /// | `DB_PASSWORD`  | `todolist`  |
    /// | `DB_HOST`      | `localhost` |
    /// | `DB_PORT`      | `5432`      |
    /// | `DB_NAME`      | `todolist`  |
    /// | `DATABASE_URL` | (unset)     |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("DB_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                CoreError::Validation(format!("DB_PORT must be a valid u16, got '{raw}'"))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port,
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            url: lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()),
        })
    }

    /// Connection string for [`crate::create_pool`].
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}
