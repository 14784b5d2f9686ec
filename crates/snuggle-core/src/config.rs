use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub store: StoreMode,
    pub cors_origins: Vec<String>,
}

/// Which [`VisitorStore`](crate::store::VisitorStore) backs the service.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMode {
    Redis,
    /// Process-local store. Counts are lost on restart and not shared
    /// between replicas.
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self, CoreError> {
        Ok(Self {
            port: std::env::var("SNUGGLE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| CoreError::InvalidConfig(format!("invalid port: {e}")))?,
            redis_url: std::env::var("SNUGGLE_REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            store: {
                let raw = std::env::var("SNUGGLE_STORE").unwrap_or_else(|_| "redis".to_string());
                StoreMode::parse(&raw)?
            },
            cors_origins: std::env::var("SNUGGLE_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

impl StoreMode {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "" | "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(CoreError::InvalidConfig(format!(
                "SNUGGLE_STORE must be one of: redis, memory (got {other:?})"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_mode_parses_known_values() {
        assert_eq!(StoreMode::parse("redis").ok(), Some(StoreMode::Redis));
        assert_eq!(StoreMode::parse("memory").ok(), Some(StoreMode::Memory));
        assert_eq!(StoreMode::parse(" memory ").ok(), Some(StoreMode::Memory));
        assert_eq!(StoreMode::parse("").ok(), Some(StoreMode::Redis));
    }

    #[test]
    fn store_mode_rejects_unknown_value() {
        let err = StoreMode::parse("postgres").unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }
}
