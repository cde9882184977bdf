//! Configuration loading and representation.
//!
//! Everything comes from the process environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | (none) | Postgres URL (required when persistent) |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | pool size |

use std::net::SocketAddr;

use anyhow::{bail, Context};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which repository backend the service runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup (tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR '{bind_addr}' is not a socket address"))?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => v
                .parse::<bool>()
                .with_context(|| format!("USE_PERSISTENT_STORES '{v}' is not true/false"))?,
            None => false,
        };

        let store = if use_persistent {
            let Some(database_url) = lookup("DATABASE_URL") else {
                bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
            };
            let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(v) => v
                    .parse::<u32>()
                    .with_context(|| format!("DATABASE_MAX_CONNECTIONS '{v}' is not a number"))?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            if max_connections == 0 {
                bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
            }
            StoreConfig::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self { bind_addr, store })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_in_memory_on_port_8080() {
        let cfg = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.store, StoreConfig::InMemory);
    }

    #[test]
    fn persistent_store_requires_database_url() {
        let err = ServiceConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "true")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/inventory"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/inventory".to_string(),
                max_connections: 12,
            }
        );
    }

    #[test]
    fn database_url_alone_does_not_switch_backends() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(cfg.store, StoreConfig::InMemory);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(ServiceConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "yes")])).is_err());
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/inventory"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
