//! Runtime settings read from the environment (after `.env` is loaded).

use crate::error::ConfigError;
use crate::schema::{descriptor_for, descriptors, EntityDescriptor};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Prefix of the alert headers (`X-{app_name}-alert`).
    pub app_name: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Entities mounted under `/api`; all of them unless `ENTITIES` restricts the set.
    pub entities: Vec<&'static EntityDescriptor>,
    pub run_migrations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/petclinic".into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_max_connections: 5,
            app_name: "petclinicApp".into(),
            default_page_size: 20,
            max_page_size: 2000,
            entities: descriptors().to_vec(),
            run_migrations: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut s = Settings::default();
        if let Some(url) = lookup("DATABASE_URL") {
            s.database_url = url;
        }
        if let Some(name) = lookup("APP_NAME") {
            s.app_name = name;
        }
        parse_into(&lookup, "BIND_ADDR", &mut s.bind_addr)?;
        parse_into(&lookup, "DB_MAX_CONNECTIONS", &mut s.db_max_connections)?;
        parse_into(&lookup, "DEFAULT_PAGE_SIZE", &mut s.default_page_size)?;
        parse_into(&lookup, "MAX_PAGE_SIZE", &mut s.max_page_size)?;
        parse_into(&lookup, "RUN_MIGRATIONS", &mut s.run_migrations)?;
        if let Some(list) = lookup("ENTITIES") {
            s.entities = list
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(descriptor_for)
                .collect::<Result<_, _>>()?;
        }
        if s.default_page_size == 0 || s.max_page_size == 0 {
            return Err(ConfigError::Env {
                var: "DEFAULT_PAGE_SIZE",
                message: "page sizes must be greater than zero".into(),
            });
        }
        s.default_page_size = s.default_page_size.min(s.max_page_size);
        Ok(s)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.entities.iter().any(|d| d.name == name)
    }
}

fn parse_into<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(var) {
        *slot = raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
            var,
            message: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.app_name, "petclinicApp");
        assert_eq!((s.default_page_size, s.max_page_size), (20, 2000));
        assert_eq!(s.entities.len(), 6);
        assert!(s.run_migrations);
    }

    #[test]
    fn entity_list_restricts_mounted_entities() {
        let s = settings(&[("ENTITIES", "owners, pets")]).unwrap();
        assert!(s.is_enabled("pets"));
        assert!(!s.is_enabled("visits"));
    }

    #[test]
    fn unknown_entity_is_config_error() {
        assert!(matches!(
            settings(&[("ENTITIES", "owners,cats")]),
            Err(ConfigError::UnknownEntity(name)) if name == "cats"
        ));
    }

    #[test]
    fn unparsable_value_names_the_variable() {
        match settings(&[("DB_MAX_CONNECTIONS", "many")]) {
            Err(ConfigError::Env { var, .. }) => assert_eq!(var, "DB_MAX_CONNECTIONS"),
            other => panic!("expected Env error, got {:?}", other),
        }
    }
}
