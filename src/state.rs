//! Shared application state for all routes.

use crate::config::Settings;
use crate::db::DatabaseClient;
use crate::domain::Entity;
use crate::search::SearchIndex;
use crate::service::EntityService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseClient>,
    pub search: Arc<dyn SearchIndex>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseClient>, search: Arc<dyn SearchIndex>, settings: Settings) -> Self {
        AppState {
            db,
            search,
            settings: Arc::new(settings),
        }
    }

    pub fn service<E: Entity>(&self) -> EntityService<E> {
        EntityService::new(self.db.clone(), self.search.clone())
    }

    pub fn app_name(&self) -> &str {
        &self.settings.app_name
    }
}
