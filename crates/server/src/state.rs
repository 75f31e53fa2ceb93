use axum::extract::FromRef;
use storage::{AnimeCatalog, Db};

use crate::config::PaginationSettings;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub catalog: AnimeCatalog,
    pub identity_salt: String,
    pub admin_token: String,
    pub pagination: PaginationSettings,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AnimeCatalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}
