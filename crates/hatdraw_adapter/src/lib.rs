#![forbid(unsafe_code)]

use std::env;
use std::path::Path;

use axum::http::StatusCode;

use hatdraw_contracts::roster::NameStatusRow;
use hatdraw_service::{ClaimService, ClaimServiceConfig, SelectOutcome, ServiceError};
use hatdraw_storage::RosterStore;

pub mod app_ui_assets {
    pub const INDEX_HTML: &str = include_str!("web/index.html");
    pub const APP_CSS: &str = include_str!("web/app.css");
    pub const APP_JS: &str = include_str!("web/app.js");
}

pub const SELECT_SUCCESS_MESSAGE: &str = "Name selected successfully";
pub const ALREADY_SELECTED_MESSAGE: &str = "This name has already been selected";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NameStatusDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "selectionCount")]
    pub selection_count: u32,
    #[serde(rename = "isSelected")]
    pub is_selected: bool,
    #[serde(rename = "selectedBy")]
    pub selected_by: Vec<String>,
}

impl NameStatusDto {
    pub fn from_row(row: NameStatusRow) -> Self {
        Self {
            id: row.name_id.0,
            name: row.text,
            selection_count: row.selection_count,
            is_selected: row.is_selected,
            selected_by: row.selected_by,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatsDto {
    pub total: u32,
    pub selected: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SelectOkDto {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResetDto {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

/// Process-wide runtime behind the HTTP routes: one store opened at
/// startup, injected into the claim service, shared behind a mutex.
pub struct AdapterRuntime {
    service: ClaimService<RosterStore>,
}

impl AdapterRuntime {
    pub fn default_from_env() -> Result<Self, String> {
        let db_path = env::var("HATDRAW_DB_PATH").unwrap_or_else(|_| "./hatdraw.db".to_string());
        let store = RosterStore::open_at(Path::new(&db_path))
            .map_err(|err| format!("failed to open roster store at {db_path}: {err}"))?;
        Ok(Self::with_store(store))
    }

    pub fn in_memory() -> Result<Self, String> {
        let store = RosterStore::open_in_memory()
            .map_err(|err| format!("failed to open in-memory roster store: {err}"))?;
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: RosterStore) -> Self {
        Self {
            service: ClaimService::new(ClaimServiceConfig::mvp_v1(), store),
        }
    }

    pub fn names_report(&self) -> Result<Vec<NameStatusDto>, ServiceError> {
        Ok(self
            .service
            .list_names()?
            .into_iter()
            .map(NameStatusDto::from_row)
            .collect())
    }

    pub fn stats_report(&self) -> Result<StatsDto, ServiceError> {
        let stats = self.service.stats()?;
        Ok(StatsDto {
            total: stats.total,
            selected: stats.selected,
            remaining: stats.remaining,
        })
    }

    pub fn select_name(&mut self, name_id: Option<i64>) -> Result<SelectOutcome, ServiceError> {
        self.service.select_name(name_id)
    }

    pub fn reset_claims(&mut self) -> Result<ResetDto, ServiceError> {
        self.service.reset_claims()?;
        Ok(ResetDto { success: true })
    }
}

pub fn service_error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn service_error_body(err: &ServiceError) -> ErrorDto {
    ErrorDto {
        error: err.to_string(),
    }
}
