use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    model::{FieldMapping, PluginSettings, ValidationScenario},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct SettingsResponse {
    pub field_mapping: Option<FieldMapping>,
    pub providers: BTreeMap<String, serde_json::Value>,
}

impl From<PluginSettings> for SettingsResponse {
    fn from(settings: PluginSettings) -> Self {
        Self {
            field_mapping: settings.field_mapping,
            providers: settings.providers,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SaveSettings {
    pub field_mapping: Option<FieldMapping>,
    #[serde(default)]
    pub providers: BTreeMap<String, serde_json::Value>,
    /// Validation scenario: "default", "fieldMapping" or "providers".
    pub scenario: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveResponse {
    pub saved: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CallbackUrlResponse {
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserGroupEntry {
    pub name: String,
    pub id: String,
}

#[derive(Serialize, ToSchema)]
pub struct AppleValidationResponse {
    pub valid: bool,
}

fn parse_scenario(
    raw: Option<&str>,
) -> Result<Option<ValidationScenario>, (StatusCode, Json<ErrorResponse>)> {
    match raw {
        None => Ok(None),
        Some("default") => Ok(Some(ValidationScenario::Default)),
        Some("fieldMapping") => Ok(Some(ValidationScenario::FieldMapping)),
        Some("providers") => Ok(Some(ValidationScenario::Providers)),
        Some(other) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("unknown scenario: {other}"))),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current plugin settings", body = SettingsResponse),
        (status = 404, description = "Plugin not installed")
    )
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.settings().settings().await {
        Ok(settings) => Ok(Json(settings.into())),
        Err(sea_orm::DbErr::RecordNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SaveSettings,
    responses(
        (status = 200, description = "Settings saved", body = SaveResponse),
        (status = 400, description = "Unknown scenario", body = ErrorResponse),
        (status = 404, description = "Plugin not installed", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveSettings>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let scenario = parse_scenario(payload.scenario.as_deref())?;

    let mut settings = PluginSettings {
        field_mapping: payload.field_mapping,
        providers: payload.providers,
        ..Default::default()
    };
    if let Some(scenario) = scenario {
        settings.set_scenario(scenario);
    }

    if let Err(errors) = settings.validate() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                message: "settings failed validation".to_string(),
                errors: errors
                    .into_iter()
                    .map(|error| ValidationIssue {
                        field: error.field,
                        message: error.message,
                    })
                    .collect(),
            }),
        ));
    }

    let saved = state
        .settings()
        .save_settings(settings, scenario)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("unable to save settings")),
            )
        })?;

    if !saved {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("plugin is not installed")),
        ));
    }

    Ok(Json(SaveResponse { saved }))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/callback-url",
    responses(
        (status = 200, description = "Social login callback URL", body = CallbackUrlResponse),
        (status = 404, description = "No primary site configured")
    )
)]
pub async fn callback_url(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CallbackUrlResponse>, StatusCode> {
    let url = state
        .settings()
        .callback_url()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match url {
        Some(url) => Ok(Json(CallbackUrlResponse { url })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/field-mapping",
    responses(
        (status = 200, description = "Effective global field mapping", body = FieldMapping)
    )
)]
pub async fn field_mapping(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FieldMapping>, StatusCode> {
    state
        .settings()
        .global_field_mapping()
        .await
        .map(Json)
        .map_err(|err| match err {
            sea_orm::DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/user-groups",
    responses(
        (status = 200, description = "Selectable user groups, sentinel first", body = [UserGroupEntry])
    )
)]
pub async fn user_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserGroupEntry>>, StatusCode> {
    let groups = state
        .settings()
        .user_groups()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(
        groups
            .into_iter()
            .map(|group| UserGroupEntry {
                name: group.name,
                id: group.id,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/apple",
    responses(
        (status = 200, description = "Apple credential block presence check", body = AppleValidationResponse)
    )
)]
pub async fn validate_apple(State(state): State<Arc<AppState>>) -> Json<AppleValidationResponse> {
    Json(AppleValidationResponse {
        valid: state.settings().validate_apple_settings(),
    })
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/settings", get(get_settings).put(save_settings))
        .route("/api/v1/settings/callback-url", get(callback_url))
        .route("/api/v1/settings/field-mapping", get(field_mapping))
        .route("/api/v1/settings/user-groups", get(user_groups))
        .route("/api/v1/settings/apple", get(validate_apple))
        .with_state(state)
}
