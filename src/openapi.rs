use utoipa::OpenApi;

use crate::{
    handler,
    handler::{
        health::Health,
        settings::{
            AppleValidationResponse, CallbackUrlResponse, ErrorResponse, SaveResponse,
            SaveSettings, SettingsResponse, UserGroupEntry, ValidationIssue,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health::health,
        handler::settings::get_settings,
        handler::settings::save_settings,
        handler::settings::callback_url,
        handler::settings::field_mapping,
        handler::settings::user_groups,
        handler::settings::validate_apple
    ),
    components(schemas(
        Health,
        SettingsResponse,
        SaveSettings,
        SaveResponse,
        ErrorResponse,
        ValidationIssue,
        CallbackUrlResponse,
        UserGroupEntry,
        AppleValidationResponse
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "settings", description = "Plugin settings")
    )
)]
pub struct ApiDoc;
