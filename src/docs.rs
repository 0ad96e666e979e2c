use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::flags::model::{FeatureFlag, FeatureFlagRequest};
use crate::modules::health::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::flags::controller::list_flags,
        crate::modules::flags::controller::get_flag_by_id,
        crate::modules::flags::controller::create_flag,
        crate::modules::flags::controller::update_flag,
        crate::modules::flags::controller::delete_flag,
        crate::modules::health::controller::health,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            FeatureFlag,
            FeatureFlagRequest,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance"),
        (name = "Feature Flags", description = "Feature flag management"),
        (name = "Health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
