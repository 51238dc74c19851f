use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const USER_TAG: &str = "User";
pub const POST_TAG: &str = "Post";
pub const AUTH_TAG: &str = "Auth";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postboard",
        description = "Users and posts API with JWT authentication",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::usecases::ResponseType,
            crate::usecases::SuccessType,
            crate::usecases::ErrorType,
            crate::usecases::Pagination,
            crate::entities::Role,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Registration, login and token refresh"),
        (name = USER_TAG, description = "User management, admin only"),
        (name = POST_TAG, description = "Post management"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token from /auth/login or /auth/register"))
                    .build(),
            ),
        )
    }
}
