//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request/response schemas
//! and the bearer security scheme used by protected routes. Swagger UI serves
//! it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::products::{
    PriceInput, ProductListingResponse, ProductRequest, ProductResponse,
};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse,
};

/// Name of the bearer security scheme in the document.
pub const BEARER_SCHEME: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Credential issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Account registration, bearer-token login and product listings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserResponse,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        PriceInput,
        ProductRequest,
        ProductResponse,
        ProductListingResponse,
        HealthResponse
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Product listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
