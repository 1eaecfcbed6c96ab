//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"alice","email":"a@x.com","password":"secret123"}
//! POST /api/auth/login {"email":"a@x.com","password":"secret123"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiResult;
use super::error::map_credentials_error;
use super::state::HttpState;
use crate::domain::{Error, LoginCredentials, RegistrationDetails, User};

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// User identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Public handle.
    #[schema(example = "alice")]
    pub username: String,
    /// Normalised login email.
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Requested public handle.
    #[serde(default)]
    pub username: String,
    /// Login email; must be unique ignoring case.
    #[serde(default)]
    pub email: String,
    /// Plaintext password; hashed before storage.
    #[serde(default)]
    pub password: String,
}

/// Registration response. No credential is issued.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// Confirmation text.
    #[schema(example = "User registered successfully")]
    pub message: String,
    /// The created account.
    pub user: UserResponse,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

/// Login response carrying the bearer credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer credential for `Authorization: Bearer <token>`.
    pub token: String,
    /// The authenticated account.
    pub user: UserResponse,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid request or user already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(&username, &email, &password)
        .map_err(map_credentials_error)?;
    let user = state.registration.register(&details).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_owned(),
        user: UserResponse::from(&user),
    }))
}

/// Exchange credentials for a bearer token.
///
/// Unknown emails and wrong passwords produce the same `401` body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: outcome.credential.into(),
        user: UserResponse::from(&outcome.user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    macro_rules! app {
        ($harness:expr) => {
            test::init_service(
                App::new()
                    .app_data($harness.state())
                    .service(web::scope("/api").configure(crate::inbound::http::configure)),
            )
            .await
        };
    }

    fn alice() -> Value {
        json!({ "username": "alice", "email": "a@x.com", "password": "secret123" })
    }

    #[actix_web::test]
    async fn register_returns_created_without_a_token() {
        let harness = TestHarness::new();
        let app = app!(harness);
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(alice())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["username"], "alice");
        assert!(body.get("token").is_none());
    }

    #[actix_web::test]
    async fn duplicate_registration_is_a_bad_request() {
        let harness = TestHarness::new();
        let app = app!(harness);
        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(alice())
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), expected);
        }
    }

    #[rstest]
    #[case(json!({ "email": "a@x.com", "password": "secret123" }), "username")]
    #[case(json!({ "username": "alice", "email": "nope", "password": "secret123" }), "email")]
    #[case(json!({ "username": "alice", "email": "a@x.com", "password": "" }), "password")]
    #[actix_web::test]
    async fn register_validates_fields(#[case] payload: Value, #[case] field: &str) {
        let harness = TestHarness::new();
        let app = app!(harness);
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn login_returns_token_and_user() {
        let harness = TestHarness::new();
        let app = app!(harness);
        let register_req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(alice())
            .to_request();
        test::call_service(&app, register_req).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@x.com", "password": "secret123" }))
            .to_request();
        let body: LoginResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!body.token.is_empty());
        assert_eq!(body.user.email, "a@x.com");
    }

    #[actix_web::test]
    async fn malformed_json_uses_the_error_envelope() {
        let harness = TestHarness::new();
        let app = app!(harness);
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
