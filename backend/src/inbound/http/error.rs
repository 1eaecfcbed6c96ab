//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use futures_util::future::{Ready, ready};
use serde_json::json;
use tracing::error;

use super::ApiResult;
use crate::domain::{
    CredentialsValidationError, Error, ErrorCode, ProductValidationError, Rejection,
};
use crate::middleware::TRACE_ID_HEADER;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal(INTERNAL_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), "request failed with internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

/// Map registration/login payload validation failures to `400`.
pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.reason() }))
}

/// Map product payload validation failures to `400`.
pub(crate) fn map_product_error(err: ProductValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// Map a gate rejection to a uniform `401`.
///
/// The precise reason is logged by the gate; clients only learn whether a
/// credential was supplied at all.
pub(crate) fn map_rejection(rejection: Rejection) -> Error {
    match rejection {
        Rejection::MissingCredential => Error::unauthorized("authentication required"),
        Rejection::Token(_) => Error::unauthorized("unauthorized"),
    }
}

/// Fallback service for unmatched routes, answering `404` in the standard
/// error envelope.
pub fn route_not_found() -> Ready<ApiResult<HttpResponse>> {
    ready(Err(Error::not_found("route not found")))
}

/// JSON extractor error handler producing the standard error envelope.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "content type must be application/json".to_owned(),
        other => format!("invalid JSON body: {other}"),
    };
    Error::invalid_request(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TokenError, TraceId};
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] code: ErrorCode, #[case] status: StatusCode) {
        assert_eq!(Error::new(code, "x").status_code(), status);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted_and_keep_trace_id() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
            .parse()
            .expect("valid uuid");
        let err = TraceId::scope(trace_id, async {
            Error::internal("database exploded").with_details(json!({ "secret": true }))
        })
        .await;

        let response = err.error_response();
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(trace_id.to_string().as_str())
        );
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["message"], INTERNAL_MESSAGE);
        assert_eq!(value["code"], "internal_error");
        assert!(value.get("details").is_none());
    }

    #[actix_web::test]
    async fn client_errors_keep_message_and_details() {
        let err = Error::invalid_request("user already exists")
            .with_details(json!({ "field": "email" }));
        let body = to_bytes(err.error_response().into_body())
            .await
            .expect("body");
        let value: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["message"], "user already exists");
        assert_eq!(value["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn unmatched_routes_use_the_error_envelope() {
        use actix_web::{App, test, web};

        let app = test::init_service(
            App::new()
                .wrap(crate::Trace)
                .default_service(web::to(route_not_found)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["traceId"].as_str(), header.as_deref());
    }

    #[rstest]
    #[case(Rejection::Token(TokenError::Malformed))]
    #[case(Rejection::Token(TokenError::BadSignature))]
    #[case(Rejection::Token(TokenError::Expired))]
    fn token_rejections_are_indistinguishable(#[case] rejection: Rejection) {
        let err = map_rejection(rejection);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "unauthorized");
    }
}
