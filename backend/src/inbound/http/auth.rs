//! Bearer authentication extractor for protected handlers.
//!
//! Handlers that take an [`AuthenticatedUser`] argument are gated: Actix runs
//! the [`crate::domain::AccessGate`] before the handler body, and a rejection
//! short-circuits with `401`. An admitted request carries its
//! [`RequestContext`] in the request extensions, so the gate runs at most once
//! per request.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use super::error::map_rejection;
use super::state::HttpState;
use crate::domain::{Error, Identity, RequestContext, UserId};

/// Identity attached to a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(Identity);

impl AuthenticatedUser {
    /// Verified user id, used to stamp ownership.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        self.0.user_id()
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let admitted = req
        .extensions()
        .get::<RequestContext>()
        .and_then(RequestContext::identity)
        .cloned();
    if let Some(identity) = admitted {
        return Ok(AuthenticatedUser(identity));
    }

    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    // A non-ASCII header cannot carry a bearer credential.
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());
    let context = state.gate.context_for(header).map_err(map_rejection)?;
    let identity = context
        .identity()
        .cloned()
        .ok_or_else(|| Error::internal("gate admitted a request without an identity"))?;
    req.extensions_mut().insert(context);
    Ok(AuthenticatedUser(identity))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(user: AuthenticatedUser, req: HttpRequest) -> HttpResponse {
        let stored = req
            .extensions()
            .get::<RequestContext>()
            .and_then(RequestContext::identity)
            .map(Identity::user_id)
            .cloned();
        let same = stored.as_ref() == Some(user.user_id());
        HttpResponse::Ok().body(format!("{}:{same}", user.user_id()))
    }

    #[actix_web::test]
    async fn admits_a_valid_bearer_credential() {
        let harness = TestHarness::new();
        let user = UserId::random();
        let credential = harness.credential_for(&user);
        let app = test::init_service(
            App::new()
                .app_data(harness.state())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {credential}")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(
            std::str::from_utf8(&body).expect("utf8"),
            format!("{user}:true")
        );
    }

    #[actix_web::test]
    async fn reuses_the_context_already_attached_to_the_request() {
        let harness = TestHarness::new();
        let user = UserId::random();
        let credential = harness.credential_for(&user);
        let req = test::TestRequest::get()
            .app_data(harness.state())
            .insert_header((AUTHORIZATION, format!("Bearer {credential}")))
            .to_http_request();

        let first = AuthenticatedUser::extract(&req).await.expect("admitted");
        let context = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .expect("context stored on the request");

        let bare = test::TestRequest::get()
            .app_data(harness.state())
            .to_http_request();
        bare.extensions_mut().insert(context);
        let second = AuthenticatedUser::extract(&bare).await.expect("stored context");
        assert_eq!(first.user_id(), &user);
        assert_eq!(second.user_id(), &user);
    }

    #[actix_web::test]
    async fn rejected_requests_carry_no_context() {
        let harness = TestHarness::new();
        let req = test::TestRequest::get()
            .app_data(harness.state())
            .insert_header((AUTHORIZATION, "Bearer garbage"))
            .to_http_request();

        assert!(AuthenticatedUser::extract(&req).await.is_err());
        assert!(req.extensions().get::<RequestContext>().is_none());
    }

    #[rstest]
    #[case(None, "authentication required")]
    #[case(Some("Bearer garbage"), "unauthorized")]
    #[case(Some("Token abc"), "unauthorized")]
    #[actix_web::test]
    async fn rejects_with_uniform_401(#[case] header: Option<&str>, #[case] message: &str) {
        let harness = TestHarness::new();
        let app = test::init_service(
            App::new()
                .app_data(harness.state())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/me");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(body["message"], message);
    }
}
