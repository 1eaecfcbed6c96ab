//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod products;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;

use actix_web::web;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = crate::domain::ApiResult<T>;

/// Register the `/api` resources on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use marketplace::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(users::register)
        .service(users::login)
        .service(products::list_products)
        .service(products::create_product);
}
