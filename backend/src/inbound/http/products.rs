//! Product API handlers.
//!
//! ```text
//! GET /api/products
//! POST /api/products {"title":"Lamp","description":"Brass","price":25.0}   (Bearer)
//! POST /api/products {"title":"Lamp","price":"25.50"}                      (Bearer)
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiResult;
use super::auth::AuthenticatedUser;
use super::error::map_product_error;
use super::state::HttpState;
use super::users::UserResponse;
use crate::domain::{
    Error, NewProduct, OwnerSummary, Product, ProductListing, ProductValidationError,
};

/// Asking price as sent by clients.
///
/// Form-style clients send the price as text, so a numeric string is accepted
/// alongside a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PriceInput {
    /// JSON number, e.g. `25.0`.
    Number(f64),
    /// Decimal string, e.g. `"25.50"`.
    Text(String),
}

impl PriceInput {
    /// Numeric value, or `None` when the text is not a decimal number.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().ok(),
        }
    }
}

/// Product listing body for `POST /api/products`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductRequest {
    /// Listing title; must not be blank.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Asking price, as a number or numeric string.
    #[schema(example = 25.0)]
    pub price: PriceInput,
    /// URL or absolute path of an already-hosted image.
    #[serde(default)]
    pub image: Option<String>,
}

/// A stored product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Product identifier.
    pub id: String,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Image reference, if any.
    pub image: Option<String>,
    /// Id of the user who listed the product.
    pub created_by: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        let details = product.details();
        Self {
            id: product.id().to_string(),
            title: details.title().to_owned(),
            description: details.description().to_owned(),
            price: details.price(),
            image: details.image().map(str::to_owned),
            created_by: product.created_by().to_string(),
            created_at: product.created_at().to_rfc3339(),
        }
    }
}

/// A product with its owner's public details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListingResponse {
    /// Product fields, flattened into the listing object.
    #[serde(flatten)]
    pub product: ProductResponse,
    /// `null` when the owner no longer exists.
    pub owner: Option<UserResponse>,
}

fn owner_response(owner: &OwnerSummary) -> UserResponse {
    UserResponse {
        id: owner.id.to_string(),
        username: owner.username.to_string(),
        email: owner.email.to_string(),
    }
}

impl From<&ProductListing> for ProductListingResponse {
    fn from(listing: &ProductListing) -> Self {
        Self {
            product: ProductResponse::from(&listing.product),
            owner: listing.owner.as_ref().map(owner_response),
        }
    }
}

/// Browse all products, newest first.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products", body = [ProductListingResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ProductListingResponse>>> {
    let listings = state.products.list().await?;
    Ok(web::Json(
        listings.iter().map(ProductListingResponse::from).collect(),
    ))
}

/// List a new product owned by the caller.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product listed", body = ProductResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid bearer credential", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("BearerAuth" = []))
)]
#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let ProductRequest {
        title,
        description,
        price,
        image,
    } = payload.into_inner();
    let amount = price
        .amount()
        .ok_or_else(|| map_product_error(ProductValidationError::InvalidPrice))?;
    let details = NewProduct::try_from_parts(&title, &description, amount, image.as_deref())
        .map_err(map_product_error)?;
    let product = state.products.create(user.user_id(), details).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(&product)))
}
