//! Product listings and their ownership stamp.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{EmailAddress, UserId, Username};

/// Maximum length of a product title.
pub const TITLE_MAX: usize = 120;
/// Maximum length of a product description.
pub const DESCRIPTION_MAX: usize = 4000;

/// Validation errors raised by [`NewProduct::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// The title was blank after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeded [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The description exceeded [`DESCRIPTION_MAX`] characters.
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The price was negative, infinite, NaN or not a number at all.
    #[error("price must be a non-negative number")]
    InvalidPrice,
    /// The image reference was neither an `http(s)` URL nor an absolute path.
    #[error("image must be a URL or an absolute path")]
    InvalidImage,
}

impl ProductValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::InvalidPrice => "price",
            Self::InvalidImage => "image",
        }
    }
}

/// Stable product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated input for listing a new product.
///
/// ## Invariants
/// - `title` is trimmed and non-empty.
/// - `price` is finite and not negative.
/// - `image`, when present, is an `http(s)://` URL or an absolute path such as
///   `/uploads/1700000000.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    title: String,
    description: String,
    price: f64,
    image: Option<String>,
}

impl NewProduct {
    /// Validate raw listing fields.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::NewProduct;
    ///
    /// let product = NewProduct::try_from_parts(" Lamp ", "Brass desk lamp", 25.0, None).unwrap();
    /// assert_eq!(product.title(), "Lamp");
    /// assert!(NewProduct::try_from_parts("Lamp", "", -1.0, None).is_err());
    /// ```
    pub fn try_from_parts(
        title: &str,
        description: &str,
        price: f64,
        image: Option<&str>,
    ) -> Result<Self, ProductValidationError> {
        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(ProductValidationError::EmptyTitle);
        }
        if trimmed_title.chars().count() > TITLE_MAX {
            return Err(ProductValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let trimmed_description = description.trim();
        if trimmed_description.chars().count() > DESCRIPTION_MAX {
            return Err(ProductValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ProductValidationError::InvalidPrice);
        }
        let image_reference = match image.map(str::trim).filter(|value| !value.is_empty()) {
            None => None,
            Some(value) if is_image_reference(value) => Some(value.to_owned()),
            Some(_) => return Err(ProductValidationError::InvalidImage),
        };
        Ok(Self {
            title: trimmed_title.to_owned(),
            description: trimmed_description.to_owned(),
            price,
            image: image_reference,
        })
    }

    /// Listing title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-form description; may be empty.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Asking price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Image reference, if one was supplied.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

fn is_image_reference(value: &str) -> bool {
    let has_scheme = value.starts_with("http://") || value.starts_with("https://");
    (has_scheme || value.starts_with('/')) && !value.chars().any(char::is_whitespace)
}

/// Listed product.
///
/// `created_by` is stamped from the authenticated identity when the product
/// is created and has no setter.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    details: NewProduct,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Stamp a validated listing with its owner and creation time.
    #[must_use]
    pub fn new(
        id: ProductId,
        details: NewProduct,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            created_by,
            created_at,
        }
    }

    /// Product identifier.
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Listing fields.
    #[must_use]
    pub fn details(&self) -> &NewProduct {
        &self.details
    }

    /// Identity that created the listing.
    #[must_use]
    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Public summary of a product owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    /// Owner identifier.
    pub id: UserId,
    /// Owner username.
    pub username: Username,
    /// Owner email.
    pub email: EmailAddress,
}

/// Product joined with its owner, as shown on the listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    /// The product.
    pub product: Product,
    /// Owner details; `None` when the owner record is gone.
    pub owner: Option<OwnerSummary>,
}
