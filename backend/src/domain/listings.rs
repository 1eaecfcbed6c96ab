//! Product catalogue use-cases: public browsing and owner-stamped creation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{
    ProductCatalogue, ProductPersistenceError, ProductRepository, UserPersistenceError,
    UserRepository,
};
use super::{
    Error, NewProduct, OwnerSummary, Product, ProductId, ProductListing, SharedClock, UserId,
};

/// Catalogue backed by product and user repositories.
pub struct ProductCatalogueService<P, U> {
    products: Arc<P>,
    users: Arc<U>,
    clock: SharedClock,
}

impl<P, U> ProductCatalogueService<P, U> {
    /// Wire the service.
    #[must_use]
    pub fn new(products: Arc<P>, users: Arc<U>, clock: SharedClock) -> Self {
        Self {
            products,
            users,
            clock,
        }
    }
}

fn map_product_error(error: ProductPersistenceError) -> Error {
    Error::internal(error.to_string())
}

fn map_owner_error(error: UserPersistenceError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl<P, U> ProductCatalogue for ProductCatalogueService<P, U>
where
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list(&self) -> Result<Vec<ProductListing>, Error> {
        let mut products = self.products.list().await.map_err(map_product_error)?;
        // Stable sort keeps insertion order for identical timestamps.
        products.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let mut owners: HashMap<UserId, Option<OwnerSummary>> = HashMap::new();
        let mut listings = Vec::with_capacity(products.len());
        for product in products {
            let owner_id = product.created_by().clone();
            let owner = match owners.get(&owner_id) {
                Some(cached) => cached.clone(),
                None => {
                    let summary = self
                        .users
                        .find_by_id(&owner_id)
                        .await
                        .map_err(map_owner_error)?
                        .map(|user| OwnerSummary {
                            id: user.id().clone(),
                            username: user.username().clone(),
                            email: user.email().clone(),
                        });
                    owners.insert(owner_id, summary.clone());
                    summary
                }
            };
            listings.push(ProductListing { product, owner });
        }
        Ok(listings)
    }

    async fn create(&self, owner: &UserId, draft: NewProduct) -> Result<Product, Error> {
        let product = Product::new(ProductId::random(), draft, owner.clone(), self.clock.utc());
        self.products
            .insert(&product)
            .await
            .map_err(map_product_error)?;
        info!(product_id = %product.id(), owner = %owner, "product listed");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, HashedSecret, User, UserRecord, Username};
    use crate::outbound::persistence::{InMemoryProductRepository, InMemoryUserRepository};
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use mockable::Clock as _;
    use rstest::{fixture, rstest};

    struct Harness {
        catalogue: ProductCatalogueService<InMemoryProductRepository, InMemoryUserRepository>,
        users: Arc<InMemoryUserRepository>,
        clock: Arc<MutableClock>,
    }

    #[fixture]
    fn harness() -> Harness {
        let start = Utc
            .with_ymd_and_hms(2026, 6, 1, 8, 30, 0)
            .single()
            .expect("valid start");
        let clock = Arc::new(MutableClock::new(start));
        let users = Arc::new(InMemoryUserRepository::new());
        let catalogue = ProductCatalogueService::new(
            Arc::new(InMemoryProductRepository::new()),
            Arc::clone(&users),
            Arc::clone(&clock) as SharedClock,
        );
        Harness {
            catalogue,
            users,
            clock,
        }
    }

    async fn seed_user(users: &InMemoryUserRepository, username: &str, email: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(username).expect("username"),
            EmailAddress::new(email).expect("email"),
            Utc::now(),
        );
        users
            .insert(&UserRecord {
                user: user.clone(),
                password_hash: HashedSecret::from_phc("$argon2id$placeholder"),
            })
            .await
            .expect("seed user");
        user
    }

    fn lamp(title: &str) -> NewProduct {
        NewProduct::try_from_parts(title, "", 10.0, None).expect("product")
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_owner_and_time(harness: Harness) {
        let owner = seed_user(&harness.users, "alice", "a@x.com").await;
        let product = harness
            .catalogue
            .create(owner.id(), lamp("Lamp"))
            .await
            .expect("create");
        assert_eq!(product.created_by(), owner.id());
        assert_eq!(product.created_at(), harness.clock.utc());
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_newest_first_with_owner_summaries(harness: Harness) {
        let owner = seed_user(&harness.users, "alice", "a@x.com").await;
        for title in ["Old", "Middle", "New"] {
            harness
                .catalogue
                .create(owner.id(), lamp(title))
                .await
                .expect("create");
            harness.clock.advance_seconds(5);
        }

        let listings = harness.catalogue.list().await.expect("list");
        let titles: Vec<&str> = listings
            .iter()
            .map(|listing| listing.product.details().title())
            .collect();
        assert_eq!(titles, ["New", "Middle", "Old"]);
        let summary = listings[0].owner.as_ref().expect("owner");
        assert_eq!(summary.username.as_ref(), "alice");
        assert_eq!(&summary.id, owner.id());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_owner_yields_no_summary(harness: Harness) {
        harness
            .catalogue
            .create(&UserId::random(), lamp("Orphan"))
            .await
            .expect("create");
        let listings = harness.catalogue.list().await.expect("list");
        assert_eq!(listings.len(), 1);
        assert!(listings[0].owner.is_none());
    }
}
