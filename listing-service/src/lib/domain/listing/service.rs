use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::models::CreateListingCommand;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingFilter;
use crate::domain::listing::models::ListingId;
use crate::domain::listing::ports::ListingRepository;
use crate::domain::listing::ports::ListingServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for listing operations.
pub struct ListingService<LR>
where
    LR: ListingRepository,
{
    repository: Arc<LR>,
}

impl<LR> ListingService<LR>
where
    LR: ListingRepository,
{
    pub fn new(repository: Arc<LR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<LR> ListingServicePort for ListingService<LR>
where
    LR: ListingRepository,
{
    async fn create_listing(
        &self,
        owner: UserId,
        command: CreateListingCommand,
    ) -> Result<Listing, ListingError> {
        let now = Utc::now();
        let listing = Listing {
            id: ListingId::new(),
            user_id: owner,
            title: command.title,
            description: command.description,
            address: command.address,
            coordinates: command.coordinates,
            listing_type: command.listing_type,
            area: command.area,
            images: command.images,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(listing).await?;

        tracing::info!(
            listing_id = %created.id,
            user_id = %created.user_id,
            "Listing created"
        );

        Ok(created)
    }

    async fn list_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, ListingError> {
        self.repository.find(&filter).await
    }
}
