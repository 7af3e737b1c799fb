use async_trait::async_trait;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::models::CreateListingCommand;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingFilter;
use crate::domain::user::models::UserId;

/// Port for listing domain service operations.
#[async_trait]
pub trait ListingServicePort: Send + Sync + 'static {
    /// Create a listing owned by `owner`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_listing(
        &self,
        owner: UserId,
        command: CreateListingCommand,
    ) -> Result<Listing, ListingError>;

    /// List listings matching every filter criterion that is set.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, ListingError>;
}

/// Persistence operations for listings.
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
    /// Persist a new listing.
    async fn create(&self, listing: Listing) -> Result<Listing, ListingError>;

    /// Find listings by exact type and area, newest first.
    async fn find(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingError>;
}
