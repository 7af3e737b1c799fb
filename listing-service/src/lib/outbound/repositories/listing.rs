use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::models::Coordinates;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingFilter;
use crate::domain::listing::models::ListingId;
use crate::domain::listing::ports::ListingRepository;
use crate::domain::user::models::UserId;

pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_listing(row: PgRow) -> Result<Listing, ListingError> {
        let lat: Option<f64> = row.get("lat");
        let lng: Option<f64> = row.get("lng");
        let coordinates = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)?),
            _ => None,
        };

        Ok(Listing {
            id: ListingId(row.get("id")),
            user_id: UserId(row.get("user_id")),
            title: row.get("title"),
            description: row.get("description"),
            address: row.get("address"),
            coordinates,
            listing_type: row.get("listing_type"),
            area: row.get("area"),
            images: row.get("images"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn create(&self, listing: Listing) -> Result<Listing, ListingError> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, user_id, title, description, address, lat, lng,
                listing_type, area, images, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(listing.id.0)
        .bind(listing.user_id.0)
        .bind(listing.title.as_deref())
        .bind(listing.description.as_deref())
        .bind(listing.address.as_deref())
        .bind(listing.coordinates.map(|c| c.lat()))
        .bind(listing.coordinates.map(|c| c.lng()))
        .bind(listing.listing_type.as_deref())
        .bind(listing.area.as_deref())
        .bind(&listing.images)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ListingError::DatabaseError(e.to_string()))?;

        Ok(listing)
    }

    async fn find(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, description, address, lat, lng,
                   listing_type, area, images, created_at, updated_at
            FROM listings
            WHERE ($1::TEXT IS NULL OR listing_type = $1)
              AND ($2::TEXT IS NULL OR area = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.listing_type.as_deref())
        .bind(filter.area.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ListingError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_listing).collect()
    }
}
