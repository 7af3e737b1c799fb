use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::listing::errors::CoordinatesError;
use crate::domain::user::models::UserId;

/// Property listing owned by a registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub user_id: UserId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub listing_type: Option<String>,
    pub area: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// WGS84 position of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Build a validated coordinate pair.
    ///
    /// # Errors
    /// * `LatitudeOutOfRange` - `lat` outside [-90, 90] or not finite
    /// * `LongitudeOutOfRange` - `lng` outside [-180, 180] or not finite
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinatesError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinatesError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Command to create a listing. The owner is supplied separately from the
/// authenticated request, never from the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateListingCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub listing_type: Option<String>,
    pub area: Option<String>,
    pub images: Vec<String>,
}

/// Exact-match listing filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub listing_type: Option<String>,
    pub area: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let type_matches = self
            .listing_type
            .as_ref()
            .map_or(true, |wanted| listing.listing_type.as_ref() == Some(wanted));
        let area_matches = self
            .area
            .as_ref()
            .map_or(true, |wanted| listing.area.as_ref() == Some(wanted));

        type_matches && area_matches
    }
}
