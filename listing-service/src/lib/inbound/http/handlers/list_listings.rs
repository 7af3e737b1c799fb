use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::listing::models::Coordinates;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingFilter;
use crate::inbound::http::middleware::AuthenticatedContext;
use crate::inbound::http::router::AppState;

pub async fn list_listings(
    State(state): State<AppState>,
    _context: AuthenticatedContext,
    params: Result<Query<ListListingsParams>, QueryRejection>,
) -> Result<ApiSuccess<Vec<ListingData>>, ApiError> {
    let Query(params) = params?;

    state
        .listing_service
        .list_listings(params.into())
        .await
        .map_err(ApiError::from)
        .map(|listings| {
            ApiSuccess::new(StatusCode::OK, listings.iter().map(ListingData::from).collect())
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListListingsParams {
    #[serde(rename = "type")]
    listing_type: Option<String>,
    area: Option<String>,
}

impl From<ListListingsParams> for ListingFilter {
    fn from(params: ListListingsParams) -> Self {
        // `?type=` with no value filters nothing.
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        ListingFilter {
            listing_type: non_empty(params.listing_type),
            area: non_empty(params.area),
        }
    }
}

/// Wire representation of a listing, shared by the list and create routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingData {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<CoordinatesData>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub area: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesData {
    pub lat: f64,
    pub lng: f64,
}

impl From<&Coordinates> for CoordinatesData {
    fn from(coordinates: &Coordinates) -> Self {
        Self {
            lat: coordinates.lat(),
            lng: coordinates.lng(),
        }
    }
}

impl From<&Listing> for ListingData {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            user_id: listing.user_id.to_string(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            address: listing.address.clone(),
            coordinates: listing.coordinates.as_ref().map(CoordinatesData::from),
            listing_type: listing.listing_type.clone(),
            area: listing.area.clone(),
            images: listing.images.clone(),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}
