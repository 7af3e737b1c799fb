use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::list_listings::CoordinatesData;
use super::list_listings::ListingData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::listing::errors::CoordinatesError;
use crate::domain::listing::models::Coordinates;
use crate::domain::listing::models::CreateListingCommand;
use crate::inbound::http::middleware::AuthenticatedContext;
use crate::inbound::http::router::AppState;

pub async fn create_listing(
    State(state): State<AppState>,
    context: AuthenticatedContext,
    payload: Result<Json<CreateListingRequest>, JsonRejection>,
) -> Result<ApiSuccess<ListingData>, ApiError> {
    let Json(body) = payload?;
    let command = body
        .try_into_command()
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid coordinates: {}", e)))?;

    state
        .listing_service
        .create_listing(context.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref listing| ApiSuccess::new(StatusCode::CREATED, listing.into()))
}

/// HTTP request body for a new listing.
///
/// Any `user_id` in the payload is ignored; ownership comes from the token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateListingRequest {
    title: Option<String>,
    description: Option<String>,
    address: Option<String>,
    coordinates: Option<CoordinatesData>,
    #[serde(rename = "type")]
    listing_type: Option<String>,
    area: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

impl CreateListingRequest {
    fn try_into_command(self) -> Result<CreateListingCommand, CoordinatesError> {
        let coordinates = self
            .coordinates
            .map(|c| Coordinates::new(c.lat, c.lng))
            .transpose()?;

        Ok(CreateListingCommand {
            title: self.title,
            description: self.description,
            address: self.address,
            coordinates,
            listing_type: self.listing_type,
            area: self.area,
            images: self.images,
        })
    }
}
