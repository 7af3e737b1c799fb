use thiserror::Error;

/// Error for out-of-range coordinates
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinatesError {
    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}

/// Top-level error for listing operations
#[derive(Debug, Clone, Error)]
pub enum ListingError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordinatesError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
