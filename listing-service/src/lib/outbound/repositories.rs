pub mod listing;
pub mod user;

pub use listing::PostgresListingRepository;
pub use user::PostgresUserRepository;
