use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use listing_service::domain::image::errors::UploadError;
use listing_service::domain::image::models::ImageUpload;
use listing_service::domain::image::models::UploadedImage;
use listing_service::domain::image::ports::ImageStorage;
use listing_service::domain::listing::errors::ListingError;
use listing_service::domain::listing::models::Listing;
use listing_service::domain::listing::models::ListingFilter;
use listing_service::domain::listing::ports::ListingRepository;
use listing_service::domain::listing::service::ListingService;
use listing_service::domain::user::errors::UserError;
use listing_service::domain::user::models::EmailAddress;
use listing_service::domain::user::models::User;
use listing_service::domain::user::models::UserId;
use listing_service::domain::user::ports::UserRepository;
use listing_service::domain::user::service::UserService;
use listing_service::inbound::http::router::create_router;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const UPLOADED_URL: &str = "https://media.test/image/upload/v1/listing.jpg";

/// Test application that spawns a real server backed by in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub users: Arc<InMemoryUserRepository>,
    pub images: Option<Arc<FakeImageStorage>>,
}

impl TestApp {
    /// Spawn with a working media host
    pub async fn spawn() -> Self {
        Self::spawn_with_storage(Some(Arc::new(FakeImageStorage::accepting()))).await
    }

    /// Spawn with the given media host, or none to simulate missing credentials
    pub async fn spawn_with_storage(images: Option<Arc<FakeImageStorage>>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let listings = Arc::new(InMemoryListingRepository::default());
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::clone(&authenticator),
        ));
        let listing_service = Arc::new(ListingService::new(listings));
        let image_storage = images
            .clone()
            .map(|storage| storage as Arc<dyn ImageStorage>);

        let router = create_router(user_service, listing_service, image_storage, authenticator);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET),
            users,
            images,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user and return a token for them
    pub async fn register_and_login(&self, name: &str, email: &str) -> String {
        let response = self.register(name, email, "secret1").await;
        assert!(response.status().is_success(), "registration failed");

        let body: serde_json::Value = self
            .login(email, "secret1")
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("login returned no token")
            .to_string()
    }
}

/// User store that enforces email uniqueness under one lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn count_by_email(&self, email: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.email.as_str() == email)
            .count()
    }

    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .map(|u| u.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryListingRepository {
    listings: Mutex<Vec<Listing>>,
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: Listing) -> Result<Listing, ListingError> {
        self.listings.lock().unwrap().push(listing.clone());
        Ok(listing)
    }

    async fn find(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingError> {
        let mut found: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

/// Media host stand-in that records what it was sent.
pub struct FakeImageStorage {
    failure: Option<UploadError>,
    received: Mutex<Vec<ImageUpload>>,
}

impl FakeImageStorage {
    pub fn accepting() -> Self {
        Self {
            failure: None,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: UploadError) -> Self {
        Self {
            failure: Some(failure),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<ImageUpload> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStorage for FakeImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, UploadError> {
        self.received.lock().unwrap().push(image);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(UploadedImage {
                url: UPLOADED_URL.to_string(),
            }),
        }
    }
}
