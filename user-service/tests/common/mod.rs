use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::TokenCodec;
use user_service::domain::user::events::UserChangedEvent;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::EventPublisher;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AuthSettings;
use user_service::user::errors::EventPublisherError;
use user_service::user::errors::UserError;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const SERVICE_USERNAME: &str = "internal-service";

/// In-memory stand-in for the Postgres repository.
///
/// Mimics the unique constraints on username and email so conflict paths
/// behave like the real store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == *username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.clone())
    }

    async fn find_by_usernames(&self, usernames: &[Username]) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| usernames.contains(&u.username))
            .cloned()
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }
}

/// Event publisher that records instead of talking to a broker.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<UserChangedEvent>>,
}

impl RecordingEventPublisher {
    pub fn recorded(&self) -> Vec<UserChangedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_user_changed(
        &self,
        event: &UserChangedEvent,
    ) -> Result<(), EventPublisherError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Test application serving the real router on a random local port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
    pub events: Arc<RecordingEventPublisher>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let events = Arc::new(RecordingEventPublisher::default());
        let user_service = Arc::new(UserService::new(repository, Arc::clone(&events)));

        let token_codec = Arc::new(TokenCodec::new(JWT_SECRET, 24));
        let auth = AuthSettings {
            header: "Authorization".to_string(),
            prefix: "Bearer ".to_string(),
            service_username: SERVICE_USERNAME.to_string(),
        };

        let application = create_router(user_service, Arc::clone(&token_codec), auth);

        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(JWT_SECRET, 24),
            events,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Register a user through the API and return the response.
    pub async fn register_user(&self, username: &str, email: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": "pass_word!",
                "name": format!("{} Display", username)
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Issue a valid bearer token for the given subject.
    pub fn bearer_for(&self, subject: &str) -> String {
        format!(
            "Bearer {}",
            self.token_codec.issue(subject).expect("Failed to issue token")
        )
    }
}
