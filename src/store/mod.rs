pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Movie, User, UserFields};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists: {0}")]
    Duplicate(String),
    #[error("no such user: {0}")]
    NotFound(String),
    #[error("store query failed: {0}")]
    Query(String),
}

/// Exact-field filter over the movie collection. Handlers set at most one
/// field; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
}

impl MovieFilter {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn by_genre(name: impl Into<String>) -> Self {
        Self { genre: Some(name.into()), ..Self::default() }
    }

    pub fn by_director(name: impl Into<String>) -> Self {
        Self { director: Some(name.into()), ..Self::default() }
    }
}

/// Boundary between handlers and the backing document collections.
///
/// Passwords cross this boundary already hashed; the store never sees
/// plaintext. Favorite lists have set semantics: adding a movie that is
/// already present returns the user unchanged.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All movies matching `filter`. An empty match set is a valid result.
    async fn find_movies(&self, filter: MovieFilter) -> Result<Vec<Movie>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a new user. Username uniqueness is enforced by the store's own
    /// constraint, not an application-level pre-check; a violation surfaces as
    /// [`StoreError::Duplicate`].
    async fn create_user(&self, fields: UserFields, password_hash: String) -> Result<User, StoreError>;

    /// Full-field replacement of an existing user. Favorites are untouched.
    async fn update_user(
        &self,
        username: &str,
        fields: UserFields,
        password_hash: String,
    ) -> Result<User, StoreError>;

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError>;

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError>;

    async fn delete_user(&self, username: &str) -> Result<(), StoreError>;
}
