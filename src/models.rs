use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A movie genre, embedded in [`Movie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub name: String,
    pub description: String,
}

/// A movie director, embedded in [`Movie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    pub name: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i32>,
}

/// A catalog entry. Movies are seeded out-of-band and immutable through the API.
///
/// Wire format keeps the PascalCase field names clients already depend on,
/// with the identifier exposed as `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<Director>,
}

/// A registered account. The password is held only as a bcrypt hash and the
/// hash is never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
}

/// Full field set accepted by registration and by user update. Update routes
/// forward these values to the store without validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserFields {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}
