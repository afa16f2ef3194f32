use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config;
use crate::models::{Director, Genre, Movie, User, UserFields};
use crate::store::{CatalogStore, MovieFilter, StoreError};

const USER_COLUMNS: &str = "id, username, password_hash, email, birthday, favorite_movies";
const MOVIE_COLUMNS: &str = "id, title, year, genre_name, genre_description, \
                             director_name, director_bio, director_birth, director_death";

/// Postgres-backed store. Username uniqueness lives in a unique index rather
/// than an application-level pre-check, so concurrent registrations cannot
/// both succeed.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects, then runs the embedded migrations (schema + movie seed).
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config::config().db_max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Query(format!("connection failed: {e}")))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {e}")))?;

        Ok(Self { pool })
    }

    async fn fetch_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }
}

/// Flat row shape for the movies table; nested Genre/Director are assembled
/// from the optional column groups.
#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    year: i32,
    genre_name: Option<String>,
    genre_description: Option<String>,
    director_name: Option<String>,
    director_bio: Option<String>,
    director_birth: Option<i32>,
    director_death: Option<i32>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        let genre = row.genre_name.map(|name| Genre {
            name,
            description: row.genre_description.unwrap_or_default(),
        });
        let director = row.director_name.map(|name| Director {
            name,
            bio: row.director_bio.unwrap_or_default(),
            birth: row.director_birth,
            death: row.director_death,
        });
        Movie { id: row.id, title: row.title, year: row.year, genre, director }
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    // SQLSTATE 23505: unique_violation
    matches!(
        e.as_database_error().and_then(|db| db.code()),
        Some(code) if code == "23505"
    )
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_movies(&self, filter: MovieFilter) -> Result<Vec<Movie>, StoreError> {
        let (clause, bind) = match &filter {
            MovieFilter { title: Some(t), .. } => (" WHERE title = $1", Some(t.as_str())),
            MovieFilter { genre: Some(g), .. } => (" WHERE genre_name = $1", Some(g.as_str())),
            MovieFilter { director: Some(d), .. } => (" WHERE director_name = $1", Some(d.as_str())),
            _ => ("", None),
        };
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies{clause} ORDER BY title");

        let mut query = sqlx::query_as::<_, MovieRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(query_error)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.fetch_user(username).await
    }

    async fn create_user(&self, fields: UserFields, password_hash: String) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, username, password_hash, email, birthday) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&fields.username)
            .bind(&password_hash)
            .bind(&fields.email)
            .bind(fields.birthday)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(fields.username.clone())
                } else {
                    query_error(e)
                }
            })
    }

    async fn update_user(
        &self,
        username: &str,
        fields: UserFields,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET username = $2, password_hash = $3, email = $4, birthday = $5 \
             WHERE username = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(&fields.username)
            .bind(&password_hash)
            .bind(&fields.email)
            .bind(fields.birthday)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(fields.username.clone())
                } else {
                    query_error(e)
                }
            })?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError> {
        // Set semantics: the append is guarded, so a movie already on the list
        // matches no row and we fall through to a plain lookup.
        let sql = format!(
            "UPDATE users SET favorite_movies = array_append(favorite_movies, $2) \
             WHERE username = $1 AND NOT ($2 = ANY(favorite_movies)) RETURNING {USER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        match updated {
            Some(user) => Ok(user),
            None => self
                .fetch_user(username)
                .await?
                .ok_or_else(|| StoreError::NotFound(username.to_string())),
        }
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET favorite_movies = array_remove(favorite_movies, $2) \
             WHERE username = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(username.to_string()));
        }
        Ok(())
    }
}
