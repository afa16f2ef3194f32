use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Director, Genre, Movie, User, UserFields};
use crate::store::{CatalogStore, MovieFilter, StoreError};

/// In-process store seeded with the fixed movie list. Serves as the test
/// double behind the [`CatalogStore`] seam and as a database-free dev mode.
pub struct MemoryStore {
    movies: Vec<Movie>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            movies: seed_movies(),
            users: RwLock::new(HashMap::new()),
        }
    }

    fn read_users(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, User>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_users(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, User>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_movies(&self, filter: MovieFilter) -> Result<Vec<Movie>, StoreError> {
        let matches = self
            .movies
            .iter()
            .filter(|m| match &filter {
                MovieFilter { title: Some(t), .. } => &m.title == t,
                MovieFilter { genre: Some(g), .. } => {
                    m.genre.as_ref().map(|x| &x.name == g).unwrap_or(false)
                }
                MovieFilter { director: Some(d), .. } => {
                    m.director.as_ref().map(|x| &x.name == d).unwrap_or(false)
                }
                _ => true,
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.read_users().values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read_users().get(username).cloned())
    }

    async fn create_user(&self, fields: UserFields, password_hash: String) -> Result<User, StoreError> {
        let mut users = self.write_users();
        if users.contains_key(&fields.username) {
            return Err(StoreError::Duplicate(fields.username));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: fields.username.clone(),
            password_hash,
            email: fields.email,
            birthday: fields.birthday,
            favorite_movies: Vec::new(),
        };
        users.insert(fields.username, user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        username: &str,
        fields: UserFields,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut users = self.write_users();
        if fields.username != username && users.contains_key(&fields.username) {
            return Err(StoreError::Duplicate(fields.username));
        }
        let mut user = users
            .remove(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
        user.username = fields.username.clone();
        user.password_hash = password_hash;
        user.email = fields.email;
        user.birthday = fields.birthday;
        users.insert(fields.username, user.clone());
        Ok(user)
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError> {
        let mut users = self.write_users();
        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
        if !user.favorite_movies.contains(&movie_id) {
            user.favorite_movies.push(movie_id);
        }
        Ok(user.clone())
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<User, StoreError> {
        let mut users = self.write_users();
        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
        user.favorite_movies.retain(|id| *id != movie_id);
        Ok(user.clone())
    }

    async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        self.write_users()
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }
}

fn genre(name: &str, description: &str) -> Option<Genre> {
    Some(Genre { name: name.to_string(), description: description.to_string() })
}

fn director(name: &str, bio: &str, birth: i32) -> Option<Director> {
    Some(Director { name: name.to_string(), bio: bio.to_string(), birth: Some(birth), death: None })
}

const ACTION: &str = "Fast-paced films built around physical feats, fights, and chases.";
const COMEDY: &str = "Films written to amuse, trading on humor and absurdity.";
const DRAMA: &str = "Character-driven films centered on emotional conflict.";
const ANIMATION: &str = "Films produced frame by frame rather than with live action.";
const THRILLER: &str = "Suspense-driven films that keep tension high until the end.";

fn seed_movies() -> Vec<Movie> {
    let entries: Vec<(&str, i32, Option<Genre>, Option<Director>)> = vec![
        (
            "Zack Snyder's Justice League",
            2021,
            genre("Action", ACTION),
            director("Zack Snyder", "American filmmaker known for large-scale comic book adaptations.", 1966),
        ),
        (
            "Coming 2 America",
            2021,
            genre("Comedy", COMEDY),
            director("Craig Brewer", "American director whose work spans music-driven drama and comedy.", 1971),
        ),
        (
            "Justice League",
            2017,
            genre("Action", ACTION),
            director("Zack Snyder", "American filmmaker known for large-scale comic book adaptations.", 1966),
        ),
        ("Cherry", 2021, None, None),
        (
            "Raya and the Last Dragon",
            2021,
            genre("Animation", ANIMATION),
            director("Don Hall", "American animator and director at Walt Disney Animation Studios.", 1969),
        ),
        ("Yes Day", 2021, genre("Comedy", COMEDY), None),
        (
            "Nomadland",
            2020,
            genre("Drama", DRAMA),
            director("Chloé Zhao", "Chinese-born filmmaker noted for naturalistic, location-driven stories.", 1982),
        ),
        (
            "Mank",
            2020,
            genre("Drama", DRAMA),
            director("David Fincher", "American director known for meticulous, dark character studies.", 1962),
        ),
        ("Mortal Kombat", 2021, genre("Action", ACTION), None),
        (
            "Minari",
            2020,
            genre("Drama", DRAMA),
            director("Lee Isaac Chung", "American director whose films draw on his Korean-American upbringing.", 1978),
        ),
        ("Deadly Illusions", 2021, genre("Thriller", THRILLER), None),
    ];

    entries
        .into_iter()
        .map(|(title, year, genre, director)| Movie {
            id: Uuid::new_v4(),
            title: title.to_string(),
            year,
            genre,
            director,
        })
        .collect()
}
