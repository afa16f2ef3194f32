pub mod movies;
pub mod session;
pub mod users;

/// GET / - public landing route
pub async fn welcome() -> &'static str {
    "Welcome to myFlix!"
}
