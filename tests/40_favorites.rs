mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

async fn movie_ids(app: &axum::Router, token: &str) -> Vec<String> {
    let (status, body) = common::send(app, Method::GET, "/movies", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|m| m["_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn add_then_remove_restores_original_set() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;
    let ids = movie_ids(&app, &token).await;

    let (status, body) = common::send(
        &app,
        Method::POST,
        &format!("/users/moviefan1/movies/{}", ids[0]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FavoriteMovies"], json!([ids[0]]));

    let (status, body) = common::send(
        &app,
        Method::PUT,
        &format!("/users/moviefan1/movies/{}", ids[0]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FavoriteMovies"], json!([]));
}

#[tokio::test]
async fn adding_the_same_movie_twice_keeps_one_entry() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;
    let ids = movie_ids(&app, &token).await;
    let uri = format!("/users/moviefan1/movies/{}", ids[0]);

    common::send(&app, Method::POST, &uri, Some(&token), None).await;
    let (status, body) = common::send(&app, Method::POST, &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FavoriteMovies"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn removing_one_favorite_leaves_the_rest() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;
    let ids = movie_ids(&app, &token).await;

    for id in &ids[..2] {
        let uri = format!("/users/moviefan1/movies/{id}");
        common::send(&app, Method::POST, &uri, Some(&token), None).await;
    }

    let (status, body) = common::send(
        &app,
        Method::PATCH,
        &format!("/users/moviefan1/movies/{}", ids[0]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FavoriteMovies"], json!([ids[1]]));
}

#[tokio::test]
async fn favorites_carry_no_referential_integrity() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;

    // an identifier that matches no movie is accepted as-is
    let uri = "/users/moviefan1/movies/00000000-0000-4000-8000-000000000001";
    let (status, body) = common::send(&app, Method::POST, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["FavoriteMovies"],
        json!(["00000000-0000-4000-8000-000000000001"])
    );
}

#[tokio::test]
async fn favorite_add_for_unknown_user_is_a_400() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;
    let ids = movie_ids(&app, &token).await;

    let uri = format!("/users/nosuchuser99/movies/{}", ids[0]);
    let (status, body) = common::send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_uuid_movie_id_is_a_bad_request() {
    let app = common::test_app();
    let token = common::auth_token(&app, "moviefan1").await;

    let (status, _body): (StatusCode, Value) = common::send(
        &app,
        Method::POST,
        "/users/moviefan1/movies/not-a-uuid",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
