use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_infra::{DatabaseConfig, JwtConfig};

use super::configure_routes;
use crate::config::{AppConfig, Environment};
use crate::middleware::auth::AUTH_COOKIE;
use crate::middleware::exception::ErrorHandlingMiddleware;
use crate::state::AppState;

fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            // One connection keeps the in-memory database alive.
            max_connections: 1,
            min_connections: 1,
            auto_migrate: true,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "quill-test".to_string(),
        },
        cookie_secure: false,
    }
}

async fn state() -> AppState {
    AppState::new(&config()).await.unwrap()
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(ErrorHandlingMiddleware::new(Environment::Development))
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn auth_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .expect("auth cookie")
        .into_owned()
}

async fn register<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    auth_cookie(&resp)
}

async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({
            "email": format!("{username}@example.com"),
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    auth_cookie(&resp)
}

async fn promote(state: &AppState, username: &str) {
    let session = state.session();
    let mut user = session
        .users()
        .get_by_username(username)
        .await
        .unwrap()
        .unwrap();
    user.is_admin = true;
    session.users().update(user).await;
    session.commit().await.unwrap();
}

async fn create_post<S, B>(app: &S, cookie: &Cookie<'static>, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = app!(state().await);

    let cookie = register(&app, "alice").await;
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(cookie)
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "alice");
    assert_eq!(me["is_admin"], false);

    let duplicate = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct-horse",
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, duplicate).await.status(),
        StatusCode::CONFLICT
    );

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "alice@example.com", "password": "wrong-horse"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong_password).await.status(),
        StatusCode::UNAUTHORIZED
    );

    login(&app, "alice").await;
}

#[actix_web::test]
async fn test_invalid_registration_is_rejected() {
    let app = app!(state().await);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "al", "email": "nope", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_me_requires_authentication() {
    let app = app!(state().await);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_drafts_are_hidden_from_other_readers() {
    let app = app!(state().await);
    let alice = register(&app, "alice").await;

    let published = create_post(
        &app,
        &alice,
        json!({"title": "First Post", "content": "Hello", "status": "Published"}),
    )
    .await;
    assert_eq!(published["url"], "first-post");
    assert!(published["published_on"].is_string());

    create_post(
        &app,
        &alice,
        json!({"title": "Work in progress", "content": "...", "url": "draft-post"}),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/posts/first-post").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/posts/draft-post").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri("/api/posts/draft-post")
        .cookie(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/posts/search?q=FIRST")
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_hidden_post_discussion_is_hidden_too() {
    let app = app!(state().await);
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let draft = create_post(
        &app,
        &alice,
        json!({"title": "Secret draft", "content": "Body"}),
    )
    .await;
    let id = draft["id"].as_str().unwrap();
    let comments_uri = format!("/api/posts/{id}/comments");
    let reactions_uri = format!("/api/posts/{id}/reactions");

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .cookie(alice.clone())
        .set_json(json!({"content": "Note to self"}))
        .to_request();
    let note: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri(&comments_uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/{}/replies", note["id"].as_str().unwrap()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .cookie(bob.clone())
        .set_json(json!({"content": "Peeking"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri(&reactions_uri)
        .cookie(bob.clone())
        .set_json(json!({"is_like": true}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{}/reactions", note["id"].as_str().unwrap()))
        .cookie(bob)
        .set_json(json!({"is_like": false}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&comments_uri)
        .cookie(alice)
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_only_author_may_edit_post() {
    let app = app!(state().await);
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let post = create_post(
        &app,
        &alice,
        json!({"title": "Alice writes", "content": "Body", "status": "Published"}),
    )
    .await;
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .cookie(bob)
        .set_json(json!({"title": "Bob was here"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .cookie(alice.clone())
        .set_json(json!({"title": "Alice edits", "status": "Archived"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["title"], "Alice edits");
    assert_eq!(updated["status"], "Archived");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .cookie(alice)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[actix_web::test]
async fn test_reaction_toggle() {
    let app = app!(state().await);
    let alice = register(&app, "alice").await;
    let post = create_post(
        &app,
        &alice,
        json!({"title": "Reactions", "content": "Body", "status": "Published"}),
    )
    .await;
    let uri = format!("/api/posts/{}/reactions", post["id"].as_str().unwrap());

    let react = |is_like: bool| {
        test::TestRequest::post()
            .uri(&uri)
            .cookie(alice.clone())
            .set_json(json!({ "is_like": is_like }))
            .to_request()
    };

    let added: Value = test::call_and_read_body_json(&app, react(true)).await;
    assert_eq!(added["is_like"], true);

    let removed: Value = test::call_and_read_body_json(&app, react(true)).await;
    assert!(removed["is_like"].is_null());

    test::call_service(&app, react(true)).await;
    let replaced: Value = test::call_and_read_body_json(&app, react(false)).await;
    assert_eq!(replaced["is_like"], false);

    let req = test::TestRequest::get().uri("/api/posts/reactions").to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["like_count"], 0);
    assert_eq!(details["dislike_count"], 1);
}

#[actix_web::test]
async fn test_comments_and_replies() {
    let app = app!(state().await);
    let alice = register(&app, "alice").await;
    let post = create_post(
        &app,
        &alice,
        json!({"title": "Discussed", "content": "Body", "status": "Published"}),
    )
    .await;
    let other = create_post(
        &app,
        &alice,
        json!({"title": "Elsewhere", "content": "Body", "status": "Published"}),
    )
    .await;
    let comments_uri = format!("/api/posts/{}/comments", post["id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .cookie(alice.clone())
        .set_json(json!({"content": "First!"}))
        .to_request();
    let root: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .cookie(alice.clone())
        .set_json(json!({"content": "Reply", "parent_comment_id": root["id"]}))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["parent_comment_id"], root["id"]);

    // A parent on another post is rejected.
    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/comments", other["id"].as_str().unwrap()))
        .cookie(alice.clone())
        .set_json(json!({"content": "Misplaced", "parent_comment_id": root["id"]}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Threads are one level deep.
    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .cookie(alice.clone())
        .set_json(json!({"content": "Nested", "parent_comment_id": reply["id"]}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/{}/replies", root["id"].as_str().unwrap()))
        .to_request();
    let replies: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(replies.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri(&comments_uri).to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["author"]["username"], "alice");
}

#[actix_web::test]
async fn test_tags_and_components() {
    let state = state().await;
    let app = app!(state.clone());
    let alice = register(&app, "alice").await;

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .cookie(alice)
        .set_json(json!({"name": "Rust"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    promote(&state, "alice").await;
    let admin = login(&app, "alice").await;

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .cookie(admin.clone())
        .set_json(json!({"name": "Rust", "color": "#b7410e"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tag: Value = test::read_body_json(resp).await;
    assert_eq!(tag["url"], "rust");

    create_post(
        &app,
        &admin,
        json!({
            "title": "Tagged Post",
            "content": "Body",
            "status": "Published",
            "tag_ids": [tag["id"]],
        }),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/tags/rust/posts").to_request();
    let tagged: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tagged.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/components/tag-cloud")
        .to_request();
    let cloud: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cloud[0]["name"], "Rust");
    assert_eq!(cloud[0]["post_count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/components/featured-posts")
        .to_request();
    let featured: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(featured[0]["title"], "Tagged Post");

    let req = test::TestRequest::get()
        .uri("/api/components/unknown")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_health_and_error_page() {
    let app = app!(state().await);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "ok");

    let req = test::TestRequest::get()
        .uri("/error")
        .cookie(Cookie::new("error_detail", "boom <b>"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().any(|c| c.name() == "error_detail"));
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("boom &lt;b&gt;"));
}

#[actix_web::test]
async fn test_error_page_hides_detail_in_production() {
    let mut state = state().await;
    state.environment = Environment::Production;
    let app = test::init_service(
        App::new()
            .wrap(ErrorHandlingMiddleware::new(Environment::Production))
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/error")
        .cookie(Cookie::new("error_detail", "connection refused"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Something went wrong"));
    assert!(!html.contains("connection refused"));
}
