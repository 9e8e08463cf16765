mod common;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use blogforge::create_app;
use common::{call, register_and_login, test_state, MultipartForm, TestUser, TEST_MAX_IMAGE_BYTES};

async fn create_blog<S, B>(app: &S, user: &TestUser, form: MultipartForm) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (content_type, body) = form.finish();
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header(user.bearer())
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    call(app, req).await
}

async fn create_simple_blog<S, B>(app: &S, user: &TestUser, title: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let form = MultipartForm::new()
        .text("title", title)
        .text("content", "Some body text");
    let (status, body) = create_blog(app, user, form).await;
    assert_eq!(status, StatusCode::CREATED, "Setup: blog creation failed: {}", body);
    body["blog"]["id"].as_str().expect("blog id").to_string()
}

async fn get_post<S, B>(app: &S, blog_id: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(&format!("/blogposts/{}", blog_id))
        .to_request();
    call(app, req).await
}

#[actix_rt::test]
async fn test_create_blog_with_image() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Writer", "writer@example.com").await;

    let form = MultipartForm::new()
        .text("title", "Hello world")
        .text("content", "First post")
        .file("image", "cover.png", "image/png", b"hello");
    let (status, body) = create_blog(&app, &user, form).await;

    assert_eq!(status, StatusCode::CREATED, "Create failed: {}", body);
    assert_eq!(body["message"], "Blog created successfully");
    assert_eq!(body["blog"]["title"], "Hello world");
    assert_eq!(body["blog"]["author"]["id"], json!(user.id));
    assert_eq!(body["blog"]["author"]["email"], "writer@example.com");
    assert_eq!(body["blog"]["likes_count"], 0);
    assert_eq!(body["blog"]["shares_count"], 0);
    assert_eq!(body["blog"]["image"], "data:image/png;base64,aGVsbG8=");
}

#[actix_rt::test]
async fn test_create_blog_requires_title_and_content() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Writer", "writer@example.com").await;

    let form = MultipartForm::new().text("content", "No title here");
    let (status, body) = create_blog(&app, &user, form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "title is required");

    let form = MultipartForm::new().text("title", "").text("content", "Empty title");
    let (status, _) = create_blog(&app, &user, form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_create_blog_rejects_bad_images() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Writer", "writer@example.com").await;

    let oversized = vec![0u8; TEST_MAX_IMAGE_BYTES + 1];
    let form = MultipartForm::new()
        .text("title", "Big")
        .text("content", "Too big")
        .file("image", "big.png", "image/png", &oversized);
    let (status, _) = create_blog(&app, &user, form).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let form = MultipartForm::new()
        .text("title", "Doc")
        .text("content", "Not a picture")
        .file("image", "notes.txt", "text/plain", b"plain text");
    let (status, _) = create_blog(&app, &user, form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let (_, body) = call(&app, req).await;
    assert_eq!(body["blogs"], json!([]));
}

#[actix_rt::test]
async fn test_create_blog_requires_token() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;

    let (content_type, body) = MultipartForm::new()
        .text("title", "Anonymous")
        .text("content", "Should not land")
        .finish();
    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_list_and_get_blog_posts() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Writer", "writer@example.com").await;

    let first = create_simple_blog(&app, &user, "First").await;
    create_simple_blog(&app, &user, "Second").await;

    // listing is public and newest first, author email hidden
    let req = test::TestRequest::get().uri("/blogs").to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let blogs = body["blogs"].as_array().expect("blogs array");
    assert_eq!(blogs.len(), 2);
    assert_eq!(blogs[0]["title"], "Second");
    assert_eq!(blogs[1]["title"], "First");
    assert_eq!(blogs[0]["author"]["name"], "Writer");
    assert!(blogs[0]["author"].get("email").is_none());
    assert_eq!(blogs[0]["likes_count"], 0);
    assert_eq!(blogs[0]["shares_count"], 0);

    let (status, body) = get_post(&app, &first).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blog_post"]["title"], "First");
    assert_eq!(body["blog_post"]["author"]["email"], "writer@example.com");

    let (status, body) = get_post(&app, &Uuid::new_v4().to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post not found");
}

#[actix_rt::test]
async fn test_update_and_delete_blog_ownership() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let owner = register_and_login(&app, "Owner", "owner@example.com").await;
    let other = register_and_login(&app, "Other", "other@example.com").await;
    let blog_id = create_simple_blog(&app, &owner, "Original").await;

    let (content_type, payload) = MultipartForm::new().text("title", "Hijacked").finish();
    let req = test::TestRequest::put()
        .uri(&format!("/blogposts/{}", blog_id))
        .insert_header(other.bearer())
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/blogposts/{}", blog_id))
        .insert_header(other.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/like", blog_id))
        .insert_header(other.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // owner update keeps content, ignores the video part
    let (content_type, payload) = MultipartForm::new()
        .text("title", "Renamed")
        .file("video", "clip.mp4", "video/mp4", b"not really a video")
        .finish();
    let req = test::TestRequest::put()
        .uri(&format!("/blogposts/{}", blog_id))
        .insert_header(owner.bearer())
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Update failed: {}", body);
    assert_eq!(body["message"], "Blog post updated");
    assert_eq!(body["blog_post"]["title"], "Renamed");
    assert_eq!(body["blog_post"]["content"], "Some body text");
    assert_eq!(body["blog_post"]["likes_count"], 1);
    assert_eq!(body["blog_post"]["shares_count"], 0);
    assert_eq!(body["blog_post"]["author"]["name"], "Owner");

    let req = test::TestRequest::delete()
        .uri(&format!("/blogposts/{}", blog_id))
        .insert_header(owner.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog post deleted");

    let (status, _) = get_post(&app, &blog_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_comments_flow() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let author = register_and_login(&app, "Author", "author@example.com").await;
    let reader = register_and_login(&app, "Reader", "reader@example.com").await;
    let blog_id = create_simple_blog(&app, &author, "Discuss").await;

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/comments", blog_id))
        .insert_header(reader.bearer())
        .set_json(json!({ "content": "Nice post" }))
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Comment failed: {}", body);
    assert_eq!(body["message"], "Comment added");
    let comment_id = body["comment"]["id"].as_str().expect("comment id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/comments", blog_id))
        .insert_header(author.bearer())
        .set_json(json!({ "content": "Thanks" }))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // listing is public, oldest first
    let req = test::TestRequest::get()
        .uri(&format!("/blogposts/{}/comments", blog_id))
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = body["comments"]
        .as_array()
        .expect("comments array")
        .iter()
        .filter_map(|c| c["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["Nice post", "Thanks"]);
    assert_eq!(body["comments"][0]["author"]["name"], "Reader");

    // the post author cannot delete the reader's comment
    let req = test::TestRequest::delete()
        .uri(&format!("/comments/{}", comment_id))
        .insert_header(author.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/comments/{}", comment_id))
        .insert_header(reader.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/comments/{}", comment_id))
        .insert_header(reader.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_comment_on_missing_blog() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Reader", "reader@example.com").await;

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/comments", Uuid::new_v4()))
        .insert_header(user.bearer())
        .set_json(json!({ "content": "Anyone here?" }))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_like_unlike_and_share() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let author = register_and_login(&app, "Author", "author@example.com").await;
    let fan = register_and_login(&app, "Fan", "fan@example.com").await;
    let blog_id = create_simple_blog(&app, &author, "Popular").await;

    let like_uri = format!("/blogposts/{}/like", blog_id);

    let req = test::TestRequest::post()
        .uri(&like_uri)
        .insert_header(fan.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Liked");

    let req = test::TestRequest::post()
        .uri(&like_uri)
        .insert_header(fan.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already liked");

    let (_, body) = get_post(&app, &blog_id).await;
    assert_eq!(body["blog_post"]["likes_count"], 1);

    let req = test::TestRequest::delete()
        .uri(&like_uri)
        .insert_header(fan.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Unliked");

    let req = test::TestRequest::delete()
        .uri(&like_uri)
        .insert_header(fan.bearer())
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not liked yet");

    let (_, body) = get_post(&app, &blog_id).await;
    assert_eq!(body["blog_post"]["likes_count"], 0);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/blogposts/{}/share", blog_id))
            .insert_header(fan.bearer())
            .to_request();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Shared");
    }

    let (_, body) = get_post(&app, &blog_id).await;
    assert_eq!(body["blog_post"]["shares_count"], 2);
}

#[actix_rt::test]
async fn test_engagement_on_missing_blog() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let user = register_and_login(&app, "Fan", "fan@example.com").await;
    let missing = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/like", missing))
        .insert_header(user.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/share", missing))
        .insert_header(user.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // liking requires a token even though the post routes are public
    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/like", missing))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_deleting_blog_removes_its_comments() {
    let (state, _store) = test_state();
    let app = test::init_service(create_app(state)).await;
    let author = register_and_login(&app, "Author", "author@example.com").await;
    let blog_id = create_simple_blog(&app, &author, "Short lived").await;

    let req = test::TestRequest::post()
        .uri(&format!("/blogposts/{}/comments", blog_id))
        .insert_header(author.bearer())
        .set_json(json!({ "content": "First!" }))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/blogposts/{}", blog_id))
        .insert_header(author.bearer())
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/blogposts/{}/comments", blog_id))
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"], json!([]));
}
