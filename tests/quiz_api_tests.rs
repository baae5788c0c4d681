// tests/quiz_api_tests.rs

use std::str::FromStr;

use lms_backend::{config::Config, routes, state::AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Spawns the app on a random port with a private in-memory database.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // A single connection keeps the in-memory database alive for the life
    // of the pool.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns a bearer token.
async fn register_and_login(client: &reqwest::Client, address: &str) -> String {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    client
        .post(format!("{}/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123",
            "role": "teacher"
        }))
        .send()
        .await
        .expect("Register failed");

    let login: serde_json::Value = client
        .post(format!("{}/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

/// Creates a course with one chapter; returns (course_id, chapter_id).
async fn seed_chapter(client: &reqwest::Client, address: &str, token: &str) -> (i64, i64) {
    let course: serde_json::Value = client
        .post(format!("{}/courses", address))
        .bearer_auth(token)
        .json(&serde_json::json!({ "title": "Rust for Beginners" }))
        .send()
        .await
        .expect("Course creation failed")
        .json()
        .await
        .unwrap();
    let course_id = course["id"].as_i64().unwrap();

    let chapter: serde_json::Value = client
        .post(format!("{}/courses/{}/chapters", address, course_id))
        .bearer_auth(token)
        .json(&serde_json::json!({ "title": "Ownership" }))
        .send()
        .await
        .expect("Chapter creation failed")
        .json()
        .await
        .unwrap();

    (course_id, chapter["id"].as_i64().unwrap())
}

fn sample_quiz() -> serde_json::Value {
    serde_json::json!({
        "title": "Checkpoint",
        "description": "End of chapter check",
        "questions": [
            {
                "questionText": "Capital of France?",
                "options": ["Paris", "London"],
                "correctOption": "Paris"
            },
            {
                "questionText": "2 + 2?",
                "options": ["3", "4"],
                "correctOption": "4"
            }
        ]
    })
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );

    let response = client
        .post(&quizzes_url)
        .bearer_auth(&token)
        .json(&sample_quiz())
        .send()
        .await
        .expect("Quiz creation failed");

    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["title"], "Checkpoint");
    assert_eq!(created["chapterId"].as_i64().unwrap(), chapter_id);
    // The created entity does not echo the nested questions back
    assert!(created.get("questions").is_none());

    let list: serde_json::Value = client
        .get(&quizzes_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let quizzes = list.as_array().unwrap();
    assert_eq!(quizzes.len(), 1);

    let quiz = &quizzes[0];
    assert_eq!(quiz["id"], created["id"]);
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["questionText"], "Capital of France?");
    assert_eq!(questions[0]["correctOption"], "Paris");
    let options = questions[0]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["optionText"], "Paris");
    assert_eq!(options[1]["optionText"], "London");
    assert_eq!(questions[1]["questionText"], "2 + 2?");
    assert_eq!(questions[1]["correctOption"], "4");
}

#[tokio::test]
async fn create_rejects_unlisted_correct_option_and_persists_nothing() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );

    let mut payload = sample_quiz();
    payload["questions"][1]["correctOption"] = serde_json::json!("Berlin");

    let response = client
        .post(&quizzes_url)
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "correct option must be one of the provided options"
    );

    // No partial rows: the chapter has no quizzes at all
    let list: serde_json::Value = client
        .get(&quizzes_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_rejects_malformed_payloads() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );

    // Blank title
    let mut blank_title = sample_quiz();
    blank_title["title"] = serde_json::json!("  ");
    // No questions
    let no_questions = serde_json::json!({ "title": "Checkpoint", "questions": [] });
    // A question with a single option
    let single_option = serde_json::json!({
        "title": "Checkpoint",
        "questions": [
            { "questionText": "Q?", "options": ["A"], "correctOption": "A" }
        ]
    });

    for payload in [&blank_title, &no_questions, &single_option] {
        let response = client
            .post(&quizzes_url)
            .bearer_auth(&token)
            .json(payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }
}

#[tokio::test]
async fn reading_a_quiz_twice_yields_identical_results() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );

    let created: serde_json::Value = client
        .post(&quizzes_url)
        .bearer_auth(&token)
        .json(&sample_quiz())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let quiz_url = format!("{}/{}", quizzes_url, created["id"].as_i64().unwrap());

    let first: serde_json::Value = client
        .get(&quiz_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: serde_json::Value = client
        .get(&quiz_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first["questions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_then_read_yields_not_found() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );

    let created: serde_json::Value = client
        .post(&quizzes_url)
        .bearer_auth(&token)
        .json(&sample_quiz())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let quiz_url = format!("{}/{}", quizzes_url, created["id"].as_i64().unwrap());

    let deleted = client
        .delete(&quiz_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);

    let read_back = client
        .get(&quiz_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(read_back.status().as_u16(), 404);

    // Deleting a second time is an error, not a no-op
    let deleted_again = client
        .delete(&quiz_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted_again.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_chapter_lists_no_quizzes() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let list: serde_json::Value = client
        .get(format!(
            "{}/courses/{}/chapters/{}/quizzes",
            address, course_id, chapter_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn quiz_endpoints_reject_unauthenticated_callers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let (course_id, chapter_id) = seed_chapter(&client, &address, &token).await;

    let quizzes_url = format!(
        "{}/courses/{}/chapters/{}/quizzes",
        address, course_id, chapter_id
    );
    let quiz_url = format!("{}/1", quizzes_url);

    // No token: every quiz endpoint answers 401 regardless of input validity
    let responses = [
        client
            .post(&quizzes_url)
            .json(&sample_quiz())
            .send()
            .await
            .unwrap(),
        client.get(&quizzes_url).send().await.unwrap(),
        client.get(&quiz_url).send().await.unwrap(),
        client.delete(&quiz_url).send().await.unwrap(),
    ];
    for response in responses {
        assert_eq!(response.status().as_u16(), 401);
    }

    // Garbage token is rejected the same way
    let response = client
        .get(&quizzes_url)
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
