use super::test_util::{self, empty_request, json_request, prepared_router, send};
use crate::api::test_util::{ErrorBody, deserialize_body};
use crate::domain::DEFAULT_USER_ID;
use crate::domain::user::{SeedOutcome, verify_password};
use crate::dto::{NewTask, TaskItem, UpdateTask};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_owned(),
        is_done: false,
        user_id: DEFAULT_USER_ID,
    }
}

async fn created_task(router: &axum::Router, title: &str) -> TaskItem {
    let response = send(router, json_request(Method::POST, "/tasks", &new_task(title))).await;
    assert_eq!(StatusCode::CREATED, response.status());

    deserialize_body(response.into_body()).await
}

async fn error_code_of(response: Response) -> String {
    let body: ErrorBody = deserialize_body(response.into_body()).await;
    body.error_code
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn seeding_is_idempotent() {
    test_util::prepare_db_and_test(|db| async move {
        let first = crate::prepare_database(&db, &test_util::seed_user()).await.unwrap();
        let second = crate::prepare_database(&db, &test_util::seed_user()).await.unwrap();

        assert_eq!(SeedOutcome::Inserted, first);
        assert_eq!(SeedOutcome::AlreadyPresent, second);

        let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(1, user_count);

        let (email, password_hash): (String, String) =
            sqlx::query_as("SELECT email, password_hash FROM users WHERE id = $1")
                .bind(DEFAULT_USER_ID)
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(test_util::SEED_EMAIL, email);
        assert_ne!(test_util::SEED_PASSWORD, password_hash);
        assert!(verify_password(test_util::SEED_PASSWORD, &password_hash));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn user_ids_continue_after_seed_user() {
    test_util::prepare_db_and_test(|db| async move {
        crate::prepare_database(&db, &test_util::seed_user()).await.unwrap();

        let (next_id,): (i32,) = sqlx::query_as(
            "INSERT INTO users (email, password_hash) VALUES ('other@example.com', 'x') RETURNING id",
        )
        .fetch_one(&db)
        .await
        .unwrap();

        assert_eq!(DEFAULT_USER_ID + 1, next_id);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn starts_with_no_tasks() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;

        let response = send(&router, empty_request(Method::GET, "/tasks")).await;

        assert_eq!(StatusCode::OK, response.status());
        let tasks: Vec<TaskItem> = deserialize_body(response.into_body()).await;
        assert!(tasks.is_empty());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn created_tasks_are_listed_in_order() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;

        let milk = created_task(&router, "Buy milk").await;
        let dog = created_task(&router, "Walk dog").await;
        assert_ne!(milk.id, dog.id);
        assert!(!milk.is_done);
        assert_eq!(DEFAULT_USER_ID, milk.user_id);

        let response = send(&router, empty_request(Method::GET, "/tasks")).await;
        let tasks: Vec<TaskItem> = deserialize_body(response.into_body()).await;
        assert_eq!(vec![milk.clone(), dog], tasks);

        let response = send(&router, empty_request(Method::GET, &format!("/tasks/{}", milk.id))).await;
        assert_eq!(StatusCode::OK, response.status());
        let fetched: TaskItem = deserialize_body(response.into_body()).await;
        assert_eq!(milk, fetched);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn task_for_unknown_user_is_rejected() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;
        let orphan = NewTask {
            user_id: 42,
            ..new_task("Nobody's task")
        };

        let response = send(&router, json_request(Method::POST, "/tasks", &orphan)).await;

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!("user_not_found", error_code_of(response).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn malformed_bodies_are_rejected() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;

        let broken_json = Request::builder()
            .method(Method::POST)
            .uri("/tasks")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();
        let response = send(&router, broken_json).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!("invalid_json", error_code_of(response).await);

        let response = send(&router, json_request(Method::POST, "/tasks", &new_task(""))).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!("invalid_input", error_code_of(response).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn update_replaces_task_content() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;
        let milk = created_task(&router, "Buy milk").await;
        let update = UpdateTask {
            id: Some(milk.id),
            title: "Buy oat milk".to_owned(),
            is_done: true,
            user_id: DEFAULT_USER_ID,
        };

        let response = send(
            &router,
            json_request(Method::PUT, &format!("/tasks/{}", milk.id), &update),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());
        let updated: TaskItem = deserialize_body(response.into_body()).await;

        let expected = TaskItem {
            id: milk.id,
            title: "Buy oat milk".to_owned(),
            is_done: true,
            user_id: DEFAULT_USER_ID,
        };
        assert_eq!(expected, updated);

        let response = send(&router, empty_request(Method::GET, "/tasks")).await;
        let tasks: Vec<TaskItem> = deserialize_body(response.into_body()).await;
        assert_eq!(vec![expected], tasks);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn update_of_missing_task_is_not_found() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;
        let update = UpdateTask {
            id: None,
            title: "Ghost".to_owned(),
            is_done: false,
            user_id: DEFAULT_USER_ID,
        };

        let response = send(&router, json_request(Method::PUT, "/tasks/999", &update)).await;

        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert_eq!("not_found", error_code_of(response).await);

        let orphan_update = UpdateTask {
            user_id: 42,
            ..update
        };
        let response = send(&router, json_request(Method::PUT, "/tasks/999", &orphan_update)).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn deleted_task_is_gone() {
    test_util::prepare_db_and_test(|db| async move {
        let router = prepared_router(db).await;
        let milk = created_task(&router, "Buy milk").await;
        let dog = created_task(&router, "Walk dog").await;
        let milk_uri = format!("/tasks/{}", milk.id);

        let response = send(&router, empty_request(Method::DELETE, &milk_uri)).await;
        assert_eq!(StatusCode::NO_CONTENT, response.status());

        let response = send(&router, empty_request(Method::GET, "/tasks")).await;
        let tasks: Vec<TaskItem> = deserialize_body(response.into_body()).await;
        assert_eq!(vec![dog], tasks);

        let response = send(&router, empty_request(Method::GET, &milk_uri)).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(&router, empty_request(Method::DELETE, &milk_uri)).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    });
}
