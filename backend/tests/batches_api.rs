use axum::http::{Method, StatusCode};
use property_desk_backend::models::user::UserRole;
use serde_json::json;

mod support;

use support::{
    create_test_token, integration_guard, seed_department, seed_property, seed_user, send,
    test_app, test_pool,
};

#[tokio::test]
async fn department_user_submits_batch_and_sees_it_pending() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let dept = seed_department(&pool, "Marketing").await;
    let requester = seed_user(&pool, UserRole::DepartmentUser, Some(dept.id)).await;
    let projector = seed_property(&pool, "Projector", 3).await;
    let chairs = seed_property(&pool, "Chair", 40).await;
    let app = test_app(pool.clone());
    let token = create_test_token(&requester);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/batches",
        Some(&token),
        Some(json!({
            "event_name": "  Spring fair  ",
            "purpose": "Booth",
            "needed_from": "2030-04-01",
            "return_by": "2030-04-03",
            "items": [
                { "property_id": projector.id, "quantity": 2 },
                { "property_id": chairs.id, "quantity": 20 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["event_name"], "Spring fair");
    assert_eq!(body["overall_status"], "pending");
    assert_eq!(body["department_id"], dept.id.to_string());
    assert_eq!(body["total_requested"], 22);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["status"] == "pending"));

    let (status, mine) = send(&app, Method::GET, "/api/batches/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(mine
        .as_array()
        .unwrap()
        .iter()
        .any(|batch| batch["id"] == body["id"]));
}

#[tokio::test]
async fn invalid_batches_are_rejected() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let dept = seed_department(&pool, "Finance").await;
    let requester = seed_user(&pool, UserRole::DepartmentUser, Some(dept.id)).await;
    let desk = seed_property(&pool, "Desk", 5).await;
    let app = test_app(pool.clone());
    let token = create_test_token(&requester);

    let base = |items: serde_json::Value, needed_from: &str, return_by: &str| {
        json!({
            "event_name": "Audit",
            "needed_from": needed_from,
            "return_by": return_by,
            "items": items
        })
    };

    let inverted = base(
        json!([{ "property_id": desk.id, "quantity": 1 }]),
        "2030-05-02",
        "2030-05-01",
    );
    let (status, _) = send(&app, Method::POST, "/api/batches", Some(&token), Some(inverted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let duplicated = base(
        json!([
            { "property_id": desk.id, "quantity": 1 },
            { "property_id": desk.id, "quantity": 2 }
        ]),
        "2030-05-01",
        "2030-05-02",
    );
    let (status, _) = send(&app, Method::POST, "/api/batches", Some(&token), Some(duplicated)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let empty = base(json!([]), "2030-05-01", "2030-05-02");
    let (status, _) = send(&app, Method::POST, "/api/batches", Some(&token), Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let zero = base(
        json!([{ "property_id": desk.id, "quantity": 0 }]),
        "2030-05-01",
        "2030-05-02",
    );
    let (status, _) = send(&app, Method::POST, "/api/batches", Some(&token), Some(zero)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = base(
        json!([{ "property_id": uuid::Uuid::new_v4(), "quantity": 1 }]),
        "2030-05-01",
        "2030-05-02",
    );
    let (status, body) = send(&app, Method::POST, "/api/batches", Some(&token), Some(unknown)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("does not exist"));

    // test config caps batches at five items
    let mut too_many = Vec::new();
    for i in 0..6 {
        let p = seed_property(&pool, &format!("Cone {i}"), 10).await;
        too_many.push(json!({ "property_id": p.id, "quantity": 1 }));
    }
    let oversized = base(json!(too_many), "2030-05-01", "2030-05-02");
    let (status, _) = send(&app, Method::POST, "/api/batches", Some(&token), Some(oversized)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inactive_property_cannot_be_requested() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let dept = seed_department(&pool, "Ops").await;
    let requester = seed_user(&pool, UserRole::DepartmentUser, Some(dept.id)).await;
    let retired = seed_property(&pool, "Old van", 1).await;
    sqlx::query("UPDATE properties SET is_active = FALSE WHERE id = $1")
        .bind(retired.id)
        .execute(&pool)
        .await
        .expect("deactivate");
    let app = test_app(pool.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/batches",
        Some(&create_test_token(&requester)),
        Some(json!({
            "event_name": "Move",
            "needed_from": "2030-06-01",
            "return_by": "2030-06-01",
            "items": [{ "property_id": retired.id, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("Old van"));
}

#[tokio::test]
async fn user_without_department_cannot_submit() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let manager = seed_user(&pool, UserRole::FinanceManager, None).await;
    let desk = seed_property(&pool, "Desk", 5).await;
    let app = test_app(pool.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/batches",
        Some(&create_test_token(&manager)),
        Some(json!({
            "event_name": "Offsite",
            "needed_from": "2030-06-01",
            "return_by": "2030-06-02",
            "items": [{ "property_id": desk.id, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_departments_cannot_see_a_batch_but_approvers_can() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let owner_dept = seed_department(&pool, "Sales").await;
    let other_dept = seed_department(&pool, "Legal").await;
    let owner = seed_user(&pool, UserRole::DepartmentUser, Some(owner_dept.id)).await;
    let outsider = seed_user(&pool, UserRole::DepartmentUser, Some(other_dept.id)).await;
    let approver = seed_user(&pool, UserRole::PropertyManager, None).await;
    let tent = seed_property(&pool, "Tent", 2).await;
    let app = test_app(pool.clone());

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/batches",
        Some(&create_test_token(&owner)),
        Some(json!({
            "event_name": "Roadshow",
            "needed_from": "2030-07-01",
            "return_by": "2030-07-02",
            "items": [{ "property_id": tent.id, "quantity": 1 }]
        })),
    )
    .await;
    let uri = format!("/api/batches/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::GET, &uri, Some(&create_test_token(&outsider)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, view) = send(&app, Method::GET, &uri, Some(&create_test_token(&approver)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["department_name"], owner_dept.name);

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requester_withdraws_only_while_everything_is_pending() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let dept = seed_department(&pool, "HR").await;
    let requester = seed_user(&pool, UserRole::DepartmentUser, Some(dept.id)).await;
    let colleague = seed_user(&pool, UserRole::DepartmentUser, Some(dept.id)).await;
    let approver = seed_user(&pool, UserRole::FinanceManager, None).await;
    let laptop = seed_property(&pool, "Laptop", 4).await;
    let app = test_app(pool.clone());
    let token = create_test_token(&requester);

    let payload = json!({
        "event_name": "Onboarding",
        "needed_from": "2030-08-01",
        "return_by": "2030-08-05",
        "items": [{ "property_id": laptop.id, "quantity": 2 }]
    });

    let (_, first) = send(&app, Method::POST, "/api/batches", Some(&token), Some(payload.clone())).await;
    let first_uri = format!("/api/batches/{}", first["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::DELETE,
        &first_uri,
        Some(&create_test_token(&colleague)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &first_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &first_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, second) = send(&app, Method::POST, "/api/batches", Some(&token), Some(payload)).await;
    let batch_id = second["id"].as_str().unwrap();
    let item_id = second["items"][0]["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/manage/batches/{batch_id}/items/{item_id}/reject"),
        Some(&create_test_token(&approver)),
        Some(json!({ "comment": "Not this quarter" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/batches/{batch_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
