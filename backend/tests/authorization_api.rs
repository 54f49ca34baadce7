use axum::http::{header, StatusCode};
use serde_json::json;
use stockbook_backend::models::user::UserRole;

mod support;

use support::{empty_request, json_request, response_json, TestApp};

const ADMIN_ONLY_GETS: &[&str] = &[
    "/sales",
    "/shopping/list",
    "/reports",
    "/users/admin/users",
];

const STAFF_GETS: &[&str] = &["/stock/products", "/sales/my", "/shopping/my"];

#[tokio::test]
async fn anonymous_callers_are_sent_to_login() {
    let app = TestApp::new().await;
    for uri in ADMIN_ONLY_GETS
        .iter()
        .chain(STAFF_GETS)
        .chain(&["/users/profile"])
    {
        let response = app.call(empty_request("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login"
        );
        assert_eq!(response_json(response).await["code"], "LOGIN_REQUIRED");
    }
}

#[tokio::test]
async fn user_role_is_forbidden_from_admin_routes() {
    let app = TestApp::new().await;
    let (_, cookie) = app.seed_and_login("ana", UserRole::User).await;

    for uri in ADMIN_ONLY_GETS {
        let response = app.call(empty_request("GET", uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(response_json(response).await["code"], "FORBIDDEN");
    }
    for uri in STAFF_GETS {
        let response = app.call(empty_request("GET", uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn admin_reaches_every_route() {
    let app = TestApp::new().await;
    let (_, cookie) = app.seed_and_login("boss", UserRole::Admin).await;

    for uri in ADMIN_ONLY_GETS.iter().chain(STAFF_GETS) {
        let response = app.call(empty_request("GET", uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn denied_mutation_writes_nothing() {
    let app = TestApp::new().await;
    let (_, cookie) = app.seed_and_login("ana", UserRole::User).await;

    let response = app
        .call(json_request(
            "POST",
            "/stock/products",
            Some(&cookie),
            json!({ "name": "Yerba", "price_cents": 1500, "stock": 10 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let anonymous = app
        .call(json_request(
            "POST",
            "/stock/products",
            None,
            json!({ "name": "Yerba", "price_cents": 1500, "stock": 10 }),
        ))
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn suspended_accounts_lose_access_immediately() {
    let app = TestApp::new().await;
    let (user, cookie) = app.seed_and_login("ana", UserRole::User).await;

    app.suspend(&user).await;

    for uri in ["/users/profile", "/stock/products"] {
        let response = app.call(empty_request("GET", uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn admin_manages_roles_and_status() {
    let app = TestApp::new().await;
    let (admin, admin_cookie) = app.seed_and_login("boss", UserRole::Admin).await;
    let (user, user_cookie) = app.seed_and_login("ana", UserRole::User).await;

    let promote = app
        .call(json_request(
            "PUT",
            &format!("/users/admin/users/{}/role", user.id),
            Some(&admin_cookie),
            json!({ "role": "ADMIN" }),
        ))
        .await;
    assert_eq!(promote.status(), StatusCode::OK);
    assert_eq!(response_json(promote).await["role"], "ADMIN");

    let reports = app
        .call(empty_request("GET", "/reports", Some(&user_cookie)))
        .await;
    assert_eq!(reports.status(), StatusCode::OK);

    let suspend = app
        .call(json_request(
            "PUT",
            &format!("/users/admin/users/{}/status", user.id),
            Some(&admin_cookie),
            json!({ "status": "SUSPENDED" }),
        ))
        .await;
    assert_eq!(suspend.status(), StatusCode::OK);
    assert_eq!(response_json(suspend).await["status"], "SUSPENDED");

    let locked_out = app
        .call(empty_request("GET", "/reports", Some(&user_cookie)))
        .await;
    assert_eq!(locked_out.status(), StatusCode::FORBIDDEN);

    let self_demote = app
        .call(json_request(
            "PUT",
            &format!("/users/admin/users/{}/role", admin.id),
            Some(&admin_cookie),
            json!({ "role": "USER" }),
        ))
        .await;
    assert_eq!(self_demote.status(), StatusCode::BAD_REQUEST);

    let self_suspend = app
        .call(json_request(
            "PUT",
            &format!("/users/admin/users/{}/status", admin.id),
            Some(&admin_cookie),
            json!({ "status": "SUSPENDED" }),
        ))
        .await;
    assert_eq!(self_suspend.status(), StatusCode::BAD_REQUEST);

    let missing = app
        .call(json_request(
            "PUT",
            "/users/admin/users/9999/role",
            Some(&admin_cookie),
            json!({ "role": "USER" }),
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let listing = app
        .call(empty_request("GET", "/users/admin/users", Some(&admin_cookie)))
        .await;
    let users = response_json(listing).await;
    assert_eq!(users.as_array().unwrap().len(), 2);
}
