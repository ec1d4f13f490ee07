/// End-to-end HTTP tests for the auth flow.
///
/// These need a PostgreSQL instance and are opt-in:
///
/// ```sh
/// DATABASE_URL=postgres://localhost/clinical_test cargo test -- --ignored
/// ```
use actix_web::{http::StatusCode, test, web, App};
use clinical_api::{config::Config, db, routes, AppState};
use uuid::Uuid;

fn test_config(database_url: String) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url,
        secret_key: "test-only-secret".to_string(),
        algorithm: "HS256".to_string(),
        access_token_expire_minutes: 120,
        setpwd_token_expire_minutes: 60,
        // Low on purpose: these tests hash several passwords.
        pbkdf2_rounds: 1_000,
        frontend_base_url: "http://localhost:5173".to_string(),
        media_root: std::env::temp_dir()
            .join("clinical-api-test-media")
            .to_string_lossy()
            .into_owned(),
        model_endpoint_url: None,
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: String::new(),
        from_name: "Test".to_string(),
    }
}

async fn test_state() -> AppState {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored DB tests");
    let pool = db::create_pool(&database_url, 2)
        .await
        .expect("failed to connect to the test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    AppState::new(test_config(database_url), pool)
}

fn unique_email(tag: &str) -> String {
    format!("{tag}+{}@x.com", Uuid::new_v4().simple())
}

#[actix_web::test]
#[ignore]
async fn test_register_login_whoami_flow() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let email = unique_email("flow");

    // register
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // registering the same email again is a conflict
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // login
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "secret1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().expect("token in response");
    assert_eq!(body["token_type"], "bearer");

    // who am I
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "patient");
}

#[actix_web::test]
#[ignore]
async fn test_token_with_stale_email_no_longer_resolves() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let email = unique_email("stale");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "secret1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Change the account email; the token's subject claim is now stale.
    let req = test::TestRequest::patch()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({ "email": unique_email("renamed") }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Account id still matches, email does not: resolution must fail.
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
#[ignore]
async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let email = unique_email("creds");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let wrong_password = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "nope00" }))
        .to_request();
    let unknown_email = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": unique_email("ghost"), "password": "nope00" }))
        .to_request();

    let a = test::call_service(&app, wrong_password).await;
    let b = test::call_service(&app, unknown_email).await;
    assert_eq!(a.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(b.status(), StatusCode::UNAUTHORIZED);

    let a: serde_json::Value = test::read_body_json(a).await;
    let b: serde_json::Value = test::read_body_json(b).await;
    assert_eq!(a, b);
}

#[actix_web::test]
#[ignore]
async fn test_patient_role_is_forbidden_from_staff_surface() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let email = unique_email("rbac");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "secret1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // authenticated, but the patient list is staff-only
    let req = test::TestRequest::get()
        .uri("/api/v1/patients")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // unauthenticated is a distinct failure
    let req = test::TestRequest::get().uri("/api/v1/patients").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
#[ignore]
async fn test_set_password_token_never_authenticates_a_request() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes),
    )
    .await;

    let email = unique_email("scope");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": "patient"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    // Signature-valid token with the set-password scope.
    let reset_token = state.tokens.issue_set_password(&email, 60).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {reset_token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // But the same token drives the reset flow.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/set-password")
        .set_json(serde_json::json!({ "token": reset_token, "new_password": "secret2" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    // Old password out, new password in.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "secret1" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": "secret2" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
