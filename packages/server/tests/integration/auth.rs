use crate::common::{TestApp, routes};
use serde_json::json;

fn register_body(username: &str, email: &str, password: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": password,
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn registers_a_new_user() {
        let app = TestApp::spawn().await;

        let body = register_body("alice", "alice@example.com", "pass12345");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
        assert!(res.body["id"].as_i64().is_some());
        // The password hash never leaves the server.
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_username() {
        let app = TestApp::spawn().await;

        let body = register_body("alice", "alice@example.com", "pass12345");
        assert_eq!(app.post_without_token(routes::REGISTER, &body).await.status, 201);

        let body = register_body("alice", "other@example.com", "pass12345");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let app = TestApp::spawn().await;

        let body = register_body("alice", "alice@example.com", "pass12345");
        assert_eq!(app.post_without_token(routes::REGISTER, &body).await.status, 201);

        let body = register_body("bob", "alice@example.com", "pass12345");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rejects_invalid_email() {
        let app = TestApp::spawn().await;

        let body = register_body("alice", "not-an-email", "pass12345");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_short_password() {
        let app = TestApp::spawn().await;

        let body = register_body("alice", "alice@example.com", "short");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_username_with_spaces() {
        let app = TestApp::spawn().await;

        let body = register_body("has space", "alice@example.com", "pass12345");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn logs_in_with_valid_credentials() {
        let app = TestApp::spawn().await;
        let body = register_body("alice", "alice@example.com", "pass12345");
        assert_eq!(app.post_without_token(routes::REGISTER, &body).await.status, 201);

        let body = json!({"username": "alice", "password": "pass12345"});
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert!(!res.body["token"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let app = TestApp::spawn().await;
        let body = register_body("alice", "alice@example.com", "pass12345");
        assert_eq!(app.post_without_token(routes::REGISTER, &body).await.status, 201);

        let body = json!({"username": "alice", "password": "wrong-pass"});
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn rejects_unknown_username() {
        let app = TestApp::spawn().await;

        let body = json!({"username": "nobody", "password": "pass12345"});
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn rejects_empty_password() {
        let app = TestApp::spawn().await;

        let body = json!({"username": "alice", "password": ""});
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_claims_for_the_bearer() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert!(res.body["id"].as_i64().is_some());
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
