use serde_json::json;

use crate::support::{ADMIN_PIN, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn seeded_admin_can_login_with_pin() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"name": "admin", "pin": ADMIN_PIN}))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["display_name"], "admin");
        assert_eq!(res.body["role"], "super_admin");
    }

    #[tokio::test]
    async fn wrong_pin_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"name": "admin", "pin": "0000"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"name": "nobody"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::LOGIN))
            .header("Content-Type", "application/json")
            .body("{\"name\": ")
            .send()
            .await
            .expect("Failed to send POST request");

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await.expect("expected a JSON error body");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn names_match_case_insensitively() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_member(&admin, "Alice", None).await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"name": "aLiCe"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["display_name"], "Alice");
    }

    #[tokio::test]
    async fn me_returns_the_token_holder() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let alice = app.create_member(&admin, "Alice", Some("red")).await;

        let res = app.get_with_token(routes::ME, &alice).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["display_name"], "Alice");
        assert_eq!(res.body["team_id"], "red");
        assert_eq!(res.body["role"], "member");
    }

    #[tokio::test]
    async fn me_without_token_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_and_list_users() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let created = app
            .post_with_token(
                routes::USERS,
                &json!({"display_name": "Alice", "team_id": "red", "pin": "1234"}),
                &admin,
            )
            .await;
        assert_eq!(created.status, 201);
        assert_eq!(created.body["has_pin"], true);
        assert!(created.body["pin_hash"].is_null());

        let list = app.get_with_token(routes::USERS, &admin).await;
        assert_eq!(list.status, 200);
        let names: Vec<&str> = list
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["display_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alice", "admin"]);
    }

    #[tokio::test]
    async fn member_cannot_create_users() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let alice = app.create_member(&admin, "Alice", None).await;

        let res = app
            .post_with_token(routes::USERS, &json!({"display_name": "Eve"}), &alice)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn duplicate_display_name_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_member(&admin, "Alice", None).await;

        let res = app
            .post_with_token(routes::USERS, &json!({"display_name": "alice"}), &admin)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE");
    }

    #[tokio::test]
    async fn short_pin_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::USERS,
                &json!({"display_name": "Alice", "pin": "12"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn deleted_user_can_no_longer_log_in() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_member(&admin, "Alice", None).await;

        let list = app.get_with_token(routes::USERS, &admin).await;
        let alice_id = list.body[0]["id"].as_str().unwrap().to_string();

        let res = app.delete_with_token(&routes::user(&alice_id), &admin).await;
        assert_eq!(res.status, 204);

        let login = app
            .post_without_token(routes::LOGIN, &json!({"name": "Alice"}))
            .await;
        assert_eq!(login.status, 401);
    }

    #[tokio::test]
    async fn admin_cannot_delete_their_own_account() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let me = app.get_with_token(routes::ME, &admin).await;
        let my_id = me.body["id"].as_str().unwrap().to_string();

        let res = app.delete_with_token(&routes::user(&my_id), &admin).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
