use serde_json::json;

use crate::support::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_an_adhoc_contest() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CONTESTS,
                &json!({"id": "halloween", "display_name": "Halloween Special"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["id"], "halloween");
        assert_eq!(res.body["phase"], "submissions_open");
        assert_eq!(res.body["metadata_required"], true);
    }

    #[tokio::test]
    async fn member_cannot_create_contests() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let alice = app.create_member(&admin, "Alice", None).await;

        let res = app
            .post_with_token(
                routes::CONTESTS,
                &json!({"id": "halloween", "display_name": "Halloween"}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn duplicate_contest_id_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "halloween", None).await;

        let res = app
            .post_with_token(
                routes::CONTESTS,
                &json!({"id": "halloween", "display_name": "Again"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE");
    }

    #[tokio::test]
    async fn contest_id_must_be_key_safe() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CONTESTS,
                &json!({"id": "no spaces!", "display_name": "Bad"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod directory {
    use super::*;

    #[tokio::test]
    async fn active_snapshot_lists_visible_contests() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "open-one", None).await;
        app.create_contest(&admin, "voting-one", None).await;
        app.open_voting("voting-one");

        let res = app.get_with_token(routes::ACTIVE, &admin).await;

        assert_eq!(res.status, 200);
        let ids: Vec<&str> = res.body["contests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"open-one"));
        assert!(ids.contains(&"voting-one"));
        assert_eq!(res.body["voting_target"]["id"], "voting-one");
        assert_eq!(res.body["submission_target"]["id"], "open-one");
    }

    #[tokio::test]
    async fn submission_target_is_virtual_when_nothing_is_open() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::ACTIVE, &admin).await;

        assert_eq!(res.status, 200);
        assert!(res.body["voting_target"].is_null());
        assert_eq!(res.body["submission_target"]["phase"], "virtual");
    }

    #[tokio::test]
    async fn team_contest_is_hidden_from_other_teams() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "red-only", Some("red")).await;
        let blue = app.create_member(&admin, "Bob", Some("blue")).await;

        let res = app.get_with_token(routes::ACTIVE, &blue).await;
        let ids: Vec<&str> = res.body["contests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert!(!ids.contains(&"red-only"));

        // And the gallery behind it reads as missing, not forbidden.
        let gallery = app.get_with_token(&routes::entries("red-only"), &blue).await;
        assert_eq!(gallery.status, 404);
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn skip_marks_an_open_contest_and_is_idempotent() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "quiet-month", None).await;

        let first = app
            .post_with_token(&routes::contest_skip("quiet-month"), &json!({}), &admin)
            .await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body["phase"], "skipped");

        let again = app
            .post_with_token(&routes::contest_skip("quiet-month"), &json!({}), &admin)
            .await;
        assert_eq!(again.status, 200);
        assert_eq!(again.body["phase"], "skipped");
    }

    #[tokio::test]
    async fn voting_contest_cannot_be_skipped() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "busy-month", None).await;
        app.open_voting("busy-month");

        let res = app
            .post_with_token(&routes::contest_skip("busy-month"), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn finalize_requires_the_voting_phase() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "too-early", None).await;

        let res = app
            .post_with_token(&routes::contest_finalize("too-early"), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn member_cannot_finalize_or_skip() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "c1", None).await;
        let alice = app.create_member(&admin, "Alice", None).await;

        let skip = app
            .post_with_token(&routes::contest_skip("c1"), &json!({}), &alice)
            .await;
        assert_eq!(skip.status, 403);

        let finalize = app
            .post_with_token(&routes::contest_finalize("c1"), &json!({}), &alice)
            .await;
        assert_eq!(finalize.status, 403);
    }
}
