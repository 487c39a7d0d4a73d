use chrono::{Datelike, Utc};
use serde_json::json;

use crate::support::{TestApp, routes};

/// A finished voting round: three photographers plus two non-entrant
/// voters whose ballots both put Alice's entry first.
/// Entry ids come back in photographer order Alice, Bob, Carol.
async fn contest_ready_to_seal(app: &TestApp, admin: &str, id: &str) -> Vec<String> {
    app.create_contest(admin, id, None).await;

    let mut entries = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        let token = app
            .create_member(admin, &format!("{name}-{id}"), None)
            .await;
        entries.push(app.submit_entry(id, &token, "photo.jpg").await);
    }
    let dave = app.create_member(admin, &format!("Dave-{id}"), None).await;
    let eve = app.create_member(admin, &format!("Eve-{id}"), None).await;
    app.open_voting(id);

    let b1 = json!({"ranking": {"slots": [entries[0], entries[2], entries[1]]}});
    let res = app.post_with_token(&routes::votes(id), &b1, &dave).await;
    assert_eq!(res.status, 201, "ballot one failed: {}", res.text);
    let b2 = json!({"ranking": {"slots": [entries[0], entries[1], entries[2]]}});
    let res = app.post_with_token(&routes::votes(id), &b2, &eve).await;
    assert_eq!(res.status, 201, "ballot two failed: {}", res.text);

    entries
}

mod finalize {
    use super::*;

    #[tokio::test]
    async fn finalize_tallies_and_seals_the_contest() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let entries = contest_ready_to_seal(&app, &admin, "c1").await;

        let res = app
            .post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["winners"]["gold"], entries[0].as_str());
        assert_eq!(res.body["stats"]["votes_cast"], 2);
        // Alice: 3 + 3 points from two first places.
        assert_eq!(res.body["entries"][0]["points"], 6);

        let active = app.get_with_token(routes::ACTIVE, &admin).await;
        assert!(active.body["voting_target"].is_null());
    }

    #[tokio::test]
    async fn finalize_is_idempotent() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;

        let first = app
            .post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;
        assert_eq!(first.status, 200);

        let second = app
            .post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;
        assert_eq!(second.status, 200);
        assert_eq!(second.body["archived_at"], first.body["archived_at"]);

        let list = app.get_with_token(routes::ARCHIVES, &admin).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn archived_gallery_reveals_attribution() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;
        app.post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;

        let outsider = app.create_member(&admin, "Outsider", None).await;
        let res = app.get_with_token(&routes::entries("c1"), &outsider).await;

        assert_eq!(res.status, 200);
        for entry in res.body.as_array().unwrap() {
            assert!(entry["photographer_name"].is_string());
        }
    }
}

mod archives {
    use super::*;

    #[tokio::test]
    async fn archives_are_listed_and_readable() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;
        app.post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;

        let list = app.get_with_token(routes::ARCHIVES, &admin).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body[0]["id"], "c1");
        assert_eq!(list.body[0]["entry_count"], 3);

        let one = app.get_with_token(&routes::archive("c1"), &admin).await;
        assert_eq!(one.status, 200);
        assert_eq!(one.body["entries"].as_array().unwrap().len(), 3);

        let missing = app.get_with_token(&routes::archive("nope"), &admin).await;
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn purging_reclaims_images_and_blanks_urls() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;
        app.post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;

        let before = app.get_with_token(&routes::archive("c1"), &admin).await;
        let url = before.body["entries"][0]["url"]
            .as_str()
            .unwrap()
            .to_string();

        let res = app
            .delete_with_token(&routes::archive_images("c1"), &admin)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["images_purged"], true);
        assert_eq!(res.body["entries"][0]["url"], "");

        let image = app
            .get_with_token(&routes::blob_from_url(&url), &admin)
            .await;
        assert_eq!(image.status, 404);

        // Purging again is a no-op.
        let again = app
            .delete_with_token(&routes::archive_images("c1"), &admin)
            .await;
        assert_eq!(again.status, 200);
    }

    #[tokio::test]
    async fn members_cannot_purge_images() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;
        app.post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;
        let member = app.create_member(&admin, "Mallory", None).await;

        let res = app
            .delete_with_token(&routes::archive_images("c1"), &member)
            .await;

        assert_eq!(res.status, 403);
    }
}

mod leaderboard {
    use super::*;

    #[tokio::test]
    async fn standings_fold_points_and_medals_across_archives() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        contest_ready_to_seal(&app, &admin, "c1").await;
        app.post_with_token(&routes::contest_finalize("c1"), &json!({}), &admin)
            .await;

        let res = app.get_with_token(routes::LEADERBOARD, &admin).await;

        assert_eq!(res.status, 200);
        let rows = res.body.as_array().unwrap();
        assert_eq!(rows[0]["photographer_name"], "Alice-c1");
        assert_eq!(rows[0]["points"], 6);
        assert_eq!(rows[0]["gold"], 1);
        assert_eq!(rows[0]["entries"], 1);
    }

    #[tokio::test]
    async fn leaderboard_is_empty_with_no_archives() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::LEADERBOARD, &admin).await;

        assert_eq!(res.status, 200);
        assert!(res.body.as_array().unwrap().is_empty());
    }
}

mod turnover {
    use super::*;

    #[tokio::test]
    async fn manual_turnover_promotes_and_provisions() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let now = Utc::now();
        let current = format!("{:04}-{:02}", now.year(), now.month());
        app.create_contest(&admin, &current, None).await;

        let res = app
            .post_with_token(routes::TURNOVER, &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["promoted"], current.as_str());
        assert!(res.body["created"].is_string());

        // A second pass in the same month finds nothing to do.
        let res = app
            .post_with_token(routes::TURNOVER, &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["promoted"].is_null());
        assert!(res.body["created"].is_null());
        assert!(res.body["archived"].is_null());
    }

    #[tokio::test]
    async fn members_cannot_trigger_turnover() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let member = app.create_member(&admin, "Mallory", None).await;

        let res = app
            .post_with_token(routes::TURNOVER, &json!({}), &member)
            .await;

        assert_eq!(res.status, 403);
    }
}
