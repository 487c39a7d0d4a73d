use serde_json::json;

use crate::support::{TestApp, routes};

/// A contest in the voting phase with three entries from three members,
/// plus a fourth member with no entry. Returns entry ids and tokens.
async fn voting_contest(app: &TestApp) -> (Vec<String>, Vec<String>) {
    let admin = app.admin_token().await;
    app.create_contest(&admin, "c1", None).await;

    let mut entries = Vec::new();
    let mut tokens = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        let token = app.create_member(&admin, name, None).await;
        entries.push(app.submit_entry("c1", &token, "photo.jpg").await);
        tokens.push(token);
    }
    tokens.push(app.create_member(&admin, "Dave", None).await);

    app.open_voting("c1");
    (entries, tokens)
}

fn ranking(first: &str, second: &str, third: &str) -> serde_json::Value {
    json!({"ranking": {"slots": [first, second, third]}})
}

mod casting {
    use super::*;

    #[tokio::test]
    async fn a_complete_ballot_is_sealed() {
        let app = TestApp::spawn().await;
        let (e, t) = voting_contest(&app).await;

        let res = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[0], &e[1], &e[2]), &t[3])
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["ranking"]["slots"][0], e[0].as_str());

        let mine = app.get_with_token(&routes::my_vote("c1"), &t[3]).await;
        assert_eq!(mine.status, 200);
        assert_eq!(mine.body["voted"], true);
    }

    #[tokio::test]
    async fn the_first_ballot_stands_against_resubmission() {
        let app = TestApp::spawn().await;
        let (e, t) = voting_contest(&app).await;

        let first = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[0], &e[1], &e[2]), &t[3])
            .await;
        assert_eq!(first.status, 201);

        // A second ballot, e.g. from another device, is refused outright.
        let second = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[2], &e[1], &e[0]), &t[3])
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "DUPLICATE");

        let mine = app.get_with_token(&routes::my_vote("c1"), &t[3]).await;
        assert_eq!(mine.body["ranking"]["slots"][0], e[0].as_str());
    }

    #[tokio::test]
    async fn ranking_your_own_entry_is_refused() {
        let app = TestApp::spawn().await;
        let (e, t) = voting_contest(&app).await;

        // Alice ranks her own entry third.
        let res = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[1], &e[2], &e[0]), &t[0])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "SELF_VOTE");
    }

    #[tokio::test]
    async fn incomplete_and_duplicate_rankings_are_refused() {
        let app = TestApp::spawn().await;
        let (e, t) = voting_contest(&app).await;

        let incomplete = app
            .post_with_token(
                &routes::votes("c1"),
                &json!({"ranking": {"slots": [e[0], null, e[2]]}}),
                &t[3],
            )
            .await;
        assert_eq!(incomplete.status, 400);
        assert_eq!(incomplete.body["code"], "VALIDATION_ERROR");

        let duplicated = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[0], &e[0], &e[2]), &t[3])
            .await;
        assert_eq!(duplicated.status, 400);

        let unknown = app
            .post_with_token(&routes::votes("c1"), &ranking(&e[0], &e[1], "ghost"), &t[3])
            .await;
        assert_eq!(unknown.status, 400);
    }

    #[tokio::test]
    async fn ballots_are_refused_outside_the_voting_phase() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_contest(&admin, "c1", None).await;
        let alice = app.create_member(&admin, "Alice", None).await;

        let res = app
            .post_with_token(&routes::votes("c1"), &ranking("a", "b", "c"), &alice)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod blindness {
    use super::*;

    #[tokio::test]
    async fn the_gallery_withholds_peer_attribution_while_voting() {
        let app = TestApp::spawn().await;
        let (_, t) = voting_contest(&app).await;

        let res = app.get_with_token(&routes::entries("c1"), &t[0]).await;
        assert_eq!(res.status, 200);

        for entry in res.body.as_array().unwrap() {
            if entry["mine"] == true {
                assert_eq!(entry["photographer_name"], "Alice");
            } else {
                assert!(entry["photographer_name"].is_null());
            }
        }
    }
}

mod progress {
    use super::*;

    #[tokio::test]
    async fn admins_see_the_roster_of_voted_and_pending() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let (e, t) = voting_contest(&app).await;

        app.post_with_token(&routes::votes("c1"), &ranking(&e[0], &e[1], &e[2]), &t[3])
            .await;

        let res = app
            .get_with_token(&routes::vote_progress("c1"), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["votes_cast"], 1);
        let voted: Vec<&str> = res.body["voted"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(voted, vec!["Dave"]);
        let pending: Vec<&str> = res.body["pending"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(pending.contains(&"Alice"));
        assert!(!pending.contains(&"Dave"));
    }

    #[tokio::test]
    async fn members_cannot_see_the_roster() {
        let app = TestApp::spawn().await;
        let (_, t) = voting_contest(&app).await;

        let res = app.get_with_token(&routes::vote_progress("c1"), &t[0]).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
