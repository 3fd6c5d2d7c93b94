//! The full forum lifecycle over HTTP: the storm-tactics walkthrough,
//! counter consistency under many writes, original-post pagination, pinned
//! ordering, and view counting.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use domains::Role;
use integration_tests::TestApp;

async fn category_body(app: &TestApp, id: uuid::Uuid) -> Value {
    let (status, body) = app.send(Method::GET, "/forum/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == json!(id))
        .cloned()
        .unwrap()
}

async fn topic_body(app: &TestApp, id: uuid::Uuid) -> Value {
    let (status, body) = app
        .send(Method::GET, &format!("/forum/topics/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn storm_tactics_walkthrough() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user1 = app.token(Role::User);
    let user2 = app.token(Role::User);
    let user3 = app.token(Role::User);

    let c1 = app.create_category(&admin, "Navigation & Equipment").await;
    let before = category_body(&app, c1).await;
    assert_eq!(before["topicsCount"], 0);
    assert_eq!(before["postsCount"], 0);

    // Topic creation counts the topic and its original post.
    let t1 = app
        .create_topic(&user1, c1, "Storm tactics", "Great tips here")
        .await;
    assert_eq!(topic_body(&app, t1).await["repliesCount"], 0);
    let after_topic = category_body(&app, c1).await;
    assert_eq!(after_topic["topicsCount"], 1);
    assert_eq!(after_topic["postsCount"], 1);

    // A reply bumps the topic and the category.
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/forum/topics/{t1}/reply"),
            Some(&user2),
            Some(json!({"content": "I agree"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(topic_body(&app, t1).await["repliesCount"], 1);
    assert_eq!(category_body(&app, c1).await["postsCount"], 2);

    // Once locked, replies are rejected and nothing moves.
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/forum/topics/{t1}/lock"),
            Some(&admin),
            Some(json!({"locked": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isLocked"], true);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/forum/topics/{t1}/reply"),
            Some(&user3),
            Some(json!({"content": "late reply"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Topic is locked");
    assert_eq!(topic_body(&app, t1).await["repliesCount"], 1);
    assert_eq!(category_body(&app, c1).await["postsCount"], 2);

    // Unlocking reopens the thread.
    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/forum/topics/{t1}/lock"),
            Some(&admin),
            Some(json!({"locked": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/forum/topics/{t1}/reply"),
            Some(&user3),
            Some(json!({"content": "back on"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(topic_body(&app, t1).await["repliesCount"], 2);
}

#[tokio::test]
async fn counters_match_the_number_of_successful_writes() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user = app.token(Role::User);
    let category = app.create_category(&admin, "Career Development").await;

    let mut topics = Vec::new();
    for i in 0..3 {
        topics.push(
            app.create_topic(&user, category, &format!("topic {i}"), "opening post")
                .await,
        );
    }
    for topic in &topics {
        for j in 0..4 {
            let (status, _) = app
                .send(
                    Method::POST,
                    &format!("/forum/topics/{topic}/reply"),
                    Some(&user),
                    Some(json!({"content": format!("reply {j}")})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    let body = category_body(&app, category).await;
    // 3 topics; each contributes 1 original post + 4 replies.
    assert_eq!(body["topicsCount"], 3);
    assert_eq!(body["postsCount"], 15);
}

#[tokio::test]
async fn original_post_leads_every_page() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user = app.token(Role::User);
    let category = app.create_category(&admin, "General Discussion").await;
    let topic = app
        .create_topic(&user, category, "Long thread", "the original post")
        .await;

    for i in 0..12 {
        app.send(
            Method::POST,
            &format!("/forum/topics/{topic}/reply"),
            Some(&user),
            Some(json!({"content": format!("reply {i}")})),
        )
        .await;
    }

    for page in 1..=3 {
        let (status, body) = app
            .send(
                Method::GET,
                &format!("/forum/topics/{topic}/posts?page={page}&per_page=5"),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let posts = body["posts"].as_array().unwrap();
        assert_eq!(posts[0]["isOriginalPost"], true, "page {page}");
        assert_eq!(posts[0]["content"], "the original post");
        assert_eq!(body["totalReplies"], 12);
        assert_eq!(body["totalPages"], 3);
    }

    // A page far past the end is still a 200 with only the original post,
    // even at the largest page number a client can express.
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/forum/topics/{topic}/posts?page={}&per_page=5", i64::MAX),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["isOriginalPost"], true);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/forum/categories/{category}/topics?page={}", i64::MAX),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["topics"].as_array().unwrap().len(), 0);

    // Replies on page 2 continue in creation order after page 1.
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/topics/{topic}/posts?page=2&per_page=5"),
            None,
            None,
        )
        .await;
    assert_eq!(body["posts"][1]["content"], "reply 5");
}

#[tokio::test]
async fn pinned_topics_sort_first_and_toggles_are_idempotent() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user = app.token(Role::User);
    let category = app.create_category(&admin, "Safety & Wellbeing").await;

    let first = app.create_topic(&user, category, "older", "op").await;
    let second = app.create_topic(&user, category, "newer", "op").await;

    // Recent sort puts the newer topic first until the older one is pinned.
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/categories/{category}/topics"),
            None,
            None,
        )
        .await;
    assert_eq!(body["topics"][0]["id"], json!(second));

    for _ in 0..2 {
        // Pinning twice succeeds both times and stays pinned.
        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/forum/topics/{first}/pin"),
                Some(&admin),
                Some(json!({"pinned": true})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isPinned"], true);
    }

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/categories/{category}/topics?sort=recent"),
            None,
            None,
        )
        .await;
    assert_eq!(body["topics"][0]["id"], json!(first));
    assert_eq!(body["topics"][0]["isPinned"], true);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn most_replies_sort_orders_within_the_unpinned_group() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user = app.token(Role::User);
    let category = app.create_category(&admin, "Technology & Innovation").await;

    let quiet = app.create_topic(&user, category, "quiet", "op").await;
    let busy = app.create_topic(&user, category, "busy", "op").await;
    for _ in 0..3 {
        app.send(
            Method::POST,
            &format!("/forum/topics/{busy}/reply"),
            Some(&user),
            Some(json!({"content": "chatter"})),
        )
        .await;
    }

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/categories/{category}/topics?sort=most_replies"),
            None,
            None,
        )
        .await;
    assert_eq!(body["topics"][0]["id"], json!(busy));
    assert_eq!(body["topics"][1]["id"], json!(quiet));

    // Unknown category listing is a 404, not an empty page.
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/forum/categories/{}/topics", uuid::Uuid::new_v4()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn views_count_once_per_viewer_and_never_for_anonymous() {
    let app = TestApp::new();
    let admin = app.token(Role::Admin);
    let user = app.token(Role::User);
    let other = app.token(Role::User);
    let category = app.create_category(&admin, "Regulations & Compliance").await;
    let topic = app.create_topic(&user, category, "colregs", "op").await;

    // The bump lands after the read, so the first authenticated view still
    // reports zero.
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/topics/{topic}"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(body["viewsCount"], 0);

    // Repeat views within the window do not bump again.
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/forum/topics/{topic}"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(body["viewsCount"], 1);
    let (_, body) = app
        .send(Method::GET, &format!("/forum/topics/{topic}"), None, None)
        .await;
    assert_eq!(body["viewsCount"], 1);

    // A distinct viewer counts separately.
    let viewer2 = app.token(Role::User);
    app.send(
        Method::GET,
        &format!("/forum/topics/{topic}"),
        Some(&viewer2),
        None,
    )
    .await;
    let (_, body) = app
        .send(Method::GET, &format!("/forum/topics/{topic}"), None, None)
        .await;
    assert_eq!(body["viewsCount"], 2);
}
