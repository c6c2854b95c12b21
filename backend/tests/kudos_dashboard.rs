//! End-to-end kudo authoring and dashboard reporting over the in-memory
//! store.

mod support;

use chrono::TimeDelta;
use kudotrio::domain::{CreateKudoRequest, DashboardQuery, ErrorCode, MemeRequest, UserRole};
use rstest::rstest;
use support::{World, actor};

fn thanks(receiver: &kudotrio::domain::User) -> CreateKudoRequest {
    CreateKudoRequest {
        receiver_id: Some(receiver.id),
        message: "Thanks for the review".to_owned(),
        meme: None,
    }
}

#[rstest]
#[tokio::test]
async fn feed_resolves_both_parties_and_departments() {
    let world = World::new();
    let engineering = world.seed_department("Engineering").await;
    let sales = world.seed_department("Sales").await;
    let a = world
        .seed_user("Ada", "Lovelace", UserRole::User, Some(&engineering))
        .await;
    let b = world
        .seed_user("Grace", "Hopper", UserRole::User, Some(&sales))
        .await;
    let _c = world
        .seed_user("Alan", "Turing", UserRole::User, None)
        .await;

    world
        .state
        .kudos
        .create_kudo(&actor(&a), thanks(&b))
        .await
        .expect("kudo created");

    let dashboard = world
        .state
        .dashboard
        .dashboard(DashboardQuery::default())
        .await
        .expect("dashboard");

    assert_eq!(dashboard.recent_activity.len(), 1);
    let entry = &dashboard.recent_activity[0];
    assert_eq!(entry.sender.user_id, a.id);
    assert_eq!(entry.sender.department_name.as_deref(), Some("Engineering"));
    assert_eq!(entry.receiver.user_id, b.id);
    assert_eq!(entry.receiver.department_name.as_deref(), Some("Sales"));
    assert_eq!(dashboard.top_receivers[0].user_id, b.id);
    assert_eq!(dashboard.top_creators[0].user_id, a.id);

    let sent = world.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, b.email);
}

#[rstest]
#[tokio::test]
async fn missing_receiver_persists_nothing() {
    let world = World::new();
    let a = world.seed_user("Ada", "Lovelace", UserRole::User, None).await;

    let error = world
        .state
        .kudos
        .create_kudo(
            &actor(&a),
            CreateKudoRequest {
                receiver_id: None,
                message: "Thanks".to_owned(),
                meme: None,
            },
        )
        .await
        .expect_err("receiver required");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let dashboard = world
        .state
        .dashboard
        .dashboard(DashboardQuery::default())
        .await
        .expect("dashboard");
    assert!(dashboard.recent_activity.is_empty());
    assert!(world.notifier.sent().is_empty());
}

#[rstest]
#[tokio::test]
async fn meme_url_reaches_the_feed() {
    let world = World::new();
    let a = world.seed_user("Ada", "Lovelace", UserRole::User, None).await;
    let b = world.seed_user("Grace", "Hopper", UserRole::User, None).await;

    let mut request = thanks(&b);
    request.meme = Some(MemeRequest {
        template_id: "buzz".to_owned(),
        top_text: "reviews".to_owned(),
        bottom_text: "reviews everywhere".to_owned(),
    });
    world
        .state
        .kudos
        .create_kudo(&actor(&a), request)
        .await
        .expect("kudo created");

    let dashboard = world
        .state
        .dashboard
        .dashboard(DashboardQuery::default())
        .await
        .expect("dashboard");
    assert_eq!(
        dashboard.recent_activity[0].meme_image_url.as_deref(),
        Some("https://memes.test/buzz.png")
    );
}

#[rstest]
#[tokio::test]
async fn only_in_window_kudos_are_counted() {
    let world = World::new();
    let a = world.seed_user("Ada", "Lovelace", UserRole::User, None).await;
    let b = world.seed_user("Grace", "Hopper", UserRole::User, None).await;
    let c = world.seed_user("Alan", "Turing", UserRole::User, None).await;
    let now = support::start_of_test();

    world.clock.set(now - TimeDelta::days(200));
    world
        .state
        .kudos
        .create_kudo(&actor(&a), thanks(&c))
        .await
        .expect("old kudo");
    world.clock.set(now - TimeDelta::days(10));
    world
        .state
        .kudos
        .create_kudo(&actor(&a), thanks(&b))
        .await
        .expect("recent kudo");
    world.clock.set(now);

    let query = DashboardQuery::try_new(Some(120), None, None).expect("query");
    let dashboard = world
        .state
        .dashboard
        .dashboard(query)
        .await
        .expect("dashboard");

    let total: u64 = dashboard.monthly_counts.iter().map(|m| m.count).sum();
    assert_eq!(total, 1);
    assert_eq!(dashboard.top_receivers.len(), 1);
    assert_eq!(dashboard.top_receivers[0].user_id, b.id);
    assert_eq!(dashboard.top_creators[0].kudo_count, 1);
}

#[rstest]
#[tokio::test]
async fn users_without_department_have_a_null_label() {
    let world = World::new();
    let engineering = world.seed_department("Engineering").await;
    let a = world
        .seed_user("Ada", "Lovelace", UserRole::User, Some(&engineering))
        .await;
    let drifter = world.seed_user("Alan", "Turing", UserRole::User, None).await;

    world
        .state
        .kudos
        .create_kudo(&actor(&a), thanks(&drifter))
        .await
        .expect("kudo created");

    let dashboard = world
        .state
        .dashboard
        .dashboard(DashboardQuery::default())
        .await
        .expect("dashboard");
    let entry = &dashboard.top_receivers[0];
    assert_eq!(entry.user_id, drifter.id);
    assert_eq!(entry.department_name, None);
}

#[rstest]
#[tokio::test]
async fn case_differing_department_names_conflict() {
    let world = World::new();
    let admin = world.seed_user("Ada", "Lovelace", UserRole::Admin, None).await;

    world
        .state
        .departments
        .add_department(&actor(&admin), "Engineering")
        .await
        .expect("first add");
    let error = world
        .state
        .departments
        .add_department(&actor(&admin), "  ENGINEERING ")
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("duplicate_name")
    );
}
