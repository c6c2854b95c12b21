//! Handler tests for the dashboard and kudo endpoints.

use super::*;
use crate::domain::{
    AuditStamp, KudoId, KudoMessage, MemeId, MemeSpec, MemeTemplate, RecipientChoice, UserRole,
};
use crate::inbound::http::test_utils::{TestPorts, error_detail_code, profile, send};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::TimeZone;
use rstest::rstest;
use serde_json::{Value, json};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn party(name: &str, department: Option<&str>) -> FeedParty {
    FeedParty {
        user_id: UserId::random(),
        display_name: name.to_owned(),
        department_name: department.map(str::to_owned),
    }
}

fn sample_dashboard() -> KudosDashboard {
    let sender = party("Ada Lovelace", Some("Engineering"));
    let receiver = party("Grace Hopper", None);
    KudosDashboard {
        window_days: 30,
        since: at(1),
        monthly_counts: vec![crate::domain::MonthlyKudoCount {
            month: "2024-04".to_owned(),
            count: 1,
        }],
        top_receivers: vec![LeaderboardEntry {
            user_id: receiver.user_id,
            display_name: receiver.display_name.clone(),
            department_name: None,
            kudo_count: 1,
        }],
        top_creators: vec![LeaderboardEntry {
            user_id: sender.user_id,
            display_name: sender.display_name.clone(),
            department_name: sender.department_name.clone(),
            kudo_count: 1,
        }],
        recent_activity: vec![ActivityFeedEntry {
            kudo_id: KudoId::random(),
            created_at: at(2),
            message: "Thanks for the review".to_owned(),
            sender,
            receiver,
            meme_image_url: None,
        }],
    }
}

#[rstest]
#[actix_web::test]
async fn dashboard_requires_login() {
    let res = send(
        TestPorts::new().into_state(),
        None,
        test::TestRequest::get().uri("/api/v1/dashboard"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn dashboard_passes_parameters_and_renders_the_feed() {
    let user = profile(UserRole::User);
    let mut ports = TestPorts::new().signed_in(&user);
    ports
        .dashboard
        .expect_dashboard()
        .withf(|query| {
            query.window_days() == 30 && query.top_n() == 3 && query.recent_limit() == 10
        })
        .times(1)
        .return_once(|_| Ok(sample_dashboard()));

    let res = send(
        ports.into_state(),
        Some(user.id),
        test::TestRequest::get().uri("/api/v1/dashboard?window_days=30&top_n=3"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["windowDays"], 30);
    assert_eq!(body["monthlyCounts"][0], json!({"month": "2024-04", "count": 1}));
    assert_eq!(body["topReceivers"][0]["departmentName"], Value::Null);
    assert_eq!(body["topCreators"][0]["departmentName"], "Engineering");
    let feed = &body["recentActivity"];
    assert_eq!(feed.as_array().map(Vec::len), Some(1));
    assert_eq!(feed[0]["sender"]["displayName"], "Ada Lovelace");
    assert_eq!(feed[0]["receiver"]["displayName"], "Grace Hopper");
}

#[rstest]
#[case("window_days=0", "window_days")]
#[case("top_n=101", "top_n")]
#[case("recent_limit=0", "recent_limit")]
#[actix_web::test]
async fn dashboard_rejects_out_of_range_parameters(#[case] query: &str, #[case] field: &str) {
    let user = profile(UserRole::User);
    let res = send(
        TestPorts::new().signed_in(&user).into_state(),
        Some(user.id),
        test::TestRequest::get().uri(&format!("/api/v1/dashboard?{query}")),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let (error, code) = error_detail_code(res).await;
    assert_eq!(code.as_deref(), Some("out_of_range"));
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!(field))
    );
}

#[rstest]
#[actix_web::test]
async fn dashboard_rejects_non_numeric_parameters() {
    let user = profile(UserRole::User);
    let res = send(
        TestPorts::new().signed_in(&user).into_state(),
        Some(user.id),
        test::TestRequest::get().uri("/api/v1/dashboard?top_n=lots"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let (_, code) = error_detail_code(res).await;
    assert_eq!(code.as_deref(), Some("malformed_query"));
}

#[rstest]
#[actix_web::test]
async fn compose_options_list_recipients_and_templates() {
    let user = profile(UserRole::User);
    let recipient = UserId::random();
    let mut ports = TestPorts::new().signed_in(&user);
    ports.kudos.expect_compose_options().return_once(move |_| {
        Ok(KudoComposeOptions {
            recipients: vec![RecipientChoice {
                id: recipient,
                display_name: "Grace Hopper".to_owned(),
            }],
            templates: vec![MemeTemplate {
                id: "buzz".to_owned(),
                name: "X, X Everywhere".to_owned(),
            }],
        })
    });

    let res = send(
        ports.into_state(),
        Some(user.id),
        test::TestRequest::get().uri("/api/v1/kudos/compose"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["recipients"][0]["id"], recipient.to_string());
    assert_eq!(body["templates"][0]["id"], "buzz");
}

#[rstest]
#[actix_web::test]
async fn create_kudo_forwards_the_meme() {
    let user = profile(UserRole::User);
    let sender = user.id;
    let receiver = UserId::random();
    let mut ports = TestPorts::new().signed_in(&user);
    ports
        .kudos
        .expect_create_kudo()
        .withf(move |actor, request| {
            actor.user_id == sender
                && request.receiver_id == Some(receiver)
                && request.meme.as_ref().map(|m| m.template_id.as_str()) == Some("buzz")
        })
        .times(1)
        .return_once(move |_, request| {
            let id = KudoId::random();
            let spec = MemeSpec::new("buzz", "kudos", "kudos everywhere").expect("valid meme");
            Ok(Kudo {
                id,
                sender_id: sender,
                receiver_id: receiver,
                message: KudoMessage::new(request.message).expect("valid message"),
                meme: Some(crate::domain::Meme {
                    id: MemeId::random(),
                    kudo_id: id,
                    spec,
                    image_url: "https://api.memegen.link/images/buzz/kudos/kudos_everywhere.png"
                        .to_owned(),
                }),
                audit: AuditStamp::created(at(3), Some(sender)),
            })
        });

    let res = send(
        ports.into_state(),
        Some(user.id),
        test::TestRequest::post().uri("/api/v1/kudos").set_json(json!({
            "receiverId": receiver.to_string(),
            "message": "Great demo",
            "meme": {"templateId": "buzz", "topText": "kudos", "bottomText": "kudos everywhere"},
        })),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Great demo");
    assert_eq!(
        body["memeImageUrl"],
        "https://api.memegen.link/images/buzz/kudos/kudos_everywhere.png"
    );
}

#[rstest]
#[case(json!({"message": "hi"}))]
#[case(json!({"receiverId": "", "message": "hi"}))]
#[actix_web::test]
async fn missing_receiver_reaches_the_service_as_none(#[case] payload: Value) {
    let user = profile(UserRole::User);
    let mut ports = TestPorts::new().signed_in(&user);
    ports
        .kudos
        .expect_create_kudo()
        .withf(|_, request| request.receiver_id.is_none())
        .return_once(|_, _| {
            Err(Error::invalid_request("choose someone to thank")
                .with_details(json!({"field": "receiverId", "code": "no_selection"})))
        });

    let res = send(
        ports.into_state(),
        Some(user.id),
        test::TestRequest::post().uri("/api/v1/kudos").set_json(payload),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let (_, code) = error_detail_code(res).await;
    assert_eq!(code.as_deref(), Some("no_selection"));
}

#[rstest]
#[actix_web::test]
async fn malformed_receiver_ids_are_rejected_before_the_service() {
    let user = profile(UserRole::User);
    let res = send(
        TestPorts::new().signed_in(&user).into_state(),
        Some(user.id),
        test::TestRequest::post()
            .uri("/api/v1/kudos")
            .set_json(json!({"receiverId": "42", "message": "hi"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let (_, code) = error_detail_code(res).await;
    assert_eq!(code.as_deref(), Some("invalid_uuid"));
}
