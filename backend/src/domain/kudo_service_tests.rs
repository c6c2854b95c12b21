//! Tests for the kudo authoring service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MemeTemplateSourceError, MockKudoRepository, MockMemeTemplateSource, MockNotifier,
    MockUserRepository, NotifierError,
};
use crate::domain::{
    EmailAddress, ErrorCode, MemeTemplate, PasswordHash, PersonName, UserId, UserRole, UserStatus,
};

type TestService =
    KudoService<MockUserRepository, MockKudoRepository, MockMemeTemplateSource, MockNotifier>;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn fixed_clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(now);
    Arc::new(clock)
}

fn user(first: &str, last: &str, status: UserStatus) -> User {
    User {
        id: UserId::random(),
        department_id: None,
        email: EmailAddress::new(format!("{}@example.com", first.to_lowercase()))
            .expect("valid email"),
        password_hash: PasswordHash::new("hash"),
        first_name: PersonName::new(first, "first_name").expect("valid name"),
        last_name: PersonName::new(last, "last_name").expect("valid name"),
        role: UserRole::User,
        status,
        audit: AuditStamp::created(now(), None),
    }
}

fn actor_for(user: &User) -> Actor {
    Actor::from(&user.profile())
}

#[fixture]
fn sender() -> User {
    user("Ada", "Lovelace", UserStatus::Active)
}

#[fixture]
fn receiver() -> User {
    user("Grace", "Hopper", UserStatus::Active)
}

fn users_knowing(known: Vec<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |id| Ok(known.iter().find(|u| &u.id == id).cloned()));
    users
}

fn service(
    users: MockUserRepository,
    kudos: MockKudoRepository,
    memes: MockMemeTemplateSource,
    notifier: MockNotifier,
) -> TestService {
    KudoService::new(
        Arc::new(users),
        Arc::new(kudos),
        Arc::new(memes),
        Arc::new(notifier),
        fixed_clock(),
    )
}

fn request(receiver_id: Option<UserId>, message: &str) -> CreateKudoRequest {
    CreateKudoRequest {
        receiver_id,
        message: message.to_owned(),
        meme: None,
    }
}

#[rstest]
#[tokio::test]
async fn missing_receiver_is_a_validation_error_and_writes_nothing(sender: User) {
    let mut kudos = MockKudoRepository::new();
    kudos.expect_insert().times(0);
    let mut notifier = MockNotifier::new();
    notifier.expect_send().times(0);
    let service = service(
        users_knowing(vec![sender.clone()]),
        kudos,
        MockMemeTemplateSource::new(),
        notifier,
    );

    let error = service
        .create_kudo(&actor_for(&sender), request(None, "great job"))
        .await
        .expect_err("no receiver selected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Please select a user");
    assert_eq!(
        error.details(),
        Some(&json!({"field": "receiver_id", "code": "no_selection"}))
    );
}

#[rstest]
#[tokio::test]
async fn persists_kudo_and_notifies_receiver(sender: User, receiver: User) {
    let receiver_id = receiver.id;
    let sender_id = sender.id;
    let mut kudos = MockKudoRepository::new();
    kudos
        .expect_insert()
        .times(1)
        .withf(move |kudo| {
            kudo.sender_id == sender_id
                && kudo.receiver_id == receiver_id
                && kudo.message.as_str() == "thanks for the deploy fix"
                && kudo.audit.created_at == now()
                && kudo.meme.is_none()
        })
        .return_once(|_| Ok(()));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send()
        .times(1)
        .withf(|n| {
            n.recipient.as_str() == "grace@example.com"
                && n.subject == NEW_KUDO_SUBJECT
                && n.body.contains("Ada Lovelace")
                && n.body.contains("thanks for the deploy fix")
        })
        .return_once(|_| Ok(()));
    let service = service(
        users_knowing(vec![sender.clone(), receiver]),
        kudos,
        MockMemeTemplateSource::new(),
        notifier,
    );

    let kudo = service
        .create_kudo(
            &actor_for(&sender),
            request(Some(receiver_id), "  thanks for the deploy fix "),
        )
        .await
        .expect("kudo created");

    assert_eq!(kudo.receiver_id, receiver_id);
}

#[rstest]
#[tokio::test]
async fn attaches_meme_with_built_url(sender: User, receiver: User) {
    let receiver_id = receiver.id;
    let mut memes = MockMemeTemplateSource::new();
    memes
        .expect_build_image_url()
        .times(1)
        .returning(|spec| format!("https://memes.test/images/{}/a/b.png", spec.template_id()));
    let mut kudos = MockKudoRepository::new();
    kudos
        .expect_insert()
        .times(1)
        .withf(|kudo| {
            kudo.meme.as_ref().is_some_and(|meme| {
                meme.kudo_id == kudo.id
                    && meme.image_url == "https://memes.test/images/buzz/a/b.png"
            })
        })
        .return_once(|_| Ok(()));
    let mut notifier = MockNotifier::new();
    notifier.expect_send().return_once(|_| Ok(()));
    let service = service(
        users_knowing(vec![sender.clone(), receiver]),
        kudos,
        memes,
        notifier,
    );

    let mut req = request(Some(receiver_id), "kudos everywhere");
    req.meme = Some(MemeRequest {
        template_id: "buzz".to_owned(),
        top_text: "kudos".to_owned(),
        bottom_text: "kudos everywhere".to_owned(),
    });
    let kudo = service
        .create_kudo(&actor_for(&sender), req)
        .await
        .expect("kudo created");

    assert!(kudo.meme.is_some());
}

#[rstest]
#[tokio::test]
async fn notification_failure_does_not_fail_the_write(sender: User, receiver: User) {
    let receiver_id = receiver.id;
    let mut kudos = MockKudoRepository::new();
    kudos.expect_insert().times(1).return_once(|_| Ok(()));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send()
        .times(1)
        .return_once(|_| Err(NotifierError::delivery("smtp down")));
    let service = service(
        users_knowing(vec![sender.clone(), receiver]),
        kudos,
        MockMemeTemplateSource::new(),
        notifier,
    );

    let result = service
        .create_kudo(&actor_for(&sender), request(Some(receiver_id), "nice"))
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[case::unknown(None, "unknown_receiver")]
#[case::inactive(Some(UserStatus::Inactive), "inactive_receiver")]
#[tokio::test]
async fn rejects_unusable_receivers(
    sender: User,
    #[case] receiver_status: Option<UserStatus>,
    #[case] code: &str,
) {
    let receiver = user("Grace", "Hopper", receiver_status.unwrap_or(UserStatus::Active));
    let receiver_id = receiver.id;
    let mut known = vec![sender.clone()];
    if receiver_status.is_some() {
        known.push(receiver);
    }
    let mut kudos = MockKudoRepository::new();
    kudos.expect_insert().times(0);
    let service = service(
        users_knowing(known),
        kudos,
        MockMemeTemplateSource::new(),
        MockNotifier::new(),
    );

    let error = service
        .create_kudo(&actor_for(&sender), request(Some(receiver_id), "hello"))
        .await
        .expect_err("receiver unusable");

    assert_eq!(error.details().and_then(|d| d.get("code")), Some(&json!(code)));
}

#[rstest]
#[tokio::test]
async fn rejects_self_kudos(sender: User) {
    let service = service(
        users_knowing(vec![sender.clone()]),
        MockKudoRepository::new(),
        MockMemeTemplateSource::new(),
        MockNotifier::new(),
    );

    let error = service
        .create_kudo(&actor_for(&sender), request(Some(sender.id), "me!"))
        .await
        .expect_err("self kudo");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn rejects_blank_message(sender: User, receiver: User) {
    let receiver_id = receiver.id;
    let mut kudos = MockKudoRepository::new();
    kudos.expect_insert().times(0);
    let service = service(
        users_knowing(vec![sender.clone(), receiver]),
        kudos,
        MockMemeTemplateSource::new(),
        MockNotifier::new(),
    );

    let error = service
        .create_kudo(&actor_for(&sender), request(Some(receiver_id), "   "))
        .await
        .expect_err("blank message");

    assert_eq!(
        error.details(),
        Some(&json!({"field": "message", "code": "invalid_message"}))
    );
}

#[rstest]
#[tokio::test]
async fn compose_options_degrade_when_templates_unavailable(sender: User, receiver: User) {
    let sender_id = sender.id;
    let profile = receiver.profile();
    let mut users = MockUserRepository::new();
    users
        .expect_list_active_except()
        .withf(move |excluded| *excluded == sender_id)
        .return_once(move |_| Ok(vec![profile]));
    let mut memes = MockMemeTemplateSource::new();
    memes
        .expect_list_templates()
        .return_once(|| Err(MemeTemplateSourceError::status(503_u16)));
    let service = service(users, MockKudoRepository::new(), memes, MockNotifier::new());

    let options = service
        .compose_options(&actor_for(&sender))
        .await
        .expect("options despite meme outage");

    assert!(options.templates.is_empty());
    assert_eq!(options.recipients.len(), 1);
    assert_eq!(
        options.recipients.first().map(|r| r.display_name.as_str()),
        Some("Grace Hopper")
    );
}

#[rstest]
#[tokio::test]
async fn compose_options_include_templates(sender: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_list_active_except()
        .return_once(|_| Ok(Vec::new()));
    let mut memes = MockMemeTemplateSource::new();
    memes.expect_list_templates().return_once(|| {
        Ok(vec![MemeTemplate {
            id: "buzz".to_owned(),
            name: "X, X Everywhere".to_owned(),
        }])
    });
    let service = service(users, MockKudoRepository::new(), memes, MockNotifier::new());

    let options = service
        .compose_options(&actor_for(&sender))
        .await
        .expect("options");

    assert_eq!(options.templates.len(), 1);
}
