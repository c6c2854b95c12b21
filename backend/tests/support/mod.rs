//! Shared fixtures for the service-level integration tests.
//!
//! A [`World`] wires the real domain services over the in-memory store,
//! directory staging, a fast bcrypt hasher, a movable clock, a canned meme
//! source and a notifier that records what it was asked to send.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use kudotrio::domain::ports::{
    DepartmentRepository, MemeTemplateSource, MemeTemplateSourceError, Notification, Notifier,
    NotifierError, UserRepository,
};
use kudotrio::domain::{
    Actor, AuditStamp, Department, DepartmentId, DepartmentName, EmailAddress, MemeSpec,
    MemeTemplate, PasswordHash, PersonName, User, UserId, UserRole, UserStatus,
};
use kudotrio::inbound::http::state::HttpState;
use kudotrio::outbound::crypto::BcryptPasswordHasher;
use kudotrio::outbound::memory::InMemoryStore;
use kudotrio::outbound::staging::DirectoryImportStaging;
use kudotrio::server::{Adapters, Stores, build_http_state};
use mockable::Clock;
use tempfile::TempDir;

pub fn start_of_test() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("valid timestamp"))
}

/// Clock the test can move forwards and backwards.
pub struct MovableClock(Mutex<DateTime<Utc>>);

impl MovableClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Mutex::new(at))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.lock_clock() = at;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MovableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[derive(Default)]
pub struct CapturingNotifier(Mutex<Vec<Notification>>);

impl CapturingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("notifier mutex"),
        }
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
        match self.0.lock() {
            Ok(mut guard) => guard.push(notification.clone()),
            Err(_) => panic!("notifier mutex"),
        }
        Ok(())
    }
}

pub struct CannedMemes;

#[async_trait]
impl MemeTemplateSource for CannedMemes {
    async fn list_templates(&self) -> Result<Vec<MemeTemplate>, MemeTemplateSourceError> {
        Ok(vec![MemeTemplate {
            id: "buzz".to_owned(),
            name: "X, X Everywhere".to_owned(),
        }])
    }

    fn build_image_url(&self, spec: &MemeSpec) -> String {
        format!("https://memes.test/{}.png", spec.template_id())
    }
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MovableClock>,
    pub notifier: Arc<CapturingNotifier>,
    pub state: HttpState,
    _staging_dir: TempDir,
}

impl World {
    pub fn new() -> Self {
        let staging_dir = tempfile::tempdir().unwrap_or_else(|e| panic!("staging dir: {e}"));
        let staging = DirectoryImportStaging::open(staging_dir.path(), 64 * 1024)
            .unwrap_or_else(|e| panic!("open staging: {e}"));
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MovableClock::new(start_of_test()));
        let notifier = Arc::new(CapturingNotifier::default());
        let state = build_http_state(
            Stores::in_memory(store.clone()),
            Adapters {
                staging: Arc::new(staging),
                hasher: Arc::new(BcryptPasswordHasher::with_cost(4)),
                memes: Arc::new(CannedMemes),
                notifier: notifier.clone(),
                clock: clock.clone(),
            },
        );
        Self {
            store,
            clock,
            notifier,
            state,
            _staging_dir: staging_dir,
        }
    }

    pub async fn seed_department(&self, name: &str) -> Department {
        let department = Department {
            id: DepartmentId::random(),
            name: DepartmentName::new(name).unwrap_or_else(|e| panic!("department name: {e}")),
            audit: AuditStamp::created(start_of_test(), None),
        };
        DepartmentRepository::insert(self.store.as_ref(), &department)
            .await
            .unwrap_or_else(|e| panic!("insert department: {e}"));
        department
    }

    pub async fn seed_user(
        &self,
        first: &str,
        last: &str,
        role: UserRole,
        department: Option<&Department>,
    ) -> User {
        let user = User {
            id: UserId::random(),
            department_id: department.map(|d| d.id),
            email: EmailAddress::new(format!("{}@example.com", first.to_lowercase()))
                .unwrap_or_else(|e| panic!("email: {e}")),
            password_hash: PasswordHash::new("$2b$04$unused"),
            first_name: PersonName::new(first, "first_name").unwrap_or_else(|e| panic!("{e}")),
            last_name: PersonName::new(last, "last_name").unwrap_or_else(|e| panic!("{e}")),
            role,
            status: UserStatus::Active,
            audit: AuditStamp::created(start_of_test(), None),
        };
        UserRepository::insert(self.store.as_ref(), &user)
            .await
            .unwrap_or_else(|e| panic!("insert user: {e}"));
        user
    }
}

pub fn actor(user: &User) -> Actor {
    Actor::from(&user.profile())
}

/// Pull the temporary password out of an account-created notification.
pub fn temporary_password(notification: &Notification) -> String {
    notification
        .body
        .lines()
        .find_map(|line| line.strip_prefix("Temporary password: "))
        .map(str::to_owned)
        .unwrap_or_else(|| panic!("notification carries a temporary password"))
}
