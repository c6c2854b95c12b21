//! Builders that turn settings into the port bundle handed to handlers.
//!
//! With a `database_url` the Diesel repositories back every store port and
//! pending migrations run first. Without one, a single in-memory store plays
//! all four roles.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::ports::{
    DepartmentRepository, ImportStaging, KudoReportRepository, KudoRepository,
    MemeTemplateSource, Notification, Notifier, NotifierError, PasswordHasher, UserRepository,
};
use crate::domain::{
    DashboardService, DepartmentService, KudoService, UserAccountService, UserImportService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::crypto::BcryptPasswordHasher;
use crate::outbound::memegen::MemegenHttpSource;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::notifications::{OutboxNotifier, TracingNotifier};
use crate::outbound::persistence::{
    DbPool, DieselDepartmentRepository, DieselKudoReportRepository, DieselKudoRepository,
    DieselUserRepository, PoolConfig, run_pending_migrations,
};
use crate::outbound::staging::DirectoryImportStaging;
use crate::settings::Settings;

use super::StartupError;

/// Repository ports.
pub struct Stores<U, D, K, R> {
    pub users: Arc<U>,
    pub departments: Arc<D>,
    pub kudos: Arc<K>,
    pub reports: Arc<R>,
}

impl Stores<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    /// One in-memory store behind every repository port.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            departments: store.clone(),
            kudos: store.clone(),
            reports: store,
        }
    }
}

impl
    Stores<
        DieselUserRepository,
        DieselDepartmentRepository,
        DieselKudoRepository,
        DieselKudoReportRepository,
    >
{
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            departments: Arc::new(DieselDepartmentRepository::new(pool.clone())),
            kudos: Arc::new(DieselKudoRepository::new(pool.clone())),
            reports: Arc::new(DieselKudoReportRepository::new(pool.clone())),
        }
    }
}

/// Non-repository driven ports.
pub struct Adapters<S, H, M, N> {
    pub staging: Arc<S>,
    pub hasher: Arc<H>,
    pub memes: Arc<M>,
    pub notifier: Arc<N>,
    pub clock: Arc<dyn Clock>,
}

/// Assemble the domain services over the given ports.
pub fn build_http_state<U, D, K, R, S, H, M, N>(
    stores: Stores<U, D, K, R>,
    adapters: Adapters<S, H, M, N>,
) -> HttpState
where
    U: UserRepository + 'static,
    D: DepartmentRepository + 'static,
    K: KudoRepository + 'static,
    R: KudoReportRepository + 'static,
    S: ImportStaging + 'static,
    H: PasswordHasher + 'static,
    M: MemeTemplateSource + 'static,
    N: Notifier + 'static,
{
    let Stores {
        users,
        departments,
        kudos,
        reports,
    } = stores;
    let Adapters {
        staging,
        hasher,
        memes,
        notifier,
        clock,
    } = adapters;

    HttpState {
        accounts: Arc::new(UserAccountService::new(
            users.clone(),
            departments.clone(),
            hasher.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        dashboard: Arc::new(DashboardService::new(reports, clock.clone())),
        kudos: Arc::new(KudoService::new(
            users.clone(),
            kudos,
            memes,
            notifier.clone(),
            clock.clone(),
        )),
        departments: Arc::new(DepartmentService::new(departments.clone(), clock.clone())),
        imports: Arc::new(UserImportService::new(
            staging,
            users,
            departments,
            hasher,
            notifier,
            clock,
        )),
    }
}

/// Notification channel picked by configuration.
pub enum ConfiguredNotifier {
    Log(TracingNotifier),
    Outbox(OutboxNotifier),
}

#[async_trait]
impl Notifier for ConfiguredNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
        match self {
            Self::Log(notifier) => notifier.send(notification).await,
            Self::Outbox(notifier) => notifier.send(notification).await,
        }
    }
}

fn configured_adapters(
    settings: &Settings,
) -> Result<
    Adapters<DirectoryImportStaging, BcryptPasswordHasher, MemegenHttpSource, ConfiguredNotifier>,
    StartupError,
> {
    let staging =
        DirectoryImportStaging::open(&settings.import_staging_dir(), settings.import_max_bytes())?;
    let hasher = settings
        .bcrypt_cost
        .map_or_else(BcryptPasswordHasher::default, BcryptPasswordHasher::with_cost);
    let memes = MemegenHttpSource::new(settings.memegen_base_url()?, settings.memegen_timeout())?;
    let notifier = match &settings.notification_outbox_dir {
        Some(dir) => {
            info!(path = %dir.display(), "notifications written to outbox");
            ConfiguredNotifier::Outbox(OutboxNotifier::open(dir)?)
        }
        None => ConfiguredNotifier::Log(TracingNotifier),
    };
    Ok(Adapters {
        staging: Arc::new(staging),
        hasher: Arc::new(hasher),
        memes: Arc::new(memes),
        notifier: Arc::new(notifier),
        clock: Arc::new(DefaultClock),
    })
}

/// Open the configured database pool after applying pending migrations.
pub async fn connect_database(settings: &Settings, url: &str) -> Result<DbPool, StartupError> {
    run_pending_migrations(url).await?;
    let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
    Ok(DbPool::new(config).await?)
}

/// Build the full port bundle described by `settings`.
pub async fn http_state_from_settings(settings: &Settings) -> Result<HttpState, StartupError> {
    let adapters = configured_adapters(settings)?;
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = connect_database(settings, url).await?;
            info!("using PostgreSQL store");
            Ok(build_http_state(Stores::diesel(&pool), adapters))
        }
        None => {
            warn!("no database_url configured; data lives in memory and is lost on exit");
            Ok(build_http_state(
                Stores::in_memory(Arc::new(InMemoryStore::new())),
                adapters,
            ))
        }
    }
}
