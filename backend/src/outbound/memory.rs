//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by integration tests. The
//! store enforces the same uniqueness rules as the PostgreSQL indexes and
//! applies batch inserts all-or-nothing.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{
    DepartmentRepository, DepartmentRepositoryError, KudoReportRepository,
    KudoReportRepositoryError, KudoRepository, KudoRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    ActivityFeedEntry, Department, DepartmentId, DepartmentSummary, EmailAddress, FeedParty, Kudo,
    LeaderboardEntry, MonthlyKudoCount, User, UserId, UserListing, UserProfile, month_label,
};

#[derive(Default)]
struct State {
    departments: Vec<Department>,
    users: Vec<User>,
    kudos: Vec<Kudo>,
}

impl State {
    fn department_name(&self, id: Option<DepartmentId>) -> Option<String> {
        let id = id?;
        self.departments
            .iter()
            .find(|department| department.id == id)
            .map(|department| department.name.as_str().to_owned())
    }

    fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    fn party(&self, id: &UserId) -> Option<FeedParty> {
        let user = self.user(id)?;
        Some(FeedParty {
            user_id: user.id,
            display_name: user.profile().display_name(),
            department_name: self.department_name(user.department_id),
        })
    }

    fn email_taken(&self, email: &EmailAddress) -> bool {
        self.users.iter().any(|user| &user.email == email)
    }

    fn name_taken(&self, candidate: &Department) -> bool {
        self.departments
            .iter()
            .any(|existing| {
                existing.id != candidate.id && existing.name.same_name_as(&candidate.name)
            })
    }

    fn leaderboard<F>(&self, since: DateTime<Utc>, limit: u32, pick: F) -> Vec<LeaderboardEntry>
    where
        F: Fn(&Kudo) -> UserId,
    {
        let mut counts: HashMap<UserId, u64> = HashMap::new();
        for kudo in self.kudos.iter().filter(|k| k.audit.created_at >= since) {
            *counts.entry(pick(kudo)).or_default() += 1;
        }
        let mut ranked: Vec<(UserId, u64)> = counts.into_iter().collect();
        ranked.sort_by_key(|(id, count)| (Reverse(*count), *id));
        ranked
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .filter_map(|(id, kudo_count)| {
                let party = self.party(&id)?;
                Some(LeaderboardEntry {
                    user_id: party.user_id,
                    display_name: party.display_name,
                    department_name: party.department_name,
                    kudo_count,
                })
            })
            .collect()
    }
}

fn by_name(a: &UserProfile, b: &UserProfile) -> std::cmp::Ordering {
    (a.last_name.as_str(), a.first_name.as_str(), a.id)
        .cmp(&(b.last_name.as_str(), b.first_name.as_str(), b.id))
}

/// Shared in-memory store. Wrap it in an `Arc` and hand the same instance
/// to every service.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.state.read().await.user(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|user| &user.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.state.write().await;
        if state.email_taken(&user.email) {
            return Err(UserRepositoryError::duplicate_email(user.email.as_str()));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn insert_batch(&self, users: &[User]) -> Result<(), UserRepositoryError> {
        let mut state = self.state.write().await;
        for (index, user) in users.iter().enumerate() {
            let repeated = users
                .iter()
                .take(index)
                .any(|earlier| earlier.email == user.email);
            if repeated || state.email_taken(&user.email) {
                return Err(UserRepositoryError::duplicate_email(user.email.as_str()));
            }
        }
        state.users.extend_from_slice(users);
        Ok(())
    }

    async fn list_with_departments(&self) -> Result<Vec<UserListing>, UserRepositoryError> {
        let state = self.state.read().await;
        let mut profiles: Vec<UserProfile> = state.users.iter().map(User::profile).collect();
        profiles.sort_by(by_name);
        Ok(profiles
            .into_iter()
            .map(|profile| UserListing {
                department_name: state.department_name(profile.department_id),
                profile,
            })
            .collect())
    }

    async fn list_active_except(
        &self,
        excluded: &UserId,
    ) -> Result<Vec<UserProfile>, UserRepositoryError> {
        let state = self.state.read().await;
        let mut profiles: Vec<UserProfile> = state
            .users
            .iter()
            .filter(|user| user.is_active() && &user.id != excluded)
            .map(User::profile)
            .collect();
        profiles.sort_by(by_name);
        Ok(profiles)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut departments = self.state.read().await.departments.clone();
        departments.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
        Ok(departments)
    }

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let state = self.state.read().await;
        Ok(state.departments.iter().find(|d| &d.id == id).cloned())
    }

    async fn find_by_exact_name(
        &self,
        name: &str,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .departments
            .iter()
            .find(|d| d.name.as_str() == name)
            .cloned())
    }

    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut state = self.state.write().await;
        if state.name_taken(department) {
            return Err(DepartmentRepositoryError::duplicate_name(
                department.name.as_str(),
            ));
        }
        state.departments.push(department.clone());
        Ok(())
    }

    async fn update(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut state = self.state.write().await;
        if state.name_taken(department) {
            return Err(DepartmentRepositoryError::duplicate_name(
                department.name.as_str(),
            ));
        }
        let slot = state
            .departments
            .iter_mut()
            .find(|d| d.id == department.id)
            .ok_or_else(|| DepartmentRepositoryError::not_found(department.id.to_string()))?;
        *slot = department.clone();
        Ok(())
    }

    async fn list_with_user_counts(
        &self,
    ) -> Result<Vec<DepartmentSummary>, DepartmentRepositoryError> {
        let departments = DepartmentRepository::list(self).await?;
        let state = self.state.read().await;
        Ok(departments
            .into_iter()
            .map(|department| {
                let members = state
                    .users
                    .iter()
                    .filter(|user| user.department_id == Some(department.id))
                    .count();
                DepartmentSummary {
                    department,
                    user_count: u64::try_from(members).unwrap_or(u64::MAX),
                }
            })
            .collect())
    }

    async fn members(
        &self,
        id: &DepartmentId,
    ) -> Result<Vec<UserProfile>, DepartmentRepositoryError> {
        let state = self.state.read().await;
        let mut members: Vec<UserProfile> = state
            .users
            .iter()
            .filter(|user| user.department_id.as_ref() == Some(id))
            .map(User::profile)
            .collect();
        members.sort_by(by_name);
        Ok(members)
    }
}

#[async_trait]
impl KudoRepository for InMemoryStore {
    async fn insert(&self, kudo: &Kudo) -> Result<(), KudoRepositoryError> {
        let mut state = self.state.write().await;
        for party in [&kudo.sender_id, &kudo.receiver_id] {
            if state.user(party).is_none() {
                return Err(KudoRepositoryError::query(format!(
                    "kudo references unknown user {party}"
                )));
            }
        }
        state.kudos.push(kudo.clone());
        Ok(())
    }
}

#[async_trait]
impl KudoReportRepository for InMemoryStore {
    async fn monthly_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyKudoCount>, KudoReportRepositoryError> {
        let state = self.state.read().await;
        let mut buckets: Vec<MonthlyKudoCount> = Vec::new();
        let mut labels: Vec<String> = state
            .kudos
            .iter()
            .filter(|kudo| kudo.audit.created_at >= since)
            .map(|kudo| month_label(kudo.audit.created_at))
            .collect();
        labels.sort();
        for label in labels {
            match buckets.last_mut() {
                Some(bucket) if bucket.month == label => bucket.count += 1,
                _ => buckets.push(MonthlyKudoCount {
                    month: label,
                    count: 1,
                }),
            }
        }
        Ok(buckets)
    }

    async fn top_receivers(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError> {
        let state = self.state.read().await;
        Ok(state.leaderboard(since, limit, |kudo| kudo.receiver_id))
    }

    async fn top_creators(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError> {
        let state = self.state.read().await;
        Ok(state.leaderboard(since, limit, |kudo| kudo.sender_id))
    }

    async fn recent_activity(
        &self,
        limit: u32,
    ) -> Result<Vec<ActivityFeedEntry>, KudoReportRepositoryError> {
        let state = self.state.read().await;
        let mut kudos: Vec<&Kudo> = state.kudos.iter().collect();
        kudos.sort_by_key(|kudo| Reverse((kudo.audit.created_at, kudo.id)));
        Ok(kudos
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .filter_map(|kudo| {
                Some(ActivityFeedEntry {
                    kudo_id: kudo.id,
                    created_at: kudo.audit.created_at,
                    message: kudo.message.as_str().to_owned(),
                    sender: state.party(&kudo.sender_id)?,
                    receiver: state.party(&kudo.receiver_id)?,
                    meme_image_url: kudo.meme.as_ref().map(|meme| meme.image_url.clone()),
                })
            })
            .collect())
    }
}
