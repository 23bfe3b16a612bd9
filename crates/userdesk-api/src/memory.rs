//! In-memory [`UserApi`] backend.
//!
//! Behaves like the remote service the console talks to: it validates
//! payloads, hashes passwords, checks bearer tokens on the calls that carry
//! one, and refuses to delete assigned users. State can be persisted to a
//! JSON snapshot so the offline CLI keeps data between runs.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use userdesk_auth::{AuthToken, verify_token};
use userdesk_config::JwtConfig;
use userdesk_core::errors::FieldErrors;
use userdesk_core::password::{DEFAULT_HASH_COST, hash_password_with_cost, verify_password};
use userdesk_core::{ConsoleError, PaginationMeta, PaginationParams};
use userdesk_models::{
    AssignAcademicCoordinatorRequest, AssignCenterAdminRequest, AssignFinancialPartnerRequest,
    AssignManagerRequest, AssignStateAdminRequest, AssignTeacherRequest, CenterId,
    CreateUserDto, EditUserDto, LookupEntry, LookupKind, Role, StateId, UserFilterParams, UserId,
    UserRecord,
};

use crate::client::{ApiError, ApiResponse, ApiResult, UserApi};

/// A user row together with its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub record: UserRecord,
    pub password_hash: String,
}

/// A named state or center that can receive an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place<I> {
    pub id: I,
    pub name: String,
}

/// Everything the backend holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<StoredUser>,
    #[serde(default)]
    pub states: Vec<Place<StateId>>,
    #[serde(default)]
    pub centers: Vec<Place<CenterId>>,
}

impl Snapshot {
    fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.iter().map(|u| &u.record).find(|u| u.id == id)
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut UserRecord, ApiError> {
        self.users
            .iter_mut()
            .map(|u| &mut u.record)
            .find(|u| u.id == id)
            .ok_or_else(|| ApiError::new(format!("User with id {} not found", id)))
    }

    fn state_taken(&self, id: StateId) -> bool {
        self.users
            .iter()
            .any(|u| u.record.role == Role::State && u.record.state_id == Some(id))
    }

    fn center_taken(&self, id: CenterId) -> bool {
        self.users
            .iter()
            .any(|u| u.record.role == Role::Center && u.record.center_id == Some(id))
    }

    fn require_role(&self, id: UserId, role: Role) -> Result<&UserRecord, ApiError> {
        let user = self
            .user(id)
            .ok_or_else(|| ApiError::new(format!("User with id {} not found", id)))?;
        if user.role != role {
            return Err(ApiError::new(format!(
                "{} is not a {}",
                user.display_name(),
                role.label()
            )));
        }
        Ok(user)
    }
}

/// Fails assignment targets that are missing, of another role, or already
/// assigned.
fn assignable<'a>(
    snapshot: &'a mut Snapshot,
    id: UserId,
    role: Role,
) -> Result<&'a mut UserRecord, ApiError> {
    let user = snapshot.user_mut(id)?;
    if user.role != role {
        return Err(ApiError::new(format!(
            "{} is not a {}",
            user.display_name(),
            role.label()
        )));
    }
    if user.status {
        return Err(ApiError::new(format!(
            "{} is already assigned",
            user.display_name()
        )));
    }
    Ok(user)
}

fn matches_search(user: &UserRecord, search: Option<&str>) -> bool {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        None => true,
        Some(term) => user
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&term.to_lowercase())),
    }
}

/// In-memory user management backend.
#[derive(Debug)]
pub struct MemoryApi {
    store: Mutex<Snapshot>,
    jwt_config: JwtConfig,
    hash_cost: u32,
    latency: Option<Duration>,
    max_page_size: Option<i64>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryApi {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self::from_snapshot(Snapshot::default(), jwt_config)
    }

    pub fn from_snapshot(snapshot: Snapshot, jwt_config: JwtConfig) -> Self {
        Self {
            store: Mutex::new(snapshot),
            jwt_config,
            hash_cost: DEFAULT_HASH_COST,
            latency: None,
            max_page_size: None,
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Lower bcrypt cost, for tests and seeding.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Delays every call by `latency` before it is handled.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Caps every list response at `size` rows, including whole-list
    /// requests, the way servers with a hard response limit behave.
    pub fn with_max_page_size(mut self, size: i64) -> Self {
        self.max_page_size = Some(size.max(1));
        self
    }

    /// Loads a snapshot file, starting empty when the file does not exist.
    pub fn load(path: &Path, jwt_config: JwtConfig) -> Result<Self, ConsoleError> {
        if !path.exists() {
            debug!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(Self::new(jwt_config));
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed snapshot in {}", path.display()))?;
        info!(
            path = %path.display(),
            users = snapshot.users.len(),
            "Snapshot loaded"
        );
        Ok(Self::from_snapshot(snapshot, jwt_config))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConsoleError> {
        let snapshot = self.snapshot()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Snapshot saved");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Snapshot, ConsoleError> {
        Ok(self.lock()?.clone())
    }

    /// Inserts a user directly, bypassing validation.
    pub fn insert_user(&self, record: UserRecord, password: &str) -> Result<UserId, ConsoleError> {
        let password_hash = hash_password_with_cost(password, self.hash_cost)?;
        self.insert_hashed(record, password_hash)
    }

    /// Inserts a user whose password is already hashed.
    pub fn insert_hashed(
        &self,
        record: UserRecord,
        password_hash: String,
    ) -> Result<UserId, ConsoleError> {
        let id = record.id;
        self.lock()?.users.push(StoredUser {
            record,
            password_hash,
        });
        Ok(id)
    }

    pub fn add_state(&self, name: impl Into<String>) -> Result<StateId, ConsoleError> {
        let id = StateId::new();
        self.lock()?.states.push(Place {
            id,
            name: name.into(),
        });
        Ok(id)
    }

    pub fn add_center(&self, name: impl Into<String>) -> Result<CenterId, ConsoleError> {
        let id = CenterId::new();
        self.lock()?.centers.push(Place {
            id,
            name: name.into(),
        });
        Ok(id)
    }

    /// Checks a name and password pair and returns the matching user.
    pub fn authenticate(&self, name: &str, password: &str) -> Result<UserRecord, ConsoleError> {
        let stored = self
            .lock()?
            .users
            .iter()
            .find(|u| u.record.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| ConsoleError::unauthenticated("Invalid name or password"))?;
        if !verify_password(password, &stored.password_hash)? {
            return Err(ConsoleError::unauthenticated("Invalid name or password"));
        }
        Ok(stored.record)
    }

    pub fn user(&self, id: UserId) -> Option<UserRecord> {
        self.lock().ok().and_then(|s| s.user(id).cloned())
    }

    /// Makes the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.into());
        }
    }

    /// Names of the calls received so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls received with the given name.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::new("Backend state is unavailable"))
    }

    async fn begin(&self, call: &'static str) -> Result<(), ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self.failure.lock().ok().and_then(|mut f| f.take());
        match injected {
            Some(message) => {
                warn!(call, %message, "Injected failure");
                Err(ApiError::new(message))
            }
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &AuthToken) -> Result<(), ApiError> {
        verify_token(token.as_str(), &self.jwt_config)
            .map(|_| ())
            .map_err(|_| ApiError::new("Unauthorized: invalid or expired token"))
    }
}

#[async_trait]
impl UserApi for MemoryApi {
    async fn fetch_users(
        &self,
        page: i64,
        page_size: i64,
        filters: &UserFilterParams,
    ) -> ApiResult<Vec<UserRecord>> {
        self.begin("fetch_users").await?;
        let store = self.lock()?;

        let matching: Vec<UserRecord> = store
            .users
            .iter()
            .map(|u| &u.record)
            .filter(|u| filters.role.is_none_or(|role| u.role == role))
            .filter(|u| matches_search(u, filters.search.as_deref()))
            .cloned()
            .collect();

        let size = filters.limit.unwrap_or(page_size);
        let (data, meta) = match (filters.pagination, self.max_page_size) {
            (Some(false), None) => {
                let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
                let meta = PaginationMeta {
                    total,
                    page: 1,
                    page_size: total,
                    has_more: false,
                };
                (matching, meta)
            }
            (Some(false), Some(cap)) => PaginationParams::new(1, cap).apply(&matching),
            (_, cap) => {
                PaginationParams::new(page, cap.map_or(size, |cap| size.min(cap))).apply(&matching)
            }
        };

        debug!(
            total = meta.total,
            returned = data.len(),
            role = ?filters.role,
            "Users fetched"
        );
        Ok(ApiResponse::ok(data).with_meta(meta))
    }

    async fn create_user(&self, user: &CreateUserDto) -> ApiResult<UserRecord> {
        self.begin("create_user").await?;
        user.validate()
            .map_err(|e| ApiError::new(FieldErrors::from(&e).to_string()))?;

        let password_hash = hash_password_with_cost(&user.password, self.hash_cost)
            .map_err(|e| ApiError::new(e.to_string()))?;
        let mut record = UserRecord::new(user.name.trim(), user.role);
        record.full_name = Some(user.full_name.trim().to_string());

        let mut store = self.lock()?;
        if store
            .users
            .iter()
            .any(|u| u.record.name.as_deref() == record.name.as_deref())
        {
            return Err(ApiError::new(format!(
                "A user named {} already exists",
                record.display_name()
            )));
        }
        store.users.push(StoredUser {
            record: record.clone(),
            password_hash,
        });

        info!(user_id = %record.id, role = %record.role, "User created");
        Ok(ApiResponse::ok(record))
    }

    async fn edit_user(
        &self,
        user_id: UserId,
        changes: &EditUserDto,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("edit_user").await?;
        self.authorize(token)?;
        changes
            .validate()
            .map_err(|e| ApiError::new(FieldErrors::from(&e).to_string()))?;

        let password_hash = changes
            .password
            .as_deref()
            .map(|p| hash_password_with_cost(p, self.hash_cost))
            .transpose()
            .map_err(|e| ApiError::new(e.to_string()))?;

        let mut store = self.lock()?;
        let stored = store
            .users
            .iter_mut()
            .find(|u| u.record.id == user_id)
            .ok_or_else(|| ApiError::new(format!("User with id {} not found", user_id)))?;
        if let Some(name) = &changes.name {
            stored.record.name = Some(name.trim().to_string());
        }
        if let Some(full_name) = &changes.full_name {
            stored.record.full_name = Some(full_name.trim().to_string());
        }
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }

        info!(%user_id, "User updated");
        Ok(ApiResponse::ok(stored.record.clone()))
    }

    async fn delete_user(&self, user_id: UserId) -> ApiResult<()> {
        self.begin("delete_user").await?;
        let mut store = self.lock()?;
        let position = store
            .users
            .iter()
            .position(|u| u.record.id == user_id)
            .ok_or_else(|| ApiError::new(format!("User with id {} not found", user_id)))?;
        if store.users[position].record.status {
            return Err(ApiError::new("Assigned users cannot be deleted"));
        }
        store.users.remove(position);

        info!(%user_id, "User deleted");
        Ok(ApiResponse::ok(()))
    }

    async fn assign_teacher(
        &self,
        request: &AssignTeacherRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_teacher").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        if !store.centers.iter().any(|c| c.id == request.center_id) {
            return Err(ApiError::new("Center not found"));
        }
        let user = assignable(&mut store, request.user_id, Role::Teacher)?;
        user.center_id = Some(request.center_id);
        user.status = true;

        info!(user_id = %request.user_id, center_id = %request.center_id, "Teacher assigned");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn assign_academic_coordinator(
        &self,
        request: &AssignAcademicCoordinatorRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_academic_coordinator").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        store.require_role(request.manager_id, Role::Manager)?;
        let user = assignable(&mut store, request.user_id, Role::Academic)?;
        user.manager_id = Some(request.manager_id);
        user.status = true;

        info!(user_id = %request.user_id, manager_id = %request.manager_id, "Academic coordinator assigned");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn assign_manager(
        &self,
        request: &AssignManagerRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_manager").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        let user = assignable(&mut store, request.user_id, Role::Manager)?;
        user.status = true;

        info!(user_id = %request.user_id, "Manager activated");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn assign_financial_partner(
        &self,
        request: &AssignFinancialPartnerRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_financial_partner").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        store.require_role(request.manager_id, Role::Manager)?;
        let user = assignable(&mut store, request.user_id, Role::Financial)?;
        user.manager_id = Some(request.manager_id);
        user.status = true;

        info!(user_id = %request.user_id, manager_id = %request.manager_id, "Financial partner assigned");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn assign_state_admin(
        &self,
        request: &AssignStateAdminRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_state_admin").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        if !store.states.iter().any(|s| s.id == request.state_id) {
            return Err(ApiError::new("State not found"));
        }
        if store.state_taken(request.state_id) {
            return Err(ApiError::new("State already has an admin"));
        }
        if let Some(coordinator) = request.academic_coordinator_id {
            store.require_role(coordinator, Role::Academic)?;
        }
        let user = assignable(&mut store, request.user_id, Role::State)?;
        user.state_id = Some(request.state_id);
        user.academic_coordinator_id = request.academic_coordinator_id;
        user.status = true;

        info!(user_id = %request.user_id, state_id = %request.state_id, "State admin assigned");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn assign_center_admin(
        &self,
        request: &AssignCenterAdminRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord> {
        self.begin("assign_center_admin").await?;
        self.authorize(token)?;
        let mut store = self.lock()?;
        if !store.centers.iter().any(|c| c.id == request.center_id) {
            return Err(ApiError::new("Center not found"));
        }
        if store.center_taken(request.center_id) {
            return Err(ApiError::new("Center already has an admin"));
        }
        let user = assignable(&mut store, request.user_id, Role::Center)?;
        user.center_id = Some(request.center_id);
        user.status = true;

        info!(user_id = %request.user_id, center_id = %request.center_id, "Center admin assigned");
        Ok(ApiResponse::ok(user.clone()))
    }

    async fn lookup(&self, kind: LookupKind) -> ApiResult<Vec<LookupEntry>> {
        self.begin("lookup").await?;
        let store = self.lock()?;
        let users_with_role = |role: Role| -> Vec<LookupEntry> {
            store
                .users
                .iter()
                .map(|u| &u.record)
                .filter(|u| u.role == role)
                .map(|u| LookupEntry::new(u.id, u.display_name(), u.status))
                .collect()
        };

        let entries = match kind {
            LookupKind::Managers => users_with_role(Role::Manager),
            LookupKind::AcademicCoordinators => users_with_role(Role::Academic),
            LookupKind::States => store
                .states
                .iter()
                .map(|s| LookupEntry::new(s.id, s.name.clone(), store.state_taken(s.id)))
                .collect(),
            LookupKind::Centers => store
                .centers
                .iter()
                .map(|c| LookupEntry::new(c.id, c.name.clone(), store.center_taken(c.id)))
                .collect(),
        };

        debug!(%kind, count = entries.len(), "Lookup served");
        Ok(ApiResponse::ok(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_auth::create_access_token;
    use uuid::Uuid;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn api() -> MemoryApi {
        MemoryApi::new(jwt_config()).with_hash_cost(4)
    }

    fn token() -> AuthToken {
        create_access_token(UserId::new(), "root", Role::Admin, &jwt_config()).unwrap()
    }

    fn create_dto(name: &str, role: Role) -> CreateUserDto {
        CreateUserDto {
            name: name.to_string(),
            full_name: format!("{} Example", name),
            password: "Secur3!pass".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_user_starts_unassigned() {
        let api = api();
        let user = api
            .create_user(&create_dto("ana", Role::Manager))
            .await
            .unwrap()
            .into_data()
            .unwrap();

        assert!(!user.status);
        assert_eq!(user.role, Role::Manager);
        let stored = api.snapshot().unwrap();
        assert_ne!(stored.users[0].password_hash, "Secur3!pass");
    }

    #[tokio::test]
    async fn test_create_user_rejects_weak_password() {
        let api = api();
        let mut dto = create_dto("ana", Role::Manager);
        dto.password = "short".to_string();
        let err = api.create_user(&dto).await.unwrap_err();
        assert!(err.message.contains("password"));
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_name() {
        let api = api();
        api.create_user(&create_dto("ana", Role::Manager)).await.unwrap();
        let err = api
            .create_user(&create_dto("ana", Role::Teacher))
            .await
            .unwrap_err();
        assert!(err.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_fetch_users_filters_and_pages() {
        let api = api();
        for i in 0..5 {
            api.insert_user(UserRecord::new(format!("teacher{}", i), Role::Teacher), "x")
                .unwrap();
        }
        api.insert_user(UserRecord::new("boss", Role::Manager), "x")
            .unwrap();

        let filters = UserFilterParams {
            role: Some(Role::Teacher),
            ..Default::default()
        };
        let response = api.fetch_users(1, 2, &filters).await.unwrap();
        let meta = response.meta.clone().unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(meta.total, 5);
        assert!(meta.has_more);

        let all = UserFilterParams {
            pagination: Some(false),
            limit: Some(100),
            search: Some("BOSS".to_string()),
            ..Default::default()
        };
        let response = api.fetch_users(3, 2, &all).await.unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].display_name(), "boss");
    }

    #[tokio::test]
    async fn test_whole_list_request_ignores_limit() {
        let api = api();
        for i in 0..5 {
            api.insert_user(UserRecord::new(format!("teacher{}", i), Role::Teacher), "x")
                .unwrap();
        }

        let whole = UserFilterParams {
            pagination: Some(false),
            limit: Some(2),
            ..Default::default()
        };
        let response = api.fetch_users(1, 2, &whole).await.unwrap();
        assert_eq!(response.data.len(), 5);
        assert!(!response.meta.unwrap().has_more);
    }

    #[tokio::test]
    async fn test_max_page_size_caps_whole_list_request() {
        let api = api().with_max_page_size(2);
        for i in 0..5 {
            api.insert_user(UserRecord::new(format!("teacher{}", i), Role::Teacher), "x")
                .unwrap();
        }

        let whole = UserFilterParams {
            pagination: Some(false),
            ..Default::default()
        };
        let response = api.fetch_users(1, 100, &whole).await.unwrap();
        assert_eq!(response.data.len(), 2);
        let meta = response.meta.unwrap();
        assert_eq!(meta.total, 5);
        assert!(meta.has_more);
    }

    #[tokio::test]
    async fn test_delete_refuses_assigned_user() {
        let api = api();
        let mut record = UserRecord::new("done", Role::Manager);
        record.status = true;
        let id = api.insert_user(record, "x").unwrap();

        let err = api.delete_user(id).await.unwrap_err();
        assert_eq!(err.message, "Assigned users cannot be deleted");
        assert!(api.user(id).is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let err = api().delete_user(UserId::new()).await.unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_assign_requires_valid_token() {
        let api = api();
        let id = api
            .insert_user(UserRecord::new("m", Role::Manager), "x")
            .unwrap();
        let err = api
            .assign_manager(&AssignManagerRequest { user_id: id }, &AuthToken::new("bogus"))
            .await
            .unwrap_err();
        assert!(err.message.starts_with("Unauthorized"));
        assert!(!api.user(id).unwrap().status);
    }

    #[tokio::test]
    async fn test_assign_center_admin_claims_slot() {
        let api = api();
        let center = api.add_center("North").unwrap();
        let first = api
            .insert_user(UserRecord::new("c1", Role::Center), "x")
            .unwrap();
        let second = api
            .insert_user(UserRecord::new("c2", Role::Center), "x")
            .unwrap();

        let request = AssignCenterAdminRequest {
            center_id: center,
            user_id: first,
        };
        let user = api
            .assign_center_admin(&request, &token())
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert!(user.status);
        assert_eq!(user.center_id, Some(center));

        let centers = api.lookup(LookupKind::Centers).await.unwrap().data;
        assert!(centers[0].assigned);

        let err = api
            .assign_center_admin(
                &AssignCenterAdminRequest {
                    center_id: center,
                    user_id: second,
                },
                &token(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.message, "Center already has an admin");
    }

    #[tokio::test]
    async fn test_assign_state_admin_checks_coordinator_role() {
        let api = api();
        let state = api.add_state("Lagos").unwrap();
        let target = api
            .insert_user(UserRecord::new("s1", Role::State), "x")
            .unwrap();
        let not_academic = api
            .insert_user(UserRecord::new("t1", Role::Teacher), "x")
            .unwrap();

        let request = AssignStateAdminRequest {
            state_id: state,
            user_id: target,
            academic_coordinator_id: Some(not_academic),
        };
        let err = api.assign_state_admin(&request, &token()).await.unwrap_err();
        assert!(err.message.contains("is not a"));
        assert!(!api.user(target).unwrap().status);
    }

    #[tokio::test]
    async fn test_teacher_assignment_does_not_claim_center() {
        let api = api();
        let center = api.add_center("East").unwrap();
        let teacher = api
            .insert_user(UserRecord::new("t", Role::Teacher), "x")
            .unwrap();
        api.assign_teacher(
            &AssignTeacherRequest {
                user_id: teacher,
                center_id: center,
            },
            &token(),
        )
        .await
        .unwrap();

        let centers = api.lookup(LookupKind::Centers).await.unwrap().data;
        assert!(!centers[0].assigned);
    }

    #[tokio::test]
    async fn test_reassign_is_rejected() {
        let api = api();
        let id = api
            .insert_user(UserRecord::new("m", Role::Manager), "x")
            .unwrap();
        let request = AssignManagerRequest { user_id: id };
        api.assign_manager(&request, &token()).await.unwrap();
        let err = api.assign_manager(&request, &token()).await.unwrap_err();
        assert!(err.message.contains("already assigned"));
    }

    #[test]
    fn test_authenticate() {
        let api = api();
        api.insert_user(UserRecord::new("root", Role::Admin), "Adm1n!pass")
            .unwrap();

        assert_eq!(api.authenticate("root", "Adm1n!pass").unwrap().role, Role::Admin);
        assert!(api.authenticate("root", "wrong").is_err());
        assert!(api.authenticate("nobody", "Adm1n!pass").is_err());
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed_once() {
        let api = api();
        api.fail_next("Service unavailable");
        let err = api.lookup(LookupKind::Managers).await.unwrap_err();
        assert_eq!(err.message, "Service unavailable");
        assert!(api.lookup(LookupKind::Managers).await.is_ok());
        assert_eq!(api.call_count("lookup"), 2);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_through_file() {
        let path = std::env::temp_dir()
            .join(format!("userdesk-{}", Uuid::new_v4()))
            .join("data.json");
        let api = api();
        api.add_state("Kano").unwrap();
        api.insert_user(UserRecord::new("ana", Role::Academic), "x")
            .unwrap();
        api.save(&path).unwrap();

        let restored = MemoryApi::load(&path, jwt_config()).unwrap();
        assert_eq!(restored.snapshot().unwrap(), api.snapshot().unwrap());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
