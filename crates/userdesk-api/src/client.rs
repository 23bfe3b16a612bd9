//! The API collaborator contract.
//!
//! Every call resolves to an [`ApiResponse`] carrying a success flag and a
//! payload, or fails with an [`ApiError`] whose message is shown to the
//! viewer as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use userdesk_auth::AuthToken;
use userdesk_core::{ConsoleError, PaginationMeta};
use userdesk_models::{
    AssignAcademicCoordinatorRequest, AssignCenterAdminRequest, AssignFinancialPartnerRequest,
    AssignManagerRequest, AssignStateAdminRequest, AssignTeacherRequest, CreateUserDto,
    EditUserDto, LookupEntry, LookupKind, UserFilterParams, UserId, UserRecord,
};

/// Remote failure carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        ConsoleError::remote(err.message)
    }
}

/// Envelope every API call resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PaginationMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The payload, or a remote error when the envelope reports failure.
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::new(
                self.message
                    .unwrap_or_else(|| "The request was not successful".to_string()),
            ))
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// User management endpoints the console depends on.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn fetch_users(
        &self,
        page: i64,
        page_size: i64,
        filters: &UserFilterParams,
    ) -> ApiResult<Vec<UserRecord>>;

    async fn create_user(&self, user: &CreateUserDto) -> ApiResult<UserRecord>;

    async fn edit_user(
        &self,
        user_id: UserId,
        changes: &EditUserDto,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn delete_user(&self, user_id: UserId) -> ApiResult<()>;

    async fn assign_teacher(
        &self,
        request: &AssignTeacherRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn assign_academic_coordinator(
        &self,
        request: &AssignAcademicCoordinatorRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn assign_manager(
        &self,
        request: &AssignManagerRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn assign_financial_partner(
        &self,
        request: &AssignFinancialPartnerRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn assign_state_admin(
        &self,
        request: &AssignStateAdminRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    async fn assign_center_admin(
        &self,
        request: &AssignCenterAdminRequest,
        token: &AuthToken,
    ) -> ApiResult<UserRecord>;

    /// Reference list for a workflow selection.
    async fn lookup(&self, kind: LookupKind) -> ApiResult<Vec<LookupEntry>>;
}
