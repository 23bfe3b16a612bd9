//! The user management page.
//!
//! [`UsersPage`] owns the fetched list and the toolbar state, decides what
//! every row offers, and forwards mutations to the [`UserApi`]. After each
//! successful mutation the whole list is refetched before the call returns.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use userdesk_api::UserApi;
use userdesk_auth::Session;
use userdesk_core::ConsoleError;
use userdesk_models::{CreateUserDto, EditUserDto, Role, RoleFilter, UserId, UserRecord};

use crate::modules::assignments::service::row_actions;
use crate::modules::permissions::{can_create, creatable_roles};
use crate::modules::users::model::{
    Action, ErrorNotice, PageState, PendingDelete, Submission, UserRow,
};
use crate::modules::users::service::{fetch_filters, filter_users, is_visible_to};
use crate::utils::in_flight::InFlight;

pub struct UsersPage<A: UserApi> {
    pub(crate) api: Arc<A>,
    pub(crate) session: Session,
    pub(crate) page_size: i64,
    pub(crate) state: RwLock<PageState>,
    pub(crate) in_flight: InFlight<Action>,
}

impl<A: UserApi> UsersPage<A> {
    pub fn new(api: Arc<A>, session: Session, page_size: i64) -> Self {
        Self {
            api,
            session,
            page_size,
            state: RwLock::new(PageState::default()),
            in_flight: InFlight::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn viewer(&self) -> Role {
        self.session.role()
    }

    /// Refetches the full user list.
    #[instrument(skip(self), fields(viewer = %self.viewer()))]
    pub async fn refresh(&self) -> Result<usize, ConsoleError> {
        let result = self.refetch().await;
        self.settle(result).await
    }

    /// Fetches the whole list. A server that caps the single-page request
    /// is walked page by page, sized by the first batch, until it reports
    /// nothing more.
    pub(crate) async fn refetch(&self) -> Result<usize, ConsoleError> {
        let mut filters = fetch_filters(self.viewer(), self.page_size);
        let mut users = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .api
                .fetch_users(page, self.page_size, &filters)
                .await?;
            let has_more = response.meta.as_ref().is_some_and(|meta| meta.has_more);
            let batch = response.into_data()?;
            if batch.is_empty() {
                break;
            }
            if page == 1 {
                filters.pagination = None;
                filters.limit = Some(i64::try_from(batch.len()).unwrap_or(i64::MAX));
            }
            users.extend(batch);
            if !has_more {
                break;
            }
            page += 1;
        }
        let count = users.len();
        self.state.write().await.users = users;
        debug!(count, "User list refreshed");
        Ok(count)
    }

    /// Visible rows with the controls each offers.
    pub async fn rows(&self) -> Vec<UserRow> {
        let viewer = self.viewer();
        let state = self.state.read().await;
        filter_users(&state.users, &state.search, &state.role_filter, viewer)
            .into_iter()
            .map(|user| UserRow {
                actions: row_actions(viewer, &user),
                user,
            })
            .collect()
    }

    pub async fn search(&self) -> String {
        self.state.read().await.search.clone()
    }

    /// Applies a search term. Callers typing into a search box feed the
    /// debounced channel to [`UsersPage::follow_search`] instead.
    pub async fn set_search(&self, term: impl Into<String>) {
        self.state.write().await.search = term.into();
    }

    /// Applies every term published on `terms` until its sender goes away.
    pub async fn follow_search(&self, mut terms: watch::Receiver<String>) {
        while terms.changed().await.is_ok() {
            let term = terms.borrow_and_update().clone();
            debug!(%term, "Search term applied");
            self.set_search(term).await;
        }
    }

    pub async fn role_filter(&self) -> RoleFilter {
        self.state.read().await.role_filter.clone()
    }

    pub async fn set_role_filter(&self, filter: impl Into<RoleFilter>) {
        self.state.write().await.role_filter = filter.into();
    }

    /// Roles offered in the create form.
    pub fn creatable_roles(&self) -> &'static [Role] {
        creatable_roles(self.viewer())
    }

    /// Whether the submit control of `action` is disabled.
    pub fn is_submitting(&self, action: Action) -> bool {
        self.in_flight.is_active(&action)
    }

    #[instrument(skip(self, dto), fields(viewer = %self.viewer(), role = %dto.role))]
    pub async fn create_user(
        &self,
        dto: CreateUserDto,
    ) -> Result<Submission<UserRecord>, ConsoleError> {
        let Some(_guard) = self.in_flight.try_acquire(Action::Create) else {
            debug!("Create already in flight, ignoring");
            return Ok(Submission::Ignored);
        };
        let result = self.submit_create(&dto).await;
        self.settle(result).await.map(Submission::Completed)
    }

    async fn submit_create(&self, dto: &CreateUserDto) -> Result<UserRecord, ConsoleError> {
        dto.validate()?;
        if !can_create(self.viewer(), dto.role) {
            return Err(ConsoleError::forbidden(format!(
                "A {} cannot create {} users",
                self.viewer().label(),
                dto.role.label()
            )));
        }
        self.session.token()?;

        let user = self.api.create_user(dto).await?.into_data()?;
        info!(user_id = %user.id, role = %user.role, "User created");
        self.refetch().await?;
        Ok(user)
    }

    #[instrument(skip(self, dto), fields(viewer = %self.viewer()))]
    pub async fn edit_user(
        &self,
        user_id: UserId,
        dto: EditUserDto,
    ) -> Result<Submission<UserRecord>, ConsoleError> {
        let Some(_guard) = self.in_flight.try_acquire(Action::Edit) else {
            debug!("Edit already in flight, ignoring");
            return Ok(Submission::Ignored);
        };
        let result = self.submit_edit(user_id, &dto).await;
        self.settle(result).await.map(Submission::Completed)
    }

    async fn submit_edit(
        &self,
        user_id: UserId,
        dto: &EditUserDto,
    ) -> Result<UserRecord, ConsoleError> {
        dto.validate()?;
        if dto.is_empty() {
            return Err(ConsoleError::validation("name", "Nothing to update"));
        }
        self.visible_user(user_id).await?;
        let token = self.session.token()?;

        let user = self.api.edit_user(user_id, dto, &token).await?.into_data()?;
        info!(%user_id, "User updated");
        self.refetch().await?;
        Ok(user)
    }

    /// First step of a delete: records which row awaits confirmation.
    pub async fn request_delete(&self, user_id: UserId) -> Result<PendingDelete, ConsoleError> {
        let result = self.pending_for(user_id).await;
        let pending = self.settle(result).await?;
        self.state.write().await.pending_delete = Some(pending.clone());
        Ok(pending)
    }

    async fn pending_for(&self, user_id: UserId) -> Result<PendingDelete, ConsoleError> {
        let user = self.visible_user(user_id).await?;
        if !row_actions(self.viewer(), &user).delete {
            return Err(ConsoleError::forbidden("Assigned users cannot be deleted"));
        }
        Ok(PendingDelete {
            user_id,
            name: user.display_name().to_string(),
        })
    }

    pub async fn pending_delete(&self) -> Option<PendingDelete> {
        self.state.read().await.pending_delete.clone()
    }

    pub async fn cancel_delete(&self) {
        self.state.write().await.pending_delete = None;
    }

    /// Deletes the row awaiting confirmation. Without one this is a no-op.
    #[instrument(skip(self), fields(viewer = %self.viewer()))]
    pub async fn confirm_delete(&self) -> Result<Submission<UserId>, ConsoleError> {
        let Some(_guard) = self.in_flight.try_acquire(Action::Delete) else {
            debug!("Delete already in flight, ignoring");
            return Ok(Submission::Ignored);
        };
        let Some(pending) = self.pending_delete().await else {
            return Ok(Submission::Ignored);
        };
        let result = self.submit_delete(&pending).await;
        self.settle(result).await.map(Submission::Completed)
    }

    async fn submit_delete(&self, pending: &PendingDelete) -> Result<UserId, ConsoleError> {
        // The row may have been assigned since the confirmation was requested.
        self.pending_for(pending.user_id).await?;
        self.session.token()?;

        self.api.delete_user(pending.user_id).await?.into_data()?;
        self.state.write().await.pending_delete = None;
        info!(user_id = %pending.user_id, "User deleted");
        self.refetch().await?;
        Ok(pending.user_id)
    }

    pub async fn last_error(&self) -> Option<ErrorNotice> {
        self.state.read().await.last_error.clone()
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// A fetched row the viewer is allowed to see.
    pub(crate) async fn visible_user(&self, user_id: UserId) -> Result<UserRecord, ConsoleError> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.id == user_id && is_visible_to(self.viewer(), u.role))
            .cloned()
            .ok_or_else(|| ConsoleError::not_found(format!("User with id {} not found", user_id)))
    }

    /// Records a failure as the page's dismissable error before handing it back.
    pub(crate) async fn settle<T>(
        &self,
        result: Result<T, ConsoleError>,
    ) -> Result<T, ConsoleError> {
        if let Err(err) = &result {
            warn!(kind = ?err.kind(), error = %err, "Action failed");
            self.state.write().await.last_error = Some(ErrorNotice::from(err));
        }
        result
    }
}
