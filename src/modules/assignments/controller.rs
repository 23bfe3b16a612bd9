//! Assignment workflows on the user management page.

use tracing::{debug, info, instrument};

use userdesk_api::UserApi;
use userdesk_core::ConsoleError;
use userdesk_models::{UserId, UserRecord};

use crate::modules::assignments::model::{AssignmentForm, Workflow};
use crate::modules::assignments::service::{AssignmentService, assignment_workflow};
use crate::modules::users::controller::UsersPage;
use crate::modules::users::model::{Action, Submission};

impl<A: UserApi> UsersPage<A> {
    /// Opens the assignment workflow a row offers, with its option lists
    /// loaded.
    #[instrument(skip(self), fields(viewer = %self.viewer()))]
    pub async fn open_assignment(&self, user_id: UserId) -> Result<AssignmentForm, ConsoleError> {
        let result = self.load_assignment(user_id).await;
        self.settle(result).await
    }

    async fn load_assignment(&self, user_id: UserId) -> Result<AssignmentForm, ConsoleError> {
        let target = self.visible_user(user_id).await?;
        let workflow = self.offered_workflow(&target)?;
        let form = AssignmentService::load_form(self.api.as_ref(), workflow, &target).await?;
        debug!(
            %workflow,
            empty = form.empty_options().len(),
            "Assignment form opened"
        );
        Ok(form)
    }

    /// Submits an assignment form: one API call, then a full refetch.
    ///
    /// Repeated submits of a workflow while one is pending are ignored.
    #[instrument(skip(self, form), fields(viewer = %self.viewer(), workflow = %form.workflow, target = %form.target))]
    pub async fn submit_assignment(
        &self,
        form: &AssignmentForm,
    ) -> Result<Submission<UserRecord>, ConsoleError> {
        let Some(_guard) = self.in_flight.try_acquire(Action::Assign(form.workflow)) else {
            debug!("Assignment already in flight, ignoring");
            return Ok(Submission::Ignored);
        };
        let result = self.submit_form(form).await;
        self.settle(result).await.map(Submission::Completed)
    }

    async fn submit_form(&self, form: &AssignmentForm) -> Result<UserRecord, ConsoleError> {
        let target = self.visible_user(form.target).await?;
        if self.offered_workflow(&target)? != form.workflow {
            return Err(ConsoleError::forbidden(format!(
                "{} is not available for {}",
                form.workflow,
                target.display_name()
            )));
        }
        let request = AssignmentService::build_request(form)?;
        let token = self.session.token()?;

        let user = AssignmentService::dispatch(self.api.as_ref(), &request, &token).await?;
        info!(user_id = %user.id, workflow = %form.workflow, "User assigned");
        self.refetch().await?;
        Ok(user)
    }

    fn offered_workflow(&self, target: &UserRecord) -> Result<Workflow, ConsoleError> {
        assignment_workflow(self.viewer(), target.role, target.status).ok_or_else(|| {
            ConsoleError::forbidden(format!(
                "No assignment is available for {}",
                target.display_name()
            ))
        })
    }

    pub fn is_assigning(&self, workflow: Workflow) -> bool {
        self.is_submitting(Action::Assign(workflow))
    }
}
