//! Offline administration on top of a snapshot-backed [`MemoryApi`].

pub mod seeder;

use std::sync::Arc;

use tracing::info;

use userdesk_api::MemoryApi;
use userdesk_auth::{FileTokenStore, Session, TokenStore};
use userdesk_config::{ConsoleConfig, JwtConfig};
use userdesk_core::ConsoleError;

use crate::modules::users::controller::UsersPage;

/// Configuration and stores a CLI invocation works with.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub console: ConsoleConfig,
    pub jwt: JwtConfig,
}

impl Workspace {
    pub fn from_env() -> Self {
        Self {
            console: ConsoleConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::new(FileTokenStore::new(
            &self.console.token_file,
            &self.console.token_key,
        ))
    }

    pub fn open_api(&self) -> Result<Arc<MemoryApi>, ConsoleError> {
        MemoryApi::load(&self.console.data_file, self.jwt.clone()).map(Arc::new)
    }

    pub fn save_api(&self, api: &MemoryApi) -> Result<(), ConsoleError> {
        api.save(&self.console.data_file)
    }

    /// Checks credentials against the snapshot and persists a session token.
    pub fn login(&self, api: &MemoryApi, name: &str, password: &str) -> Result<Session, ConsoleError> {
        let user = api.authenticate(name, password)?;
        let session = Session::login(
            self.token_store(),
            user.id,
            user.display_name(),
            user.role,
            &self.jwt,
        )?;
        info!(user_id = %user.id, role = %user.role, "Logged in");
        Ok(session)
    }

    pub fn session(&self) -> Result<Session, ConsoleError> {
        Session::restore(self.token_store(), &self.jwt)
    }

    /// A page for the logged-in viewer with the list already fetched.
    pub async fn open_page(
        &self,
        api: Arc<MemoryApi>,
    ) -> Result<UsersPage<MemoryApi>, ConsoleError> {
        let page = UsersPage::new(api, self.session()?, self.console.page_size);
        page.refresh().await?;
        Ok(page)
    }
}
