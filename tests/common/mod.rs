#![allow(dead_code)]

use std::sync::Arc;

use userdesk::modules::users::controller::UsersPage;
use userdesk_api::MemoryApi;
use userdesk_auth::{MemoryTokenStore, Session, TokenStore};
use userdesk_config::JwtConfig;
use userdesk_models::{CreateUserDto, Role, UserRecord};
use uuid::Uuid;

pub const VALID_PASSWORD: &str = "Secur3!pass";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

/// Backend with a cheap bcrypt cost.
pub fn memory_api() -> Arc<MemoryApi> {
    Arc::new(MemoryApi::new(jwt_config()).with_hash_cost(4))
}

/// A logged-in session and the store its token lives in.
pub fn login(role: Role) -> (Session, Arc<dyn TokenStore>) {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = Session::login(
        store.clone(),
        userdesk_models::UserId::new(),
        &format!("{}-viewer", role.as_str()),
        role,
        &jwt_config(),
    )
    .unwrap();
    (session, store)
}

pub fn page_for(api: Arc<MemoryApi>, role: Role) -> UsersPage<MemoryApi> {
    let (session, _) = login(role);
    UsersPage::new(api, session, 100)
}

pub fn user(name: Option<&str>, role: Role, status: bool) -> UserRecord {
    let mut user = UserRecord::new("placeholder", role);
    user.name = name.map(str::to_string);
    user.status = status;
    user
}

pub fn generate_unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().to_string()[..8])
}

pub fn create_dto(name: &str, role: Role) -> CreateUserDto {
    CreateUserDto {
        name: name.to_string(),
        full_name: format!("{} Tester", name),
        password: VALID_PASSWORD.to_string(),
        role,
    }
}
