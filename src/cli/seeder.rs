//! Fills a [`MemoryApi`] with fake users, states and centers.
//!
//! Every seeded user starts unassigned so each assignment workflow has
//! something to work on. One password hash (cost 4) is shared by all seeded
//! users to keep seeding fast.

use std::collections::HashSet;
use std::time::Instant;

use fake::Fake;
use fake::faker::address::en::{CityName, StateName};
use fake::faker::name::en::{FirstName, LastName};
use tracing::info;

use userdesk_api::MemoryApi;
use userdesk_core::ConsoleError;
use userdesk_core::password::hash_password_with_cost;
use userdesk_models::{Role, UserRecord};

const SEED_HASH_COST: u32 = 4;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_password: String,
    /// Password shared by every other seeded user.
    pub password: String,
    pub managers: usize,
    pub academics: usize,
    pub financials: usize,
    pub teachers: usize,
    pub state_users: usize,
    pub center_users: usize,
    pub states: usize,
    pub centers: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_name: "admin".to_string(),
            admin_password: "Adm1n!pass".to_string(),
            password: "Passw0rd!".to_string(),
            managers: 2,
            academics: 3,
            financials: 2,
            teachers: 8,
            state_users: 3,
            center_users: 3,
            states: 4,
            centers: 4,
        }
    }
}

impl SeedConfig {
    fn plan(&self) -> [(Role, usize); 6] {
        [
            (Role::Manager, self.managers),
            (Role::Academic, self.academics),
            (Role::Financial, self.financials),
            (Role::Teacher, self.teachers),
            (Role::State, self.state_users),
            (Role::Center, self.center_users),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub states: usize,
    pub centers: usize,
}

/// Generates a login name not yet in `taken`, e.g. `jane.doe2`.
fn unique_name(taken: &mut HashSet<String>) -> String {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let base = format!("{}.{}", first, last).to_lowercase().replace(' ', "");

    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}{}", base, suffix);
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

pub fn seed_memory(api: &MemoryApi, config: &SeedConfig) -> Result<SeedSummary, ConsoleError> {
    let start = Instant::now();
    let mut taken: HashSet<String> = api
        .snapshot()?
        .users
        .into_iter()
        .filter_map(|u| u.record.name)
        .collect();
    let mut summary = SeedSummary::default();

    if !taken.contains(&config.admin_name) {
        let admin = UserRecord::new(config.admin_name.clone(), Role::Admin);
        api.insert_user(admin, &config.admin_password)?;
        taken.insert(config.admin_name.clone());
        summary.users += 1;
    }

    let shared_hash = hash_password_with_cost(&config.password, SEED_HASH_COST)?;
    for (role, count) in config.plan() {
        for _ in 0..count {
            let name = unique_name(&mut taken);
            let mut user = UserRecord::new(name, role);
            user.full_name = Some(format!(
                "{} {}",
                FirstName().fake::<String>(),
                LastName().fake::<String>()
            ));
            api.insert_hashed(user, shared_hash.clone())?;
            summary.users += 1;
        }
    }

    for _ in 0..config.states {
        api.add_state(StateName().fake::<String>())?;
        summary.states += 1;
    }
    for _ in 0..config.centers {
        api.add_center(format!("{} Center", CityName().fake::<String>()))?;
        summary.centers += 1;
    }

    info!(
        users = summary.users,
        states = summary.states,
        centers = summary.centers,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seeding finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_config::JwtConfig;

    fn api() -> MemoryApi {
        MemoryApi::new(JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        })
        .with_hash_cost(4)
    }

    #[test]
    fn test_seed_counts() {
        let api = api();
        let config = SeedConfig::default();
        let summary = seed_memory(&api, &config).unwrap();

        assert_eq!(summary.users, 1 + 2 + 3 + 2 + 8 + 3 + 3);
        assert_eq!(summary.states, 4);
        let snapshot = api.snapshot().unwrap();
        assert!(snapshot.users.iter().all(|u| !u.record.status));
        assert_eq!(snapshot.centers.len(), 4);
    }

    #[test]
    fn test_seeded_names_are_unique_and_admin_once() {
        let api = api();
        let config = SeedConfig::default();
        seed_memory(&api, &config).unwrap();
        let second = seed_memory(&api, &config).unwrap();
        assert_eq!(second.users, 21);

        let names: Vec<String> = api
            .snapshot()
            .unwrap()
            .users
            .into_iter()
            .filter_map(|u| u.record.name)
            .collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(api.authenticate("admin", "Adm1n!pass").is_ok());
    }
}
