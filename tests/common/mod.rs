#![allow(dead_code)]

use std::sync::Arc;

use rapier_auth::auth::user::{NewUser, User, UserRole};
use rapier_auth::config::AppConfig;
use rapier_auth::services::AccessGate;
use rapier_auth::storage::{MemoryStorageProvider, StorageProvider};

pub fn setup() -> (AccessGate, Arc<dyn StorageProvider>) {
    let config = Arc::new(AppConfig::for_testing());
    let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorageProvider::new());
    let gate = AccessGate::new(config, storage.clone());
    (gate, storage)
}

pub async fn create_user(gate: &AccessGate, name: &str, role: UserRole) -> User {
    gate.identity()
        .create_user(
            NewUser::new(&format!("{}@x.com", name), name, &format!("{}-password", name)),
            role,
        )
        .await
        .unwrap()
}

pub async fn login(gate: &AccessGate, name: &str) -> String {
    gate.login(name, &format!("{}-password", name))
        .await
        .unwrap()
        .access_token
}
