use crate::config::SeedFile;
use anyhow::{Context, Result};
use invport_common::types::CreateUserRequest;
use invport_storage::auth::hash_password;
use invport_storage::InventoryStore;

/// Import users and inventory items from a JSON seed file.
///
/// Users are skipped when the username is already taken, so re-running the
/// seed is safe. Items are inserted unconditionally; duplicate serial
/// numbers are reported and skipped rather than aborting the run.
pub async fn run_seed(store: &InventoryStore, seed_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(seed_path)
        .with_context(|| format!("Failed to read seed file: {seed_path}"))?;
    let seed: SeedFile =
        serde_json::from_str(&content).context("Failed to parse seed file as JSON")?;

    let mut users_created = 0usize;
    let mut users_skipped = 0usize;
    for user in &seed.users {
        if store.get_user_by_username(&user.username).await?.is_some() {
            tracing::info!(username = %user.username, "User already exists, skipping");
            users_skipped += 1;
            continue;
        }
        let password_hash = hash_password(&user.password)?;
        store
            .create_user(
                &CreateUserRequest {
                    username: user.username.clone(),
                    email: user.email.clone(),
                    password: String::new(),
                    role: user.role,
                },
                &password_hash,
            )
            .await
            .with_context(|| format!("Failed to create user '{}'", user.username))?;
        users_created += 1;
    }

    let mut items_created = 0usize;
    let mut items_skipped = 0usize;
    for entry in &seed.items {
        let submitted_by = entry.submitted_by.as_deref().unwrap_or("seed");
        match store.insert_item(&entry.item, submitted_by).await {
            Ok(_) => items_created += 1,
            Err(e) if e.to_string().contains("UNIQUE constraint") => {
                tracing::warn!(
                    serial = entry.item.serial_number.as_deref().unwrap_or("-"),
                    "Duplicate serial number in seed file, skipping item"
                );
                items_skipped += 1;
            }
            Err(e) => return Err(e.context("Failed to insert seed item")),
        }
    }

    tracing::info!(
        users_created,
        users_skipped,
        items_created,
        items_skipped,
        "Seed import finished"
    );
    Ok(())
}
