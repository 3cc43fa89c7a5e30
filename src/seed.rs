//! Startup data initializer.
//!
//! Seeds the admin account, the default workflow statuses and the default
//! labels the first time the server starts against an empty store. A store
//! that already has users is left untouched, so restarts are safe.

use crate::auth::password;
use crate::store::models::{NewLabel, NewTaskStatus, NewUser};
use crate::store::EntityStore;
use crate::AppState;
use anyhow::Result;

const DEFAULT_STATUS_SLUGS: [&str; 5] =
    ["draft", "to_review", "to_be_fixed", "to_publish", "published"];

const DEFAULT_LABELS: [&str; 2] = ["feature", "bug"];

/// Derive a display name from a slug: first word capitalized, underscores
/// turned into spaces ("to_be_fixed" → "To be fixed").
fn display_name(slug: &str) -> String {
    let mut words = slug.split('_');
    let mut name = String::new();
    if let Some(first) = words.next() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            name.extend(c.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    for word in words {
        name.push(' ');
        name.push_str(word);
    }
    name
}

pub async fn run(state: &AppState) -> Result<()> {
    if !state.store.list_users().await?.is_empty() {
        tracing::debug!("store already populated, skipping seed");
        return Ok(());
    }

    let admin = state
        .store
        .create_user(NewUser {
            email: state.config.admin_email.clone(),
            first_name: Some("Admin".to_string()),
            last_name: None,
            password_digest: password::hash(&state.config.admin_password)?,
        })
        .await?;
    tracing::info!(user_id = admin.id, email = %admin.email, "seeded admin account");

    for slug in DEFAULT_STATUS_SLUGS {
        state
            .store
            .create_status(NewTaskStatus {
                name: display_name(slug),
                slug: slug.to_string(),
            })
            .await?;
    }

    for name in DEFAULT_LABELS {
        state
            .store
            .create_label(NewLabel {
                name: name.to_string(),
            })
            .await?;
    }

    tracing::info!(
        statuses = DEFAULT_STATUS_SLUGS.len(),
        labels = DEFAULT_LABELS.len(),
        "seeded default statuses and labels"
    );
    Ok(())
}
