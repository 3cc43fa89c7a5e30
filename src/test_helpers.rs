//! Test helper factories for unit tests inside the crate.
#![allow(dead_code)]

use crate::auth::jwt::encode_jwt;
use crate::store::models::{NewLabel, NewTaskStatus, NewUser, User};
use crate::store::EntityStore;
use crate::{AppState, Config};

pub(crate) const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

/// A config with a fixed JWT secret and the default seed account.
pub(crate) fn test_config() -> Config {
    Config {
        server_port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_secs: 3600,
        admin_email: "admin@example.com".to_string(),
        admin_password: "qwerty".to_string(),
    }
}

/// AppState over a fresh in-memory store, pre-seeded with an admin account
/// (password "qwerty", low bcrypt cost for speed), two statuses ("draft",
/// "published") and two labels ("feature", "bug").
pub(crate) async fn seeded_state() -> (AppState, User) {
    let state = AppState::new(test_config());

    let digest = bcrypt::hash("qwerty", 4).expect("bcrypt hash");
    let admin = state
        .store
        .create_user(NewUser {
            email: "admin@example.com".to_string(),
            first_name: Some("Admin".to_string()),
            last_name: None,
            password_digest: digest,
        })
        .await
        .expect("seed admin");

    for (name, slug) in [("Draft", "draft"), ("Published", "published")] {
        state
            .store
            .create_status(NewTaskStatus {
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await
            .expect("seed status");
    }

    for name in ["feature", "bug"] {
        state
            .store
            .create_label(NewLabel {
                name: name.to_string(),
            })
            .await
            .expect("seed label");
    }

    (state, admin)
}

/// A valid Bearer token for the given user, signed with [`TEST_SECRET`].
pub(crate) fn test_token(state: &AppState, user: &User) -> String {
    encode_jwt(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )
    .expect("encode test token")
}
