//! Some helpful utilities for testing. This module is only available if the `test-tools` feature
//! is enabled. Its main features are a prebuilt directory fixture and a token mint for producing
//! identity tokens for arbitrary logins. All functions panic if they encounter an error to make it
//! easier on users (so they don't have to handle the errors in their tests in the exact same way)

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::directory::memory::MemoryDirectory;

/// The shared secret the fixture tokens are signed with. Pair with
/// `BearerToken::new(TEST_SECRET)` on the server side
pub const TEST_SECRET: &[u8] = b"granary-test-secret";

/// The login that holds every permission in the fixture directory
pub const AUTHORIZED_LOGIN: &str = "admin";

/// A login the fixture directory has no grants for
pub const GUEST_LOGIN: &str = "guest";

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Returns a directory with a two-permission catalog (`permission.list` and
/// `permission.update`), both granted to [`AUTHORIZED_LOGIN`](AUTHORIZED_LOGIN) and neither to
/// anyone else
pub fn directory() -> MemoryDirectory {
    MemoryDirectory::builder()
        .permission("permission.list")
        .permission("permission.update")
        .grant(AUTHORIZED_LOGIN, "permission.list")
        .grant(AUTHORIZED_LOGIN, "permission.update")
        .build()
        .expect("fixture directory should build")
}

/// Mints an identity token for the given login, signed with
/// [`TEST_SECRET`](TEST_SECRET) and valid for an hour
pub fn mint_token(login: &str) -> String {
    mint_token_with_secret(TEST_SECRET, login)
}

/// Mints an identity token for the given login with an arbitrary secret
pub fn mint_token_with_secret(secret: &[u8], login: &str) -> String {
    let exp = (SystemTime::now() + Duration::from_secs(3600))
        .duration_since(UNIX_EPOCH)
        .expect("time should be sane")
        .as_secs();
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: login.to_owned(),
            exp,
        },
        &EncodingKey::from_secret(secret),
    )
    .expect("token should encode")
}
