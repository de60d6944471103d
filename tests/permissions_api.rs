//! Tests for the permissions API endpoints. These are integration style tests running requests
//! through the fully composed route filter: bearer-token authentication, directory-backed
//! authorization, and the JSON handlers

use std::collections::BTreeSet;
use std::time::Duration;

use rstest::rstest;
use warp::Filter;

use granary::authn::bearer::BearerToken;
use granary::authz::directory::DirectoryAuthorizer;
use granary::directory::memory::MemoryDirectory;
use granary::directory::{DirectoryError, PermissionDirectory, Result as DirectoryResult};
use granary::server::routes;
use granary::testing;
use granary::{Permission, PERMISSION_LIST, ROUTING_KEY_HEADER, X_AUTHORIZATION_HEADER};

const LIST_PATH: &str = "/permissions/list";
const CURRENT_USER_PATH: &str = "/permissions/list/for/current/user";

fn api(
    directory: MemoryDirectory,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    routes::api(
        directory.clone(),
        BearerToken::new(testing::TEST_SECRET),
        DirectoryAuthorizer::new(directory),
    )
}

fn authorized_request(path: &str, login: &str) -> warp::test::RequestBuilder {
    warp::test::request()
        .method("GET")
        .path(path)
        .header(
            X_AUTHORIZATION_HEADER,
            format!("Bearer {}", testing::mint_token(login)),
        )
        .header(ROUTING_KEY_HEADER, PERMISSION_LIST)
}

#[tokio::test]
async fn test_list_returns_full_catalog() {
    let directory = testing::directory();
    let expected = directory
        .list()
        .await
        .expect("fixture directory should list");
    let api = api(directory);

    let res = authorized_request(LIST_PATH, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    assert_eq!(
        200,
        res.status(),
        "unexpected response: {}",
        String::from_utf8_lossy(res.body())
    );
    assert_eq!(
        "application/json",
        res.headers()
            .get("Content-Type")
            .expect("content type should be set")
            .to_str()
            .expect("content type should be ascii")
    );

    let catalog: Vec<Permission> =
        serde_json::from_slice(res.body()).expect("body should be a permission array");
    assert_eq!(expected, catalog);
    assert_eq!(2, catalog.len());
}

#[tokio::test]
async fn test_current_user_returns_grant_set() {
    let api = api(testing::directory());

    let res = authorized_request(CURRENT_USER_PATH, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    assert_eq!(
        200,
        res.status(),
        "unexpected response: {}",
        String::from_utf8_lossy(res.body())
    );

    let names: Vec<String> =
        serde_json::from_slice(res.body()).expect("body should be an array of names");
    assert_eq!(vec!["permission.list", "permission.update"], names);
}

#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_guest_is_denied(#[case] path: &str) {
    let api = api(testing::directory());

    let res = authorized_request(path, testing::GUEST_LOGIN).reply(&api).await;
    assert_eq!(403, res.status());

    // No catalog or grant data may leak in the denial body
    let body = String::from_utf8_lossy(res.body());
    assert!(
        !body.contains("permission.update"),
        "denial body disclosed directory data: {}",
        body
    );
    let err: granary::ErrorResponse =
        serde_json::from_slice(res.body()).expect("denial body should be an error object");
    assert_eq!("access denied", err.error);
}

#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_missing_token_is_denied(#[case] path: &str) {
    let api = api(testing::directory());

    let res = warp::test::request()
        .method("GET")
        .path(path)
        .header(ROUTING_KEY_HEADER, PERMISSION_LIST)
        .reply(&api)
        .await;
    assert_eq!(403, res.status());
}

#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_token_with_wrong_secret_is_denied(#[case] path: &str) {
    let api = api(testing::directory());

    let token =
        testing::mint_token_with_secret(b"not-the-server-secret", testing::AUTHORIZED_LOGIN);
    let res = warp::test::request()
        .method("GET")
        .path(path)
        .header(X_AUTHORIZATION_HEADER, format!("Bearer {}", token))
        .header(ROUTING_KEY_HEADER, PERMISSION_LIST)
        .reply(&api)
        .await;
    assert_eq!(403, res.status());
}

#[tokio::test]
async fn test_mismatched_routing_key_is_denied() {
    let api = api(testing::directory());

    // The caller holds permission.update, but that is not what this route demands
    let res = warp::test::request()
        .method("GET")
        .path(LIST_PATH)
        .header(
            X_AUTHORIZATION_HEADER,
            format!("Bearer {}", testing::mint_token(testing::AUTHORIZED_LOGIN)),
        )
        .header(ROUTING_KEY_HEADER, "permission.update")
        .reply(&api)
        .await;
    assert_eq!(403, res.status());
}

#[tokio::test]
async fn test_missing_routing_key_is_tolerated() {
    let api = api(testing::directory());

    let res = warp::test::request()
        .method("GET")
        .path(LIST_PATH)
        .header(
            X_AUTHORIZATION_HEADER,
            format!("Bearer {}", testing::mint_token(testing::AUTHORIZED_LOGIN)),
        )
        .reply(&api)
        .await;
    assert_eq!(200, res.status());
}

#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_repeated_requests_are_byte_identical(#[case] path: &str) {
    let api = api(testing::directory());

    let first = authorized_request(path, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    let second = authorized_request(path, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    assert_eq!(200, first.status());
    assert_eq!(first.body(), second.body());
}

#[derive(Clone)]
struct StalledDirectory;

#[async_trait::async_trait]
impl PermissionDirectory for StalledDirectory {
    async fn list(&self) -> DirectoryResult<Vec<Permission>> {
        Ok(Vec::new())
    }

    async fn get_by_login(&self, _login: &str) -> DirectoryResult<BTreeSet<String>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(BTreeSet::new())
    }
}

#[derive(Clone)]
struct BrokenDirectory;

#[async_trait::async_trait]
impl PermissionDirectory for BrokenDirectory {
    async fn list(&self) -> DirectoryResult<Vec<Permission>> {
        Err(DirectoryError::Other("backing store unavailable".to_owned()))
    }

    async fn get_by_login(&self, _login: &str) -> DirectoryResult<BTreeSet<String>> {
        Err(DirectoryError::Other("backing store unavailable".to_owned()))
    }
}

// A hung or broken grant lookup is an infrastructure fault, not a denial
#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_stalled_grant_lookup_is_a_server_error(#[case] path: &str) {
    let api = routes::api(
        StalledDirectory,
        BearerToken::new(testing::TEST_SECRET),
        DirectoryAuthorizer::new(StalledDirectory).with_timeout(Duration::from_millis(10)),
    );

    let res = authorized_request(path, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    assert_eq!(500, res.status());
    let err: granary::ErrorResponse =
        serde_json::from_slice(res.body()).expect("fault body should be an error object");
    assert_eq!("authorization check failed", err.error);
}

#[rstest]
#[case::catalog(LIST_PATH)]
#[case::current_user(CURRENT_USER_PATH)]
#[tokio::test]
async fn test_failing_grant_lookup_is_a_server_error(#[case] path: &str) {
    let api = routes::api(
        BrokenDirectory,
        BearerToken::new(testing::TEST_SECRET),
        DirectoryAuthorizer::new(BrokenDirectory),
    );

    let res = authorized_request(path, testing::AUTHORIZED_LOGIN)
        .reply(&api)
        .await;
    assert_eq!(500, res.status());
    let err: granary::ErrorResponse =
        serde_json::from_slice(res.body()).expect("fault body should be an error object");
    assert_eq!("authorization check failed", err.error);
}

#[tokio::test]
async fn test_grants_scoped_to_calling_identity() {
    // A second identity with a single grant must see only its own names
    let directory = MemoryDirectory::builder()
        .permission("permission.list")
        .permission("permission.update")
        .grant("admin", "permission.list")
        .grant("admin", "permission.update")
        .grant("auditor", "permission.list")
        .build()
        .expect("directory should build");
    let api = api(directory);

    let res = authorized_request(CURRENT_USER_PATH, "auditor").reply(&api).await;
    assert_eq!(200, res.status());
    let names: Vec<String> =
        serde_json::from_slice(res.body()).expect("body should be an array of names");
    assert_eq!(vec!["permission.list"], names);
}
