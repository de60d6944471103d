use std::convert::Infallible;

use tracing::instrument;

use super::reply;
use crate::directory::PermissionDirectory;

/// Handler for `GET /permissions/list`. The login is already authorized by the
/// filter chain; the catalog itself is the same for every caller
#[instrument(level = "debug", skip(directory))]
pub async fn list_permissions<D: PermissionDirectory>(
    _login: String,
    directory: D,
) -> Result<impl warp::Reply, Infallible> {
    let catalog = match directory.list().await {
        Ok(c) => c,
        Err(e) => {
            return Ok(reply::into_reply(e));
        }
    };
    Ok(warp::reply::with_status(
        reply::json(&catalog),
        warp::http::StatusCode::OK,
    ))
}

/// Handler for `GET /permissions/list/for/current/user`. Returns the grant set
/// of the calling identity as a sorted array of permission names
#[instrument(level = "debug", skip(directory))]
pub async fn list_permissions_for_current_user<D: PermissionDirectory>(
    login: String,
    directory: D,
) -> Result<impl warp::Reply, Infallible> {
    let grants = match directory.get_by_login(&login).await {
        Ok(g) => g,
        Err(e) => {
            return Ok(reply::into_reply(e));
        }
    };
    Ok(warp::reply::with_status(
        reply::json(&grants),
        warp::http::StatusCode::OK,
    ))
}
