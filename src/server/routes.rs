use super::filters;
use crate::authn::Authenticator;
use crate::authz::Authorizer;
use crate::directory::PermissionDirectory;

use warp::Filter;

/// Returns the full API: both permission-listing routes plus the rejection
/// handler that maps authentication and authorization failures to their
/// boundary status codes
pub fn api<D, Authn, Authz>(
    directory: D,
    authn: Authn,
    authz: Authz,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    D: PermissionDirectory + Clone + Send + Sync,
    Authn: Authenticator + Clone + Send + Sync,
    Authz: Authorizer + Clone + Send + Sync,
{
    permissions::list(directory.clone(), authn.clone(), authz.clone())
        .or(permissions::list_for_current_user(directory, authn, authz))
        .recover(filters::handle_auth_rejection)
}

pub mod permissions {
    use super::*;

    use crate::server::handlers::*;

    /// `GET /permissions/list` - the full permission catalog. Requires
    /// `permission.list`
    pub fn list<D, Authn, Authz>(
        directory: D,
        authn: Authn,
        authz: Authz,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
    where
        D: PermissionDirectory + Clone + Send + Sync,
        Authn: Authenticator + Clone + Send + Sync,
        Authz: Authorizer + Clone + Send + Sync,
    {
        warp::path!("permissions" / "list")
            .and(warp::get())
            .and(filters::authenticate_and_authorize(
                authn,
                authz,
                crate::PERMISSION_LIST,
            ))
            .and(with_directory(directory))
            .and_then(list_permissions)
    }

    /// `GET /permissions/list/for/current/user` - the grant set of the calling
    /// identity. Requires `permission.list`
    pub fn list_for_current_user<D, Authn, Authz>(
        directory: D,
        authn: Authn,
        authz: Authz,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
    where
        D: PermissionDirectory + Clone + Send + Sync,
        Authn: Authenticator + Clone + Send + Sync,
        Authz: Authorizer + Clone + Send + Sync,
    {
        warp::path!("permissions" / "list" / "for" / "current" / "user")
            .and(warp::get())
            .and(filters::authenticate_and_authorize(
                authn,
                authz,
                crate::PERMISSION_LIST,
            ))
            .and(with_directory(directory))
            .and_then(list_permissions_for_current_user)
    }
}

fn with_directory<D>(
    directory: D,
) -> impl Filter<Extract = (D,), Error = std::convert::Infallible> + Clone
where
    D: PermissionDirectory + Clone + Send,
{
    // We have to clone for this to be Fn instead of FnOnce
    warp::any().map(move || directory.clone())
}
