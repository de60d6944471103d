use tracing::{debug, instrument, trace};
use tracing_futures::Instrument;
use warp::reject::{custom, Reject, Rejection};
use warp::Filter;

use crate::authn::Authenticator;
use crate::authz::{Authorizable, Authorizer, AuthzError};
use crate::{ROUTING_KEY_HEADER, X_AUTHORIZATION_HEADER};

/// A warp filter that resolves the identity token on the request to an authenticated identity
fn authenticate<Authn: Authenticator + Clone + Send + Sync>(
    authn: Authn,
) -> impl Filter<Extract = (Authn::Item,), Error = Rejection> + Clone {
    // The header is optional so that a missing token surfaces as an authentication failure
    // rather than a routing miss
    warp::any()
        .map(move || authn.clone())
        .and(warp::header::optional::<String>(X_AUTHORIZATION_HEADER))
        .and_then(_authenticate)
}

#[instrument(level = "trace", skip(authn, auth_header), name = "authentication")]
async fn _authenticate<A: Authenticator + Clone + Send>(
    authn: A,
    auth_header: Option<String>,
) -> Result<A::Item, Rejection> {
    let auth_data = auth_header.unwrap_or_default();
    match authn.authenticate(&auth_data).await {
        Ok(item) => Ok(item),
        Err(e) => {
            debug!(error = %e, "Authentication error");
            Err(custom(AuthnFail))
        }
    }
}

#[derive(Debug)]
struct AuthnFail;

impl Reject for AuthnFail {}

/// A warp filter that authenticates the request and then authorizes the resolved identity
/// against the route's required permission, extracting the login on success.
///
/// The route's own key is authoritative: a `Routing-Key` header naming a different permission
/// is treated as a denial, and an absent one is tolerated
pub(crate) fn authenticate_and_authorize<
    Authn: Authenticator + Clone + Send + Sync,
    Authz: Authorizer + Clone + Send + Sync,
>(
    authn: Authn,
    authz: Authz,
    route_key: &'static str,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    authenticate(authn)
        .and(warp::header::optional::<String>(ROUTING_KEY_HEADER))
        .and(warp::any().map(move || authz.clone()))
        .and_then(
            move |item: Authn::Item, routing_key: Option<String>, authz: Authz| {
                async move {
                    if let Some(key) = routing_key {
                        if key != route_key {
                            debug!(%key, %route_key, "Routing-Key does not match route requirement");
                            return Err(custom(AuthzFail));
                        }
                    }
                    trace!(login = item.login(), %route_key, "Authorizing request");
                    match authz.authorize(&item, route_key).await {
                        Ok(()) => Ok(item.login().to_owned()),
                        Err(e @ AuthzError::Denied { .. }) => {
                            debug!(error = %e, "Authorization denied");
                            Err(custom(AuthzFail))
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Authorization check failed");
                            Err(custom(AuthzUnavailable))
                        }
                    }
                }
                .instrument(tracing::trace_span!("authorization"))
            },
        )
}

#[derive(Debug)]
struct AuthzFail;

impl Reject for AuthzFail {}

#[derive(Debug)]
struct AuthzUnavailable;

impl Reject for AuthzUnavailable {}

#[instrument(level = "trace", skip(err))]
pub(crate) async fn handle_auth_rejection(
    err: warp::Rejection,
) -> Result<impl warp::Reply, warp::Rejection> {
    if err.find::<AuthnFail>().is_some() || err.find::<AuthzFail>().is_some() {
        // The two causes are deliberately indistinguishable at the boundary
        debug!("Handling rejection as access denied");
        Ok(crate::server::reply::reply_from_error(
            "access denied",
            warp::http::StatusCode::FORBIDDEN,
        ))
    } else if err.find::<AuthzUnavailable>().is_some() {
        Ok(crate::server::reply::reply_from_error(
            "authorization check failed",
            warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        ))
    } else {
        Err(err)
    }
}
