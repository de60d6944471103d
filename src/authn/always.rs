use super::Authenticator;
use crate::authz::always::Anonymous;

/// An authenticator that resolves every request, credentialed or not, to the
/// `anonymous` principal.
///
/// This is what the server binary falls back to (with a warning) when no
/// credential source is configured. It only makes sense paired with an
/// authorizer that ignores the principal, since `anonymous` holds no grants
/// in a real directory
#[derive(Clone, Debug)]
pub struct AlwaysAuthenticate;

#[async_trait::async_trait]
impl Authenticator for AlwaysAuthenticate {
    type Item = Anonymous;

    async fn authenticate(&self, _auth_data: &str) -> anyhow::Result<Self::Item> {
        Ok(Anonymous)
    }
}
