use std::fmt;

use crate::directory::OrgDirectory;
use crate::ident::{User, WarehouseId};
use crate::resolver::{AccessResolver, GrantReader, ResolveError};
use crate::tier::{RequiredTier, Tier};

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub required: RequiredTier,
    pub actual: Tier,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "access denied: {} required, user holds {}",
            self.required, self.actual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Tier),
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Guard in front of every read- or write-capable warehouse operation.
///
/// The outer `Result` carries transport failures only; the authorization
/// verdict is always a value. `guard` is the composable form: the wrapped
/// operation runs only after an `Allow`, so denial happens strictly before
/// any side effect.
pub struct AuthorizationGate<D: OrgDirectory, G: GrantReader> {
    resolver: AccessResolver<D, G>,
}

impl<D: OrgDirectory, G: GrantReader> AuthorizationGate<D, G> {
    pub fn new(resolver: AccessResolver<D, G>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &AccessResolver<D, G> {
        &self.resolver
    }

    pub async fn authorize(
        &self,
        user: &User,
        warehouse: WarehouseId,
        required: RequiredTier,
    ) -> Result<Decision, ResolveError> {
        let actual = self.resolver.resolve(user, warehouse).await?;
        if required.allows(actual) {
            Ok(Decision::Allow(actual))
        } else {
            Ok(Decision::Deny(Denial { required, actual }))
        }
    }

    pub async fn guard<T, F, Fut>(
        &self,
        user: &User,
        warehouse: WarehouseId,
        required: RequiredTier,
        op: F,
    ) -> Result<Result<T, Denial>, ResolveError>
    where
        F: FnOnce(Tier) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.authorize(user, warehouse, required).await? {
            Decision::Allow(tier) => Ok(Ok(op(tier).await)),
            Decision::Deny(denial) => Ok(Err(denial)),
        }
    }
}
