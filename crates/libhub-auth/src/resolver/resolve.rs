//! Resolves a verified identity into a member or operator profile.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::member::{CreateMemberProfile, MemberProfile};
use libhub_entity::operator::OperatorProfile;

use crate::provider::ProviderIdentity;
use crate::store::{MemberStore, OperatorStore};

/// The two disjoint identity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityClass {
    /// Ordinary library member.
    Member,
    /// Privileged operator.
    Operator,
}

impl IdentityClass {
    /// Return the class as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Operator => "operator",
        }
    }
}

impl fmt::Display for IdentityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdentityClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "operator" => Ok(Self::Operator),
            _ => Err(AppError::validation(format!(
                "Invalid identity class: '{s}'. Expected one of: member, operator"
            ))),
        }
    }
}

/// A resolved identity: exactly one of the two profile kinds.
///
/// The two profile stores share no interface; resolution is an explicit
/// two-branch strategy over this tagged union.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class", content = "profile", rename_all = "lowercase")]
pub enum ResolvedIdentity {
    /// An ordinary member with their profile.
    Member(MemberProfile),
    /// A privileged operator with their profile.
    Operator(OperatorProfile),
}

impl ResolvedIdentity {
    /// The identity class of this resolution.
    pub fn class(&self) -> IdentityClass {
        match self {
            Self::Member(_) => IdentityClass::Member,
            Self::Operator(_) => IdentityClass::Operator,
        }
    }

    /// The provider subject id.
    pub fn subject_id(&self) -> &str {
        match self {
            Self::Member(p) => &p.subject_id,
            Self::Operator(p) => &p.subject_id,
        }
    }

    /// The member profile, if this is a member.
    pub fn as_member(&self) -> Option<&MemberProfile> {
        match self {
            Self::Member(p) => Some(p),
            Self::Operator(_) => None,
        }
    }

    /// The operator profile, if this is an operator.
    pub fn as_operator(&self) -> Option<&OperatorProfile> {
        match self {
            Self::Member(_) => None,
            Self::Operator(p) => Some(p),
        }
    }
}

/// Determines which identity class a verified subject belongs to, and
/// synchronizes a member profile on first login.
///
/// `resolve` may create: a member-class resolution for a never-before-seen
/// subject writes exactly one profile row (guarded by the store's unique
/// `subject_id` key), then re-reads it. Operator resolution never writes
/// and never falls back to the member store.
#[derive(Clone)]
pub struct ProfileResolver {
    members: Arc<dyn MemberStore>,
    operators: Arc<dyn OperatorStore>,
}

impl std::fmt::Debug for ProfileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileResolver").finish()
    }
}

impl ProfileResolver {
    /// Create a resolver over the two profile stores.
    pub fn new(members: Arc<dyn MemberStore>, operators: Arc<dyn OperatorStore>) -> Self {
        Self { members, operators }
    }

    /// Resolve a verified identity into a profile.
    ///
    /// With a requested class the lookup is strict (no cross-class
    /// fallback). Without one (role-discovery mode, used after generic
    /// login) the member store is probed first, then the operator store,
    /// and an unknown subject is synchronized as a member. Most traffic
    /// is member traffic, hence the asymmetric order.
    pub async fn resolve(
        &self,
        identity: &ProviderIdentity,
        requested: Option<IdentityClass>,
    ) -> AppResult<ResolvedIdentity> {
        match requested {
            Some(IdentityClass::Operator) => self.resolve_operator(identity).await,
            Some(IdentityClass::Member) => self.resolve_member(identity).await,
            None => self.discover(identity).await,
        }
    }

    async fn resolve_operator(&self, identity: &ProviderIdentity) -> AppResult<ResolvedIdentity> {
        match self
            .operators
            .find_by_subject_id(&identity.subject_id)
            .await?
        {
            Some(profile) => Ok(ResolvedIdentity::Operator(profile)),
            // Operator login must not fall back to member.
            None => Err(AppError::not_authorized(
                "No operator account exists for this identity",
            )),
        }
    }

    async fn resolve_member(&self, identity: &ProviderIdentity) -> AppResult<ResolvedIdentity> {
        if let Some(profile) = self
            .members
            .find_by_subject_id(&identity.subject_id)
            .await?
        {
            return Self::admit_member(profile);
        }

        // The member lookup failed; only now may the operator store be
        // probed, so operator existence never leaks on the happy path.
        if self
            .operators
            .find_by_subject_id(&identity.subject_id)
            .await?
            .is_some()
        {
            return Err(AppError::wrong_portal(
                "Administrators must use the operator entry point",
            ));
        }

        let profile = self.synchronize(identity).await?;
        Self::admit_member(profile)
    }

    async fn discover(&self, identity: &ProviderIdentity) -> AppResult<ResolvedIdentity> {
        if let Some(profile) = self
            .members
            .find_by_subject_id(&identity.subject_id)
            .await?
        {
            return Self::admit_member(profile);
        }

        if let Some(profile) = self
            .operators
            .find_by_subject_id(&identity.subject_id)
            .await?
        {
            return Ok(ResolvedIdentity::Operator(profile));
        }

        let profile = self.synchronize(identity).await?;
        Self::admit_member(profile)
    }

    /// A found member profile is admitted only if the account is usable.
    /// The caller must terminate the session token on `AccountSuspended`.
    fn admit_member(profile: MemberProfile) -> AppResult<ResolvedIdentity> {
        if profile.suspended {
            return Err(AppError::account_suspended(
                "This account has been suspended",
            ));
        }
        Ok(ResolvedIdentity::Member(profile))
    }

    /// First-login synchronization: create a member profile from identity
    /// token data.
    ///
    /// At most one creation write per unresolved subject. Two concurrent
    /// first logins race on the store's unique key; the loser sees
    /// `Conflict` and retries the lookup once. Any other failure degrades
    /// to `StoreUnavailable` and never silently grants member access.
    async fn synchronize(&self, identity: &ProviderIdentity) -> AppResult<MemberProfile> {
        let payload = CreateMemberProfile::from_token_data(
            &identity.subject_id,
            &identity.email,
            &identity.display_name,
        );

        match self.members.create(&payload).await {
            Ok(profile) => {
                info!(
                    subject_id = %profile.subject_id,
                    "Synchronized new member profile at first login"
                );
                Ok(profile)
            }
            Err(e) if e.kind == ErrorKind::Conflict => self
                .members
                .find_by_subject_id(&identity.subject_id)
                .await?
                .ok_or_else(|| {
                    AppError::store_unavailable(
                        "Synchronized profile disappeared before the retry lookup",
                    )
                }),
            Err(e) if e.kind == ErrorKind::StoreUnavailable => Err(e),
            Err(e) => Err(AppError::new(
                ErrorKind::StoreUnavailable,
                format!("First-login synchronization failed: {}", e.message),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryMemberStore, InMemoryOperatorStore};
    use chrono::{Duration, Utc};

    fn identity(subject_id: &str) -> ProviderIdentity {
        ProviderIdentity {
            subject_id: subject_id.to_string(),
            email: format!("{subject_id}@example.edu"),
            display_name: format!("User {subject_id}"),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn operator_row(subject_id: &str) -> OperatorProfile {
        OperatorProfile {
            subject_id: subject_id.to_string(),
            email: format!("{subject_id}@example.edu"),
            name: format!("Operator {subject_id}"),
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn resolver() -> (Arc<InMemoryMemberStore>, Arc<InMemoryOperatorStore>, ProfileResolver) {
        let members = Arc::new(InMemoryMemberStore::new());
        let operators = Arc::new(InMemoryOperatorStore::new());
        let resolver = ProfileResolver::new(members.clone(), operators.clone());
        (members, operators, resolver)
    }

    #[tokio::test]
    async fn test_first_login_synchronizes_member() {
        let (members, _, resolver) = resolver();

        let resolved = resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap();

        assert_eq!(resolved.class(), IdentityClass::Member);
        let profile = resolved.as_member().unwrap();
        assert_eq!(profile.subject_id, "s1");
        assert!(!profile.suspended);
        assert!(!profile.profile_completed);
        assert_eq!(members.row_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let (members, _, resolver) = resolver();

        resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap();
        resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap();

        // Exactly one row and exactly one creation attempt.
        assert_eq!(members.row_count(), 1);
        assert_eq!(members.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_insert_race_retries_lookup() {
        let (members, _, resolver) = resolver();

        // A concurrent first login inserts the row inside our race
        // window: our lookup misses, our create hits the unique key.
        let seeded = members
            .create(&CreateMemberProfile::from_token_data(
                "s1",
                "s1@example.edu",
                "User s1",
            ))
            .await
            .unwrap();
        members.miss_next_find();

        let resolved = resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap();

        // The duplicate insert was treated as "already exists, retry
        // lookup", not as an error.
        assert_eq!(resolved.subject_id(), seeded.subject_id);
        assert_eq!(members.row_count(), 1);
        assert_eq!(members.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_suspended_member_is_rejected() {
        let (members, _, resolver) = resolver();

        let resolved = resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap();
        let mut profile = resolved.as_member().unwrap().clone();
        profile.set_suspended(true, Utc::now());
        members.insert_row(profile);

        let err = resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountSuspended);
        assert!(err.requires_sign_out());
    }

    #[tokio::test]
    async fn test_operator_login_never_falls_back_to_member() {
        let (members, operators, resolver) = resolver();
        let _ = members; // member store untouched

        let err = resolver
            .resolve(&identity("o1"), Some(IdentityClass::Operator))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthorized);

        operators.insert_row(operator_row("o1"));
        let resolved = resolver
            .resolve(&identity("o1"), Some(IdentityClass::Operator))
            .await
            .unwrap();
        assert_eq!(resolved.class(), IdentityClass::Operator);
    }

    #[tokio::test]
    async fn test_operator_via_member_portal_is_wrong_portal() {
        let (members, operators, resolver) = resolver();
        operators.insert_row(operator_row("o1"));

        let err = resolver
            .resolve(&identity("o1"), Some(IdentityClass::Member))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongPortal);
        assert!(err.requires_sign_out());

        // No member profile was synchronized for the operator.
        assert_eq!(members.row_count(), 0);
        assert_eq!(members.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_discovery_prefers_member_then_operator() {
        let (_, operators, resolver) = resolver();
        operators.insert_row(operator_row("o1"));

        let resolved = resolver.resolve(&identity("o1"), None).await.unwrap();
        assert_eq!(resolved.class(), IdentityClass::Operator);
    }

    #[tokio::test]
    async fn test_discovery_syncs_unknown_subject_as_member() {
        let (members, _, resolver) = resolver();

        let resolved = resolver.resolve(&identity("s9"), None).await.unwrap();
        assert_eq!(resolved.class(), IdentityClass::Member);
        assert_eq!(members.row_count(), 1);
    }

    #[tokio::test]
    async fn test_sync_failure_degrades_to_store_unavailable() {
        let (members, _, resolver) = resolver();
        members.set_unavailable(true);

        let err = resolver
            .resolve(&identity("s1"), Some(IdentityClass::Member))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }
}
