use async_trait::async_trait;
use uuid::Uuid;

/// Actions that may be gated by a subscription or usage policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddVocabulary,
    SubmitReview,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddVocabulary => "add_vocabulary",
            Action::SubmitReview => "submit_review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied { reason: String },
}

/// Capability check consulted before gated operations. The production
/// deployment injects a policy backed by the subscription system; the
/// default grants everything.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn can_perform(&self, user_id: Option<Uuid>, action: Action) -> AccessDecision;
}

/// Policy that allows every action. Used when no subscription gating is
/// configured and in tests.
#[derive(Debug, Clone, Default)]
pub struct UnrestrictedPolicy;

#[async_trait]
impl AccessPolicy for UnrestrictedPolicy {
    async fn can_perform(&self, _user_id: Option<Uuid>, _action: Action) -> AccessDecision {
        AccessDecision::Allowed
    }
}
