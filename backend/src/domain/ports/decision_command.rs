//! Driving port for recording decisions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserId};

/// Request to record one user's like or pass toward another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionRequest {
    /// User making the decision.
    #[schema(value_type = String, example = "user-1")]
    pub actor_user_id: UserId,
    /// User the decision is about.
    #[schema(value_type = String, example = "user-2")]
    pub recipient_user_id: UserId,
    /// `true` for a like, `false` for a pass.
    pub liked_recipient: bool,
}

/// Outcome of recording a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionResponse {
    /// Whether both users like each other after this decision.
    pub mutual_likes: bool,
}

/// Driving port for decision writes.
///
/// # Examples
///
/// ```rust,no_run
/// # use explore::domain::UserId;
/// # use explore::domain::ports::{DecisionCommand, FixtureDecisionCommand, PutDecisionRequest};
/// # async fn example() -> Result<(), explore::domain::Error> {
/// let request = PutDecisionRequest {
///     actor_user_id: UserId::new("u1").expect("valid id"),
///     recipient_user_id: UserId::new("u2").expect("valid id"),
///     liked_recipient: true,
/// };
/// let response = FixtureDecisionCommand.put_decision(request).await?;
/// assert!(!response.mutual_likes);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecisionCommand: Send + Sync {
    /// Record the decision and report whether the pair now like each other.
    ///
    /// Durable-store failures fail the call. Like-cache failures are logged
    /// and otherwise ignored.
    async fn put_decision(&self, request: PutDecisionRequest) -> Result<PutDecisionResponse, Error>;
}

/// Fixture command that never reports a mutual like.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDecisionCommand;

#[async_trait]
impl DecisionCommand for FixtureDecisionCommand {
    async fn put_decision(
        &self,
        _request: PutDecisionRequest,
    ) -> Result<PutDecisionResponse, Error> {
        Ok(PutDecisionResponse {
            mutual_likes: false,
        })
    }
}
