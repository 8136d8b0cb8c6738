//! Driving port for "liked you" reads.
//!
//! Inbound adapters use this port to list and count a recipient's likers
//! without depending on which store serves the read.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Liker, UserId};

/// Request for one page of a recipient's likers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikedYouRequest {
    /// Recipient whose likers are listed.
    pub recipient_user_id: UserId,
    /// Token from the previous page; `None` or an empty string requests the
    /// first page.
    pub pagination_token: Option<String>,
}

/// Liker entry returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikerPayload {
    /// The liking user.
    #[schema(value_type = String, example = "user-1")]
    pub actor_id: UserId,
    /// When the like was recorded, in seconds since the Unix epoch.
    #[schema(example = 1_700_000_000)]
    pub unix_timestamp: u64,
}

impl TryFrom<Liker> for LikerPayload {
    type Error = Error;

    /// Fails for likes stamped before the Unix epoch, which the wire format
    /// cannot carry.
    fn try_from(value: Liker) -> Result<Self, Self::Error> {
        let unix_timestamp = u64::try_from(value.timestamp()).map_err(|_| {
            Error::internal(format!(
                "like by {} has pre-epoch timestamp {}",
                value.actor_id(),
                value.timestamp()
            ))
        })?;
        Ok(Self {
            actor_id: value.actor_id().clone(),
            unix_timestamp,
        })
    }
}

/// One page of likers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListLikedYouResponse {
    /// Likers on this page in ascending score order.
    pub likers: Vec<LikerPayload>,
    /// Token for the next page; absent on the final page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_pagination_token: Option<String>,
}

/// Request for a recipient's liker count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountLikedYouRequest {
    /// Recipient whose likers are counted.
    pub recipient_user_id: UserId,
}

/// Liker count for a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountLikedYouResponse {
    /// Number of users currently liking the recipient.
    pub count: u64,
}

/// Driving port for liked-you reads.
///
/// # Examples
///
/// ```rust,no_run
/// # use explore::domain::UserId;
/// # use explore::domain::ports::{FixtureLikedYouQuery, LikedYouQuery, ListLikedYouRequest};
/// # async fn example() -> Result<(), explore::domain::Error> {
/// let request = ListLikedYouRequest {
///     recipient_user_id: UserId::new("u2").expect("valid id"),
///     pagination_token: None,
/// };
/// let page = FixtureLikedYouQuery.list_liked_you(request).await?;
/// assert!(page.likers.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikedYouQuery: Send + Sync {
    /// List users who like the recipient.
    async fn list_liked_you(
        &self,
        request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error>;

    /// List users who like the recipient and have not been liked back.
    async fn list_new_liked_you(
        &self,
        request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error>;

    /// Count users who like the recipient.
    async fn count_liked_you(
        &self,
        request: CountLikedYouRequest,
    ) -> Result<CountLikedYouResponse, Error>;
}

/// Fixture query that reports no likers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLikedYouQuery;

#[async_trait]
impl LikedYouQuery for FixtureLikedYouQuery {
    async fn list_liked_you(
        &self,
        _request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error> {
        Ok(ListLikedYouResponse {
            likers: Vec::new(),
            next_pagination_token: None,
        })
    }

    async fn list_new_liked_you(
        &self,
        _request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error> {
        Ok(ListLikedYouResponse {
            likers: Vec::new(),
            next_pagination_token: None,
        })
    }

    async fn count_liked_you(
        &self,
        _request: CountLikedYouRequest,
    ) -> Result<CountLikedYouResponse, Error> {
        Ok(CountLikedYouResponse { count: 0 })
    }
}
