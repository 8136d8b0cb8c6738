//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`DecisionRepository`], [`LikeCache`]) describe the stores
//! the domain relies on. Driving ports ([`DecisionCommand`],
//! [`LikedYouQuery`]) describe what inbound adapters may ask of the domain.

mod macros;
pub(crate) use macros::define_port_error;

mod decision_command;
mod decision_repository;
mod like_cache;
mod liked_you_query;

#[cfg(test)]
pub use decision_command::MockDecisionCommand;
pub use decision_command::{
    DecisionCommand, FixtureDecisionCommand, PutDecisionRequest, PutDecisionResponse,
};
#[cfg(test)]
pub use decision_repository::MockDecisionRepository;
pub use decision_repository::{DecisionRepository, DecisionRepositoryError};
#[cfg(test)]
pub use like_cache::MockLikeCache;
pub use like_cache::{LikeCache, LikeCacheError};
#[cfg(test)]
pub use liked_you_query::MockLikedYouQuery;
pub use liked_you_query::{
    CountLikedYouRequest, CountLikedYouResponse, FixtureLikedYouQuery, LikedYouQuery,
    LikerPayload, ListLikedYouRequest, ListLikedYouResponse,
};
