//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they can be exercised with fixtures or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    DecisionCommand, FixtureDecisionCommand, FixtureLikedYouQuery, LikedYouQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub decisions: Arc<dyn DecisionCommand>,
    pub liked_you: Arc<dyn LikedYouQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(decisions: Arc<dyn DecisionCommand>, liked_you: Arc<dyn LikedYouQuery>) -> Self {
        Self {
            decisions,
            liked_you,
        }
    }

    /// State backed by the fixture ports, which accept every decision and
    /// report no likers.
    pub fn fixtures() -> Self {
        Self::new(Arc::new(FixtureDecisionCommand), Arc::new(FixtureLikedYouQuery))
    }
}
