//! Rebuild like-cache entries from the decision store.
//!
//! # Examples
//! ```sh
//! EXPLORE_DATABASE_URL=postgres://localhost/explore \
//! EXPLORE_REDIS_URL=redis://localhost:6379 \
//!   cargo run --manifest-path backend/Cargo.toml --bin reconcile-likes -- --recipient u1 --recipient u2
//! ```

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use explore::domain::{LikeCacheReconciler, UserId};
use explore::outbound::cache::RedisLikeCache;
use explore::outbound::persistence::{DbPool, DieselDecisionRepository};
use explore::settings::ExploreSettings;

/// Reconcile the like cache for one or more recipients.
#[derive(Debug, Parser)]
#[command(name = "reconcile-likes", version)]
struct Cli {
    /// Recipient whose cached likers are rebuilt; repeat for several.
    #[arg(long = "recipient", required = true)]
    recipients: Vec<String>,
}

fn parse_recipients(raw: Vec<String>) -> Result<Vec<UserId>> {
    raw.into_iter()
        .map(|id| UserId::new(id.as_str()).map_err(|err| eyre!("invalid recipient {id:?}: {err}")))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let recipients = parse_recipients(cli.recipients)?;

    // Flags belong to this binary; settings come from the environment and
    // configuration files only.
    let settings = ExploreSettings::load_from_iter([OsString::from("reconcile-likes")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("failed to build decision store pool")?;
    let cache = RedisLikeCache::connect(&settings.redis_pool_config()?)
        .await
        .wrap_err("failed to connect like cache")?;
    let reconciler = LikeCacheReconciler::new(
        Arc::new(DieselDecisionRepository::new(pool)),
        Arc::new(cache),
        settings.page_size()?,
    );

    for recipient in &recipients {
        let report = reconciler
            .reconcile(recipient)
            .await
            .wrap_err_with(|| format!("failed to reconcile {recipient}"))?;
        info!(
            %recipient,
            added = report.added,
            removed = report.removed,
            retracted = report.retracted,
            "recipient reconciled"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn recipients_are_repeatable() {
        let cli = Cli::try_parse_from(["reconcile-likes", "--recipient", "u1", "--recipient", "u2"])
            .expect("arguments parse");
        let recipients = parse_recipients(cli.recipients).expect("valid ids");
        let ids: Vec<_> = recipients.iter().map(UserId::as_str).collect();
        assert_eq!(ids, vec!["u1", "u2"]);
    }

    #[rstest]
    fn at_least_one_recipient_is_required() {
        assert!(Cli::try_parse_from(["reconcile-likes"]).is_err());
    }

    #[rstest]
    fn blank_recipient_is_rejected() {
        assert!(parse_recipients(vec!["  ".to_owned()]).is_err());
    }
}
