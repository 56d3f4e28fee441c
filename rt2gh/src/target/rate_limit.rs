//! GitHub core-API rate limit guard.
//!
//! Each issue/comment creation first checks the remaining core-API
//! allowance and sleeps until the reset when it runs low.

use octocrab::Octocrab;
use std::time::Duration;
use tracing::{info, warn};

/// Longest we are willing to sleep waiting for a rate limit reset.
const MAX_WAIT_SECS: u64 = 3600;

/// Remaining-request floor below which we wait for the reset.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit state for the core API resource.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp at which the window resets.
    pub reset: u64,

    /// Requests allowed per window.
    pub limit: u32,
}

/// Reads the current core-API rate limit from GitHub.
///
/// # Errors
///
/// Returns an error if the rate limit endpoint itself fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Sleeps until the reset when the remaining allowance is nearly gone.
/// Returns whether a wait happened.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    if info.remaining >= MIN_REMAINING_THRESHOLD {
        return false;
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if info.reset <= now {
        return false;
    }

    let wait_secs = info.reset - now;
    if wait_secs > MAX_WAIT_SECS {
        warn!(
            wait_secs,
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset suspiciously far out, capping wait"
        );
    }

    let actual_wait = wait_secs.min(MAX_WAIT_SECS);
    info!(
        remaining = info.remaining,
        wait_secs = actual_wait,
        "Core rate limit low, waiting for reset"
    );

    tokio::time::sleep(Duration::from_secs(actual_wait)).await;
    true
}

/// Checks the core rate limit and waits out the window if necessary.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    wait_if_needed(&info).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plenty_of_headroom_means_no_wait() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 0,
            limit: 5000,
        };
        assert!(!wait_if_needed(&info).await);
    }

    #[tokio::test]
    async fn stale_reset_means_no_wait() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 0,
            limit: 5000,
        };
        assert!(!wait_if_needed(&info).await);
    }
}
