pub mod analysis;
pub mod archetypes;
pub mod assistant;
pub mod messages;
pub mod traits;
pub mod upload;

use rand::Rng;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Extra time a handle waits for a reply beyond the simulated latency.
pub(crate) const REPLY_GRACE: Duration = Duration::from_secs(30);

/// Waits out the simulated latency. Returns `false` if the requester went
/// away first, in which case the work is abandoned.
pub(crate) async fn simulated_delay<T>(latency: Duration, responder: &mut oneshot::Sender<T>) -> bool {
    tokio::select! {
        _ = responder.closed() => false,
        _ = sleep(latency) => true,
    }
}

/// Rolls the configured failure injection.
pub(crate) fn should_fail(failure_rate: f64) -> bool {
    if !failure_rate.is_finite() || failure_rate <= 0.0 {
        return false;
    }
    rand::thread_rng().gen_bool(failure_rate.min(1.0))
}
