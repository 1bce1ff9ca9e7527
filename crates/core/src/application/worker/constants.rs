// Worker constants (no magic values)
use std::time::Duration;

/// Sleep duration when no jobs are available (100ms)
pub const IDLE_SLEEP_DURATION: Duration = Duration::from_millis(100);

/// Sleep duration after worker error before retry (1s)
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

/// How long a dequeued job stays invisible before the queue hands it out
/// again (crash redelivery window)
pub const JOB_LEASE_DURATION: Duration = Duration::from_secs(30);

/// Deliveries per job before the queue drops it instead of redelivering
pub const MAX_JOB_DELIVERIES: i64 = 3;

/// Default simulated work interval (3s)
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(3);
