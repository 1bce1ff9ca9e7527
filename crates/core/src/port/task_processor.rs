// Task Processor Port
// Abstraction for performing the unit of work behind a task

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use thiserror::Error;

use crate::domain::Task;
use crate::port::time_provider::TimeProvider;

/// Processing errors
#[derive(Error, Debug, Clone)]
pub enum ProcessingError {
    #[error("Processing failed: {0}")]
    Failed(String),
}

/// Task Processor trait
///
/// Implementations:
/// - FixedDelayProcessor: simulated work, waits then reports
/// - MockProcessor: scripted outcomes for tests
#[async_trait]
pub trait TaskProcessor: Send + Sync {
    /// Perform the work for one task and return its result string
    ///
    /// # Errors
    /// - ProcessingError::Failed when the unit of work cannot complete
    async fn process(&self, task: &Task) -> Result<String, ProcessingError>;
}

/// Production processor: waits a fixed interval, then reports when the
/// work finished.
pub struct FixedDelayProcessor {
    delay: Duration,
    time_provider: Arc<dyn TimeProvider>,
}

impl FixedDelayProcessor {
    pub fn new(delay: Duration, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            delay,
            time_provider,
        }
    }
}

#[async_trait]
impl TaskProcessor for FixedDelayProcessor {
    async fn process(&self, task: &Task) -> Result<String, ProcessingError> {
        tokio::time::sleep(self.delay).await;
        let completed_at = self
            .time_provider
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(format!("Task {} processed at {}", task.id, completed_at))
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock processor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed with a canned result
        Success,
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Task Processor for testing
    pub struct MockProcessor {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockProcessor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl TaskProcessor for MockProcessor {
        async fn process(&self, task: &Task) -> Result<String, ProcessingError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success => Ok(format!("Task {} processed at mock-time", task.id)),
                MockBehavior::Fail(msg) => Err(ProcessingError::Failed(msg)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
