//! Retry policies for outbound requests.

use crate::FetchError;
use std::time::Duration;

/// Backoff strategy between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Delay grows by `step` per attempt, capped at `max`.
    Linear { step: Duration, max: Duration },
    /// Delay doubles per attempt, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl BackoffStrategy {
    /// Delay before the attempt following `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Linear { step, max } => {
                let delay = step.saturating_mul(attempt.saturating_add(1));
                std::cmp::min(delay, *max)
            }
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                std::cmp::min(base.saturating_mul(multiplier), *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(500),
        }
    }
}

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    StatusCode(u16),
    /// Any 5xx status.
    ServerError,
    Timeout,
    ConnectionError,
}

impl RetryCondition {
    pub fn matches_status(&self, status: u16) -> bool {
        match self {
            Self::StatusCode(code) => status == *code,
            Self::ServerError => (500..600).contains(&status),
            _ => false,
        }
    }

    pub fn matches_error(&self, error: &FetchError) -> bool {
        match (self, error) {
            (Self::Timeout, FetchError::Timeout) => true,
            (Self::ConnectionError, FetchError::RequestError(_)) => true,
            (_, FetchError::HttpError { status, .. }) => self.matches_status(*status),
            _ => false,
        }
    }
}

/// Retry policy configuration.
///
/// `max_attempts` counts retries, not the first try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// A policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    pub fn should_retry_status(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_attempts && self.retry_on.iter().any(|c| c.matches_status(status))
    }

    pub fn should_retry_error(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_attempts && self.retry_on.iter().any(|c| c.matches_error(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
