//! Simulated network latency
//!
//! The services sit on in-memory data, so latency only exists to imitate a
//! remote backend while developing a UI against them. The default profile is
//! zero everywhere, which keeps tests deterministic.

use rand::Rng;
use std::time::Duration;

/// Kind of call, each with its own simulated delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Whole collection
    LoadAll,
    /// Single record by id
    Load,
    /// Record keyed by project
    ByProject,
    /// Filtered read (category, featured, search)
    Query,
    /// Insert
    Create,
    /// Modify
    Update,
    /// Remove
    Delete,
    /// Analytics aggregation
    Analytics,
}

/// Delay applied before a call resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    /// No delay
    #[default]
    None,
    /// Constant delay
    Fixed(Duration),
    /// Uniformly random delay in `[min, max]`
    Between(Duration, Duration),
}

impl Latency {
    /// Constant delay in milliseconds
    #[inline]
    #[must_use]
    pub fn fixed_ms(ms: u64) -> Self {
        Self::Fixed(Duration::from_millis(ms))
    }

    /// Random delay between two millisecond bounds
    #[inline]
    #[must_use]
    pub fn between_ms(min: u64, max: u64) -> Self {
        Self::Between(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Concrete delay for one call
    #[must_use]
    pub fn sample(self) -> Duration {
        match self {
            Latency::None => Duration::ZERO,
            Latency::Fixed(d) => d,
            Latency::Between(min, max) if max <= min => min,
            Latency::Between(min, max) => {
                let lo = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
                let hi = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(rand::rng().random_range(lo..=hi))
            }
        }
    }
}

/// Per-endpoint delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyProfile {
    load_all: Latency,
    load: Latency,
    by_project: Latency,
    query: Latency,
    create: Latency,
    update: Latency,
    delete: Latency,
    analytics: Latency,
}

impl LatencyProfile {
    /// No delays anywhere
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Delays of the mock backend the UI was developed against
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            load_all: Latency::fixed_ms(300),
            load: Latency::between_ms(100, 300),
            by_project: Latency::fixed_ms(350),
            query: Latency::between_ms(200, 300),
            create: Latency::fixed_ms(400),
            update: Latency::between_ms(200, 500),
            delete: Latency::between_ms(150, 400),
            analytics: Latency::fixed_ms(400),
        }
    }

    /// Same delay for every endpoint
    #[must_use]
    pub fn uniform(latency: Latency) -> Self {
        Self {
            load_all: latency,
            load: latency,
            by_project: latency,
            query: latency,
            create: latency,
            update: latency,
            delete: latency,
            analytics: latency,
        }
    }

    /// Override one endpoint
    #[must_use]
    pub fn with(mut self, endpoint: Endpoint, latency: Latency) -> Self {
        *self.slot(endpoint) = latency;
        self
    }

    /// Configured delay of an endpoint
    #[must_use]
    pub fn get(&self, endpoint: Endpoint) -> Latency {
        match endpoint {
            Endpoint::LoadAll => self.load_all,
            Endpoint::Load => self.load,
            Endpoint::ByProject => self.by_project,
            Endpoint::Query => self.query,
            Endpoint::Create => self.create,
            Endpoint::Update => self.update,
            Endpoint::Delete => self.delete,
            Endpoint::Analytics => self.analytics,
        }
    }

    fn slot(&mut self, endpoint: Endpoint) -> &mut Latency {
        match endpoint {
            Endpoint::LoadAll => &mut self.load_all,
            Endpoint::Load => &mut self.load,
            Endpoint::ByProject => &mut self.by_project,
            Endpoint::Query => &mut self.query,
            Endpoint::Create => &mut self.create,
            Endpoint::Update => &mut self.update,
            Endpoint::Delete => &mut self.delete,
            Endpoint::Analytics => &mut self.analytics,
        }
    }

    /// Sleep for the endpoint's delay
    pub async fn pause(&self, endpoint: Endpoint) {
        let delay = self.get(endpoint).sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
