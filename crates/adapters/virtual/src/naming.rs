//! Random pump-name generator.

use std::future::Future;
use std::time::Duration;

use pumpsim_app::ports::NameProvider;
use pumpsim_domain::error::PumpSimError;

const LETTERS: usize = 3;
const DIGITS: usize = 5;
const SUFFIX_LETTERS: usize = 2;

/// Hands out serials shaped like real pump names: three letters, five digits
/// and two letters (`UHH00002TI`).
#[derive(Debug, Clone, Default)]
pub struct RandomNameProvider {
    latency: Duration,
}

impl RandomNameProvider {
    /// Provider that answers after `latency`, to mimic a remote service.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    #[must_use]
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Produce one serial without waiting.
    #[must_use]
    pub fn generate() -> String {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let letter = |b: u8| char::from(b'A' + b % 26);
        let digit = |b: u8| char::from(b'0' + b % 10);

        let mut bytes = bytes.into_iter();
        let mut name = String::with_capacity(LETTERS + DIGITS + SUFFIX_LETTERS);
        name.extend(bytes.by_ref().take(LETTERS).map(letter));
        name.extend(bytes.by_ref().take(DIGITS).map(digit));
        name.extend(bytes.take(SUFFIX_LETTERS).map(letter));
        name
    }
}

impl NameProvider for RandomNameProvider {
    fn request_name(&self) -> impl Future<Output = Result<String, PumpSimError>> + Send {
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let name = Self::generate();
            tracing::debug!(%name, "generated pump name");
            Ok(name)
        }
    }
}
