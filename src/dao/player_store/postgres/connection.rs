use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::time::sleep;
use tracing::warn;

use super::{
    config::PostgresConfig,
    error::{PgDaoError, PgResult},
};

struct RetryPolicy;

impl RetryPolicy {
    const MAX_ATTEMPTS: u32 = 10;
    const INITIAL_DELAY_MS: u64 = 250;

    fn initial_delay() -> Duration {
        Duration::from_millis(Self::INITIAL_DELAY_MS)
    }

    fn next_delay(current: Duration) -> Duration {
        (current * 2).min(Duration::from_secs(5))
    }
}

pub async fn establish_pool(config: &PostgresConfig) -> PgResult<PgPool> {
    let mut attempts = 0;
    let mut delay = RetryPolicy::initial_delay();

    loop {
        let outcome = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.options.clone())
            .await;

        match outcome {
            Ok(pool) => return Ok(pool),
            Err(err) => {
                attempts += 1;
                if attempts >= RetryPolicy::MAX_ATTEMPTS {
                    return Err(PgDaoError::Connect {
                        attempts,
                        source: err,
                    });
                }
                warn!(attempt = attempts, error = %err, "PostgreSQL connection attempt failed");
                sleep(delay).await;
                delay = RetryPolicy::next_delay(delay);
            }
        }
    }
}
