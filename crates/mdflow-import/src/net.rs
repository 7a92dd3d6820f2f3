//! Resilient network client (spec §4.7): every remote GET uses a per-request
//! timeout, exponential backoff with jitter (base 1s, cap 10s, multiplier 2,
//! 4 attempts total), and retryable-error classification (network errors,
//! HTTP 429/5xx).

use std::time::Duration;

use mdflow_core::MdflowError;
use rand::Rng;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const BASE_DELAY: Duration = Duration::from_secs(1);
const CAP_DELAY: Duration = Duration::from_secs(10);
const MULTIPLIER: u32 = 2;
const TOTAL_ATTEMPTS: u32 = 4;

#[derive(Debug)]
enum Outcome {
    Success(String),
    Retryable(String),
    Fatal(MdflowError),
}

async fn attempt_once(client: &reqwest::Client, url: &str, timeout: Duration) -> Outcome {
    let request = client.get(url).timeout(timeout).send();
    match request.await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.text().await {
                    Ok(body) => Outcome::Success(body),
                    Err(e) => Outcome::Retryable(e.to_string()),
                }
            } else if status.as_u16() == 429 || status.is_server_error() {
                Outcome::Retryable(format!("HTTP {status}"))
            } else {
                Outcome::Fatal(MdflowError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                })
            }
        }
        Err(e) => {
            if e.is_timeout() {
                Outcome::Fatal(MdflowError::FetchTimeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                })
            } else if e.is_connect() || e.is_request() {
                Outcome::Retryable(e.to_string())
            } else {
                Outcome::Fatal(MdflowError::FetchExhausted {
                    url: url.to_string(),
                    attempts: 1,
                    cause: e.to_string(),
                })
            }
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE_DELAY.saturating_mul(MULTIPLIER.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp.min(CAP_DELAY);
    let jitter_ms = rand::thread_rng().gen_range(0..=capped.as_millis() as u64 / 4);
    capped + Duration::from_millis(jitter_ms)
}

/// Performs a resilient GET against `url`. Returns the response body on
/// success, or `FetchExhausted`/`FetchTimeout`/`HttpStatus` on failure.
pub async fn resilient_get(client: &reqwest::Client, url: &str) -> Result<String, MdflowError> {
    let mut last_cause = String::new();
    for attempt in 1..=TOTAL_ATTEMPTS {
        match attempt_once(client, url, DEFAULT_TIMEOUT).await {
            Outcome::Success(body) => return Ok(body),
            Outcome::Fatal(err) => return Err(err),
            Outcome::Retryable(cause) => {
                last_cause = cause;
                if attempt < TOTAL_ATTEMPTS {
                    tokio::time::sleep(backoff_delay(attempt)).await;
                }
            }
        }
    }
    Err(MdflowError::FetchExhausted {
        url: url.to_string(),
        attempts: TOTAL_ATTEMPTS,
        cause: last_cause,
    })
}
