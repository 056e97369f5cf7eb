use reqwest::header::CONTENT_LENGTH;
use std::time::Duration;
use url::Url;

use super::ProbeError;

/// Delay before the single retry of a transient failure.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Issues a header-only request to determine a remote attachment's byte
/// length. The body is never downloaded.
///
/// Each attempt is bounded by `probe_timeout`. Transient failures
/// (timeout, connection error, 5xx) are retried exactly once; anything
/// else surfaces immediately. A missing `Content-Length` header on a
/// successful response is [`ProbeError::LengthUnavailable`].
pub(crate) async fn head_content_length(
    client: &reqwest::Client,
    url: &Url,
    probe_timeout: Duration,
) -> Result<u64, ProbeError> {
    let mut retried = false;

    loop {
        let attempt = tokio::time::timeout(probe_timeout, client.head(url.clone()).send()).await;

        let failure = match attempt {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    // Read the header directly; Response::content_length
                    // reflects the (empty) HEAD body, not the advertised size
                    return response
                        .headers()
                        .get(CONTENT_LENGTH)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .ok_or(ProbeError::LengthUnavailable);
                }
                if response.status().is_server_error() {
                    format!("HTTP status {}", response.status())
                } else {
                    // Client errors are not transient; fail immediately
                    return Err(ProbeError::Unreachable(format!(
                        "HTTP status {}",
                        response.status()
                    )));
                }
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {:?}", probe_timeout),
        };

        if retried {
            return Err(ProbeError::Unreachable(failure));
        }

        tracing::debug!(url = %url, error = %failure, "Length probe failed, retrying once");
        tokio::time::sleep(RETRY_DELAY).await;
        retried = true;
    }
}
