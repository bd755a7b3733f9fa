//! Example plan download.
//!
//! # Responsibility
//! - Fetch the example plan document with one blocking HTTP GET.
//!
//! # Invariants
//! - No retry; callers decide whether to try again.
//! - The body is returned verbatim; parsing happens through the normal load path.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Location of the published example plan.
pub const EXAMPLE_PLAN_URL: &str =
    "https://github.com/Johannett321/acit4420-oblig1/blob/main/CodePlans/ExamplePlans.json?raw=true";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum RemoteError {
    /// Connection, TLS or body transfer failure.
    Http(reqwest::Error),
    /// Server answered with a non-success status.
    Status(u16),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "download failed: {err}"),
            Self::Status(code) => write!(f, "download failed with HTTP status {code}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Downloads `url` and returns the response body as text.
pub fn fetch_text(url: &str) -> Result<String, RemoteError> {
    let started_at = Instant::now();
    info!("event=example_download module=remote status=start");

    match fetch_inner(url) {
        Ok(body) => {
            info!(
                "event=example_download module=remote status=ok duration_ms={} bytes={}",
                started_at.elapsed().as_millis(),
                body.len()
            );
            Ok(body)
        }
        Err(err) => {
            error!(
                "event=example_download module=remote status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn fetch_inner(url: &str) -> Result<String, RemoteError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }
    Ok(response.text()?)
}
