use std::time::Duration;

use anyhow::{Result, anyhow};

pub(crate) struct JsonRequest<'a> {
    pub(crate) url: &'a str,
    pub(crate) authorization: Option<&'a str>,
    pub(crate) body: &'a str,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
}

/// One POST attempt; the caller decides what a failure means.
pub(crate) fn post_json(request: &JsonRequest<'_>) -> Result<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(request.connect_timeout)
        .timeout_read(request.read_timeout)
        .timeout_write(request.read_timeout)
        .build();

    let mut call = agent
        .post(request.url)
        .set("Content-Type", "application/json");
    if let Some(authorization) = request.authorization {
        call = call.set("Authorization", authorization);
    }

    match call.send_string(request.body) {
        Ok(response) => response
            .into_string()
            .map_err(|err| anyhow!("request failed: response decode failed: {err}")),
        Err(ureq::Error::Status(status, response)) => {
            let response_body = response.into_string().ok().unwrap_or_default();
            let body = response_body.trim();
            if body.is_empty() {
                Err(anyhow!("request failed: HTTP status {status}"))
            } else {
                let truncated = body.chars().take(240).collect::<String>();
                Err(anyhow!("request failed: HTTP status {status} ({truncated})"))
            }
        }
        Err(ureq::Error::Transport(err)) => Err(anyhow!("request failed: transport error: {err}")),
    }
}
