use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};

use crate::http::{JsonRequest, post_json};
use crate::oauth::{Credentials, authorization_header};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostId(pub(crate) String);

/// Creates one post, optionally as a reply to an earlier one.
pub(crate) trait StatusClient {
    fn create_post(&mut self, text: &str, reply_to: Option<&PostId>) -> Result<PostId>;
}

/// Publishes the chunks of one line as a single thread.
pub(crate) trait Poster {
    fn post_thread(&mut self, chunks: &[String]) -> Result<()>;
}

impl<P: Poster + ?Sized> Poster for Box<P> {
    fn post_thread(&mut self, chunks: &[String]) -> Result<()> {
        (**self).post_thread(chunks)
    }
}

pub(crate) struct DryRunPoster<W> {
    out: W,
}

impl<W: Write> DryRunPoster<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Poster for DryRunPoster<W> {
    fn post_thread(&mut self, chunks: &[String]) -> Result<()> {
        let total = chunks.len();
        writeln!(self.out, "[DRY_RUN] Would post:")?;
        for (idx, chunk) in chunks.iter().enumerate() {
            writeln!(self.out, "  ({}/{total}) {chunk}", idx + 1)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

pub(crate) struct ThreadPoster<C> {
    client: C,
}

impl<C: StatusClient> ThreadPoster<C> {
    pub(crate) fn new(client: C) -> Self {
        Self { client }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }
}

impl<C: StatusClient> Poster for ThreadPoster<C> {
    fn post_thread(&mut self, chunks: &[String]) -> Result<()> {
        let mut reply_to: Option<PostId> = None;
        for chunk in chunks {
            let id = self.client.create_post(chunk, reply_to.as_ref())?;
            tracing::debug!(id = %id.0, "post created");
            reply_to = Some(id);
        }
        Ok(())
    }
}

pub(crate) struct ApiClient {
    url: String,
    credentials: Credentials,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl ApiClient {
    pub(crate) fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl StatusClient for ApiClient {
    fn create_post(&mut self, text: &str, reply_to: Option<&PostId>) -> Result<PostId> {
        let body = post_body(text, reply_to).to_string();
        let authorization = authorization_header(&self.credentials, "POST", &self.url)?;
        let raw = post_json(&JsonRequest {
            url: &self.url,
            authorization: Some(&authorization),
            body: &body,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
        })
        .with_context(|| format!("failed to create post at {}", self.url))?;
        parse_post_id(&raw)
    }
}

pub(crate) fn post_body(text: &str, reply_to: Option<&PostId>) -> Value {
    match reply_to {
        Some(parent) => json!({
            "text": text,
            "reply": { "in_reply_to_tweet_id": parent.0 },
        }),
        None => json!({ "text": text }),
    }
}

pub(crate) fn parse_post_id(raw: &str) -> Result<PostId> {
    let parsed: Value = serde_json::from_str(raw).context("post response is not JSON")?;
    let id = match parsed.pointer("/data/id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(anyhow!("post response has no data.id: {raw}")),
    };
    Ok(PostId(id))
}
