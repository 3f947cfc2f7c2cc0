//! Media materialization.
//!
//! Downloads provider media and re-hosts it in object storage. Every failure
//! along the way (fetch, timeout, upload, key collision) falls back to the
//! original remote URL so the message itself is never lost.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use media_store::StoreClient;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classify::{MediaCategory, MediaRef};

/// Some media hosts reject requests with default/empty user agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";

/// Voice-note containers are unreliable in their reported type; force one.
const AUDIO_CONTENT_TYPE: &str = "audio/ogg";

/// Re-hosts remote media in durable storage.
#[derive(Debug, Clone)]
pub struct Materializer {
    http: Client,
    store: Option<StoreClient>,
}

impl Materializer {
    /// Fetch timeout. A hanging media host must not stall ingestion.
    const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Build a materializer. Without a store client it passes original URLs
    /// through unchanged (fallback-only mode).
    pub fn new(store: Option<StoreClient>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Self::FETCH_TIMEOUT).build()?;
        Ok(Self { http, store })
    }

    /// Re-host the referenced media, returning the URL to persist.
    ///
    /// `None` means the payload carried no URL at all; otherwise the result
    /// is the durable public URL, or the original remote URL after any
    /// failure.
    pub async fn materialize(&self, media: &MediaRef) -> Option<String> {
        let url = media.url.as_deref()?;

        let store = match &self.store {
            Some(store) => store,
            None => {
                debug!(url, "No media store configured; keeping original URL");
                return Some(url.to_string());
            }
        };

        let response = match self
            .http
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(url, status = %resp.status(), "Media fetch rejected; keeping original URL");
                return Some(url.to_string());
            }
            Err(e) => {
                warn!(url, error = %e, "Media fetch failed; keeping original URL");
                return Some(url.to_string());
            }
        };

        let fetched_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                warn!(url, error = %e, "Media body read failed; keeping original URL");
                return Some(url.to_string());
            }
        };

        let content_type = final_content_type(media, fetched_type.as_deref());
        let key = object_key(&content_type);

        match store.upload(&key, bytes, &content_type, true).await {
            Ok(()) => {
                debug!(url, key, "Media re-hosted");
                Some(store.public_url(&key))
            }
            Err(e) => {
                warn!(url, key, error = %e, "Media upload failed; keeping original URL");
                Some(url.to_string())
            }
        }
    }
}

/// Decide the stored content type: audio is forced to a fixed container,
/// everything else trusts the provider hint, then the fetched type.
fn final_content_type(media: &MediaRef, fetched: Option<&str>) -> String {
    if media.category == MediaCategory::Audio {
        return AUDIO_CONTENT_TYPE.to_string();
    }
    media
        .mime_hint
        .as_deref()
        .or(fetched)
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Collision-resistant object key: unix millis, random suffix, extension.
fn object_key(content_type: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix = Uuid::new_v4().simple().to_string();
    format!("inbound/{}-{}.{}", millis, &suffix[..8], extension_for(content_type))
}

/// File extension for a content type. Parameters ("; codecs=...") are ignored.
fn extension_for(content_type: &str) -> &'static str {
    let base = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();

    match base {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "audio/ogg" => "ogg",
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "video/mp4" => "mp4",
        "video/3gpp" => "3gp",
        "application/pdf" => "pdf",
        "text/csv" => "csv",
        "text/plain" => "txt",
        _ => "bin",
    }
}
