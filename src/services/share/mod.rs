//! Shareable event links.
//!
//! A link carries only an 8-character id (`<base>?s=<id>`). The event itself
//! is stored locally as an obfuscated payload that expires after a number of
//! days. Old-style links that embed the event (`?share=<base64>`) are still
//! understood.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, info};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::config::ShareConfig;
use crate::models::event::Event;
use crate::models::shared_event::SharedEvent;

mod cipher;
mod payload;

pub use cipher::{encode_uri_component, obfuscate, reveal};
pub use payload::{decode_legacy, decode_payload, encode_payload};

pub const SHORT_ID_LEN: usize = 8;
const SHORT_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const MAX_ID_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Could not decode shared data: {0}")]
    Decode(String),
    #[error("Invalid shared event data: {0}")]
    InvalidPayload(String),
    #[error("'{0}' is not a share link")]
    InvalidLink(String),
}

/// The part of a share URL that identifies the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareLink {
    /// `?s=<short id>`, resolved through share storage.
    Short(String),
    /// `?share=<base64 query string>`, self-contained.
    Legacy(String),
}

/// Extract the share parameter from a URL. `s` wins over `share`.
pub fn parse_link(url: &str) -> Result<ShareLink, ShareError> {
    let query = url
        .split_once('?')
        .map(|(_, query)| query.split('#').next().unwrap_or_default())
        .ok_or_else(|| ShareError::InvalidLink(url.to_string()))?;
    let pairs = payload::query_pairs(query)?;

    let find = |name: &str| {
        pairs
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.clone())
    };

    find("s")
        .map(ShareLink::Short)
        .or_else(|| find("share").map(ShareLink::Legacy))
        .ok_or_else(|| ShareError::InvalidLink(url.to_string()))
}

pub fn generate_short_id() -> String {
    let mut rng = rand::rng();
    (0..SHORT_ID_LEN)
        .map(|_| SHORT_ID_ALPHABET[rng.random_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect()
}

/// Creates and resolves share links backed by the `shared_links` table.
pub struct ShareService<'a> {
    conn: &'a Connection,
    base_url: String,
    expiry: Duration,
}

impl<'a> ShareService<'a> {
    pub fn new(conn: &'a Connection, config: &ShareConfig) -> Self {
        Self {
            conn,
            base_url: config.base_url.clone(),
            expiry: Duration::days(i64::from(config.expiry_days)),
        }
    }

    pub fn link_url(&self, short_id: &str) -> String {
        format!("{}?s={}", self.base_url, short_id)
    }

    /// Store `event` and return its share URL.
    pub fn create_link(&self, event: &Event) -> Result<String> {
        self.create_link_at(event, Utc::now())
    }

    /// Look up a short id. Expired entries are deleted and yield `None`.
    pub fn open(&self, short_id: &str) -> Result<Option<SharedEvent>> {
        self.open_at(short_id, Utc::now())
    }

    /// Resolve any share URL, short or legacy.
    pub fn resolve(&self, url: &str) -> Result<Option<SharedEvent>> {
        match parse_link(url)? {
            ShareLink::Short(id) => self.open(&id),
            ShareLink::Legacy(param) => Ok(Some(decode_legacy(&param)?)),
        }
    }

    /// Delete every expired link; returns how many were removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        self.cleanup_expired_at(Utc::now())
    }

    fn create_link_at(&self, event: &Event, now: DateTime<Utc>) -> Result<String> {
        let token = encode_payload(&SharedEvent::from_event(event))?;
        let expires_at = timestamp(now + self.expiry);

        for _ in 0..MAX_ID_ATTEMPTS {
            let short_id = generate_short_id();
            let inserted = self
                .conn
                .execute(
                    "INSERT OR IGNORE INTO shared_links (short_id, payload, created_at, expires_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![short_id, token, timestamp(now), expires_at],
                )
                .context("Failed to store shared link")?;

            if inserted == 1 {
                info!("Created share link {} for event {}", short_id, event.id);
                return Ok(self.link_url(&short_id));
            }
            debug!("Share id {} already taken, retrying", short_id);
        }

        anyhow::bail!("Could not allocate a unique share id")
    }

    fn open_at(&self, short_id: &str, now: DateTime<Utc>) -> Result<Option<SharedEvent>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT payload, expires_at FROM shared_links WHERE short_id = ?1",
                [short_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("Failed to read shared link")?;

        let Some((token, expires_at)) = row else {
            return Ok(None);
        };

        if expires_at <= timestamp(now) {
            info!("Share link {} has expired", short_id);
            self.conn
                .execute("DELETE FROM shared_links WHERE short_id = ?1", [short_id])
                .context("Failed to delete expired link")?;
            return Ok(None);
        }

        Ok(Some(decode_payload(&token)?))
    }

    fn cleanup_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM shared_links WHERE expires_at <= ?1",
                [timestamp(now)],
            )
            .context("Failed to clean up shared links")?;
        if removed > 0 {
            info!("Removed {} expired share links", removed);
        }
        Ok(removed)
    }
}

/// Fixed-width UTC timestamp, so stored values compare as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
