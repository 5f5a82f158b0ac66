use std::fmt;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::envelope::{Envelope, ErrorBody};
use super::{ApiError, CalendarApi, EventQuery};
use crate::config::ApiConfig;
use crate::models::calendar::{Calendar, CalendarPatch, SharePermission};
use crate::models::event::{Event, EventPatch};

/// Blocking HTTP implementation of [`CalendarApi`].
///
/// Idempotent requests (`GET`, `PUT`, `DELETE`) are retried on network
/// errors and gateway failures; `POST` and `PATCH` are sent once.
pub struct HttpCalendarApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    sync_enabled: bool,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl fmt::Debug for HttpCalendarApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCalendarApi")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***redacted***"))
            .field("sync_enabled", &self.sync_enabled)
            .finish()
    }
}

impl HttpCalendarApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build calendar API HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            sync_enabled: config.sync_enabled,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    pub fn set_sync_enabled(&mut self, enabled: bool) {
        log::info!("Calendar sync {}", if enabled { "enabled" } else { "disabled" });
        self.sync_enabled = enabled;
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Envelope<T>, ApiError> {
        if !self.sync_enabled {
            return Err(ApiError::Offline);
        }

        let retries = if is_idempotent(&method) {
            self.max_retries
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            match self.request_once(method.clone(), path, body.as_ref()) {
                Err(err) if err.is_transient() && attempt < retries => {
                    attempt += 1;
                    log::warn!(
                        "{} {} attempt {} failed: {}",
                        method,
                        path,
                        attempt,
                        err
                    );
                    thread::sleep(Duration::from_millis(self.retry_delay_ms));
                }
                Err(err) => {
                    log::warn!("{} {} failed: {}", method, path, err);
                    return Err(err);
                }
                Ok(envelope) => return Ok(envelope),
            }
        }
    }

    fn request_once<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Envelope<T>, ApiError> {
        log::debug!("{} {}", method, path);

        let mut request = self.client.request(method, self.url(path));
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| ApiError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ApiError::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(ApiError::from_status(status, message));
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .error_message()
                .unwrap_or_else(|| "Request was not successful".to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope)
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        self.request::<T>(method, path, body)?
            .data
            .ok_or_else(|| ApiError::Decode(format!("Response to {} has no data", path)))
    }

    fn send(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.request::<Value>(method, path, None).map(|_| ())
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::PUT | Method::DELETE)
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl CalendarApi for HttpCalendarApi {
    fn health_check(&self) -> Result<(), ApiError> {
        self.send(Method::GET, "/health")
    }

    fn list_calendars(&self) -> Result<Vec<Calendar>, ApiError> {
        Ok(self
            .request::<Vec<Calendar>>(Method::GET, "/calendars", None)?
            .data
            .unwrap_or_default())
    }

    fn get_calendar(&self, id: &str) -> Result<Calendar, ApiError> {
        self.fetch(Method::GET, &format!("/calendars/{}", segment(id)), None)
    }

    fn create_calendar(&self, calendar: &Calendar) -> Result<Calendar, ApiError> {
        self.fetch(Method::POST, "/calendars", Some(to_body(calendar)?))
    }

    fn create_default_calendar(&self) -> Result<Calendar, ApiError> {
        self.fetch(Method::POST, "/calendars/create-default", None)
    }

    fn update_calendar(&self, id: &str, patch: &CalendarPatch) -> Result<Calendar, ApiError> {
        self.fetch(
            Method::PUT,
            &format!("/calendars/{}", segment(id)),
            Some(to_body(patch)?),
        )
    }

    fn delete_calendar(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/calendars/{}", segment(id)))
    }

    fn toggle_calendar_visibility(&self, id: &str) -> Result<Calendar, ApiError> {
        self.fetch(
            Method::PATCH,
            &format!("/calendars/{}/visibility", segment(id)),
            None,
        )
    }

    fn share_calendar(
        &self,
        id: &str,
        email: &str,
        permission: SharePermission,
    ) -> Result<(), ApiError> {
        self.request::<Value>(
            Method::POST,
            &format!("/calendars/{}/share", segment(id)),
            Some(json!({ "email": email, "permission": permission })),
        )
        .map(|_| ())
    }

    fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
        let path = format!("/events{}", query.to_query_string());
        Ok(self
            .request::<Vec<Event>>(Method::GET, &path, None)?
            .data
            .unwrap_or_default())
    }

    fn get_event(&self, id: &str) -> Result<Event, ApiError> {
        self.fetch(Method::GET, &format!("/events/{}", segment(id)), None)
    }

    fn create_event(&self, event: &Event) -> Result<Event, ApiError> {
        self.fetch(Method::POST, "/events", Some(to_body(event)?))
    }

    fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, ApiError> {
        self.fetch(
            Method::PUT,
            &format!("/events/{}", segment(id)),
            Some(to_body(patch)?),
        )
    }

    fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/events/{}", segment(id)))
    }

    fn move_event(&self, id: &str, new_calendar_id: &str) -> Result<Event, ApiError> {
        self.fetch(
            Method::PATCH,
            &format!("/events/{}/move", segment(id)),
            Some(json!({ "newCalendarId": new_calendar_id })),
        )
    }

    fn duplicate_event(
        &self,
        id: &str,
        new_id: &str,
        new_calendar_id: &str,
    ) -> Result<Event, ApiError> {
        self.fetch(
            Method::POST,
            &format!("/events/{}/duplicate", segment(id)),
            Some(json!({ "newId": new_id, "newCalendarId": new_calendar_id })),
        )
    }
}
