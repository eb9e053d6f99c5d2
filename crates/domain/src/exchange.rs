//! Message exchange records.
//!
//! A [`MessageExchangeRecord`] correlates a request item with the most
//! recent request/response pair it captured. Records are created per
//! inspection and never persisted. Every accessor pulls through to the
//! item's live response, so an exchange can be inspected before a response
//! exists without special-casing it.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Header map. Keys keep the case they were given with.
pub type Headers = BTreeMap<String, String>;

/// A file attached to a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// A response captured for a request, together with what was actually sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedResponse {
    /// Request body as dispatched.
    pub request_content: String,
    /// Request headers as dispatched.
    pub request_headers: Headers,
    /// Response body.
    pub content: String,
    /// Response headers.
    pub headers: Headers,
    /// Response attachments.
    pub attachments: Vec<Attachment>,
    /// Round-trip time in milliseconds.
    pub time_taken_ms: u64,
    /// Unix timestamp (milliseconds) of when the response arrived.
    pub timestamp_ms: i64,
}

/// A model item that can take part in a message exchange.
pub trait ExchangeSource {
    /// Returns the item's name.
    fn name(&self) -> &str;

    /// Returns the request content as currently edited.
    fn request_content(&self) -> String;

    /// Returns the request headers as currently edited.
    fn request_headers(&self) -> Headers;

    /// Returns the request attachments.
    fn attachments(&self) -> Vec<Attachment>;

    /// Returns the response currently held, if any.
    fn response(&self) -> Option<Arc<CapturedResponse>>;
}

/// A request whose response slot is filled in by the transport.
#[derive(Debug, Default)]
pub struct RequestItem {
    name: String,
    content: String,
    headers: Headers,
    attachments: Vec<Attachment>,
    response: RwLock<Option<Arc<CapturedResponse>>>,
}

impl RequestItem {
    /// Creates a request with the given body.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a request attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Stores the response received for this request.
    pub fn set_response(&self, response: CapturedResponse) {
        *self.response.write() = Some(Arc::new(response));
    }

    /// Drops the stored response.
    pub fn clear_response(&self) {
        *self.response.write() = None;
    }
}

impl ExchangeSource for RequestItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_content(&self) -> String {
        self.content.clone()
    }

    fn request_headers(&self) -> Headers {
        self.headers.clone()
    }

    fn attachments(&self) -> Vec<Attachment> {
        self.attachments.clone()
    }

    fn response(&self) -> Option<Arc<CapturedResponse>> {
        self.response.read().clone()
    }
}

/// Read-through view of one request/response exchange.
#[derive(Debug)]
pub struct MessageExchangeRecord<'a, T: ExchangeSource + ?Sized> {
    item: &'a T,
    request_content_override: Option<String>,
    response: OnceLock<Arc<CapturedResponse>>,
    properties: BTreeMap<String, String>,
    messages: Vec<String>,
}

impl<'a, T: ExchangeSource + ?Sized> MessageExchangeRecord<'a, T> {
    /// Creates a record over the given item.
    ///
    /// The item's current response, if any, is pinned right away.
    #[must_use]
    pub fn new(item: &'a T) -> Self {
        let response = OnceLock::new();
        if let Some(current) = item.response() {
            let _ = response.set(current);
        }
        Self {
            item,
            request_content_override: None,
            response,
            properties: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    /// Returns the wrapped item.
    #[must_use]
    pub const fn model_item(&self) -> &'a T {
        self.item
    }

    /// Pins the request content, e.g. to what was dispatched.
    pub fn set_request_content(&mut self, content: impl Into<String>) {
        self.request_content_override = Some(content.into());
    }

    fn live_response(&self) -> Option<&CapturedResponse> {
        if let Some(response) = self.response.get() {
            return Some(response.as_ref());
        }
        let current = self.item.response()?;
        Some(self.response.get_or_init(|| current).as_ref())
    }

    /// Request content: override, then the response's record of it, then the item.
    #[must_use]
    pub fn request_content(&self) -> String {
        if let Some(content) = &self.request_content_override {
            return content.clone();
        }
        self.live_response().map_or_else(
            || self.item.request_content(),
            |response| response.request_content.clone(),
        )
    }

    /// Request headers as sent, or as edited when nothing was sent yet.
    #[must_use]
    pub fn request_headers(&self) -> Headers {
        self.live_response().map_or_else(
            || self.item.request_headers(),
            |response| response.request_headers.clone(),
        )
    }

    /// Request attachments, always taken from the item.
    #[must_use]
    pub fn request_attachments(&self) -> Vec<Attachment> {
        self.item.attachments()
    }

    /// Response body, absent when no response exists.
    #[must_use]
    pub fn response_content(&self) -> Option<&str> {
        self.live_response().map(|r| r.content.as_str())
    }

    /// Response headers, empty when no response exists.
    #[must_use]
    pub fn response_headers(&self) -> Headers {
        self.live_response()
            .map(|r| r.headers.clone())
            .unwrap_or_default()
    }

    /// Response attachments, empty when no response exists.
    #[must_use]
    pub fn response_attachments(&self) -> Vec<Attachment> {
        self.live_response()
            .map(|r| r.attachments.clone())
            .unwrap_or_default()
    }

    /// Round-trip time in milliseconds, 0 without a response.
    #[must_use]
    pub fn time_taken_ms(&self) -> u64 {
        self.live_response().map_or(0, |r| r.time_taken_ms)
    }

    /// Response timestamp in Unix milliseconds, 0 without a response.
    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.live_response().map_or(0, |r| r.timestamp_ms)
    }

    /// Returns true if a response is available.
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.live_response().is_some()
    }

    /// Exchanges are never discarded.
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        false
    }

    /// Attaches a free-form property to the record.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Returns the record's properties.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns messages collected while processing the exchange.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Replaces the collected messages.
    pub fn set_messages(&mut self, messages: Vec<String>) {
        self.messages = messages;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response() -> CapturedResponse {
        CapturedResponse {
            request_content: "<sent/>".to_string(),
            request_headers: Headers::from([("X-Sent".to_string(), "yes".to_string())]),
            content: "<ok/>".to_string(),
            headers: Headers::from([("Content-Type".to_string(), "text/xml".to_string())]),
            attachments: vec![Attachment {
                name: "report.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                size: 42,
            }],
            time_taken_ms: 120,
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_missing_response_yields_empty_values() {
        let item = RequestItem::new("r", "<draft/>").with_header("Accept", "text/xml");
        let record = MessageExchangeRecord::new(&item);

        assert!(!record.has_response());
        assert_eq!(record.response_content(), None);
        assert!(record.response_headers().is_empty());
        assert!(record.response_attachments().is_empty());
        assert_eq!(record.time_taken_ms(), 0);
        assert_eq!(record.timestamp_ms(), 0);
        assert_eq!(record.request_content(), "<draft/>");
        assert_eq!(record.request_headers().get("Accept").unwrap(), "text/xml");
    }

    #[test]
    fn test_response_values_are_read_through() {
        let item = RequestItem::new("r", "<draft/>");
        item.set_response(response());
        let record = MessageExchangeRecord::new(&item);

        assert_eq!(record.response_content(), Some("<ok/>"));
        assert_eq!(record.request_content(), "<sent/>");
        assert_eq!(record.request_headers().get("X-Sent").unwrap(), "yes");
        assert_eq!(
            record.response_headers().get("Content-Type").unwrap(),
            "text/xml"
        );
        assert_eq!(record.response_attachments().len(), 1);
        assert_eq!(record.time_taken_ms(), 120);
        assert_eq!(record.timestamp_ms(), 1_700_000_000_000);
    }

    #[test]
    fn test_response_arriving_later_is_picked_up() {
        let item = RequestItem::new("r", "<draft/>");
        let record = MessageExchangeRecord::new(&item);
        assert_eq!(record.time_taken_ms(), 0);

        item.set_response(response());
        assert_eq!(record.time_taken_ms(), 120);

        item.clear_response();
        assert_eq!(record.time_taken_ms(), 120, "response stays pinned once seen");
    }

    #[test]
    fn test_request_content_override_wins() {
        let item = RequestItem::new("r", "<draft/>");
        item.set_response(response());
        let mut record = MessageExchangeRecord::new(&item);
        record.set_request_content("<pinned/>");
        assert_eq!(record.request_content(), "<pinned/>");
    }

    #[test]
    fn test_request_attachments_come_from_item() {
        let item = RequestItem::new("r", "").with_attachment(Attachment {
            name: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            size: 1,
        });
        let record = MessageExchangeRecord::new(&item);
        assert_eq!(record.request_attachments().len(), 1);
        assert_eq!(record.model_item().name(), "r");
        assert!(!record.is_discarded());
    }

    #[test]
    fn test_properties_and_messages() {
        let item = RequestItem::new("r", "");
        let mut record = MessageExchangeRecord::new(&item);
        record.add_property("assertions", "3");
        record.set_messages(vec!["valid".to_string()]);
        assert_eq!(record.properties().get("assertions").unwrap(), "3");
        assert_eq!(record.messages(), ["valid".to_string()]);
    }
}
