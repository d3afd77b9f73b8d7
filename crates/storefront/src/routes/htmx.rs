//! HTMX response helpers.
//!
//! Store events published while a request is handled are sent back to the
//! browser as one `HX-Trigger` header, so htmx fires them as DOM events.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use serde_json::{Map, Value};

use crate::events::{EventBus, StoreEvent, Subscription};

/// The htmx response header that triggers client-side events.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Records the events published on a bus until it is turned into a header.
///
/// ```rust,ignore
/// let triggers = HxTriggers::record(&visitor.events);
/// visitor.cart().clear()?;
/// Ok((triggers, fragment))
/// ```
pub struct HxTriggers {
    events: Arc<Mutex<Vec<StoreEvent>>>,
    _subscription: Subscription,
}

impl HxTriggers {
    /// Start recording events published on `bus`.
    #[must_use]
    pub fn record(bus: &EventBus) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = bus.subscribe(move |event: &StoreEvent| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        });

        Self {
            events,
            _subscription: subscription,
        }
    }

    /// Events recorded so far, in publish order.
    #[must_use]
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// JSON header value, or `None` if nothing was published.
    ///
    /// Repeated events collapse into one key; filter events keep the last
    /// state as their detail.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        let events = self.events();
        if events.is_empty() {
            return None;
        }

        let mut triggers = Map::new();
        for event in &events {
            let detail = match event {
                StoreEvent::CartUpdated => Value::Object(Map::new()),
                StoreEvent::FiltersUpdated(state) => {
                    serde_json::to_value(state).unwrap_or_else(|_| Value::Object(Map::new()))
                }
            };
            triggers.insert(event.name().to_string(), detail);
        }

        Some(Value::Object(triggers).to_string())
    }
}

impl IntoResponseParts for HxTriggers {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.header_value() {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    res.headers_mut().insert(HX_TRIGGER, value);
                }
                Err(e) => tracing::warn!("Dropping unencodable HX-Trigger header: {e}"),
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use gamershop_core::FilterState;

    use super::*;

    #[test]
    fn test_nothing_published_no_header() {
        let bus = EventBus::new();
        let triggers = HxTriggers::record(&bus);
        assert!(triggers.header_value().is_none());

        let response = (triggers, "body").into_response();
        assert!(response.headers().get(HX_TRIGGER).is_none());
    }

    #[test]
    fn test_encodes_events_as_json() {
        let bus = EventBus::new();
        let triggers = HxTriggers::record(&bus);

        bus.publish(&StoreEvent::CartUpdated);
        bus.publish(&StoreEvent::FiltersUpdated(FilterState {
            genre: Some("Action".to_string()),
        }));

        let value: Value = serde_json::from_str(&triggers.header_value().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cartUpdated": {},
                "filtersUpdated": { "genre": "Action" }
            })
        );
    }

    #[test]
    fn test_last_filter_state_wins() {
        let bus = EventBus::new();
        let triggers = HxTriggers::record(&bus);

        bus.publish(&StoreEvent::FiltersUpdated(FilterState {
            genre: Some("Action".to_string()),
        }));
        bus.publish(&StoreEvent::FiltersUpdated(FilterState::default()));

        let value: Value = serde_json::from_str(&triggers.header_value().unwrap()).unwrap();
        assert_eq!(value["filtersUpdated"]["genre"], Value::Null);
        assert_eq!(triggers.events().len(), 2);
    }

    #[test]
    fn test_stops_recording_when_dropped() {
        let bus = EventBus::new();
        let triggers = HxTriggers::record(&bus);
        assert_eq!(bus.listener_count(), 1);

        let response = (triggers, "body").into_response();
        assert_eq!(bus.listener_count(), 0);
        assert!(response.headers().get(HX_TRIGGER).is_none());
    }
}
