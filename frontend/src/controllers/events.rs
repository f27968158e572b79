use ticketdesk_shared::Event;
use tracing::info;

use super::{ActionOutcome, MutationGate, Notification};
use crate::api::TicketApi;
use crate::error::ClientError;
use crate::request::HttpClient;

const LOAD_FAILED: &str = "Failed to load events";
const BOOKING_FAILED: &str = "Booking failed";
const SOLD_OUT: &str = "This event is sold out";

/// 活动列表页：浏览与订票
#[derive(Clone)]
pub struct EventsController<C> {
    api: TicketApi<C>,
    gate: MutationGate,
}

impl<C: HttpClient> EventsController<C> {
    pub fn new(api: TicketApi<C>) -> Self {
        Self {
            api,
            gate: MutationGate::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Event>, Notification> {
        self.api
            .list_events()
            .await
            .map_err(|e| Notification::from_error(&e, LOAD_FAILED))
    }

    /// 订一张票
    ///
    /// 已售罄的活动在客户端直接拒绝，不发出请求。成功后重新获取活动列表，
    /// 余票数以服务端为准。
    pub async fn book(&self, event: &Event) -> ActionOutcome<Vec<Event>> {
        if event.is_sold_out() {
            let err = ClientError::validation(SOLD_OUT);
            return ActionOutcome::failed(Notification::from_error(&err, BOOKING_FAILED));
        }

        let _gate = self.gate.enter().await;

        let ticket = match self.api.book_ticket(event.id).await {
            Ok(ticket) => ticket,
            Err(e) => return ActionOutcome::failed(Notification::from_error(&e, BOOKING_FAILED)),
        };
        info!(event_id = event.id, reference = %ticket.reference_number, "Ticket booked");

        let booked = Notification::success(format!(
            "Ticket booked successfully (ref {})",
            ticket.reference_number
        ));
        match self.load().await {
            Ok(events) => ActionOutcome::succeeded(booked, Some(events)),
            Err(n) => ActionOutcome::succeeded(booked, None).with_notification(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::*;
    use serde_json::json;
    use ticketdesk_shared::protocol::HttpMethod;

    #[tokio::test]
    async fn test_load_failure_keeps_state_and_notifies() {
        let api = api_as(Some("user"));
        api.client()
            .mock_network_error(HttpMethod::Get, &url("/events"), "offline");
        let ctrl = EventsController::new(api);

        let err = ctrl.load().await.unwrap_err();
        assert!(err.is_error());
        assert_eq!(err.message, "Failed to load events");
    }

    #[tokio::test]
    async fn test_negative_seat_counts_do_not_blank_the_list() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Get,
            &url("/events"),
            200,
            json!([event_json(1, "Concert", 100, 40), event_json(2, "Broken", -1, -1)]),
        );
        let ctrl = EventsController::new(api);

        let events = ctrl.load().await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], event(1, "Concert", 100, 40));
        assert!(events[1].is_sold_out());

        // 非正数余票同样在客户端拒绝
        let outcome = ctrl.book(&events[1]).await;
        assert_eq!(outcome.notifications[0].message, "This event is sold out");
        assert_eq!(ctrl.api.client().request_lines(), vec!["GET http://api.test/events"]);
    }

    #[tokio::test]
    async fn test_server_error_detail_is_shown() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            503,
            json!({"detail": "Booking service is temporarily unavailable"}),
        );
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 5)).await;

        assert_eq!(
            outcome.notifications[0].message,
            "Booking service is temporarily unavailable"
        );
        assert!(ctrl.api.session().get().is_some());
    }

    #[tokio::test]
    async fn test_sold_out_event_is_rejected_without_request() {
        let api = api_as(Some("user"));
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 0)).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.notifications[0].message, "This event is sold out");
        assert!(ctrl.api.client().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_booking_last_seat_refetches_and_disables() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            200,
            json!({"id": 9, "event_name": "Concert", "reference_number": "TKT-0A1B2C3D"}),
        );
        api.client().mock_response(
            HttpMethod::Get,
            &url("/events"),
            200,
            json!([event_json(1, "Concert", 100, 0)]),
        );
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 1)).await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome.notifications[0].message,
            "Ticket booked successfully (ref TKT-0A1B2C3D)"
        );
        let events = outcome.value.unwrap();
        assert_eq!(events[0].available_seats, 0);
        assert!(events[0].is_sold_out());
        assert_eq!(
            ctrl.api.client().request_lines(),
            vec![
                "POST http://api.test/tickets?event_id=1",
                "GET http://api.test/events"
            ]
        );
    }

    #[tokio::test]
    async fn test_booking_rejection_shows_backend_detail() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            400,
            json!({"detail": "Seat temporarily locked"}),
        );
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 5)).await;

        assert_eq!(outcome.notifications[0].message, "Seat temporarily locked");
        assert!(outcome.value.is_none());
        assert_eq!(ctrl.api.client().request_lines().len(), 1);
    }

    #[tokio::test]
    async fn test_booking_without_detail_uses_fallback() {
        let api = api_as(Some("user"));
        api.client().mock_bytes(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            500,
            b"Internal Server Error",
        );
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 5)).await;
        assert_eq!(outcome.notifications[0].message, "Booking failed");
    }

    #[tokio::test]
    async fn test_concurrent_bookings_are_serialized() {
        let api = api_with_client(crate::request::MockHttpClient::yielding(), Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            200,
            json!({"id": 1, "event_name": "Concert", "reference_number": "TKT-1"}),
        );
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=2"),
            200,
            json!({"id": 2, "event_name": "Opera", "reference_number": "TKT-2"}),
        );
        api.client().mock_response(HttpMethod::Get, &url("/events"), 200, json!([]));
        let ctrl = EventsController::new(api);

        let first = event(1, "Concert", 10, 10);
        let second = event(2, "Opera", 10, 10);
        let (a, b) = futures::join!(ctrl.book(&first), ctrl.book(&second));

        assert!(a.is_success() && b.is_success());
        assert_eq!(
            ctrl.api.client().request_lines(),
            vec![
                "POST http://api.test/tickets?event_id=1",
                "GET http://api.test/events",
                "POST http://api.test/tickets?event_id=2",
                "GET http://api.test/events",
            ]
        );
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared_on_booking() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/tickets?event_id=1"),
            401,
            json!({"detail": "Could not validate credentials"}),
        );
        let ctrl = EventsController::new(api);

        let outcome = ctrl.book(&event(1, "Concert", 100, 5)).await;

        assert_eq!(
            outcome.notifications[0].message,
            crate::error::SESSION_EXPIRED_MESSAGE
        );
        assert!(ctrl.api.session().get().is_none());
    }
}
