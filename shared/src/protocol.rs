use crate::{
    Event, EventReportRow, LoginResponse, MessageResponse, ReportPeriod, Ticket, TotalBookings,
    UserAccount,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 请求体编码方式
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` 键值对
    Form(Vec<(String, String)>),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request carries the bearer token.
    const AUTHENTICATED: bool = true;

    /// The URL path, including any query string.
    fn path(&self) -> String;

    fn body(&self) -> RequestBody {
        RequestBody::Empty
    }
}

// =========================================================
// Request Definitions
// =========================================================

/// OAuth2 password form: the email goes into `username`.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/login".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Form(vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = UserAccount;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/register".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Json(serde_json::json!({
            "email": self.email,
            "password": self.password,
        }))
    }
}

/// List all events
#[derive(Debug, Clone, Copy)]
pub struct ListEventsRequest;

impl ApiRequest for ListEventsRequest {
    type Response = Vec<Event>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/events".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub total_seats: u32,
}

impl ApiRequest for CreateEventRequest {
    type Response = Event;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/events".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Json(serde_json::json!({
            "name": self.name,
            "total_seats": self.total_seats,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEventRequest {
    pub id: i64,
}

impl ApiRequest for DeleteEventRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/events/{}", self.id)
    }
}

/// Book one seat; the event id travels in the query string.
#[derive(Debug, Clone, Copy)]
pub struct BookTicketRequest {
    pub event_id: i64,
}

impl ApiRequest for BookTicketRequest {
    type Response = Ticket;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/tickets?event_id={}", self.event_id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListMyTicketsRequest;

impl ApiRequest for ListMyTicketsRequest {
    type Response = Vec<Ticket>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/my-tickets".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CancelTicketRequest {
    pub id: i64,
}

impl ApiRequest for CancelTicketRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/tickets/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TotalBookingsRequest;

impl ApiRequest for TotalBookingsRequest {
    type Response = TotalBookings;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/total-bookings".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventReportRequest;

impl ApiRequest for EventReportRequest {
    type Response = Vec<EventReportRow>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/event-wise".to_string()
    }
}

/// Binary report export.
///
/// The payload is opaque; callers fetch it as raw bytes instead of decoding
/// `Response`.
#[derive(Debug, Clone, Copy)]
pub struct DownloadReportRequest {
    pub period: ReportPeriod,
}

impl ApiRequest for DownloadReportRequest {
    type Response = Vec<u8>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/admin/report/{}", self.period.as_str())
    }
}
