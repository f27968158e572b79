//! 后端 API 客户端
//!
//! 所有视图通过这里访问后端：拼接 URL、附加 Bearer 令牌、编码请求体、
//! 并把非 2xx 响应归类为 `ClientError`。

use ticketdesk_shared::protocol::{
    ApiRequest, BookTicketRequest, CancelTicketRequest, CreateEventRequest, DeleteEventRequest,
    DownloadReportRequest, EventReportRequest, ListEventsRequest, ListMyTicketsRequest,
    LoginRequest, RegisterRequest, RequestBody, TotalBookingsRequest,
};
use ticketdesk_shared::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, ErrorBody, Event, EventReportRow, HEADER_AUTHORIZATION,
    LoginResponse, MessageResponse, ReportPeriod, Ticket, TotalBookings, UserAccount,
};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct TicketApi<C> {
    client: C,
    base_url: String,
    session: SessionStore,
}

impl<C: HttpClient> TicketApi<C> {
    pub fn new(client: C, base_url: &str, session: SessionStore) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&req.path()), R::METHOD);

        if R::AUTHENTICATED {
            // 没有会话时照常发送，由后端返回 401
            if let Some(session) = self.session.get() {
                http = http.with_header(
                    HEADER_AUTHORIZATION,
                    &format!("Bearer {}", session.token()),
                );
            }
        }

        match req.body() {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                http = http
                    .with_header("Content-Type", CONTENT_TYPE_JSON)
                    .with_body(value.to_string());
            }
            RequestBody::Form(fields) => {
                let encoded = serde_urlencoded::to_string(&fields)
                    .map_err(|e| ClientError::transport(format!("form encoding failed: {}", e)))?;
                http = http
                    .with_header("Content-Type", CONTENT_TYPE_FORM)
                    .with_body(encoded);
            }
        }

        Ok(http)
    }

    /// 发送请求并返回 2xx 响应；其余状态码转换为错误
    async fn send_raw<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpResponse> {
        let http = self.build(req)?;
        let carried_token = http.header(HEADER_AUTHORIZATION).is_some();
        let method = http.method;
        let url = http.url.clone();
        debug!(method = method.as_str(), %url, "API request");

        let resp = self.client.send(http).await.inspect_err(|e| {
            warn!(method = method.as_str(), %url, error = %e, "API request failed");
        })?;

        if resp.is_success() {
            return Ok(resp);
        }

        let detail = ErrorBody::parse(&resp.body).and_then(|body| body.message());
        let err = ClientError::from_status(resp.status, detail, carried_token);
        warn!(method = method.as_str(), %url, status = resp.status, error = %err, "API request rejected");

        if err.is_session_expired() {
            self.session.clear();
        }
        Err(err)
    }

    /// 发送请求并把响应体解码为 `R::Response`
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        self.send_raw(req).await?.json()
    }

    // =========================================================
    // 端点封装
    // =========================================================

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        self.call(&LoginRequest {
            username: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn register(&self, email: &str, password: &str) -> ClientResult<UserAccount> {
        self.call(&RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        self.call(&ListEventsRequest).await
    }

    pub async fn create_event(&self, name: &str, total_seats: u32) -> ClientResult<Event> {
        self.call(&CreateEventRequest {
            name: name.to_string(),
            total_seats,
        })
        .await
    }

    pub async fn delete_event(&self, id: i64) -> ClientResult<MessageResponse> {
        self.call(&DeleteEventRequest { id }).await
    }

    pub async fn book_ticket(&self, event_id: i64) -> ClientResult<Ticket> {
        self.call(&BookTicketRequest { event_id }).await
    }

    pub async fn my_tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.call(&ListMyTicketsRequest).await
    }

    pub async fn cancel_ticket(&self, id: i64) -> ClientResult<MessageResponse> {
        self.call(&CancelTicketRequest { id }).await
    }

    pub async fn total_bookings(&self) -> ClientResult<TotalBookings> {
        self.call(&TotalBookingsRequest).await
    }

    pub async fn event_report(&self) -> ClientResult<Vec<EventReportRow>> {
        self.call(&EventReportRequest).await
    }

    /// 下载报表：内容对客户端不透明，直接返回字节
    pub async fn download_report(&self, period: ReportPeriod) -> ClientResult<Vec<u8>> {
        Ok(self.send_raw(&DownloadReportRequest { period }).await?.body)
    }
}
