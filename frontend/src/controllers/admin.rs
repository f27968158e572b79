use ticketdesk_shared::{Event, EventReportRow, ReportPeriod};
use tracing::info;

use super::{ActionOutcome, MutationGate, Notification};
use crate::api::TicketApi;
use crate::error::ClientError;
use crate::request::HttpClient;

const EVENTS_LOAD_FAILED: &str = "Failed to load events";
const REPORTS_LOAD_FAILED: &str = "Failed to load reports";
const MISSING_FIELDS: &str = "Please fill all fields";
const INVALID_SEATS: &str = "Total seats must be a positive number";
const CREATE_FAILED: &str = "Only admin can create events";
const DELETE_FAILED: &str = "Cannot delete event";
const DOWNLOAD_FAILED: &str = "Failed to download report";

/// 管理面板的报表数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminReports {
    pub total_bookings: u64,
    pub rows: Vec<EventReportRow>,
}

/// 修改操作之后重新获取的数据；获取失败的部分为 `None`，视图保持原状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRefresh {
    pub events: Option<Vec<Event>>,
    pub reports: Option<AdminReports>,
}

/// 已下载的报表文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 创建活动表单的原始输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub total_seats: String,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, total_seats: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_seats: total_seats.into(),
        }
    }

    /// 校验输入，返回 `(名称, 座位数)`
    pub fn validate(&self) -> Result<(String, u32), ClientError> {
        let name = self.name.trim();
        let seats = self.total_seats.trim();
        if name.is_empty() || seats.is_empty() {
            return Err(ClientError::validation(MISSING_FIELDS));
        }

        match seats.parse::<u32>() {
            Ok(n) if n > 0 => Ok((name.to_string(), n)),
            _ => Err(ClientError::validation(INVALID_SEATS)),
        }
    }
}

#[derive(Clone)]
pub struct AdminController<C> {
    api: TicketApi<C>,
    gate: MutationGate,
}

impl<C: HttpClient> AdminController<C> {
    pub fn new(api: TicketApi<C>) -> Self {
        Self {
            api,
            gate: MutationGate::new(),
        }
    }

    /// 总预订数与按活动统计的报表
    pub async fn load_reports(&self) -> Result<AdminReports, Notification> {
        let total = self
            .api
            .total_bookings()
            .await
            .map_err(|e| Notification::from_error(&e, REPORTS_LOAD_FAILED))?;
        let rows = self
            .api
            .event_report()
            .await
            .map_err(|e| Notification::from_error(&e, REPORTS_LOAD_FAILED))?;

        Ok(AdminReports {
            total_bookings: total.total_bookings,
            rows,
        })
    }

    /// 创建活动；成功后重新获取活动列表与报表
    pub async fn create(&self, draft: &EventDraft) -> ActionOutcome<AdminRefresh> {
        let (name, total_seats) = match draft.validate() {
            Ok(valid) => valid,
            Err(e) => return ActionOutcome::failed(Notification::from_error(&e, CREATE_FAILED)),
        };

        let _gate = self.gate.enter().await;

        match self.api.create_event(&name, total_seats).await {
            Ok(event) => info!(event_id = event.id, total_seats, "Event created"),
            Err(e) => return ActionOutcome::failed(Notification::from_error(&e, CREATE_FAILED)),
        }

        self.refresh(Notification::success("Event created successfully"))
            .await
    }

    /// 删除活动；后端拒绝时（例如仍有有效票）原样显示其说明
    pub async fn delete(&self, event: &Event) -> ActionOutcome<AdminRefresh> {
        let _gate = self.gate.enter().await;

        if let Err(e) = self.api.delete_event(event.id).await {
            return ActionOutcome::failed(Notification::from_error(&e, DELETE_FAILED));
        }
        info!(event_id = event.id, "Event deleted");

        self.refresh(Notification::success("Event deleted successfully"))
            .await
    }

    pub async fn download(&self, period: ReportPeriod) -> ActionOutcome<ReportFile> {
        match self.api.download_report(period).await {
            Ok(bytes) => {
                let file = ReportFile {
                    file_name: period.file_name(),
                    bytes,
                };
                let saved = Notification::success(format!("Downloaded {}", file.file_name));
                ActionOutcome::succeeded(saved, Some(file))
            }
            Err(e) => ActionOutcome::failed(Notification::from_error(&e, DOWNLOAD_FAILED)),
        }
    }

    /// 依次加载活动列表与报表
    ///
    /// 会话过期时不再继续请求，避免重复提示。
    pub async fn load_all(&self) -> (AdminRefresh, Vec<Notification>) {
        let mut refreshed = AdminRefresh::default();
        let mut notifications = Vec::new();

        match self.api.list_events().await {
            Ok(events) => refreshed.events = Some(events),
            Err(e) => {
                notifications.push(Notification::from_error(&e, EVENTS_LOAD_FAILED));
                if e.is_session_expired() {
                    return (refreshed, notifications);
                }
            }
        }
        match self.load_reports().await {
            Ok(reports) => refreshed.reports = Some(reports),
            Err(n) => notifications.push(n),
        }

        (refreshed, notifications)
    }

    async fn refresh(&self, done: Notification) -> ActionOutcome<AdminRefresh> {
        let (refreshed, notifications) = self.load_all().await;
        let mut outcome = ActionOutcome::succeeded(done, Some(refreshed));
        outcome.notifications.extend(notifications);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::*;
    use serde_json::json;
    use ticketdesk_shared::protocol::HttpMethod;

    fn mock_reports(api: &TicketApi<crate::request::MockHttpClient>, total: u64) {
        api.client().mock_response(
            HttpMethod::Get,
            &url("/reports/total-bookings"),
            200,
            json!({"total_bookings": total}),
        );
        api.client().mock_response(
            HttpMethod::Get,
            &url("/reports/event-wise"),
            200,
            json!([{"event_name": "Concert", "total_bookings": total}]),
        );
    }

    #[test]
    fn test_draft_validation() {
        let cases = [
            (EventDraft::new("", "10"), Err("Please fill all fields")),
            (EventDraft::new("Concert", " "), Err("Please fill all fields")),
            (EventDraft::new("Concert", "0"), Err("Total seats must be a positive number")),
            (EventDraft::new("Concert", "-3"), Err("Total seats must be a positive number")),
            (EventDraft::new("Concert", "ten"), Err("Total seats must be a positive number")),
            (EventDraft::new(" Concert ", "100"), Ok(("Concert".to_string(), 100))),
        ];

        for (draft, expected) in cases {
            let got = draft.validate().map_err(|e| e.user_message(""));
            assert_eq!(got, expected.map_err(str::to_string), "{:?}", draft);
        }
    }

    #[tokio::test]
    async fn test_create_refetches_events_and_reports() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/events"),
            200,
            event_json(7, "Concert", 100, 100),
        );
        api.client().mock_response(
            HttpMethod::Get,
            &url("/events"),
            200,
            json!([event_json(7, "Concert", 100, 100)]),
        );
        mock_reports(&api, 0);
        let ctrl = AdminController::new(api);

        let outcome = ctrl.create(&EventDraft::new("Concert", "100")).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].message, "Event created successfully");
        let refreshed = outcome.value.unwrap();
        assert_eq!(refreshed.events, Some(vec![event(7, "Concert", 100, 100)]));
        assert_eq!(refreshed.reports.unwrap().total_bookings, 0);

        let requests = ctrl.api.client().requests.borrow();
        assert_eq!(requests[0].line(), "POST http://api.test/events");
        assert_eq!(requests[0].header("Authorization"), Some("Bearer tok-test"));
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Concert", "total_seats": 100}));
    }

    #[tokio::test]
    async fn test_create_invalid_seats_skips_request() {
        let ctrl = AdminController::new(api_as(Some("admin")));

        let outcome = ctrl.create(&EventDraft::new("Concert", "0")).await;

        assert_eq!(
            outcome.notifications[0].message,
            "Total seats must be a positive number"
        );
        assert!(ctrl.api.client().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_forbidden_keeps_session() {
        let api = api_as(Some("user"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/events"),
            403,
            json!({}),
        );
        let ctrl = AdminController::new(api);

        let outcome = ctrl.create(&EventDraft::new("Concert", "100")).await;

        assert_eq!(outcome.notifications[0].message, "Only admin can create events");
        assert!(ctrl.api.session().get().is_some());
    }

    #[tokio::test]
    async fn test_delete_with_active_bookings_shows_detail() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Delete,
            &url("/events/7"),
            400,
            json!({"detail": "Cannot delete event with active bookings"}),
        );
        let ctrl = AdminController::new(api);

        let outcome = ctrl.delete(&event(7, "Concert", 100, 99)).await;

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.notifications[0].message,
            "Cannot delete event with active bookings"
        );
        // 失败时不重新获取，视图保留原列表
        assert!(outcome.value.is_none());
        assert_eq!(
            ctrl.api.client().request_lines(),
            vec!["DELETE http://api.test/events/7"]
        );
    }

    #[tokio::test]
    async fn test_delete_success_refreshes() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Delete,
            &url("/events/7"),
            200,
            json!({"message": "Event deleted"}),
        );
        api.client()
            .mock_response(HttpMethod::Get, &url("/events"), 200, json!([]));
        mock_reports(&api, 0);
        let ctrl = AdminController::new(api);

        let outcome = ctrl.delete(&event(7, "Concert", 100, 100)).await;

        assert_eq!(outcome.notifications[0].message, "Event deleted successfully");
        assert_eq!(outcome.value.unwrap().events, Some(vec![]));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_partial_state() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Delete,
            &url("/events/7"),
            200,
            json!({"message": "Event deleted"}),
        );
        api.client()
            .mock_response(HttpMethod::Get, &url("/events"), 200, json!([]));
        api.client().mock_network_error(
            HttpMethod::Get,
            &url("/reports/total-bookings"),
            "offline",
        );
        let ctrl = AdminController::new(api);

        let outcome = ctrl.delete(&event(7, "Concert", 100, 100)).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.notifications[1].message, "Failed to load reports");
        let refreshed = outcome.value.unwrap();
        assert_eq!(refreshed.events, Some(vec![]));
        assert_eq!(refreshed.reports, None);
    }

    #[tokio::test]
    async fn test_load_all_stops_after_session_expiry() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Get,
            &url("/events"),
            401,
            json!({"detail": "Could not validate credentials"}),
        );
        mock_reports(&api, 3);
        let ctrl = AdminController::new(api);

        let (refreshed, notifications) = ctrl.load_all().await;

        assert_eq!(refreshed, AdminRefresh::default());
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, crate::error::SESSION_EXPIRED_MESSAGE);
        assert_eq!(ctrl.api.client().request_lines(), vec!["GET http://api.test/events"]);
        assert!(ctrl.api.session().get().is_none());
    }

    #[tokio::test]
    async fn test_load_all_continues_after_plain_failure() {
        let api = api_as(Some("admin"));
        api.client()
            .mock_network_error(HttpMethod::Get, &url("/events"), "offline");
        mock_reports(&api, 3);
        let ctrl = AdminController::new(api);

        let (refreshed, notifications) = ctrl.load_all().await;

        assert_eq!(refreshed.events, None);
        assert_eq!(refreshed.reports.unwrap().total_bookings, 3);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, "Failed to load events");
    }

    #[tokio::test]
    async fn test_load_reports() {
        let api = api_as(Some("admin"));
        mock_reports(&api, 4);
        let ctrl = AdminController::new(api);

        let reports = ctrl.load_reports().await.unwrap();
        assert_eq!(reports.total_bookings, 4);
        assert_eq!(reports.rows[0].event_name, "Concert");
    }

    #[tokio::test]
    async fn test_download_names_file_by_period() {
        let api = api_as(Some("admin"));
        api.client().mock_bytes(
            HttpMethod::Get,
            &url("/admin/report/weekly"),
            200,
            b"%PDF-1.4",
        );
        let ctrl = AdminController::new(api);

        let outcome = ctrl.download(ReportPeriod::Weekly).await;

        let file = outcome.value.unwrap();
        assert_eq!(file.file_name, "weekly_report.pdf");
        assert_eq!(file.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_download_failure() {
        let api = api_as(Some("admin"));
        api.client().mock_response(
            HttpMethod::Get,
            &url("/admin/report/monthly"),
            500,
            json!({}),
        );
        let ctrl = AdminController::new(api);

        let outcome = ctrl.download(ReportPeriod::Monthly).await;
        assert_eq!(outcome.notifications[0].message, "Failed to download report");
        assert!(outcome.value.is_none());
    }
}
