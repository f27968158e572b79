//! 控制器测试共用的夹具

use serde_json::json;
use ticketdesk_shared::Event;

use crate::api::TicketApi;
use crate::request::MockHttpClient;
use crate::session::SessionStore;

pub const BASE: &str = "http://api.test";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// 以指定角色登录（`None` 表示未登录）的 API 客户端
pub fn api_with_client(client: MockHttpClient, role: Option<&str>) -> TicketApi<MockHttpClient> {
    let session = SessionStore::in_memory();
    if let Some(role) = role {
        session.set("tok-test", role).unwrap();
    }
    TicketApi::new(client, BASE, session)
}

pub fn api_as(role: Option<&str>) -> TicketApi<MockHttpClient> {
    api_with_client(MockHttpClient::new(), role)
}

pub fn event(id: i64, name: &str, total_seats: i64, available_seats: i64) -> Event {
    Event {
        id,
        name: name.to_string(),
        total_seats,
        available_seats,
    }
}

pub fn event_json(id: i64, name: &str, total_seats: i64, available_seats: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "total_seats": total_seats,
        "available_seats": available_seats,
    })
}
