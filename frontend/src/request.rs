use serde::de::DeserializeOwned;
use ticketdesk_shared::protocol::HttpMethod;

use crate::error::{ClientError, ClientResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashMap, VecDeque};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
///
/// 响应体保留为字节，报表下载直接使用原始内容。
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body).map_err(ClientError::from)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 记录下来的请求 (Method, URL, Headers, Body)
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[cfg(test)]
impl RecordedRequest {
    /// "METHOD url" 形式，便于断言调用顺序
    pub fn line(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
enum MockReply {
    Response(u16, Vec<u8>),
    NetworkError(String),
}

/// 按 "METHOD url" 排队的脚本化响应
///
/// 同一个键可以排多个响应，依次返回；最后一个会被重复使用。
#[cfg(test)]
pub struct MockHttpClient {
    replies: RefCell<HashMap<String, VecDeque<MockReply>>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
    /// 每次请求先让出一次执行权，用于暴露并发交错
    yield_before_reply: bool,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            yield_before_reply: false,
        }
    }

    pub fn yielding() -> Self {
        Self {
            yield_before_reply: true,
            ..Self::new()
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.push(method, url, MockReply::Response(status, body.to_string().into_bytes()));
    }

    pub fn mock_bytes(&self, method: HttpMethod, url: &str, status: u16, body: &[u8]) {
        self.push(method, url, MockReply::Response(status, body.to_vec()));
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str, message: &str) {
        self.push(method, url, MockReply::NetworkError(message.to_string()));
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests.borrow().iter().map(RecordedRequest::line).collect()
    }

    fn push(&self, method: HttpMethod, url: &str, reply: MockReply) {
        self.replies
            .borrow_mut()
            .entry(format!("{} {}", method.as_str(), url))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, key: &str) -> Option<ClientResult<HttpResponse>> {
        let mut replies = self.replies.borrow_mut();
        let queue = replies.get_mut(key)?;
        let reply = if queue.len() > 1 {
            queue.pop_front()?
        } else {
            match queue.front()? {
                MockReply::Response(status, body) => MockReply::Response(*status, body.clone()),
                MockReply::NetworkError(msg) => MockReply::NetworkError(msg.clone()),
            }
        };

        Some(match reply {
            MockReply::Response(status, body) => Ok(HttpResponse { status, body }),
            MockReply::NetworkError(msg) => Err(ClientError::Transport(msg)),
        })
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let recorded = RecordedRequest {
            method: req.method,
            url: req.url.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
        };
        let key = recorded.line();
        self.requests.borrow_mut().push(recorded);

        if self.yield_before_reply {
            tokio::task::yield_now().await;
        }

        self.next_reply(&key).unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                body: br#"{"detail":"Not Found"}"#.to_vec(),
            })
        })
    }
}
