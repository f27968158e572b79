//! 浏览器 HTTP 客户端
//!
//! 基于 `gloo-net` 的 fetch 封装，实现 `HttpClient` 特性。

use gloo_net::http::{Request, RequestBuilder};
use ticketdesk_shared::protocol::HttpMethod;

use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};

/// fetch 实现的 HTTP 客户端
///
/// 无状态，可随意复制到各个控制器中。
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn builder(req: &HttpRequest) -> RequestBuilder {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        req.headers
            .iter()
            .fold(builder, |b, (key, value)| b.header(key, value))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let builder = Self::builder(&req);

        let resp = match req.body {
            Some(body) => builder
                .body(body)
                .map_err(ClientError::transport)?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(ClientError::transport)?;

        let status = resp.status();
        let body = resp.binary().await.map_err(ClientError::transport)?;

        Ok(HttpResponse { status, body })
    }
}
