// 基于 reqwest 的默认传输实现

use crate::error::{FssError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// reqwest 传输
///
/// 服务地址和 `Authorization: bearer <token>` 在构造时一次性写入客户端，
/// 之后每个请求只需要拼接路径
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP客户端（内部连接可在多个批次间共享）
    client: Client,
    /// 服务地址（不含末尾的 `/`）
    base_address: String,
}

impl ReqwestTransport {
    /// 创建新的传输
    ///
    /// # 参数
    /// * `base_address` - 服务地址，如 `https://fss.example.com/api`
    /// * `access_token` - 访问令牌
    /// * `timeout` - 单个请求超时时间
    pub fn new(base_address: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let mut auth_value = HeaderValue::from_str(&format!("bearer {}", access_token))
            .map_err(|_| FssError::Authentication("访问令牌包含非法字符".to_string()))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let base_address = base_address.trim_end_matches('/').to_string();
        info!(
            "初始化 HTTP 传输: base_address={}, timeout={}s",
            base_address,
            timeout.as_secs()
        );

        Ok(Self {
            client,
            base_address,
        })
    }

    /// 拼接完整 URL
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_address, path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url(&request.path);
        debug!("发送请求: {} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(data) => builder.header(CONTENT_TYPE, "application/json").body(data),
            RequestBody::Bytes(data) => builder.body(data),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(
            "收到响应: {} {}, status={}, size={} bytes",
            request.method,
            url,
            status,
            body.len()
        );

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let transport =
            ReqwestTransport::new("https://fss.example.com/api/", "token", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            transport.url("/batch/abc/status"),
            "https://fss.example.com/api/batch/abc/status"
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = ReqwestTransport::new(
            "https://fss.example.com",
            "bad\ntoken",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(FssError::Authentication(_))));
    }
}
