// 传输层
//
// 上传引擎和批次控制器只通过 HttpTransport 发送请求：
// - ReqwestTransport: 默认实现，构造时一次性注入服务地址和认证头
// - 测试中使用记录请求的 MockTransport

pub mod auth;
pub mod reqwest_transport;

#[cfg(test)]
pub(crate) mod mock;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use reqwest::Method;
pub use reqwest_transport::ReqwestTransport;

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// 无请求体
    Empty,
    /// JSON 请求体（Content-Type: application/json）
    Json(Vec<u8>),
    /// 原始字节（Content-Type 由调用方设置）
    Bytes(Vec<u8>),
}

impl RequestBody {
    /// 请求体字节
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Empty => &[],
            RequestBody::Json(data) | RequestBody::Bytes(data) => data,
        }
    }
}

/// HTTP 请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// 请求方法
    pub method: Method,
    /// 相对于服务地址的路径（含查询参数），如 `/batch/abc/status`
    pub path: String,
    /// 额外请求头
    pub headers: Vec<(String, String)>,
    /// 请求体
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// 添加请求头
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 设置 JSON 请求体
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// 设置原始字节请求体
    pub fn bytes(mut self, data: Vec<u8>) -> Self {
        self.body = RequestBody::Bytes(data);
        self
    }

    /// 查找请求头（不区分大小写）
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP 响应
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// 状态码
    pub status: u16,
    /// 响应体
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, Vec::new())
    }
}

/// HTTP 传输
///
/// 只负责完成一次 HTTP 交换：任何状态码都作为正常响应返回，
/// 只有无法完成交换（超时、连接失败等）才返回错误
#[async_trait]
pub trait HttpTransport: std::fmt::Debug + Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::put("/batch/abc/files/a.bin/00001")
            .header("Content-Type", "application/octet-stream")
            .header("Content-MD5", "xyz==")
            .bytes(vec![1, 2, 3]);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.header_value("content-md5"), Some("xyz=="));
        assert_eq!(request.header_value("X-Missing"), None);
        assert_eq!(request.body.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_json_body() {
        let request = HttpRequest::post("/batch")
            .json(&serde_json::json!({"businessUnit": "TEST"}))
            .unwrap();
        match &request.body {
            RequestBody::Json(data) => {
                let value: serde_json::Value = serde_json::from_slice(data).unwrap();
                assert_eq!(value["businessUnit"], "TEST");
            }
            other => panic!("unexpected body: {:?}", other),
        }
        assert!(RequestBody::Empty.as_bytes().is_empty());
    }
}
