// 测试用传输：按 File Share Service 的约定返回成功响应，并记录所有请求

use crate::error::Result;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync>;

pub(crate) struct MockTransport {
    batch_id: String,
    responder: Option<Responder>,
    delay: Option<Duration>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("batch_id", &self.batch_id)
            .field("requests", &self.requests.lock().len())
            .finish()
    }
}

impl MockTransport {
    pub(crate) fn new(batch_id: &str) -> Self {
        Self {
            batch_id: batch_id.to_string(),
            responder: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 覆盖部分请求的响应，返回 None 时使用默认响应
    pub(crate) fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// 每个请求的响应延迟
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// 请求序列，如 `["POST /batch", "PUT /batch/abc123"]`
    pub(crate) fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    fn default_response(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["batch"]) => HttpResponse::new(
                201,
                format!(r#"{{"batchId":"{}"}}"#, self.batch_id).into_bytes(),
            ),
            ("GET", ["batch"]) => HttpResponse::new(
                200,
                format!(
                    r#"{{"count":1,"total":1,"entries":[{{"batchId":"{}","files":[]}}],"_links":{{"self":{{"href":"/batch?limit=10&start=0"}}}}}}"#,
                    self.batch_id
                )
                .into_bytes(),
            ),
            ("GET", ["batch", id]) => HttpResponse::new(
                200,
                format!(r#"{{"batchId":"{}","files":[]}}"#, id).into_bytes(),
            ),
            ("PUT", ["batch", _]) => HttpResponse::empty(202),
            ("DELETE", ["batch", _]) => HttpResponse::empty(204),
            ("GET", ["batch", id, "status"]) => HttpResponse::new(
                200,
                format!(r#"{{"batchId":"{}","status":"Committed"}}"#, id).into_bytes(),
            ),
            ("POST", ["batch", _, "acl"])
            | ("PUT", ["batch", _, "acl"])
            | ("PUT", ["batch", _, "expiry"]) => HttpResponse::empty(204),
            ("GET", ["batch", _, "files"]) => HttpResponse::new(200, b"PK\x03\x04".to_vec()),
            ("POST", ["batch", _, "files", _]) => HttpResponse::empty(201),
            ("PUT", ["batch", _, "files", _]) => HttpResponse::empty(200),
            ("GET", ["batch", _, "files", _]) => {
                if request.header_value("Range").is_some() {
                    HttpResponse::new(206, b"ell".to_vec())
                } else {
                    HttpResponse::new(200, b"hello".to_vec())
                }
            }
            ("PUT", ["batch", _, "files", _, _]) => HttpResponse::empty(201),
            ("GET", ["attributes"]) => {
                HttpResponse::new(200, br#"["Colour","Product"]"#.to_vec())
            }
            ("GET", ["attributes", "search"]) => HttpResponse::new(
                200,
                br#"{"searchBatchCount":2,"batchAttributes":[{"key":"Colour","values":["red","blue"]}]}"#
                    .to_vec(),
            ),
            _ => HttpResponse::empty(404),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responder
            .as_ref()
            .and_then(|responder| responder(&request))
            .unwrap_or_else(|| self.default_response(&request));
        Ok(response)
    }
}
