// 统一结果封装
//
// 每个远程调用都先转换为 ApiResult，再由调用风格决定：
// - Result 风格：直接返回 ApiResult（服务端拒绝不视为 Err）
// - 旧风格：通过 into_result()/into_data() 将失败转换为 FssError::Remote

use crate::error::{FssError, Result};
use crate::transport::HttpResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 服务端返回的单条错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// 出错的字段或来源
    #[serde(default)]
    pub source: String,
    /// 错误描述
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub fn new(source: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            description: description.into(),
        }
    }
}

/// 服务端错误响应体
///
/// 响应示例:
/// ```json
/// {
///   "correlationId": "7b9d1d2e-...",
///   "errors": [{"source": "batchId", "description": "Batch not found"}]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDescription {
    #[serde(default)]
    #[allow(dead_code)]
    correlation_id: Option<String>,
    errors: Vec<ApiError>,
}

/// 解析错误响应体
///
/// - 空响应体：返回空列表
/// - 符合错误结构：返回其中的错误列表
/// - 其他内容：整个响应文本作为一条错误描述
pub fn parse_errors(body: &[u8]) -> Vec<ApiError> {
    if body.is_empty() {
        return Vec::new();
    }

    match serde_json::from_slice::<ErrorDescription>(body) {
        Ok(description) => description.errors,
        Err(_) => vec![ApiError::new("", String::from_utf8_lossy(body))],
    }
}

/// 远程调用结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// 状态码是否为该操作约定的成功状态码
    pub is_success: bool,
    /// HTTP 状态码
    pub status_code: u16,
    /// 错误列表（仅失败时有内容）
    pub errors: Vec<ApiError>,
    /// 响应数据（仅成功且有响应体时存在）
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// 成功结果
    pub fn success(status_code: u16, data: Option<T>) -> Self {
        Self {
            is_success: true,
            status_code,
            errors: Vec::new(),
            data,
        }
    }

    /// 失败结果
    pub fn failure(status_code: u16, errors: Vec<ApiError>) -> Self {
        Self {
            is_success: false,
            status_code,
            errors,
            data: None,
        }
    }

    /// 根据响应构建结果
    ///
    /// # 参数
    /// * `response` - HTTP 响应
    /// * `success_codes` - 该操作约定的成功状态码
    /// * `parse` - 成功且有响应体时的数据解析函数
    pub fn from_response<F>(response: HttpResponse, success_codes: &[u16], parse: F) -> Result<Self>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        let HttpResponse { status, body } = response;

        if !success_codes.contains(&status) {
            return Ok(Self::failure(status, parse_errors(&body)));
        }

        let data = if body.is_empty() {
            None
        } else {
            Some(parse(body)?)
        };

        Ok(Self::success(status, data))
    }

    /// 转换数据类型，保留状态码和错误
    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResult {
            is_success: self.is_success,
            status_code: self.status_code,
            errors: self.errors,
            data: self.data.map(f),
        }
    }

    /// 丢弃数据，用于把某一步的失败结果向上传递
    pub fn discard<U>(self) -> ApiResult<U> {
        ApiResult {
            is_success: self.is_success,
            status_code: self.status_code,
            errors: self.errors,
            data: None,
        }
    }

    /// 转换为旧风格结果（失败时返回 FssError::Remote）
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success {
            Ok(self.data)
        } else {
            Err(FssError::Remote {
                status_code: self.status_code,
                errors: self.errors,
            })
        }
    }

    /// 转换为旧风格结果，并要求响应数据存在
    pub fn into_data(self) -> Result<T> {
        let status_code = self.status_code;
        self.into_result()?.ok_or_else(|| {
            FssError::InvalidResponse(format!("响应缺少数据: status={}", status_code))
        })
    }
}

impl ApiResult<()> {
    /// 只关心状态码的操作（注册、上传分片、提交等）
    pub fn from_status(response: HttpResponse, success_codes: &[u16]) -> Self {
        let HttpResponse { status, body } = response;
        if success_codes.contains(&status) {
            Self::success(status, None)
        } else {
            Self::failure(status, parse_errors(&body))
        }
    }
}

impl<T: DeserializeOwned> ApiResult<T> {
    /// JSON 响应
    pub fn from_json_response(response: HttpResponse, success_codes: &[u16]) -> Result<Self> {
        Self::from_response(response, success_codes, |body| {
            serde_json::from_slice(&body).map_err(FssError::from)
        })
    }
}

impl ApiResult<Vec<u8>> {
    /// 原始字节响应（下载）
    pub fn from_bytes_response(response: HttpResponse, success_codes: &[u16]) -> Self {
        let HttpResponse { status, body } = response;
        if !success_codes.contains(&status) {
            return Self::failure(status, parse_errors(&body));
        }
        let data = if body.is_empty() { None } else { Some(body) };
        Self::success(status, data)
    }
}
