// 错误类型定义
//
// 错误分类：
// - InvalidArgument: 调用方参数不合法，在发起任何网络请求之前就失败
// - Remote: 服务端返回了非预期的状态码
// - Transport / Io: 网络交换或本地流读取失败
// - Cancelled: 调用方通过取消令牌中止了操作

use crate::result::ApiError;
use thiserror::Error;

/// 客户端统一错误类型
#[derive(Debug, Error)]
pub enum FssError {
    /// 参数错误（不会发起网络请求）
    #[error("参数错误: {0}")]
    InvalidArgument(String),

    /// 服务端拒绝请求
    #[error("服务端返回错误: status={status_code}, errors={}", format_errors(.errors))]
    Remote {
        status_code: u16,
        errors: Vec<ApiError>,
    },

    /// 网络请求失败（超时、DNS、连接重置等）
    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 本地流读取失败
    #[error("读取文件流失败: {0}")]
    Io(#[from] std::io::Error),

    /// 操作已取消
    #[error("操作已取消")]
    Cancelled,

    /// 获取访问令牌失败
    #[error("获取访问令牌失败: {0}")]
    Authentication(String),

    /// 响应无法解析
    #[error("无效的响应: {0}")]
    InvalidResponse(String),

    /// JSON 序列化/反序列化失败
    #[error("JSON 处理失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FssError {
    /// 服务端返回的状态码（仅 Remote 错误有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FssError::Remote { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// 是否为取消错误
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FssError::Cancelled)
    }
}

fn format_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "[]".to_string();
    }
    let parts: Vec<String> = errors
        .iter()
        .map(|e| {
            if e.source.is_empty() {
                e.description.clone()
            } else {
                format!("{}: {}", e.source, e.description)
            }
        })
        .collect();
    format!("[{}]", parts.join("; "))
}

/// 客户端统一结果类型
pub type Result<T> = std::result::Result<T, FssError>;
