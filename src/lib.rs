// File Share Service Rust Library
// File Share Service 客户端核心库

// 批次模块
pub mod batch;

// 客户端
pub mod client;

// 配置管理模块
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// 请求/响应数据类型
pub mod models;

// 查询与下载
pub mod query;

// 统一结果封装
pub mod result;

// 传输层
pub mod transport;

// 上传引擎模块
pub mod uploader;

// 导出常用类型
pub use batch::{BatchHandle, FileRecord};
pub use client::FileShareClient;
pub use config::{ClientConfig, LogConfig};
pub use error::{FssError, Result};
pub use logging::{init_logging, LogGuard};
pub use models::{
    Acl, BatchAttribute, BatchAttributesSearchResponse, BatchDetails, BatchModel,
    BatchSearchResponse, BatchStatus, KeyValuePair,
};
pub use query::ByteRange;
pub use result::{ApiError, ApiResult};
pub use transport::{HttpTransport, ReqwestTransport, StaticTokenProvider, TokenProvider};
pub use tokio_util::sync::CancellationToken;
pub use uploader::{FileUploadProgress, ProgressCallback, DEFAULT_MAX_BLOCK_SIZE};
