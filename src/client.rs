// File Share Service 客户端
//
// 一个客户端实例持有一份配置和一个共享的传输，可在多个批次间并发使用。
// 具体操作分布在：
// - batch::lifecycle  创建/状态/提交/回滚/ACL/过期时间
// - uploader::engine  分片上传
// - query             搜索与下载

use crate::config::ClientConfig;
use crate::error::{FssError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// File Share Service 客户端
#[derive(Debug, Clone)]
pub struct FileShareClient {
    /// 共享传输
    transport: Arc<dyn HttpTransport>,
    /// 客户端配置
    config: ClientConfig,
}

impl FileShareClient {
    /// 创建使用 reqwest 传输的客户端
    ///
    /// 访问令牌只在这里获取一次，之后附加到该客户端的所有请求上
    ///
    /// # 参数
    /// * `config` - 客户端配置
    /// * `token_provider` - 访问令牌提供者
    pub async fn connect(config: ClientConfig, token_provider: &dyn TokenProvider) -> Result<Self> {
        config.validate()?;

        let access_token = token_provider.access_token().await?;
        let transport = ReqwestTransport::new(
            &config.base_address,
            &access_token,
            Duration::from_secs(config.timeout_secs),
        )?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// 使用自定义传输创建客户端
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;

        info!(
            "初始化 File Share 客户端: base_address={}, max_block_size={} bytes",
            config.base_address, config.max_block_size
        );

        Ok(Self { transport, config })
    }

    /// 客户端配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 单个分片最大字节数
    pub fn max_block_size(&self) -> usize {
        self.config.max_block_size
    }

    /// 发送请求
    ///
    /// 请求与取消令牌竞争：令牌触发时中止请求并返回 Cancelled，不做任何补偿操作
    pub(crate) async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(FssError::Cancelled);
        }

        let method = request.method.clone();
        let path = request.path.clone();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("请求已取消: {} {}", method, path);
                Err(FssError::Cancelled)
            }
            response = self.transport.send(request) => response,
        }
    }
}

/// 批次路径: `/batch/{batch_id}`
pub(crate) fn batch_path(batch_id: &str) -> String {
    format!("/batch/{}", urlencoding::encode(batch_id))
}

/// 文件路径: `/batch/{batch_id}/files/{file_name}`
pub(crate) fn file_path(batch_id: &str, file_name: &str) -> String {
    format!(
        "{}/files/{}",
        batch_path(batch_id),
        urlencoding::encode(file_name)
    )
}

/// 校验批次 ID
pub(crate) fn ensure_batch_id(batch_id: &str) -> Result<()> {
    if batch_id.trim().is_empty() {
        return Err(FssError::InvalidArgument("批次 ID 不能为空".to_string()));
    }
    Ok(())
}
