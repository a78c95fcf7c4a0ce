// 配置管理模块

use crate::error::{FssError, Result as FssResult};
use crate::uploader::DEFAULT_MAX_BLOCK_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 服务地址，如 `https://fss.example.com/api`
    pub base_address: String,
    /// 单个分片最大字节数（默认 4MB）
    #[serde(default = "default_max_block_size")]
    pub max_block_size: usize,
    /// 单个请求超时时间（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

fn default_max_block_size() -> usize {
    DEFAULT_MAX_BLOCK_SIZE
}

fn default_timeout_secs() -> u64 {
    60
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 是否启用日志文件持久化
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
    /// 日志文件保存目录
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// 日志保留天数（默认 7 天）
    #[serde(default = "default_log_retention_days")]
    pub retention_days: u32,
    /// 日志级别（默认 info）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_enabled() -> bool {
    false
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_retention_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            log_dir: default_log_dir(),
            retention_days: default_log_retention_days(),
            level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// 使用默认参数创建配置
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            max_block_size: default_max_block_size(),
            timeout_secs: default_timeout_secs(),
            log: LogConfig::default(),
        }
    }

    /// 设置分片大小
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    /// 设置请求超时
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// 验证配置
    ///
    /// - 服务地址必须是 http/https 绝对地址
    /// - 分片大小必须大于 0
    pub fn validate(&self) -> FssResult<()> {
        let url = reqwest::Url::parse(&self.base_address).map_err(|e| {
            FssError::InvalidArgument(format!("服务地址无效: {}, 错误: {}", self.base_address, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FssError::InvalidArgument(format!(
                "服务地址必须使用 http 或 https: {}",
                self.base_address
            )));
        }

        if self.max_block_size == 0 {
            return Err(FssError::InvalidArgument(
                "分片大小必须大于 0".to_string(),
            ));
        }

        tracing::debug!(
            "✓ 配置验证通过: base_address={}, max_block_size={}",
            self.base_address,
            self.max_block_size
        );
        Ok(())
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content).context("Failed to parse config file")?;
        config.validate().context("配置文件验证失败")?;
        Ok(config)
    }

    /// 从文件加载配置
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
    }

    /// 保存配置到文件
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path.as_ref(), content)
            .await
            .context("Failed to write config file")?;
        Ok(())
    }
}
