// 批次相关请求/响应类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 键值对属性（批次属性、文件属性）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 批次访问控制列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acl {
    /// 可读用户
    #[serde(default)]
    pub read_users: Vec<String>,
    /// 可读用户组
    #[serde(default)]
    pub read_groups: Vec<String>,
}

impl Acl {
    pub fn new(read_users: Vec<String>, read_groups: Vec<String>) -> Self {
        Self {
            read_users,
            read_groups,
        }
    }
}

/// 创建批次请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchModel {
    /// 业务单元
    pub business_unit: String,
    /// 访问控制
    #[serde(default)]
    pub acl: Acl,
    /// 批次属性
    #[serde(default)]
    pub attributes: Vec<KeyValuePair>,
    /// 过期时间
    #[serde(
        default,
        with = "crate::models::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl BatchModel {
    pub fn new(business_unit: impl Into<String>) -> Self {
        Self {
            business_unit: business_unit.into(),
            acl: Acl::default(),
            attributes: Vec::new(),
            expiry_date: None,
        }
    }

    pub fn with_acl(mut self, acl: Acl) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(KeyValuePair::new(key, value));
        self
    }

    pub fn with_expiry_date(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

/// 创建批次响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchResponse {
    pub batch_id: String,
}

/// 批次状态
///
/// 提交是异步的：Incomplete → CommitInProgress → Committed | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// 创建后、提交前
    Incomplete,
    /// 服务端正在提交
    CommitInProgress,
    /// 已提交
    Committed,
    /// 已回滚
    RolledBack,
    /// 提交失败
    Failed,
}

impl BatchStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Committed | BatchStatus::RolledBack | BatchStatus::Failed
        )
    }
}

/// 批次状态响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusResponse {
    pub batch_id: String,
    pub status: BatchStatus,
}

/// 注册文件请求体
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileAttributes {
    pub attributes: Vec<KeyValuePair>,
}

/// 完成文件请求体（按上传顺序排列的分片 ID）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlockList {
    pub block_ids: Vec<String>,
}

/// 设置过期时间请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExpiry {
    #[serde(with = "crate::models::datetime")]
    pub expiry_date: DateTime<Utc>,
}
