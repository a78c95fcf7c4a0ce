// 查询相关响应类型

use crate::models::{BatchStatus, KeyValuePair};
use serde::{Deserialize, Serialize};

/// 链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// 分页链接
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Link>,
}

/// 批次中的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFileDetails {
    pub filename: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<KeyValuePair>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// 批次详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetails {
    pub batch_id: String,
    #[serde(default)]
    pub status: Option<BatchStatus>,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub attributes: Vec<KeyValuePair>,
    /// 发布时间（服务端原样返回的字符串）
    #[serde(default)]
    pub batch_publish_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub files: Vec<BatchFileDetails>,
}

/// 批次搜索响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSearchResponse {
    /// 本页条目数
    #[serde(default)]
    pub count: u32,
    /// 匹配总数
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub entries: Vec<BatchDetails>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// 属性及其取值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAttribute {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// 属性搜索响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAttributesSearchResponse {
    #[serde(default)]
    pub search_batch_count: u32,
    #[serde(default)]
    pub batch_attributes: Vec<BatchAttribute>,
}
