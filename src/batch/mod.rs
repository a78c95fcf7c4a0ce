// 批次模块
//
// - handle:    客户端侧的批次句柄
// - lifecycle: 创建、查询状态、提交、回滚、ACL 和过期时间

pub mod handle;
pub mod lifecycle;

pub use handle::{BatchHandle, FileRecord};
