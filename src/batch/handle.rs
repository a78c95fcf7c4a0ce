// 批次句柄
//
// 客户端侧的进行中批次：服务端分配的批次 ID + 已成功上传的文件清单。
// 清单只能通过上传引擎追加，保证其中只有完整上传的文件

use serde::{Deserialize, Serialize};

/// 文件清单条目（提交批次时的请求体元素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// 文件名
    pub file_name: String,
    /// 整个文件的 MD5（base64）
    pub hash: String,
}

/// 批次句柄
///
/// 由 `create_batch` 创建，每成功添加一个文件追加一条记录，
/// 提交或回滚之后不应再使用（客户端不做检查）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHandle {
    batch_id: String,
    files: Vec<FileRecord>,
}

impl BatchHandle {
    pub(crate) fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            files: Vec::new(),
        }
    }

    /// 服务端分配的批次 ID
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// 已添加的文件（按添加顺序）
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// 已添加的文件数量
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// 记录一个完整上传的文件
    pub(crate) fn add_file(&mut self, file_name: impl Into<String>, hash: impl Into<String>) {
        self.files.push(FileRecord {
            file_name: file_name.into(),
            hash: hash.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_is_empty() {
        let handle = BatchHandle::new("abc123");
        assert_eq!(handle.batch_id(), "abc123");
        assert!(handle.files().is_empty());
        assert_eq!(handle.file_count(), 0);
    }

    #[test]
    fn test_add_file_keeps_order() {
        let mut handle = BatchHandle::new("abc123");
        handle.add_file("File1.bin", "aGFzaDE=");
        handle.add_file("File2.bin", "aGFzaDI=");

        assert_eq!(handle.file_count(), 2);
        assert_eq!(handle.files()[0].file_name, "File1.bin");
        assert_eq!(handle.files()[1].hash, "aGFzaDI=");
    }

    #[test]
    fn test_commit_payload_json() {
        let mut handle = BatchHandle::new("abc123");
        handle.add_file("File1.bin", "aGFzaDE=");
        assert_eq!(
            serde_json::to_string(handle.files()).unwrap(),
            r#"[{"fileName":"File1.bin","hash":"aGFzaDE="}]"#
        );
    }
}
