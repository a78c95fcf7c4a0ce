// 上传分片
//
// File Share Service 分片规则：
// - 分片 ID 从 1 开始，连续递增，格式化为 5 位补零十进制字符串（00001、00002 ...）
//   服务端按字典序拼装，补零保证字典序与数值序一致
// - 除最后一个分片外，每个分片大小等于 max_block_size
// - 文件大小恰好为分片大小整数倍时，不会产生空的尾分片
// - 空文件没有分片
// - 分片 ID 固定 5 位，单个文件最多 99999 个分片

use crate::uploader::hasher::{calculate_md5, md5_base64, Md5Digest};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// 默认分片大小: 4MB
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// 分片 ID 位数
pub const BLOCK_ID_WIDTH: usize = 5;

/// 单个文件的最大分片数（5 位分片 ID 能表示的最大值）
pub const MAX_BLOCK_COUNT: usize = 99_999;

/// 格式化分片 ID
///
/// # 参数
/// * `block_number` - 分片序号（从 1 开始，不超过 MAX_BLOCK_COUNT）
pub fn format_block_id(block_number: usize) -> String {
    format!("{:0width$}", block_number, width = BLOCK_ID_WIDTH)
}

/// 计算分片数量: ceil(total_size / max_block_size)
pub fn block_count(total_size: u64, max_block_size: usize) -> usize {
    if total_size == 0 || max_block_size == 0 {
        return 0;
    }
    total_size.div_ceil(max_block_size as u64) as usize
}

/// 上传分片
#[derive(Debug, Clone)]
pub struct UploadBlock {
    /// 分片序号（从 1 开始）
    pub number: usize,
    /// 分片 ID（5 位补零）
    pub block_id: String,
    /// 分片数据
    pub data: Vec<u8>,
    /// 分片数据的 MD5
    pub md5: Md5Digest,
}

impl UploadBlock {
    pub fn new(number: usize, data: Vec<u8>) -> Self {
        let md5 = calculate_md5(&data);
        Self {
            number,
            block_id: format_block_id(number),
            data,
            md5,
        }
    }

    /// 分片大小
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Content-MD5 请求头的值
    pub fn content_md5(&self) -> String {
        md5_base64(&self.md5)
    }
}

/// 分片读取器
///
/// 从流的当前位置开始，依次读取最多 max_block_size 字节的分片，直到流末尾
pub struct BlockReader<'a, R: AsyncRead + Unpin> {
    reader: &'a mut R,
    max_block_size: usize,
    next_number: usize,
}

impl<'a, R: AsyncRead + Unpin> BlockReader<'a, R> {
    pub fn new(reader: &'a mut R, max_block_size: usize) -> Self {
        Self {
            reader,
            max_block_size,
            next_number: 1,
        }
    }

    /// 已读取的分片数量
    pub fn blocks_read(&self) -> usize {
        self.next_number - 1
    }

    /// 读取下一个分片，流已读完时返回 None
    ///
    /// 分片数超过 MAX_BLOCK_COUNT 时返回 InvalidInput
    pub async fn next_block(&mut self) -> io::Result<Option<UploadBlock>> {
        let mut data = Vec::with_capacity(self.max_block_size.min(DEFAULT_MAX_BLOCK_SIZE));
        (&mut *self.reader)
            .take(self.max_block_size as u64)
            .read_to_end(&mut data)
            .await?;

        if data.is_empty() {
            return Ok(None);
        }

        if self.next_number > MAX_BLOCK_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("分片数超过上限 {}", MAX_BLOCK_COUNT),
            ));
        }

        let block = UploadBlock::new(self.next_number, data);
        self.next_number += 1;

        debug!(
            "读取分片 #{}: 大小={} bytes",
            block.block_id,
            block.size()
        );

        Ok(Some(block))
    }
}
