// 完整性校验（MD5）
//
// - 分片 MD5：随分片上传，作为 Content-MD5 请求头
// - 文件 MD5：提交批次时作为文件清单的哈希（base64）

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::Context as Md5Context;
use std::io::{self, SeekFrom};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// MD5 摘要（16 字节）
pub type Md5Digest = [u8; 16];

/// 读取缓冲区大小
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// 计算字节数组的 MD5
pub fn calculate_md5(data: &[u8]) -> Md5Digest {
    md5::compute(data).0
}

/// MD5 摘要的 base64 编码（Content-MD5 和提交清单使用）
pub fn md5_base64(digest: &Md5Digest) -> String {
    STANDARD.encode(digest)
}

/// 计算流从当前位置到末尾的 MD5
///
/// 计算完成后恢复流的原始位置
///
/// # 返回
/// (MD5, 参与计算的字节数)
pub async fn calculate_stream_md5<R>(reader: &mut R) -> io::Result<(Md5Digest, u64)>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let origin = reader.stream_position().await?;

    let mut hasher = Md5Context::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.consume(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    reader.seek(SeekFrom::Start(origin)).await?;
    Ok((hasher.compute().0, total))
}

/// 计算流当前位置处一个分片的 MD5
///
/// 读取 `min(max_block_size, 剩余字节数)` 字节，计算完成后恢复流的原始位置
pub async fn calculate_block_md5<R>(reader: &mut R, max_block_size: usize) -> io::Result<Md5Digest>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let origin = reader.stream_position().await?;

    let mut block = Vec::with_capacity(max_block_size.min(HASH_BUFFER_SIZE));
    (&mut *reader)
        .take(max_block_size as u64)
        .read_to_end(&mut block)
        .await?;

    reader.seek(SeekFrom::Start(origin)).await?;
    Ok(calculate_md5(&block))
}
