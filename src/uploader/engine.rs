// 上传引擎
//
// 单个文件的上传流程（严格串行，一次只有一个请求在途）：
// 1. 注册文件: POST /batch/{id}/files/{name}，带 X-Content-Size / X-MIME-Type
// 2. 计算整个文件的 MD5（用于提交清单），然后回到流开头
// 3. 依次上传分片: PUT /batch/{id}/files/{name}/{blockId}，带 Content-MD5
// 4. 合并分片: PUT /batch/{id}/files/{name}，请求体为有序的分片 ID 列表
// 5. 全部成功后才在批次句柄上记录该文件
//
// 任何一步失败立即中止，不重试，也不清理已上传的分片。
// 读取文件流全部走异步 I/O，取消令牌在读取期间同样生效

use crate::batch::BatchHandle;
use crate::client::{ensure_batch_id, file_path, FileShareClient};
use crate::error::{FssError, Result};
use crate::models::{FileAttributes, FileBlockList, KeyValuePair};
use crate::result::ApiResult;
use crate::transport::HttpRequest;
use crate::uploader::chunk::{block_count, BlockReader, MAX_BLOCK_COUNT};
use crate::uploader::hasher::{calculate_stream_md5, md5_base64};
use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// 注册文件的成功状态码
const REGISTER_SUCCESS_CODES: &[u16] = &[200, 201];

/// 上传分片的成功状态码
const BLOCK_SUCCESS_CODES: &[u16] = &[200, 201];

/// 合并分片的成功状态码
const FINALIZE_SUCCESS_CODES: &[u16] = &[200];

/// 单个文件的上传进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileUploadProgress {
    /// 已完成的分片数
    pub blocks_complete: usize,
    /// 分片总数（整个上传过程中保持不变）
    pub total_blocks: usize,
}

impl FileUploadProgress {
    /// 是否已上传完所有分片
    pub fn is_complete(&self) -> bool {
        self.blocks_complete == self.total_blocks
    }
}

/// 进度回调
///
/// 在上传流程中同步调用：开始时一次 (0, N)，之后每完成一个分片调用一次
pub type ProgressCallback<'a> = dyn FnMut(FileUploadProgress) + Send + 'a;

fn report_progress(
    progress: &mut Option<&mut ProgressCallback<'_>>,
    blocks_complete: usize,
    total_blocks: usize,
) {
    if let Some(callback) = progress.as_deref_mut() {
        callback(FileUploadProgress {
            blocks_complete,
            total_blocks,
        });
    }
}

/// 检查流是否支持随机访问，返回流的总长度
///
/// 不支持时返回参数错误，此时尚未发起任何请求
async fn measure_stream_length<R>(stream: &mut R) -> Result<u64>
where
    R: AsyncSeek + Unpin,
{
    let seekable = async {
        let length = stream.seek(SeekFrom::End(0)).await?;
        stream.seek(SeekFrom::Start(0)).await?;
        Ok::<u64, io::Error>(length)
    };
    seekable
        .await
        .map_err(|e| FssError::InvalidArgument(format!("文件流必须支持随机访问: {}", e)))
}

/// 读取文件流，取消令牌触发时中止读取
async fn read_until_cancelled<T, F>(cancel: &CancellationToken, read: F) -> Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FssError::Cancelled),
        result = read => Ok(result?),
    }
}

impl FileShareClient {
    /// 上传一个文件到批次（Result 风格）
    ///
    /// 服务端拒绝任何一步时返回 `is_success == false` 的结果，批次句柄保持不变。
    /// 参数错误、网络失败、读取失败和取消仍然以 `Err` 返回
    ///
    /// # 参数
    /// * `handle` - 批次句柄，成功后追加一条文件记录
    /// * `stream` - 文件内容，必须支持随机访问，从位置 0 开始读取
    /// * `file_name` - 文件名（作为路径段，会被 URL 编码）
    /// * `mime_type` - MIME 类型（可选）
    /// * `attributes` - 文件属性
    /// * `progress` - 进度回调（可选）
    /// * `cancel` - 取消令牌
    #[allow(clippy::too_many_arguments)]
    pub async fn add_file_to_batch_with_result<R>(
        &self,
        handle: &mut BatchHandle,
        stream: &mut R,
        file_name: &str,
        mime_type: Option<&str>,
        attributes: &[KeyValuePair],
        mut progress: Option<&mut ProgressCallback<'_>>,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>>
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        ensure_batch_id(handle.batch_id())?;
        if file_name.is_empty() {
            return Err(FssError::InvalidArgument("文件名不能为空".to_string()));
        }
        let content_size = measure_stream_length(stream).await?;
        if block_count(content_size, self.max_block_size()) > MAX_BLOCK_COUNT {
            return Err(FssError::InvalidArgument(format!(
                "文件分片数超过上限 {}: size={} bytes, max_block_size={} bytes",
                MAX_BLOCK_COUNT,
                content_size,
                self.max_block_size()
            )));
        }

        let path = file_path(handle.batch_id(), file_name);
        info!(
            "开始上传文件: batch={}, file={}, size={} bytes",
            handle.batch_id(),
            file_name,
            content_size
        );

        // 1. 注册文件
        let mut request = HttpRequest::post(&path).header("X-Content-Size", content_size.to_string());
        if let Some(mime_type) = mime_type {
            request = request.header("X-MIME-Type", mime_type);
        }
        let request = request.json(&FileAttributes {
            attributes: attributes.to_vec(),
        })?;

        let registered = ApiResult::from_status(
            self.execute(request, cancel).await?,
            REGISTER_SUCCESS_CODES,
        );
        if !registered.is_success {
            error!(
                "注册文件失败: file={}, status={}",
                file_name, registered.status_code
            );
            return Ok(registered);
        }

        // 2. 整个文件的 MD5
        stream.seek(SeekFrom::Start(0)).await?;
        let (file_md5, hashed_size) =
            read_until_cancelled(cancel, calculate_stream_md5(&mut *stream)).await?;
        let total_blocks = block_count(hashed_size, self.max_block_size());
        debug!(
            "文件 MD5 计算完成: file={}, md5={}, 分片数={}",
            file_name,
            md5_base64(&file_md5),
            total_blocks
        );

        report_progress(&mut progress, 0, total_blocks);

        // 3. 依次上传分片
        let mut block_ids = Vec::with_capacity(total_blocks);
        let mut reader = BlockReader::new(stream, self.max_block_size());
        while let Some(block) = read_until_cancelled(cancel, reader.next_block()).await? {
            let request = HttpRequest::put(format!("{}/{}", path, block.block_id))
                .header("Content-Type", "application/octet-stream")
                .header("Content-MD5", block.content_md5())
                .bytes(block.data);

            let uploaded =
                ApiResult::from_status(self.execute(request, cancel).await?, BLOCK_SUCCESS_CODES);
            if !uploaded.is_success {
                error!(
                    "分片上传失败: file={}, block={}, status={}",
                    file_name, block.block_id, uploaded.status_code
                );
                return Ok(uploaded);
            }

            block_ids.push(block.block_id);
            report_progress(&mut progress, block_ids.len(), total_blocks);
        }

        // 4. 合并分片
        let request = HttpRequest::put(&path).json(&FileBlockList { block_ids })?;
        let finalized =
            ApiResult::from_status(self.execute(request, cancel).await?, FINALIZE_SUCCESS_CODES);
        if !finalized.is_success {
            error!(
                "合并分片失败: file={}, status={}",
                file_name, finalized.status_code
            );
            return Ok(finalized);
        }

        // 5. 记录到批次句柄
        handle.add_file(file_name, md5_base64(&file_md5));

        info!(
            "文件上传完成: batch={}, file={}, 分片数={}",
            handle.batch_id(),
            file_name,
            total_blocks
        );
        Ok(finalized)
    }

    /// 上传一个文件到批次
    ///
    /// 服务端拒绝时返回 `FssError::Remote`
    pub async fn add_file_to_batch<R>(
        &self,
        handle: &mut BatchHandle,
        stream: &mut R,
        file_name: &str,
        mime_type: Option<&str>,
        attributes: &[KeyValuePair],
        progress: Option<&mut ProgressCallback<'_>>,
    ) -> Result<()>
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        self.add_file_to_batch_with_result(
            handle,
            stream,
            file_name,
            mime_type,
            attributes,
            progress,
            &CancellationToken::new(),
        )
        .await?
        .into_result()
        .map(|_| ())
    }

    /// 上传本地文件到批次（Result 风格），文件名取路径的最后一段
    pub async fn add_file_from_path_with_result(
        &self,
        handle: &mut BatchHandle,
        local_path: &Path,
        mime_type: Option<&str>,
        attributes: &[KeyValuePair],
        progress: Option<&mut ProgressCallback<'_>>,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                FssError::InvalidArgument(format!("无法获取文件名: {:?}", local_path))
            })?
            .to_string();

        let mut file = File::open(local_path).await?;
        self.add_file_to_batch_with_result(
            handle,
            &mut file,
            &file_name,
            mime_type,
            attributes,
            progress,
            cancel,
        )
        .await
    }

    /// 上传本地文件到批次
    pub async fn add_file_from_path(
        &self,
        handle: &mut BatchHandle,
        local_path: &Path,
        mime_type: Option<&str>,
        attributes: &[KeyValuePair],
        progress: Option<&mut ProgressCallback<'_>>,
    ) -> Result<()> {
        self.add_file_from_path_with_result(
            handle,
            local_path,
            mime_type,
            attributes,
            progress,
            &CancellationToken::new(),
        )
        .await?
        .into_result()
        .map(|_| ())
    }
}
