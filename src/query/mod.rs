// 查询与下载
//
// 都是单个请求的只读操作：
// - 批次搜索、属性搜索、属性列表、批次详情
// - 下载单个文件（支持 Range）、下载整个批次的 zip

use crate::client::{batch_path, ensure_batch_id, file_path, FileShareClient};
use crate::error::{FssError, Result};
use crate::models::{BatchAttributesSearchResponse, BatchDetails, BatchSearchResponse};
use crate::result::ApiResult;
use crate::transport::HttpRequest;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const SEARCH_SUCCESS_CODES: &[u16] = &[200];
const DOWNLOAD_SUCCESS_CODES: &[u16] = &[200, 206];
const ZIP_SUCCESS_CODES: &[u16] = &[200];

/// 下载字节范围（闭区间，对应 `Range: bytes=start-end`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// 范围长度
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

fn search_path(filter: Option<&str>, limit: u32, start: u32) -> String {
    match filter {
        Some(filter) => format!(
            "/batch?$filter={}&limit={}&start={}",
            urlencoding::encode(filter),
            limit,
            start
        ),
        None => format!("/batch?limit={}&start={}", limit, start),
    }
}

fn attribute_search_path(filter: Option<&str>, max_attribute_value_count: u32) -> String {
    match filter {
        Some(filter) => format!(
            "/attributes/search?$filter={}&maxAttributeValueCount={}",
            urlencoding::encode(filter),
            max_attribute_value_count
        ),
        None => format!(
            "/attributes/search?maxAttributeValueCount={}",
            max_attribute_value_count
        ),
    }
}

impl FileShareClient {
    /// 搜索批次（Result 风格）
    ///
    /// # 参数
    /// * `filter` - 搜索表达式，如 `BusinessUnit eq 'ADDS'`
    /// * `limit` - 每页数量，必须大于 0
    /// * `start` - 起始偏移
    pub async fn search_batches_with_result(
        &self,
        filter: Option<&str>,
        limit: u32,
        start: u32,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<BatchSearchResponse>> {
        if limit == 0 {
            return Err(FssError::InvalidArgument("每页数量必须大于 0".to_string()));
        }

        let request = HttpRequest::get(search_path(filter, limit, start));
        let result = ApiResult::<BatchSearchResponse>::from_json_response(
            self.execute(request, cancel).await?,
            SEARCH_SUCCESS_CODES,
        )?;

        if let Some(page) = &result.data {
            debug!(
                "批次搜索完成: count={}, total={}, start={}",
                page.count, page.total, start
            );
        }
        Ok(result)
    }

    /// 搜索批次
    pub async fn search_batches(
        &self,
        filter: Option<&str>,
        limit: u32,
        start: u32,
    ) -> Result<BatchSearchResponse> {
        self.search_batches_with_result(filter, limit, start, &CancellationToken::new())
            .await?
            .into_data()
    }

    /// 搜索批次属性（Result 风格）
    ///
    /// `max_attribute_value_count` 为每个属性最多返回的取值数量，必须大于 0
    pub async fn search_batch_attributes_with_result(
        &self,
        filter: Option<&str>,
        max_attribute_value_count: u32,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<BatchAttributesSearchResponse>> {
        if max_attribute_value_count == 0 {
            return Err(FssError::InvalidArgument(
                "属性取值数量必须大于 0".to_string(),
            ));
        }

        let request = HttpRequest::get(attribute_search_path(filter, max_attribute_value_count));
        ApiResult::from_json_response(self.execute(request, cancel).await?, SEARCH_SUCCESS_CODES)
    }

    /// 搜索批次属性
    pub async fn search_batch_attributes(
        &self,
        filter: Option<&str>,
        max_attribute_value_count: u32,
    ) -> Result<BatchAttributesSearchResponse> {
        self.search_batch_attributes_with_result(
            filter,
            max_attribute_value_count,
            &CancellationToken::new(),
        )
        .await?
        .into_data()
    }

    /// 列出所有批次属性名（Result 风格）
    pub async fn list_attributes_with_result(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<Vec<String>>> {
        let request = HttpRequest::get("/attributes");
        ApiResult::from_json_response(self.execute(request, cancel).await?, SEARCH_SUCCESS_CODES)
    }

    /// 列出所有批次属性名
    pub async fn list_attributes(&self) -> Result<Vec<String>> {
        Ok(self
            .list_attributes_with_result(&CancellationToken::new())
            .await?
            .into_result()?
            .unwrap_or_default())
    }

    /// 批次详情（Result 风格）
    pub async fn get_batch_details_with_result(
        &self,
        batch_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<BatchDetails>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::get(batch_path(batch_id));
        ApiResult::from_json_response(self.execute(request, cancel).await?, SEARCH_SUCCESS_CODES)
    }

    /// 批次详情
    pub async fn get_batch_details(&self, batch_id: &str) -> Result<BatchDetails> {
        self.get_batch_details_with_result(batch_id, &CancellationToken::new())
            .await?
            .into_data()
    }

    /// 下载文件（Result 风格）
    ///
    /// 指定 `range` 时只下载该范围，服务端返回 206
    pub async fn download_file_with_result(
        &self,
        batch_id: &str,
        file_name: &str,
        range: Option<ByteRange>,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<Vec<u8>>> {
        ensure_batch_id(batch_id)?;
        if file_name.is_empty() {
            return Err(FssError::InvalidArgument("文件名不能为空".to_string()));
        }

        let mut request = HttpRequest::get(file_path(batch_id, file_name));
        if let Some(range) = range {
            if range.is_empty() {
                return Err(FssError::InvalidArgument(format!(
                    "下载范围无效: {}-{}",
                    range.start, range.end
                )));
            }
            request = request.header("Range", range.header_value());
        }

        let result = ApiResult::from_bytes_response(
            self.execute(request, cancel).await?,
            DOWNLOAD_SUCCESS_CODES,
        );
        if !result.is_success {
            warn!(
                "下载文件失败: batch={}, file={}, status={}",
                batch_id, file_name, result.status_code
            );
        }
        Ok(result)
    }

    /// 下载文件
    pub async fn download_file(
        &self,
        batch_id: &str,
        file_name: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>> {
        Ok(self
            .download_file_with_result(batch_id, file_name, range, &CancellationToken::new())
            .await?
            .into_result()?
            .unwrap_or_default())
    }

    /// 下载文件并写入 writer（Result 风格），成功时数据为写入的字节数
    pub async fn download_file_to_with_result<W>(
        &self,
        batch_id: &str,
        file_name: &str,
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<u64>>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let result = self
            .download_file_with_result(batch_id, file_name, None, cancel)
            .await?;
        if !result.is_success {
            return Ok(result.discard());
        }

        let data = result.data.as_deref().unwrap_or_default();
        writer.write_all(data).await?;
        writer.flush().await?;

        info!(
            "文件已下载: batch={}, file={}, size={} bytes",
            batch_id,
            file_name,
            data.len()
        );
        let written = data.len() as u64;
        Ok(result.map(|_| written))
    }

    /// 下载文件并写入 writer，返回写入的字节数
    pub async fn download_file_to<W>(
        &self,
        batch_id: &str,
        file_name: &str,
        writer: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        Ok(self
            .download_file_to_with_result(batch_id, file_name, writer, &CancellationToken::new())
            .await?
            .into_result()?
            .unwrap_or_default())
    }

    /// 下载整个批次的 zip（Result 风格）
    pub async fn download_zip_with_result(
        &self,
        batch_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<Vec<u8>>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::get(format!("{}/files", batch_path(batch_id)));
        Ok(ApiResult::from_bytes_response(
            self.execute(request, cancel).await?,
            ZIP_SUCCESS_CODES,
        ))
    }

    /// 下载整个批次的 zip
    pub async fn download_zip(&self, batch_id: &str) -> Result<Vec<u8>> {
        Ok(self
            .download_zip_with_result(batch_id, &CancellationToken::new())
            .await?
            .into_result()?
            .unwrap_or_default())
    }
}
