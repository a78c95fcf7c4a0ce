// 批次生命周期
//
// 创建 → 上传文件 → 提交（异步，通过状态查询观察结果）或回滚
// ACL 和过期时间可在批次存续期间单独修改

use crate::batch::BatchHandle;
use crate::client::{batch_path, ensure_batch_id, FileShareClient};
use crate::error::{FssError, Result};
use crate::models::{Acl, BatchExpiry, BatchModel, BatchStatus, BatchStatusResponse, CreateBatchResponse};
use crate::result::ApiResult;
use crate::transport::HttpRequest;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const CREATE_SUCCESS_CODES: &[u16] = &[201];
const STATUS_SUCCESS_CODES: &[u16] = &[200];
const COMMIT_SUCCESS_CODES: &[u16] = &[202];
const NO_CONTENT_SUCCESS_CODES: &[u16] = &[204];

impl FileShareClient {
    /// 创建批次（Result 风格）
    pub async fn create_batch_with_result(
        &self,
        batch: &BatchModel,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<BatchHandle>> {
        let request = HttpRequest::post("/batch").json(batch)?;
        let response = self.execute(request, cancel).await?;

        let result = ApiResult::<CreateBatchResponse>::from_json_response(
            response,
            CREATE_SUCCESS_CODES,
        )?;
        if !result.is_success {
            warn!(
                "创建批次失败: business_unit={}, status={}",
                batch.business_unit, result.status_code
            );
            return Ok(result.discard());
        }
        if result.data.is_none() {
            return Err(FssError::InvalidResponse(
                "创建批次响应缺少 batchId".to_string(),
            ));
        }

        let result = result.map(|created| BatchHandle::new(created.batch_id));
        if let Some(handle) = &result.data {
            info!(
                "批次已创建: batch={}, business_unit={}",
                handle.batch_id(),
                batch.business_unit
            );
        }
        Ok(result)
    }

    /// 创建批次
    pub async fn create_batch(&self, batch: &BatchModel) -> Result<BatchHandle> {
        self.create_batch_with_result(batch, &CancellationToken::new())
            .await?
            .into_data()
    }

    /// 查询批次状态（Result 风格）
    pub async fn get_batch_status_with_result(
        &self,
        batch_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<BatchStatus>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::get(format!("{}/status", batch_path(batch_id)));
        let response = self.execute(request, cancel).await?;

        let result = ApiResult::<BatchStatusResponse>::from_json_response(
            response,
            STATUS_SUCCESS_CODES,
        )?
        .map(|body| body.status);

        debug!("批次状态: batch={}, status={:?}", batch_id, result.data);
        Ok(result)
    }

    /// 查询批次状态
    pub async fn get_batch_status(&self, batch_id: &str) -> Result<BatchStatus> {
        self.get_batch_status_with_result(batch_id, &CancellationToken::new())
            .await?
            .into_data()
    }

    /// 提交批次（Result 风格）
    ///
    /// 提交清单为句柄中按添加顺序排列的文件。服务端接受后异步提交，
    /// 这里不等待提交完成
    pub async fn commit_batch_with_result(
        &self,
        handle: &BatchHandle,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        ensure_batch_id(handle.batch_id())?;
        let request = HttpRequest::put(batch_path(handle.batch_id())).json(handle.files())?;
        let result =
            ApiResult::from_status(self.execute(request, cancel).await?, COMMIT_SUCCESS_CODES);

        if result.is_success {
            info!(
                "批次提交已受理: batch={}, 文件数={}",
                handle.batch_id(),
                handle.file_count()
            );
        } else {
            warn!(
                "批次提交失败: batch={}, status={}",
                handle.batch_id(),
                result.status_code
            );
        }
        Ok(result)
    }

    /// 提交批次
    pub async fn commit_batch(&self, handle: &BatchHandle) -> Result<()> {
        self.commit_batch_with_result(handle, &CancellationToken::new())
            .await?
            .into_result()
            .map(|_| ())
    }

    /// 回滚批次（Result 风格）
    pub async fn rollback_batch_with_result(
        &self,
        handle: &BatchHandle,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        ensure_batch_id(handle.batch_id())?;
        let request = HttpRequest::delete(batch_path(handle.batch_id()));
        let result = ApiResult::from_status(
            self.execute(request, cancel).await?,
            NO_CONTENT_SUCCESS_CODES,
        );

        if result.is_success {
            info!("批次已回滚: batch={}", handle.batch_id());
        } else {
            warn!(
                "批次回滚失败: batch={}, status={}",
                handle.batch_id(),
                result.status_code
            );
        }
        Ok(result)
    }

    /// 回滚批次
    pub async fn rollback_batch(&self, handle: &BatchHandle) -> Result<()> {
        self.rollback_batch_with_result(handle, &CancellationToken::new())
            .await?
            .into_result()
            .map(|_| ())
    }

    /// 追加 ACL（Result 风格）
    pub async fn append_acl_with_result(
        &self,
        batch_id: &str,
        acl: &Acl,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::post(format!("{}/acl", batch_path(batch_id))).json(acl)?;
        self.send_no_content(request, cancel).await
    }

    /// 追加 ACL
    pub async fn append_acl(&self, batch_id: &str, acl: &Acl) -> Result<()> {
        self.append_acl_with_result(batch_id, acl, &CancellationToken::new())
            .await?
            .into_result()
            .map(|_| ())
    }

    /// 替换 ACL（Result 风格）
    pub async fn replace_acl_with_result(
        &self,
        batch_id: &str,
        acl: &Acl,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::put(format!("{}/acl", batch_path(batch_id))).json(acl)?;
        self.send_no_content(request, cancel).await
    }

    /// 替换 ACL
    pub async fn replace_acl(&self, batch_id: &str, acl: &Acl) -> Result<()> {
        self.replace_acl_with_result(batch_id, acl, &CancellationToken::new())
            .await?
            .into_result()
            .map(|_| ())
    }

    /// 设置批次过期时间（Result 风格）
    pub async fn set_expiry_date_with_result(
        &self,
        batch_id: &str,
        expiry_date: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        ensure_batch_id(batch_id)?;
        let request = HttpRequest::put(format!("{}/expiry", batch_path(batch_id)))
            .json(&BatchExpiry { expiry_date })?;
        self.send_no_content(request, cancel).await
    }

    /// 设置批次过期时间
    pub async fn set_expiry_date(&self, batch_id: &str, expiry_date: DateTime<Utc>) -> Result<()> {
        self.set_expiry_date_with_result(batch_id, expiry_date, &CancellationToken::new())
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn send_no_content(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResult<()>> {
        let line = format!("{} {}", request.method, request.path);
        let result = ApiResult::from_status(
            self.execute(request, cancel).await?,
            NO_CONTENT_SUCCESS_CODES,
        );
        if !result.is_success {
            warn!("请求失败: {}, status={}", line, result.status_code);
        }
        Ok(result)
    }
}
