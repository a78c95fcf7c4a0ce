// 访问令牌获取
//
// 令牌只在创建客户端时获取一次，之后附加到该客户端发出的所有请求上，不会自动刷新

use crate::error::{FssError, Result};
use async_trait::async_trait;

/// 访问令牌提供者
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// 获取访问令牌（不含 `bearer` 前缀）
    async fn access_token(&self) -> Result<String>;
}

/// 固定令牌
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"***")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(FssError::Authentication("访问令牌为空".to_string()));
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticTokenProvider::new("secret-token");
        assert_eq!(provider.access_token().await.unwrap(), "secret-token");
        assert!(!format!("{:?}", provider).contains("secret-token"));
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let provider = StaticTokenProvider::new("  ");
        assert!(matches!(
            provider.access_token().await,
            Err(FssError::Authentication(_))
        ));
    }
}
