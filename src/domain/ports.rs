use crate::domain::model::{SearchOutcome, SearchQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 一個職缺來源。只負責取回資料，不做去重、過濾或儲存。
///
/// 沒有憑證時應回傳空結果並附上警告，而不是錯誤；網路或解析錯誤則以 `Err` 回傳。
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome>;
}
