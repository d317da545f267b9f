use async_trait::async_trait;

use crate::error::Result;
use crate::types::ComicDetail;

/// Remote source of comic detail records.
#[async_trait]
pub trait ComicApi: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Fetch the detail record addressed by an already normalized link.
    async fn comic_detail(&self, link: &str) -> Result<ComicDetail>;
}
