use crate::core::form::FormState;
use crate::core::render::RenderedSheet;
use crate::domain::company::CompanyInfo;
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

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn part_rows(&self) -> usize;
    fn company(&self) -> &CompanyInfo;
}

#[async_trait]
pub trait SheetPipeline: Send + Sync {
    async fn extract(&self) -> Result<FormState>;
    async fn transform(&self, state: FormState) -> Result<RenderedSheet>;
    async fn load(&self, sheet: RenderedSheet) -> Result<String>;
}
