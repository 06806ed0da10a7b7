pub mod engine;
pub mod form;
pub mod pipeline;
pub mod render;
pub mod totals;

pub use crate::domain::model::{LaborInputs, LineItem, ServiceReport, Totals};
pub use crate::domain::ports::{ConfigProvider, SheetPipeline, Storage};
pub use crate::utils::error::Result;
