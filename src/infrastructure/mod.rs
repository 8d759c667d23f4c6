//! 基础设施层：持有 Page，只暴露执行脚本的能力

pub mod cdp_page;
pub mod js_executor;

pub use cdp_page::CdpHostPage;
pub use js_executor::JsExecutor;
