//! 页面访问层
//!
//! - `host_page` - 宿主页面端口（trait）与元素操作
//! - `snapshot` - 页面脚本采集的只读快照
//! - `matcher` - 选择器回退链
//! - `selectors` - 各平台的选择器目录

pub mod host_page;
pub mod matcher;
pub mod selectors;
pub mod snapshot;

pub use host_page::{DomAction, DomEvent, ElementHandle, ElementInfo, HostPage};
pub use matcher::{Filter, Matcher, MatcherChain};
pub use selectors::SelectorCatalog;
pub use snapshot::{CardFields, RawCard, RawControl, ScrollMetrics, SelectOption};
