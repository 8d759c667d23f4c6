use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, BrowserError};

/// 连接到已开启调试端口的浏览器并获取页面
///
/// 优先复用 URL 含有 `url_hint` 的已有标签页，找不到时新建页面并导航到 `target_url`
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
    url_hint: Option<&str>,
) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {}, 复用标签页提示: {:?}", target_url, url_hint);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(hint) = url_hint {
        debug!("正在查找 URL 包含 '{}' 的页面", hint);
        for p in pages.iter() {
            if let Ok(Some(page_url)) = p.url().await {
                debug!("检查页面: {}", page_url);
                if page_url.contains(hint) {
                    info!("✓ 复用已打开的页面: {}", page_url);
                    return Ok((browser, p.clone()));
                }
            }
        }
        debug!("未找到匹配的页面，将创建新页面");
    }

    let page = open_page(&browser, target_url).await?;
    Ok((browser, page))
}

/// 新建空白页并导航
pub(crate) async fn open_page(browser: &Browser, url: &str) -> AppResult<Page> {
    debug!("创建新页面并导航到: {}", url);
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.goto(url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", url, e);
        BrowserError::NavigationFailed {
            url: url.to_string(),
            source: Box::new(e),
        }
    })?;
    info!("已导航到: {}", url);
    Ok(page)
}
