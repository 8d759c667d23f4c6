use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则 `verbose` 时为 debug，默认 info。
/// 日志写到 stderr，stdout 留给控制通道的响应。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quick_apply_agent={},warn", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n自动申请日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(target_url: &str, daily_limit: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 顺序浏览自动申请模式");
    info!("🌐 目标页面: {}", target_url);
    info!("📊 每日申请上限: {}", daily_limit);
    info!("{}", "=".repeat(60));
}

/// 记录扫描结果
pub fn log_queue_loaded(total: usize, quick_apply: usize) {
    info!("✓ 找到 {} 个待处理的职位", total);
    info!("📋 其中 {} 个支持 Easy Apply", quick_apply);
    info!("💡 将逐个打开职位，每个完成后再开始下一个\n");
}

/// 打印会话统计信息
///
/// # 参数
/// - `applied`: 成功申请数量
/// - `skipped`: 跳过数量
/// - `failed`: 失败数量
/// - `log_file_path`: 日志文件路径
pub fn print_session_stats(applied: usize, skipped: usize, failed: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次会话统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已申请: {}", applied);
    info!("⏭️ 跳过: {}", skipped);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
