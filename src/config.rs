use crate::utils::timing::Timing;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 职位搜索页 URL
    pub target_url: String,
    /// 是否启动无头浏览器（否则连接已打开的调试端口）
    pub launch_headless: bool,
    /// 无头模式下使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 持久化文档路径
    pub store_path: String,
    /// 用户资料 TOML 文件（可选）
    pub profile_toml: Option<String>,
    /// 启动后立即开始自动申请
    pub auto_start: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 等待时间倍率（1.0 为默认节奏）
    pub speed_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.linkedin.com/jobs/search/?f_AL=true".to_string(),
            launch_headless: false,
            chrome_executable: None,
            store_path: "job_hunter_data.json".to_string(),
            profile_toml: Some("profile.toml".to_string()),
            auto_start: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            speed_factor: 1.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            launch_headless: std::env::var("LAUNCH_HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.launch_headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            store_path: std::env::var("STORE_PATH").unwrap_or(default.store_path),
            profile_toml: match std::env::var("PROFILE_TOML") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => default.profile_toml,
            },
            auto_start: std::env::var("AUTO_START").ok().and_then(|v| v.parse().ok()).unwrap_or(default.auto_start),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            speed_factor: std::env::var("SPEED_FACTOR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.speed_factor),
        }
    }

    /// 按倍率生成本次运行使用的时间常量
    pub fn timing(&self) -> Timing {
        Timing::default().scaled(self.speed_factor)
    }
}
