use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 存储读写错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 申请记录被拒绝（数据错误 / 重复 / 过滤）
    #[error("申请被拒绝: {0}")]
    Rejected(RejectReason),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {message}")]
    LaunchFailed { message: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 脚本返回了无法识别的结果
    #[error("脚本返回结果异常: {detail}")]
    UnexpectedScriptResult { detail: String },
}

/// 存储相关错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取文档失败
    #[error("读取文档失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文档失败
    #[error("写入文档失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文档解析失败
    #[error("文档解析失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 资料文件解析失败
    #[error("资料文件 {path} 解析失败: {source}")]
    ProfileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 申请记录被拒绝的原因
///
/// `Display` 输出的字符串就是返回给调用方的 reason。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Invalid data")]
    InvalidData,
    #[error("Duplicate")]
    Duplicate,
    #[error("Contains excluded keywords")]
    ExcludedKeyword,
    #[error("Missing target job title keywords")]
    MissingTargetTitle,
    #[error("Company is blacklisted")]
    BlacklistedCompany,
    #[error("Salary outside preferred range")]
    SalaryOutOfRange,
    #[error("Platform not enabled")]
    PlatformDisabled,
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::UnexpectedScriptResult {
            detail: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::ProfileParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        AppError::Rejected(reason)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建文档写入错误
    pub fn storage_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文档读取错误
    pub fn storage_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 如果是拒绝类错误，返回拒绝原因
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            AppError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
