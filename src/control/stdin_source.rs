//! 命令来源：标准输入 + Ctrl-C

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::control::command::{Command, CommandError, Response};
use crate::control::dispatcher::emit;

/// 逐行读取 stdin 并解析为命令
///
/// stdin 关闭后任务结束，不会发送 quit
pub fn spawn_stdin_source(tx: mpsc::Sender<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("stdin 已关闭");
                    break;
                }
                Err(e) => {
                    warn!("⚠️ 读取 stdin 失败: {}", e);
                    break;
                }
            };
            match interpret_line(&line) {
                Ok(Some(command)) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(reply) => emit(&reply),
            }
        }
    })
}

/// 解析一行输入
///
/// 空行返回 `Ok(None)`；无法识别的行返回要写回客户端的错误响应
pub fn interpret_line(line: &str) -> Result<Option<Command>, Response> {
    match Command::parse(line) {
        Ok(command) => Ok(Some(command)),
        Err(CommandError::Empty) => Ok(None),
        Err(e) => {
            warn!("⚠️ {}", e);
            Err(Response::error(e.to_string()))
        }
    }
}

/// Ctrl-C 依次发送 stop 和 quit
pub fn spawn_ctrl_c(tx: mpsc::Sender<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("\n🛑 收到 Ctrl-C，正在停止...");
            let _ = tx.send(Command::StopAutoApply).await;
            let _ = tx.send(Command::Quit).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(interpret_line("   ").unwrap(), None);
    }

    #[test]
    fn test_keyword_becomes_command() {
        assert_eq!(
            interpret_line("pause").unwrap(),
            Some(Command::PauseAutoApply)
        );
    }

    #[test]
    fn test_unknown_line_gets_error_reply() {
        let reply = interpret_line("launch rockets").unwrap_err();
        let Response::Error { message } = reply else {
            panic!("应该返回错误响应");
        };
        assert!(message.contains("launch rockets"));

        assert!(matches!(
            interpret_line(r#"{"action":"fly"}"#),
            Err(Response::Error { .. })
        ));
    }
}
