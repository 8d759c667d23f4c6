//! 控制通道
//!
//! 入站命令（stdin JSON 行或关键字、Ctrl-C）和出站响应

pub mod command;
pub mod dispatcher;
pub mod stdin_source;

pub use command::{Command, CommandError, Response};
pub use dispatcher::{emit, Dispatcher};
pub use stdin_source::{interpret_line, spawn_ctrl_c, spawn_stdin_source};
