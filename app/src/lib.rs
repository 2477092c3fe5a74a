//! sbconv library crate
//! 说明：命令行前端（输入解析、订阅获取、文件命名、交互会话）；转换逻辑在 `sb-link` /
//! `sb-subscribe` / `sb-export` 中。

pub mod cli;
pub mod format;
pub mod logging;
pub mod naming;
pub mod resolve;
pub mod session;
pub mod settings;
