//! Client config emitters for canonical proxy links.
//! 将规范化代理链接导出为客户端配置。
//!
//! Three targets share one [`Emitter`] capability:
//! - [`SingBoxEmitter`]: every dialect; outbounds-only or a full runnable config
//! - [`ClashEmitter`]: VLESS, VMess, Trojan, Shadowsocks, SOCKS5, HTTP(S); block YAML
//! - [`XrayEmitter`]: VLESS, VMess, Trojan, Shadowsocks
//!
//! Single-link entry points are strict. Batch entry points skip failures and report them in
//! [`EmittedConfig::skipped`], failing with [`ExportError::NoConvertibleLinks`] only when
//! nothing converts.

pub mod clash;
pub mod emitter;
pub mod error;
pub mod format;
pub mod singbox;
pub mod xray;

pub use clash::ClashEmitter;
pub use emitter::{convert_many, convert_one, emit_link, render, EmittedConfig, Emitter, SkippedLink};
pub use error::ExportError;
pub use format::TargetFormat;
pub use singbox::SingBoxEmitter;
pub use xray::XrayEmitter;

fn singbox(full: bool) -> SingBoxEmitter {
    if full {
        SingBoxEmitter::full()
    } else {
        SingBoxEmitter::outbounds_only()
    }
}

/// One link as a sing-box config.
pub fn emit_singbox(link: &str, full: bool) -> Result<EmittedConfig, ExportError> {
    convert_one(&singbox(full), link)
}

pub fn emit_singbox_batch<S: AsRef<str>>(links: &[S], full: bool) -> Result<EmittedConfig, ExportError> {
    convert_many(&singbox(full), links)
}

pub fn emit_clash<S: AsRef<str>>(links: &[S]) -> Result<EmittedConfig, ExportError> {
    convert_many(&ClashEmitter, links)
}

pub fn emit_clash_single(link: &str) -> Result<EmittedConfig, ExportError> {
    convert_one(&ClashEmitter, link)
}

pub fn emit_xray<S: AsRef<str>>(links: &[S]) -> Result<EmittedConfig, ExportError> {
    convert_many(&XrayEmitter, links)
}

pub fn emit_xray_single(link: &str) -> Result<EmittedConfig, ExportError> {
    convert_one(&XrayEmitter, link)
}

/// Dispatch on a runtime-selected format.
pub fn emit_batch<S: AsRef<str>>(
    format: TargetFormat,
    links: &[S],
    full: bool,
) -> Result<EmittedConfig, ExportError> {
    match format {
        TargetFormat::SingBox => emit_singbox_batch(links, full),
        TargetFormat::Clash => emit_clash(links),
        TargetFormat::Xray => emit_xray(links),
    }
}

pub fn emit_single(format: TargetFormat, link: &str, full: bool) -> Result<EmittedConfig, ExportError> {
    match format {
        TargetFormat::SingBox => emit_singbox(link, full),
        TargetFormat::Clash => emit_clash_single(link),
        TargetFormat::Xray => emit_xray_single(link),
    }
}
