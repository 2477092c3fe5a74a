use clap::ValueEnum;
use sb_export::TargetFormat;
use std::fmt;

/// What `convert` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Newline-joined link list
    Text,
    /// sing-box outbounds (a full config for batches)
    #[value(name = "singbox")]
    SingBox,
    /// Complete sing-box config: log, dns, inbounds, outbounds, route
    #[value(name = "singbox-full")]
    SingBoxFull,
    Clash,
    Xray,
}

impl OutputFormat {
    /// Emitter backing this format, `None` for the plain link list.
    pub const fn target(self) -> Option<TargetFormat> {
        match self {
            Self::Text => None,
            Self::SingBox | Self::SingBoxFull => Some(TargetFormat::SingBox),
            Self::Clash => Some(TargetFormat::Clash),
            Self::Xray => Some(TargetFormat::Xray),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self.target() {
            Some(t) => t.extension(),
            None => "txt",
        }
    }

    pub const fn default_file_name(self) -> &'static str {
        match self.target() {
            Some(t) => t.default_file_name(),
            None => "subscription.txt",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SingBox => "singbox",
            Self::SingBoxFull => "singbox-full",
            Self::Clash => "clash",
            Self::Xray => "xray",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
