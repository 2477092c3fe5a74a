use serde::Serialize;
use std::fmt;

/// Client ecosystems the emitters target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    SingBox,
    Clash,
    Xray,
}

impl TargetFormat {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SingBox => "sing-box",
            Self::Clash => "clash",
            Self::Xray => "xray",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::SingBox | Self::Xray => "json",
            Self::Clash => "yaml",
        }
    }

    /// File name used when the input carries no usable host.
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::SingBox => "sing-box-config.json",
            Self::Clash => "clash-config.yaml",
            Self::Xray => "xray-config.json",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
