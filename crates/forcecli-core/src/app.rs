//! Target platforms and application types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for names that are not a known platform or app type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAppError {
    #[error("Invalid os: {0}")]
    Os(String),
    #[error("Invalid appType: {0}")]
    AppType(String),
}

/// Mobile operating system an app is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Ios,
    Android,
}

impl Os {
    pub const ALL: [Os; 2] = [Os::Ios, Os::Android];

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Ios => "ios",
            Os::Android => "android",
        }
    }

    /// Name of the scaffolding CLI that targets this platform
    pub fn cli_name(&self) -> &'static str {
        match self {
            Os::Ios => "forceios",
            Os::Android => "forcedroid",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = ParseAppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Os::Ios),
            "android" => Ok(Os::Android),
            _ => Err(ParseAppError::Os(s.to_string())),
        }
    }
}

/// Kind of application a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    Native,
    NativeSwift,
    ReactNative,
    HybridLocal,
    HybridRemote,
}

impl AppType {
    pub const ALL: [AppType; 5] = [
        AppType::Native,
        AppType::NativeSwift,
        AppType::ReactNative,
        AppType::HybridLocal,
        AppType::HybridRemote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Native => "native",
            AppType::NativeSwift => "native_swift",
            AppType::ReactNative => "react_native",
            AppType::HybridLocal => "hybrid_local",
            AppType::HybridRemote => "hybrid_remote",
        }
    }

    /// Built with the platform toolchain rather than cordova (includes react_native)
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            AppType::Native | AppType::NativeSwift | AppType::ReactNative
        )
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, AppType::HybridLocal | AppType::HybridRemote)
    }

    /// Swift apps only exist for iOS
    pub fn supported_on(&self, os: Os) -> bool {
        !(*self == AppType::NativeSwift && os == Os::Android)
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = ParseAppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseAppError::AppType(s.to_string()))
    }
}

/// Join app type names for prompts and usage text
pub fn join_app_types(app_types: &[AppType]) -> String {
    app_types
        .iter()
        .map(AppType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
