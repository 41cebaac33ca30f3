use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Frame shape requested from the video model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Label for display
    pub fn name(&self) -> &str {
        match self {
            Self::Landscape => "Landscape (16:9)",
            Self::Portrait => "Portrait (9:16)",
        }
    }

    /// Value sent to the API
    pub fn id(&self) -> &str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    pub fn all() -> [AspectRatio; 2] {
        [Self::Landscape, Self::Portrait]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16:9" | "landscape" | "wide" => Ok(Self::Landscape),
            "9:16" | "portrait" | "tall" => Ok(Self::Portrait),
            _ => Err(Error::UnknownOption {
                kind: "aspect ratio",
                value: s.to_string(),
            }),
        }
    }
}

/// Output resolution requested from the video model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "1080p")]
    FullHd,
}

impl Resolution {
    /// Label for display
    pub fn name(&self) -> &str {
        match self {
            Self::Hd => "720p HD",
            Self::FullHd => "1080p FHD",
        }
    }

    /// Value sent to the API
    pub fn id(&self) -> &str {
        match self {
            Self::Hd => "720p",
            Self::FullHd => "1080p",
        }
    }

    pub fn all() -> [Resolution; 2] {
        [Self::Hd, Self::FullHd]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "720p" | "hd" | "standard" => Ok(Self::Hd),
            "1080p" | "fhd" | "high" => Ok(Self::FullHd),
            _ => Err(Error::UnknownOption {
                kind: "resolution",
                value: s.to_string(),
            }),
        }
    }
}

/// Social platform a post was (simulated) published to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl Platform {
    pub fn name(&self) -> &str {
        match self {
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
        }
    }

    pub fn all() -> [Platform; 3] {
        [Self::Instagram, Self::TikTok, Self::YouTube]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownOption {
                kind: "platform",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_ids() {
        assert_eq!(AspectRatio::Landscape.id(), "16:9");
        assert_eq!(AspectRatio::Portrait.id(), "9:16");
        assert_eq!(Resolution::Hd.id(), "720p");
        assert_eq!(Resolution::FullHd.id(), "1080p");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AspectRatio::default(), AspectRatio::Landscape);
        assert_eq!(Resolution::default(), Resolution::Hd);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("wide".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
        assert_eq!("HIGH".parse::<Resolution>().unwrap(), Resolution::FullHd);
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("4:3".parse::<AspectRatio>().is_err());
        assert!("4k".parse::<Resolution>().is_err());
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_serde_uses_api_ids() {
        assert_eq!(serde_json::to_string(&AspectRatio::Portrait).unwrap(), "\"9:16\"");
        assert_eq!(serde_json::to_string(&Resolution::FullHd).unwrap(), "\"1080p\"");
    }
}
