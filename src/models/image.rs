//! Image generation wire types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output dimensions accepted by the image endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    Square256,
    #[serde(rename = "512x512")]
    Square512,
    #[default]
    #[serde(rename = "1024x1024")]
    Square1024,
    #[serde(rename = "1280x720")]
    Landscape1280x720,
    #[serde(rename = "1920x1080")]
    Landscape1920x1080,
    #[serde(rename = "1792x1024")]
    Wide1792x1024,
    #[serde(rename = "1024x1792")]
    Tall1024x1792,
}

impl ImageSize {
    pub const ALL: [ImageSize; 7] = [
        ImageSize::Square256,
        ImageSize::Square512,
        ImageSize::Square1024,
        ImageSize::Landscape1280x720,
        ImageSize::Landscape1920x1080,
        ImageSize::Wide1792x1024,
        ImageSize::Tall1024x1792,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square256 => "256x256",
            ImageSize::Square512 => "512x512",
            ImageSize::Square1024 => "1024x1024",
            ImageSize::Landscape1280x720 => "1280x720",
            ImageSize::Landscape1920x1080 => "1920x1080",
            ImageSize::Wide1792x1024 => "1792x1024",
            ImageSize::Tall1024x1792 => "1024x1792",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSize::ALL
            .iter()
            .find(|size| size.as_str() == s.trim())
            .copied()
            .ok_or_else(|| {
                let valid: Vec<&str> = ImageSize::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown image size '{}' (expected one of {})", s, valid.join(", "))
            })
    }
}

/// Image generation model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ImageModel {
    #[serde(rename = "dall-e-2")]
    DallE2,
    #[default]
    #[serde(rename = "dall-e-3")]
    DallE3,
}

impl ImageModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::DallE2 => "dall-e-2",
            ImageModel::DallE3 => "dall-e-3",
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dall-e-2" => Ok(ImageModel::DallE2),
            "dall-e-3" => Ok(ImageModel::DallE3),
            other => Err(format!(
                "unknown image model '{}' (expected dall-e-2 or dall-e-3)",
                other
            )),
        }
    }
}

/// One generated image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Response of the image endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageResponse {
    /// Unix timestamp, seconds. Absent or unreadable timestamps are `None`.
    #[serde(
        default,
        alias = "created_at",
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<i64>,
    #[serde(default)]
    pub data: Vec<ImageData>,
}

impl ImageResponse {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// URLs of every image that carries one.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.data.iter().filter_map(|d| d.url.as_deref())
    }
}

/// Accepts integer or fractional seconds, a numeric string, or an RFC 3339
/// string. Anything else is treated as missing rather than failing the
/// whole response.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Seconds(i64),
        Fractional(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Seconds(secs)) => Some(secs),
        Some(RawTimestamp::Fractional(secs)) if secs.is_finite() => Some(secs.trunc() as i64),
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        _ => None,
    })
}

fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.timestamp())
    })
}
