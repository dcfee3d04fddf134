//! Display helpers for WeRead values (timestamps, ratings, note styles).

use chrono::{DateTime, SecondsFormat};

use crate::types::ReadingTime;

/// Unix seconds to an RFC 3339 UTC string with milliseconds. Zero maps to "".
pub fn format_timestamp(secs: i64) -> String {
    if secs == 0 {
        return String::new();
    }
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Book ratings are stored as hundredths.
#[allow(clippy::cast_precision_loss)]
pub fn format_rating(rating: i64) -> f64 {
    rating as f64 / 100.0
}

/// Review stars are stored out of 100; convert to a 5-star scale.
#[allow(clippy::cast_precision_loss)]
pub fn format_star_rating(star: i64) -> f64 {
    star as f64 / 20.0
}

impl ReadingTime {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            return Self {
                seconds: 0,
                minutes: 0,
                hours: 0.0,
                formatted: "0分钟".into(),
            };
        }

        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let mut formatted = String::new();
        if hours > 0 {
            formatted.push_str(&format!("{hours}小时"));
        }
        if minutes > 0 || hours == 0 {
            formatted.push_str(&format!("{minutes}分钟"));
        }

        Self {
            seconds,
            minutes: seconds / 60,
            hours: (seconds as f64 / 36.0).round() / 100.0,
            formatted,
        }
    }
}

/// Highlight colour names.
pub fn color_style_name(style: i64) -> &'static str {
    match style {
        0 => "蓝色",
        1 => "红色",
        2 => "黄色",
        3 => "绿色",
        _ => "未知",
    }
}

/// Note type names.
pub fn review_type_name(kind: i64) -> &'static str {
    match kind {
        1 => "划线笔记",
        4 => "书评/想法",
        _ => "其他",
    }
}
