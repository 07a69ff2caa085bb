/// Object key naming for staged email content
///
/// Keys look like `2026-10-18/1792310400_<uuid>/attachment_report.pdf`: a
/// per-day prefix, a per-email folder, then one entry per stored blob.
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Folder for one email, stamped with the current UTC time
///
/// The timestamp only has second resolution; uniqueness comes from
/// `random_id`, so pass something like a v4 UUID.
pub fn folder_name(random_id: impl Display) -> String {
    folder_name_at(Utc::now(), random_id)
}

pub fn folder_name_at(now: DateTime<Utc>, random_id: impl Display) -> String {
    format!(
        "{}/{}_{}",
        now.date_naive().format("%Y-%m-%d"),
        now.timestamp(),
        random_id
    )
}

/// `{folder}/{content_type}`, plus `_{content_name}` when a name is given
///
/// `content_name` is used verbatim. A name containing `/` ends up in a
/// nested key.
pub fn content_key(folder: &str, content_type: &str, content_name: &str) -> String {
    if content_name.is_empty() {
        format!("{}/{}", folder, content_type)
    } else {
        format!("{}/{}_{}", folder, content_type, content_name)
    }
}

/// Last `/`-separated segment of a local path
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
