use chrono::Utc;

/// Default snapshot name: `<prefix>-<unix seconds>`
pub fn default_snapshot_name(prefix: &str) -> String {
    snapshot_name_at(prefix, Utc::now().timestamp())
}

pub fn snapshot_name_at(prefix: &str, unix_seconds: i64) -> String {
    format!("{prefix}-{unix_seconds}")
}
