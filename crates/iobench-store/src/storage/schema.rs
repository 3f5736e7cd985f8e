// All structured payloads are stored as serialized text; the implicit rowid
// is the insertion-order counter reads sort by.
pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS benchmark_runs (
  series_id TEXT,
  start_time TEXT,
  cmd TEXT,
  ior_output TEXT,
  extra TEXT
);
"#;
