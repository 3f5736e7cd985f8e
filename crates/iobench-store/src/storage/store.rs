use crate::model::BenchmarkRun;
use anyhow::Context;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Handle to the run database. Cheap to clone; all clones share one
/// connection. The store does no locking beyond the handle mutex — callers
/// serialize access.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

/// Raw column text of one `benchmark_runs` row, before validation.
struct StoredRow {
    rowid: i64,
    series_id: Option<String>,
    start_time: Option<String>,
    cmd: Option<String>,
    ior_output: Option<String>,
    extra: Option<String>,
}

impl Store {
    /// Open (or create) the database file and ensure the run table exists.
    /// Table creation is idempotent; opening the same file twice is safe.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store for tests and ephemeral use.
    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert one run as a single parameterized statement. Each insert is
    /// its own durability point; there is no batching.
    pub fn insert_run(&self, run: &BenchmarkRun) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO benchmark_runs(series_id, start_time, cmd, ior_output, extra)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.series_id(),
                run.start_time().to_rfc3339(),
                run.cmd_joined(),
                run.ior_output().to_canonical_json()?,
                serde_json::to_string(run.extra_data())?,
            ],
        )
        .context("failed to insert benchmark run")?;
        Ok(())
    }

    /// All distinct series identifiers, ascending.
    pub fn get_all_series(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT series_id FROM benchmark_runs ORDER BY series_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, Option<String>>(0))?;
        let mut series = Vec::new();
        for s in rows {
            if let Some(s) = s? {
                series.push(s);
            }
        }
        Ok(series)
    }

    /// All runs recorded under `series_id`, in insertion order. A row that
    /// fails validation is logged and dropped: one corrupt historical row
    /// never blocks access to the rest of the series.
    pub fn get_all_runs(&self, series_id: &str) -> anyhow::Result<Vec<BenchmarkRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT rowid, series_id, start_time, cmd, ior_output, extra
             FROM benchmark_runs
             WHERE series_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![series_id], |row| {
            Ok(StoredRow {
                rowid: row.get(0)?,
                series_id: row.get(1)?,
                start_time: row.get(2)?,
                cmd: row.get(3)?,
                ior_output: row.get(4)?,
                extra: row.get(5)?,
            })
        })?;

        let mut runs = Vec::new();
        for row in rows {
            let row = row?;
            match BenchmarkRun::from_stored(
                row.series_id,
                row.start_time,
                row.cmd,
                row.ior_output,
                row.extra,
            ) {
                Ok(run) => runs.push(run),
                Err(err) => {
                    tracing::warn!(
                        series_id = %series_id,
                        rowid = row.rowid,
                        error = %err,
                        "skipping benchmark run row that failed validation"
                    );
                }
            }
        }
        Ok(runs)
    }

    /// Release the connection. Consuming the handle makes use-after-close a
    /// compile error; with other clones outstanding the connection stays
    /// open until the last one goes.
    pub fn close(self) -> anyhow::Result<()> {
        if let Ok(mutex) = Arc::try_unwrap(self.conn) {
            let conn = mutex.into_inner().unwrap();
            conn.close()
                .map_err(|(_, e)| e)
                .context("failed to close sqlite db")?;
        }
        Ok(())
    }
}
