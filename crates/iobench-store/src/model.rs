use crate::errors::ModelError;
use crate::output::IorOutput;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Accepted input forms for a run's start time.
///
/// Callers hand over whichever form they have; construction normalizes all
/// of them to a UTC instant. Offset-free ISO-8601 text is read as UTC.
#[derive(Debug, Clone, PartialEq)]
pub enum StartTime {
    /// Seconds since the Unix epoch, integer or fractional.
    Epoch(f64),
    /// ISO-8601 date-time text.
    Iso(String),
    /// An already-resolved instant.
    Instant(DateTime<Utc>),
}

impl StartTime {
    fn resolve(&self) -> Result<DateTime<Utc>, ModelError> {
        match self {
            StartTime::Epoch(secs) => {
                let micros = (secs * 1e6).round();
                if !micros.is_finite() {
                    return Err(ModelError(format!("invalid epoch start_time: {}", secs)));
                }
                DateTime::from_timestamp_micros(micros as i64)
                    .ok_or_else(|| ModelError(format!("epoch start_time out of range: {}", secs)))
            }
            StartTime::Iso(text) => parse_iso(text),
            StartTime::Instant(dt) => Ok(*dt),
        }
    }
}

impl From<i64> for StartTime {
    fn from(secs: i64) -> Self {
        StartTime::Epoch(secs as f64)
    }
}

impl From<f64> for StartTime {
    fn from(secs: f64) -> Self {
        StartTime::Epoch(secs)
    }
}

impl From<&str> for StartTime {
    fn from(text: &str) -> Self {
        StartTime::Iso(text.to_string())
    }
}

impl From<String> for StartTime {
    fn from(text: String) -> Self {
        StartTime::Iso(text)
    }
}

impl From<DateTime<Utc>> for StartTime {
    fn from(dt: DateTime<Utc>) -> Self {
        StartTime::Instant(dt)
    }
}

fn parse_iso(text: &str) -> Result<DateTime<Utc>, ModelError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Offset-free variants, interpreted as UTC.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| ModelError(format!("invalid ISO-8601 start_time {:?}: {}", text, e)))
}

/// One benchmark invocation record: which series it belongs to, when it
/// started, how the tool was invoked, what it reported, plus free-form
/// metadata.
///
/// Immutable once constructed; every instance has passed validation. `cmd`
/// is stored space-joined, so an argument containing a space will read back
/// split at that space. Accepted limitation.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    series_id: String,
    start_time: DateTime<Utc>,
    cmd: Vec<String>,
    ior_output: IorOutput,
    extra_data: serde_json::Map<String, serde_json::Value>,
}

impl BenchmarkRun {
    /// Build a validated run record with empty `extra_data`.
    pub fn new(
        series_id: impl Into<String>,
        start_time: impl Into<StartTime>,
        cmd: Vec<String>,
        ior_output: IorOutput,
    ) -> Result<Self, ModelError> {
        if cmd.is_empty() {
            return Err(ModelError("cmd must not be empty".to_string()));
        }
        Ok(Self {
            series_id: series_id.into(),
            start_time: start_time.into().resolve()?,
            cmd,
            ior_output,
            extra_data: serde_json::Map::new(),
        })
    }

    /// Attach free-form metadata.
    pub fn with_extra_data(
        mut self,
        extra_data: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.extra_data = extra_data;
        self
    }

    /// Rebuild a record from its stored column text. Any missing or
    /// malformed column is a decode failure for the whole row.
    pub(crate) fn from_stored(
        series_id: Option<String>,
        start_time: Option<String>,
        cmd: Option<String>,
        ior_output: Option<String>,
        extra: Option<String>,
    ) -> Result<Self, ModelError> {
        let series_id = series_id.ok_or_else(|| ModelError("missing series_id".to_string()))?;
        let start_time = start_time.ok_or_else(|| ModelError("missing start_time".to_string()))?;
        let cmd_text = cmd.ok_or_else(|| ModelError("missing cmd".to_string()))?;
        let ior_output = ior_output.ok_or_else(|| ModelError("missing ior_output".to_string()))?;
        let extra = extra.ok_or_else(|| ModelError("missing extra".to_string()))?;

        if cmd_text.is_empty() {
            return Err(ModelError("empty cmd".to_string()));
        }
        let extra_data: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&extra)
                .map_err(|e| ModelError(format!("invalid extra JSON: {}", e)))?;

        Ok(Self {
            series_id,
            start_time: parse_iso(&start_time)?,
            cmd: cmd_text.split(' ').map(String::from).collect(),
            ior_output: IorOutput::from_canonical_json(&ior_output)?,
            extra_data,
        })
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn cmd(&self) -> &[String] {
        &self.cmd
    }

    /// The space-joined form `cmd` is stored as.
    pub fn cmd_joined(&self) -> String {
        self.cmd.join(" ")
    }

    pub fn ior_output(&self) -> &IorOutput {
        &self.ior_output
    }

    pub fn extra_data(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra_data
    }
}
