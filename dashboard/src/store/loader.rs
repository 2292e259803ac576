use anyhow::{bail, Context};
use coveragecore::filtering::distinct_networks;
use coveragecore::ingest::{parse_records, LoadReport};
use coveragecore::record::MeasurementRecord;
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where the measurement CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Url(String),
    File(PathBuf),
}

impl RecordSource {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            RecordSource::Url(trimmed.to_string())
        } else {
            RecordSource::File(PathBuf::from(trimmed))
        }
    }

    /// Blocking download or file read; holds no store lock.
    pub fn fetch(&self) -> anyhow::Result<LoadReport> {
        let report = match self {
            RecordSource::Url(url) => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(30))
                    .build()
                    .context("building HTTP client")?;
                let body = client
                    .get(url)
                    .send()
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.bytes())
                    .with_context(|| format!("downloading {}", url))?;
                parse_records(body.as_ref()).with_context(|| format!("parsing {}", url))?
            }
            RecordSource::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening {}", path.display()))?;
                parse_records(BufReader::new(file))
                    .with_context(|| format!("parsing {}", path.display()))?
            }
        };
        if report.records.is_empty() {
            bail!("source holds no usable records");
        }
        Ok(report)
    }
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Url(url) => write!(f, "{}", url),
            RecordSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable records of one successful load plus the derived network options.
#[derive(Debug, Default)]
pub struct RecordSnapshot {
    pub records: Vec<MeasurementRecord>,
    pub networks: Vec<String>,
    pub skipped: usize,
}

impl RecordSnapshot {
    pub fn new(report: LoadReport) -> Self {
        let networks = distinct_networks(&report.records);
        Self {
            records: report.records,
            networks,
            skipped: report.skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Holds the latest snapshot. A failed load leaves an empty snapshot and a
/// status message; the next `reload` may succeed.
pub struct RecordStore {
    source: RecordSource,
    snapshot: Arc<RecordSnapshot>,
    status: String,
}

impl RecordStore {
    pub fn new(source: RecordSource) -> Self {
        Self {
            source,
            snapshot: Arc::new(RecordSnapshot::default()),
            status: "no data loaded".into(),
        }
    }

    pub fn load(source: RecordSource) -> Self {
        let mut store = Self::new(source);
        store.reload();
        store
    }

    /// Returns true when the new load produced records.
    pub fn reload(&mut self) -> bool {
        let result = self.source.fetch();
        self.install(result)
    }

    /// Swaps in the outcome of a fetch made without the store borrowed.
    pub fn install(&mut self, result: anyhow::Result<LoadReport>) -> bool {
        match result {
            Ok(report) => {
                let snapshot = RecordSnapshot::new(report);
                self.status = format!(
                    "loaded {} records across {} networks ({} rows skipped)",
                    snapshot.records.len(),
                    snapshot.networks.len(),
                    snapshot.skipped
                );
                info!("{} from {}", self.status, self.source);
                self.snapshot = Arc::new(snapshot);
                true
            }
            Err(err) => {
                warn!("record store load from {} failed: {:#}", self.source, err);
                self.status = format!("no data available: {:#}", err);
                self.snapshot = Arc::new(RecordSnapshot::default());
                false
            }
        }
    }

    pub fn snapshot(&self) -> Arc<RecordSnapshot> {
        self.snapshot.clone()
    }

    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        temp
    }

    #[test]
    fn source_parse_distinguishes_urls_and_paths() {
        assert_eq!(
            RecordSource::parse("https://example.com/data.csv"),
            RecordSource::Url("https://example.com/data.csv".into())
        );
        assert_eq!(
            RecordSource::parse(" data/signal.csv "),
            RecordSource::File(PathBuf::from("data/signal.csv"))
        );
    }

    #[test]
    fn store_loads_file_and_lists_networks() {
        let temp = csv_file(
            "X,Y,Network,Signal Strength,Signal Quality\n\
             20,10,Zong,-80,Good\n\
             21,11,Jazz,-70,Great\n\
             bad,11,Jazz,-70,Great\n",
        );
        let store = RecordStore::load(RecordSource::File(temp.path().to_path_buf()));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.networks, vec!["Jazz", "Zong"]);
        assert_eq!(snapshot.skipped, 1);
        assert!(store.status().starts_with("loaded 2 records"));
    }

    #[test]
    fn missing_file_leaves_empty_store_that_can_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.csv");
        let mut store = RecordStore::load(RecordSource::File(path.clone()));
        assert!(store.snapshot().is_empty());
        assert!(store.status().starts_with("no data available"));

        std::fs::write(&path, "X,Y,Network,Signal Quality\n20,10,Jazz,Bad\n").unwrap();
        assert!(store.reload());
        assert_eq!(store.snapshot().records.len(), 1);
    }

    #[test]
    fn install_replaces_snapshot_and_failure_clears_it() {
        let mut store = RecordStore::new(RecordSource::File(PathBuf::from("unused.csv")));
        let report = parse_records("X,Y,Network,Signal Quality\n20,10,Jazz,Bad\n".as_bytes()).unwrap();
        assert!(store.install(Ok(report)));
        assert_eq!(store.snapshot().networks, vec!["Jazz"]);

        assert!(!store.install(Err(anyhow::anyhow!("connection reset"))));
        assert!(store.snapshot().is_empty());
        assert!(store.status().contains("connection reset"));
    }

    #[test]
    fn header_only_file_is_no_data() {
        let temp = csv_file("X,Y,Network,Signal Strength,Signal Quality\n");
        let store = RecordStore::load(RecordSource::File(temp.path().to_path_buf()));
        assert!(store.snapshot().is_empty());
        assert!(store.status().contains("no usable records"));
    }
}
