use crate::error::{LeaderboardError, Result};
use crate::models::RawRecord;
use async_trait::async_trait;
use csv::ReaderBuilder;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Somewhere a leaderboard CSV can be fetched from.
#[async_trait]
pub trait CsvSource: Send + Sync {
    fn locator(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<u8>>;
}

pub struct FileSource {
    locator: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            locator: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl CsvSource for FileSource {
    fn locator(&self) -> &str {
        &self.locator
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        // Relative paths resolve against the working directory at fetch time.
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| LeaderboardError::Fetch {
                locator: self.locator.clone(),
                reason: e.to_string(),
            })
    }
}

pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn fetch_error(&self, e: reqwest::Error) -> LeaderboardError {
        LeaderboardError::Fetch {
            locator: self.url.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl CsvSource for HttpSource {
    fn locator(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.fetch_error(e))?;
        let body = response.bytes().await.map_err(|e| self.fetch_error(e))?;
        Ok(body.to_vec())
    }
}

pub fn source_for(locator: &str) -> Arc<dyn CsvSource> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        Arc::new(HttpSource::new(locator))
    } else {
        Arc::new(FileSource::new(locator))
    }
}

/// Parses a CSV document with a header row. Blank rows are skipped, short rows
/// are padded with empty cells. Any malformed row fails the whole document.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record = RawRecord::new(
            headers
                .iter()
                .enumerate()
                .map(|(i, column)| (column.to_string(), row.get(i).unwrap_or("").to_string()))
                .collect(),
        );
        if !record.is_blank() {
            records.push(record);
        }
    }
    Ok(records)
}

#[derive(Clone)]
pub struct CsvLoader {
    source: Arc<dyn CsvSource>,
}

impl CsvLoader {
    pub fn new(source: Arc<dyn CsvSource>) -> Self {
        Self { source }
    }

    pub fn locator(&self) -> &str {
        self.source.locator()
    }

    pub async fn load(&self) -> Result<Vec<RawRecord>> {
        let bytes = self.source.fetch().await?;
        let records = parse_csv(&bytes)?;
        info!("Loaded {} row(s) from {}", records.len(), self.source.locator());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_BADGES, COL_EMAIL, COL_NAME};
    use std::io::Write;

    const SAMPLE: &str = "\
User Name,User Email,Access Code Redemption Status,All Skill Badges & Games Completed,# of Skill Badges Completed,# of Arcade Games Completed
Ada,ada@x,Yes,No,4,1

,,,,,
Grace,grace@x,Yes,Yes,15,1
";

    #[test]
    fn parses_rows_and_skips_blank_ones() {
        let records = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "Ada");
        assert_eq!(records[1].email(), "grace@x");
        assert_eq!(records[1].get(COL_BADGES), "15");
    }

    #[test]
    fn short_rows_are_padded() {
        let records = parse_csv(b"User Name,User Email,# of Skill Badges Completed\nAda\n").unwrap();
        assert_eq!(records[0].name(), "Ada");
        assert_eq!(records[0].get(COL_EMAIL), "");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let records = parse_csv(b"User Name,User Email\n\"Lovelace, Ada\",ada@x\n").unwrap();
        assert_eq!(records[0].get(COL_NAME), "Lovelace, Ada");
    }

    #[test]
    fn invalid_utf8_fails_the_whole_document() {
        let err = parse_csv(b"User Name,User Email\nAda,ada@x\n\xff\xfe,bad\n").unwrap_err();
        assert!(matches!(err, LeaderboardError::Parse(_)));
    }

    #[test]
    fn header_only_document_is_empty() {
        assert!(parse_csv(b"User Name,User Email\n").unwrap().is_empty());
    }

    #[test]
    fn http_locators_pick_http_source() {
        assert_eq!(source_for("https://example.org/a.csv").locator(), "https://example.org/a.csv");
        assert_eq!(source_for("./leaderboard.csv").locator(), "./leaderboard.csv");
    }

    #[tokio::test]
    async fn file_loader_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let loader = CsvLoader::new(Arc::new(FileSource::new(file.path())));
        let records = loader.load().await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvLoader::new(Arc::new(FileSource::new(dir.path().join("missing.csv"))));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Fetch { .. }));
    }
}
