use crate::ingest::parse_csv;
use crate::table::{DataSource, Dataset};
use crate::Result;

/// Public fallback dataset used when nothing is uploaded.
pub const SAMPLE_DATASET_URL: &str =
    "https://raw.githubusercontent.com/dD2405/Twitter_Sentiment_Analysis/master/train.csv";

const SAMPLE_RENAMES: &[(&str, &str)] = &[("label", "Sentiment"), ("tweet", "Tweet")];
const SAMPLE_COLUMNS: &[&str] = &["Tweet", "Sentiment"];

/// Rename the sample's `label`/`tweet` columns and keep only `[Tweet, Sentiment]`.
pub fn adapt_sample(ds: Dataset) -> Result<Dataset> {
    let mut ds = ds;
    ds.rename_columns(SAMPLE_RENAMES);
    ds.select(SAMPLE_COLUMNS)
}

/// Parse fetched sample bytes, adapt them, then normalize column names.
pub fn load_sample(bytes: &[u8], url: &str) -> Result<Dataset> {
    let raw = parse_csv(bytes, DataSource::Sample { url: url.to_string() })?;
    let mut ds = adapt_sample(raw)?;
    ds.normalize_columns();
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatasetError;

    #[test]
    fn test_load_sample_projects_columns() {
        let csv = "id,label,tweet\n1,0,@user when a father is dysfunctional\n2,1,i love u take with u all the time\n";
        let ds = load_sample(csv.as_bytes(), SAMPLE_DATASET_URL).unwrap();
        assert_eq!(ds.columns(), ["Tweet", "Sentiment"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][1].as_deref(), Some("1"));
        assert!(matches!(ds.source(), DataSource::Sample { .. }));
    }

    #[test]
    fn test_load_sample_requires_columns() {
        let err = load_sample(b"id,text\n1,hello\n", SAMPLE_DATASET_URL).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(_)));
    }
}
