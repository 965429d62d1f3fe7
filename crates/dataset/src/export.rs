use crate::table::Dataset;
use crate::{DatasetError, Result};

pub const EXPORT_FILE_NAME: &str = "analyzed_sentiment_results.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize header + rows. Missing values are written as empty fields.
pub fn to_csv_bytes(ds: &Dataset) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ds.columns())?;
    for row in ds.rows() {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    wtr.into_inner().map_err(|e| DatasetError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_csv, DataSource};

    #[test]
    fn test_export_quotes_and_blanks() {
        let ds = Dataset::from_rows(
            vec!["Tweet".into(), "Sentiment".into()],
            vec![
                vec![Some("good, very good".into()), Some("Positive".into())],
                vec![None, Some("Neutral".into())],
            ],
        )
        .unwrap();

        let bytes = to_csv_bytes(&ds).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text, "Tweet,Sentiment\n\"good, very good\",Positive\n,Neutral\n");

        let back = parse_csv(&bytes, DataSource::Inline).unwrap();
        assert_eq!(back.rows(), ds.rows());
    }
}
