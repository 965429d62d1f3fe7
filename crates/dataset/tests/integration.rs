use dataset::{load_csv, to_csv_bytes, DataSource, DatasetError, ParseMode};

const REVIEWS: &str = "\
 review id , Review Text ,stars
1,\"Arrived quickly and works great, would buy again\",5
2,Broke after two days,1
3,,3
4,N/A,4
";

#[test]
fn test_upload_roundtrip() {
    let source = DataSource::Upload { file_name: "reviews.csv".into() };
    let mut ds = load_csv(REVIEWS.as_bytes(), source.clone()).unwrap();

    assert_eq!(ds.columns(), ["Review id", "Review text", "Stars"]);
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.source(), &source);
    assert_eq!(ds.report().mode, ParseMode::Strict);

    let text = ds.find_column_ci("review text").unwrap();
    let values: Vec<_> = ds.column_text(text).collect();
    assert_eq!(values[2], "nan");
    assert_eq!(values[3], "nan");

    ds.set_column(
        "Sentiment",
        vec![
            Some("Positive".into()),
            Some("Negative".into()),
            Some("Neutral".into()),
            Some("Neutral".into()),
        ],
    )
    .unwrap();

    let exported = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
    let mut lines = exported.lines();
    assert_eq!(lines.next(), Some("Review id,Review text,Stars,Sentiment"));
    assert_eq!(
        lines.next(),
        Some("1,\"Arrived quickly and works great, would buy again\",5,Positive")
    );
    assert_eq!(lines.next(), Some("2,Broke after two days,1,Negative"));
    assert_eq!(lines.next(), Some("3,,3,Neutral"));
}

#[test]
fn test_pipe_delimited_upload() {
    let csv = "comment|score\nnot bad at all|3\nterrible, just terrible|1\nbroken|line|extra\n";
    let ds = load_csv(csv.as_bytes(), DataSource::Inline).unwrap();

    assert_eq!(ds.report().mode, ParseMode::Permissive);
    assert_eq!(ds.report().delimiter, '|');
    assert_eq!(ds.report().skipped_lines, 1);
    assert_eq!(ds.columns(), ["Comment", "Score"]);
    assert_eq!(ds.len(), 2);
}

#[test]
fn test_header_only_file() {
    let ds = load_csv(b"Tweet,Sentiment\n", DataSource::Inline).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.columns(), ["Tweet", "Sentiment"]);
}

#[test]
fn test_blank_header_is_empty() {
    let err = load_csv(b",,\n1,2,3\n", DataSource::Inline).unwrap_err();
    assert!(matches!(err, DatasetError::Empty));
}

#[test]
fn test_trailing_empty_fields_keep_the_record() {
    let csv = "Text,Stars,Source\nI really love this phone so much,5,web\nworst phone I ever owned honestly,1\n";
    let ds = load_csv(csv.as_bytes(), DataSource::Inline).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.report().skipped_lines, 0);
    assert_eq!(ds.column_text(2).collect::<Vec<_>>(), ["web", "nan"]);
}
