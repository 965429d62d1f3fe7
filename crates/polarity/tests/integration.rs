use polarity::{PolarityScorer, SentimentIntensityAnalyzer};

#[test]
fn test_scores_are_deterministic() {
    let a = SentimentIntensityAnalyzer::new();
    let b = SentimentIntensityAnalyzer::new();
    let text = "Honestly the delivery was slow but the support team was AMAZING!";

    let first = a.polarity_scores(text);
    for _ in 0..5 {
        assert_eq!(a.polarity_scores(text), first);
    }
    assert_eq!(b.polarity_scores(text), first);
}

#[test]
fn test_scorer_trait_object() {
    let scorer: Box<dyn PolarityScorer> = Box::new(SentimentIntensityAnalyzer::new());
    assert!(scorer.compound("what a wonderful day") > 0.0);
    assert!(scorer.compound("what an awful day") < 0.0);
    assert_eq!(scorer.compound("what a day"), 0.0);
}

#[test]
fn test_tweet_vocabulary_outside_common_adjectives() {
    let scorer = SentimentIntensityAnalyzer::new();
    for (text, positive) in [
        ("we won the championship tonight", true),
        ("finally got the promotion, so proud", true),
        ("they are going to kill the project", false),
        ("she keeps crying about the ending", false),
    ] {
        let c = scorer.compound(text);
        assert_ne!(c, 0.0, "{text}");
        assert_eq!(c > 0.0, positive, "{text}: {c}");
    }
}

#[test]
fn test_compound_stays_in_range() {
    let sia = SentimentIntensityAnalyzer::new();
    for text in [
        "",
        "nan",
        "HATE HATE HATE hate awful terrible worst!!!!!!!",
        "love love love love love love best best best ever!!!!",
        "???? ok ????",
    ] {
        let c = sia.compound(text);
        assert!((-1.0..=1.0).contains(&c), "{text}: {c}");
    }
}
