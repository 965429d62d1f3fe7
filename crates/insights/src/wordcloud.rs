//! Word-frequency cloud over positively labeled text.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use dataset::Dataset;
use regex::Regex;
use serde::Serialize;

use crate::label::SentimentLabel;

pub const NO_POSITIVE_TEXT: &str = "No positive text available for the word cloud.";
pub const NO_TEXT_COLUMN: &str = "No text column available for the word cloud.";

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']+").expect("word regex compiles"));

/// Standard English word-cloud stopword list.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http",
    "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its",
    "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my", "myself",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "otherwise",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same", "shall", "shan't",
    "she", "she'd", "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then",
    "there", "there's", "therefore", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what",
    "what's", "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom",
    "why", "why's", "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll",
    "you're", "you've", "your", "yours", "yourself", "yourselves",
];

const PADDING: f64 = 8.0;
const WORD_GAP: f64 = 10.0;
/// Rough glyph width as a fraction of font size.
const GLYPH_RATIO: f64 = 0.6;
const LINE_RATIO: f64 = 1.15;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordCloudConfig {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub background: String,
    pub palette: Vec<String>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_words: 200,
            min_font_size: 10.0,
            max_font_size: 72.0,
            background: "white".to_string(),
            palette: ["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedWord {
    pub word: String,
    pub count: usize,
    /// count / highest count, in (0, 1].
    pub weight: f64,
    pub font_size: f64,
    /// Baseline-left position; `None` when the word did not fit on the canvas.
    pub position: Option<(f64, f64)>,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub words: Vec<PlacedWord>,
    pub svg: String,
}

impl WordCloud {
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.word == word)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordCloudOutcome {
    Rendered(WordCloud),
    /// Non-fatal: the dashboard shows `reason` in place of the cloud.
    Unavailable { reason: String },
}

impl WordCloudOutcome {
    pub fn unavailable(reason: &str) -> Self {
        WordCloudOutcome::Unavailable { reason: reason.to_string() }
    }

    pub fn cloud(&self) -> Option<&WordCloud> {
        match self {
            WordCloudOutcome::Rendered(c) => Some(c),
            WordCloudOutcome::Unavailable { .. } => None,
        }
    }
}

/// Space-joined text of every record labeled `Positive`.
pub fn positive_text(ds: &Dataset, label_idx: usize, text_idx: usize) -> String {
    let positive = SentimentLabel::Positive.as_str();
    ds.column_text(label_idx)
        .zip(ds.column_text(text_idx))
        .filter(|(label, _)| *label == positive)
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased word counts without stopwords or bare numbers, most frequent first
/// (ties alphabetical), truncated to `max_words`.
///
/// A trailing `'s` is dropped, and a plural is counted under its singular when the
/// singular also occurs.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in WORD_REGEX.find_iter(text) {
        let mut word = m.as_str().to_lowercase();
        if word.ends_with("'s") {
            word.truncate(word.len() - 2);
        }
        if word.is_empty()
            || STOPWORDS.contains(&word.as_str())
            || word.chars().all(|c| c.is_numeric())
        {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }
    unify_plurals(&mut counts);

    let mut freqs: Vec<(String, usize)> = counts.into_iter().collect();
    freqs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    freqs.truncate(max_words);
    freqs
}

fn unify_plurals(counts: &mut HashMap<String, usize>) {
    let plurals: Vec<String> = counts
        .keys()
        .filter(|w| w.ends_with('s') && !w.ends_with("ss"))
        .filter(|w| counts.contains_key(&w[..w.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(n) = counts.remove(&plural) {
            *counts.entry(plural[..plural.len() - 1].to_string()).or_insert(0) += n;
        }
    }
}

pub fn build_word_cloud(text: &str, cfg: &WordCloudConfig) -> WordCloudOutcome {
    if text.trim().is_empty() {
        return WordCloudOutcome::unavailable(NO_POSITIVE_TEXT);
    }
    let freqs = word_frequencies(text, cfg.max_words);
    let Some(max_count) = freqs.first().map(|(_, c)| *c) else {
        return WordCloudOutcome::unavailable(NO_POSITIVE_TEXT);
    };

    let words = layout(&freqs, max_count, cfg);
    let svg = render_svg(&words, cfg);
    WordCloudOutcome::Rendered(WordCloud { width: cfg.width, height: cfg.height, words, svg })
}

fn layout(freqs: &[(String, usize)], max_count: usize, cfg: &WordCloudConfig) -> Vec<PlacedWord> {
    let width = f64::from(cfg.width);
    let height = f64::from(cfg.height);
    let mut x = PADDING;
    let mut y = PADDING;
    let mut row_height: f64 = 0.0;

    let mut out = Vec::with_capacity(freqs.len());
    for (i, (word, count)) in freqs.iter().enumerate() {
        let weight = *count as f64 / max_count as f64;
        let font_size = cfg.min_font_size + (cfg.max_font_size - cfg.min_font_size) * weight;
        let word_width = word.chars().count() as f64 * font_size * GLYPH_RATIO;
        let word_height = font_size * LINE_RATIO;

        let mut position = None;
        if word_width <= width - 2.0 * PADDING {
            if x + word_width > width - PADDING {
                x = PADDING;
                y += row_height;
                row_height = 0.0;
            }
            if y + word_height <= height - PADDING {
                position = Some((x, y + font_size));
                x += word_width + WORD_GAP;
                row_height = row_height.max(word_height);
            }
        }

        let color = if cfg.palette.is_empty() {
            "black".to_string()
        } else {
            cfg.palette[i % cfg.palette.len()].clone()
        };

        out.push(PlacedWord { word: word.clone(), count: *count, weight, font_size, position, color });
    }
    out
}

fn render_svg(words: &[PlacedWord], cfg: &WordCloudConfig) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="Word cloud">"#,
        w = cfg.width,
        h = cfg.height,
    );
    let _ = write!(svg, r#"<rect width="100%" height="100%" fill="{}"/>"#, xml_escape(&cfg.background));
    for w in words {
        let Some((x, y)) = w.position else { continue };
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="{size:.1}" font-family="sans-serif" fill="{fill}">{text}</text>"#,
            size = w.font_size,
            fill = xml_escape(&w.color),
            text = xml_escape(&w.word),
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Escapes text for HTML and SVG bodies and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequencies_drop_stopwords_and_numbers() {
        let freqs = word_frequencies("I love it, LOVE it and 2024 love-ly days", 200);
        assert_eq!(freqs[0], ("love".to_string(), 3));
        assert!(freqs.iter().all(|(w, _)| w != "it" && w != "and" && w != "2024"));
        assert!(freqs.iter().any(|(w, _)| w == "ly"));
        assert!(freqs.iter().any(|(w, _)| w == "days"));
    }

    #[test]
    fn test_possessives_and_plurals_merge() {
        let freqs = word_frequencies("The product's box. Great products, great product! Glass", 200);
        assert_eq!(freqs[0], ("product".to_string(), 3));
        assert_eq!(freqs[1], ("great".to_string(), 2));
        assert!(!freqs.iter().any(|(w, _)| w == "products" || w == "product's"));
        assert!(freqs.contains(&("glass".to_string(), 1)));
    }

    #[test]
    fn test_frequencies_tie_break_and_truncate() {
        let freqs = word_frequencies("zebra apple mango apple", 2);
        assert_eq!(freqs, vec![("apple".to_string(), 2), ("mango".to_string(), 1)]);
    }

    #[test]
    fn test_font_size_monotonic_in_frequency() {
        let text = "sun sun sun sun moon moon star";
        let WordCloudOutcome::Rendered(cloud) = build_word_cloud(text, &WordCloudConfig::default()) else {
            panic!("expected a cloud");
        };
        let sizes: Vec<f64> = cloud.words.iter().map(|w| w.font_size).collect();
        assert!(sizes.windows(2).all(|p| p[0] >= p[1]));
        assert_eq!(cloud.words[0].weight, 1.0);
        assert_eq!(cloud.words[0].font_size, 72.0);
        assert!(cloud.svg.starts_with("<svg"));
        assert!(cloud.svg.contains(">sun</text>"));
    }

    #[test]
    fn test_blank_or_stopword_only_text_is_unavailable() {
        let cfg = WordCloudConfig::default();
        assert_eq!(build_word_cloud("   ", &cfg), WordCloudOutcome::unavailable(NO_POSITIVE_TEXT));
        assert_eq!(build_word_cloud("the and of", &cfg), WordCloudOutcome::unavailable(NO_POSITIVE_TEXT));
    }

    #[test]
    fn test_words_that_do_not_fit_are_unplaced() {
        let cfg = WordCloudConfig { width: 120, height: 60, ..Default::default() };
        let WordCloudOutcome::Rendered(cloud) =
            build_word_cloud("enormous enormous tiny bit", &cfg)
        else {
            panic!("expected a cloud");
        };
        assert!(cloud.words.iter().any(|w| w.position.is_none()));
        assert!(cloud.contains("enormous"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(xml_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
