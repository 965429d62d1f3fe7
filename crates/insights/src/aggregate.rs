use std::collections::HashMap;

use dataset::Dataset;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    /// Share of labeled records, 0..=100 (unrounded).
    pub percent: f64,
}

impl LabelShare {
    pub fn percent_display(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Per-label counts ordered by count (descending), ties by first appearance.
/// Missing labels are left out of both the counts and the percentage base.
pub fn label_distribution(ds: &Dataset, label_idx: usize) -> Vec<LabelShare> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for label in ds.column_cells(label_idx).flatten() {
        match index.get(label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label, order.len());
                order.push((label.to_string(), 1));
            }
        }
    }

    // stable: equal counts keep first-appearance order
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = order.iter().map(|(_, count)| count).sum();
    order
        .into_iter()
        .map(|(label, count)| LabelShare {
            percent: count as f64 * 100.0 / total as f64,
            label,
            count,
        })
        .collect()
}

/// Mean length in characters of a column's display text; 0 for no column or no rows.
pub fn average_text_length(ds: &Dataset, text_idx: Option<usize>) -> f64 {
    let Some(idx) = text_idx else {
        return 0.0;
    };
    if ds.is_empty() {
        return 0.0;
    }
    let chars: usize = ds.column_text(idx).map(|t| t.chars().count()).sum();
    chars as f64 / ds.len() as f64
}
