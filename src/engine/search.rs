use icu_normalizer::ComposingNormalizerBorrowed;

use crate::content::Catalog;

/// Characters of offset from the start of a field that cost one full
/// point of score.
const LOCATION_DISTANCE: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Highest accepted score; 0.0 only accepts exact matches at position 0.
    pub threshold: f64,
    pub limit: usize,
    pub max_query_length: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            limit: 10,
            max_query_length: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRecord {
    pub chapter_id: &'static str,
    pub chapter_number: u32,
    pub chapter_title: &'static str,
    pub section_id: &'static str,
    pub section_title: &'static str,
    pub search_text: String,
}

#[derive(Clone, Debug)]
pub struct SearchHit<'a> {
    pub record: &'a SearchRecord,
    /// Lower is better.
    pub score: f64,
}

struct IndexedRecord {
    record: SearchRecord,
    /// Normalized `[section_title, chapter_title, search_text]`.
    fields: [String; 3],
}

pub struct SearchIndex {
    entries: Vec<IndexedRecord>,
    options: SearchOptions,
}

impl SearchIndex {
    pub fn build(catalog: &Catalog, options: SearchOptions) -> Self {
        let entries: Vec<IndexedRecord> = catalog
            .chapters()
            .iter()
            .flat_map(|chapter| {
                chapter.sections.iter().map(move |section| {
                    let record = SearchRecord {
                        chapter_id: chapter.id,
                        chapter_number: chapter.number,
                        chapter_title: chapter.title,
                        section_id: section.id,
                        section_title: section.title,
                        search_text: format!("{} {}", chapter.title, section.title),
                    };
                    let fields = [
                        normalize(record.section_title),
                        normalize(record.chapter_title),
                        normalize(&record.search_text),
                    ];
                    IndexedRecord { record, fields }
                })
            })
            .collect();
        tracing::debug!(records = entries.len(), "search index built");
        Self { entries, options }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &SearchRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Clamp, normalize and trim a raw query. `None` for blank input.
    pub fn prepare_query(&self, query: &str) -> Option<String> {
        let clamped: String = query.chars().take(self.options.max_query_length).collect();
        let normalized = normalize(&clamped);
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Best matches first, at most `limit` of them. Equal scores keep
    /// catalog order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let Some(pattern) = self.prepare_query(query) else {
            return Vec::new();
        };
        let threshold = self.options.threshold;

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = entry
                    .fields
                    .iter()
                    .map(|field| field_score(&pattern, field, threshold))
                    .fold(f64::INFINITY, f64::min);
                (score <= threshold).then_some(SearchHit {
                    record: &entry.record,
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(self.options.limit);
        tracing::debug!(query = %pattern, hits = hits.len(), "search");
        hits
    }
}

fn normalize(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfkc()
        .normalize(text)
        .to_lowercase()
}

/// Approximate-substring score of `pattern` inside `text`: the edit
/// distance to the closest window, divided by the pattern length, plus
/// `start / LOCATION_DISTANCE`. Exact substrings only pay the location part.
fn field_score(pattern: &str, text: &str, threshold: f64) -> f64 {
    if let Some(byte_pos) = text.find(pattern) {
        let start = text[..byte_pos].chars().count();
        return start as f64 / LOCATION_DISTANCE;
    }

    let pattern_len = pattern.chars().count();
    let chars: Vec<char> = text.chars().collect();
    let slack = (pattern_len as f64 * threshold).ceil() as usize;
    if pattern_len > chars.len() + slack {
        return f64::INFINITY;
    }

    let min_len = pattern_len.saturating_sub(slack).max(1);
    let max_len = pattern_len + slack;
    let pattern_len = pattern_len as f64;

    if chars.len() < min_len {
        return strsim::levenshtein(pattern, text) as f64 / pattern_len;
    }

    let mut best = f64::INFINITY;
    for start in 0..chars.len() {
        let location = start as f64 / LOCATION_DISTANCE;
        if location >= best || location > threshold {
            break;
        }
        for len in min_len..=max_len {
            let end = start + len;
            if end > chars.len() {
                break;
            }
            let window: String = chars[start..end].iter().collect();
            let score = strsim::levenshtein(pattern, &window) as f64 / pattern_len + location;
            best = best.min(score);
        }
    }
    best
}
