//! Keyword-driven news catalyst scoring.
//!
//! Headlines are matched against tiered keyword tables. Tier-1 catalysts
//! (earnings beats/misses, guidance moves, insider trades, buybacks) carry
//! the most weight; mentions of a tier-1 analyst firm multiply the hit.

use crate::models::{NewsItem, NewsSentiment};

/// Firms whose coverage moves markets; their headlines weigh 1.5x.
const TIER1_FIRMS: &[&str] = &[
    "goldman sachs",
    "goldman",
    "morgan stanley",
    "jpmorgan",
    "jp morgan",
    "bank of america",
    "bofa",
    "citi",
    "citigroup",
    "wells fargo",
    "barclays",
    "deutsche bank",
    "credit suisse",
    "ubs",
    "jefferies",
];

/// High-confidence positive catalysts, 30 points base.
const TIER1_POSITIVE: &[&str] = &[
    "beat",
    "beats",
    "exceeded",
    "exceeds",
    "raised guidance",
    "raises guidance",
    "insider buying",
    "insider purchase",
    "ceo bought",
    "director bought",
    "buyback",
    "share repurchase",
    "dividend increase",
    "dividend raised",
    "stock split",
    "share split",
];

/// High-confidence negative catalysts, 30 points base.
const TIER1_NEGATIVE: &[&str] = &[
    "miss",
    "misses",
    "missed",
    "lowered guidance",
    "lowers guidance",
    "guidance cut",
    "insider selling",
    "insider sale",
    "dividend cut",
    "dividend suspended",
    "sec investigation",
    "doj probe",
    "antitrust",
];

/// Medium-confidence positive catalysts, 20 points base.
const TIER2_POSITIVE: &[&str] = &[
    "upgrade",
    "upgraded",
    "raises price target",
    "approval",
    "approved",
    "fda approval",
    "acquisition",
    "merger",
    "partnership",
    "buy rating",
    "initiated with buy",
    "outperform",
];

/// Medium-confidence negative catalysts, 20 points base.
const TIER2_NEGATIVE: &[&str] = &[
    "downgrade",
    "downgraded",
    "lowers price target",
    "lawsuit",
    "recall",
    "investigation",
    "sell rating",
    "underperform",
    "bankruptcy",
    "chapter 11",
];

/// Low-confidence positive catalysts, 10 points base.
const TIER3_POSITIVE: &[&str] = &[
    "strong earnings",
    "strong revenue",
    "strong growth",
    "expansion",
    "contract win",
    "award",
];

/// Low-confidence negative catalysts, 10 points base.
const TIER3_NEGATIVE: &[&str] = &["weak", "decline", "concern", "warning", "risk"];

/// Events that move implied volatility regardless of direction.
const VOLATILITY_KEYWORDS: &[&str] = &[
    "earnings call",
    "earnings report",
    "ceo change",
    "cfo change",
    "executive transition",
    "restructuring",
    "turnaround plan",
    "trial results",
    "clinical trial",
    "fda decision",
];

const TIER1_FIRM_MULTIPLIER: f64 = 1.5;
const VOLATILITY_BONUS: f64 = 5.0;
const MAX_REASONS: usize = 3;
const REASON_TITLE_LEN: usize = 75;

/// The news read for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsAnalysis {
    /// Net headline sentiment.
    pub sentiment: NewsSentiment,
    /// Catalyst score: positive reads score in [0, 100] (plus volatility
    /// bonus, capped), negative reads in [-100, 0], mixed reads the raw
    /// difference. Does not feed the composite discovery score.
    pub catalyst_score: f64,
    /// Up to three headline excerpts backing the read.
    pub reasons: Vec<String>,
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

fn push_reason(reasons: &mut Vec<String>, title: &str) {
    if reasons.len() < MAX_REASONS {
        let excerpt: String = title.chars().take(REASON_TITLE_LEN).collect();
        reasons.push(format!("{excerpt}..."));
    }
}

/// Score recent headlines for catalysts.
///
/// Each headline can hit once per tier; tier-1 firm mentions multiply
/// tier-1 and tier-2 hits by 1.5. Volatility keywords add a flat bonus to
/// positive reads only.
#[must_use]
pub fn analyze_news(news: &[NewsItem]) -> NewsAnalysis {
    if news.is_empty() {
        return NewsAnalysis {
            sentiment: NewsSentiment::Neutral,
            catalyst_score: 0.0,
            reasons: Vec::new(),
        };
    }

    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut volatility_count = 0u32;
    let mut reasons = Vec::new();

    for item in news {
        let title = item.title.to_lowercase();
        let firm_multiplier = if contains_any(&title, TIER1_FIRMS) {
            TIER1_FIRM_MULTIPLIER
        } else {
            1.0
        };

        if contains_any(&title, TIER1_POSITIVE) {
            positive += 30.0 * firm_multiplier;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, TIER1_NEGATIVE) {
            negative += 30.0 * firm_multiplier;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, TIER2_POSITIVE) {
            positive += 20.0 * firm_multiplier;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, TIER2_NEGATIVE) {
            negative += 20.0 * firm_multiplier;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, TIER3_POSITIVE) {
            positive += 10.0;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, TIER3_NEGATIVE) {
            negative += 10.0;
            push_reason(&mut reasons, &item.title);
        }
        if contains_any(&title, VOLATILITY_KEYWORDS) {
            volatility_count += 1;
        }
    }

    let (sentiment, catalyst_score) = if positive == 0.0 && negative == 0.0 {
        (NewsSentiment::Neutral, 0.0)
    } else if positive > negative * 1.3 {
        (
            NewsSentiment::Positive,
            (positive + f64::from(volatility_count) * VOLATILITY_BONUS).min(100.0),
        )
    } else if negative > positive * 1.3 {
        (NewsSentiment::Negative, -negative.min(100.0))
    } else {
        (NewsSentiment::Mixed, positive - negative)
    };

    NewsAnalysis {
        sentiment,
        catalyst_score,
        reasons,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            publisher: "Test Wire".to_string(),
            link: "https://example.com/a".to_string(),
            published_at: Utc::now(),
            sentiment: None,
        }
    }

    #[test]
    fn empty_news_is_neutral() {
        let analysis = analyze_news(&[]);
        assert_eq!(analysis.sentiment, NewsSentiment::Neutral);
        assert_eq!(analysis.catalyst_score, 0.0);
        assert!(analysis.reasons.is_empty());
    }

    #[test]
    fn earnings_beat_is_positive_catalyst() {
        let analysis = analyze_news(&[item("Acme beats Q3 estimates, raises guidance")]);
        assert_eq!(analysis.sentiment, NewsSentiment::Positive);
        // One tier-1 hit: 30 points.
        assert!((analysis.catalyst_score - 30.0).abs() < 1e-9);
        assert_eq!(analysis.reasons.len(), 1);
    }

    #[test]
    fn tier1_firm_multiplies() {
        let analysis = analyze_news(&[item("Goldman Sachs upgrades Acme to buy rating")]);
        assert_eq!(analysis.sentiment, NewsSentiment::Positive);
        // Tier-2 hit at 20 points, 1.5x firm multiplier.
        assert!((analysis.catalyst_score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn downgrades_read_negative() {
        let analysis = analyze_news(&[
            item("Acme downgraded on demand concern"),
            item("Analysts warn of weak quarter ahead for Acme"),
        ]);
        assert_eq!(analysis.sentiment, NewsSentiment::Negative);
        // First headline hits tier 2 (20) and tier 3 (10); second hits
        // tier 3 (10).
        assert!((analysis.catalyst_score + 40.0).abs() < 1e-9);
    }

    #[test]
    fn balanced_coverage_reads_mixed() {
        let analysis = analyze_news(&[
            item("Acme announces contract win with major customer"),
            item("Acme faces supplier decline"),
        ]);
        assert_eq!(analysis.sentiment, NewsSentiment::Mixed);
        assert!((analysis.catalyst_score - 0.0).abs() < 1e-9);
    }

    #[test]
    fn volatility_keywords_boost_positive_only() {
        let analysis = analyze_news(&[
            item("Acme beats estimates"),
            item("Acme earnings call scheduled"),
        ]);
        assert_eq!(analysis.sentiment, NewsSentiment::Positive);
        assert!((analysis.catalyst_score - 35.0).abs() < 1e-9);
    }

    #[test]
    fn catalyst_score_capped() {
        let items: Vec<NewsItem> =
            (0..10).map(|_| item("Acme beats and exceeds expectations")).collect();
        let analysis = analyze_news(&items);
        assert_eq!(analysis.catalyst_score, 100.0);
        assert_eq!(analysis.reasons.len(), 3);
    }
}
