//! Insider-transaction sentiment.

use crate::models::{InsiderActivity, InsiderSentiment};

/// An insider read: net sentiment plus a signed confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsiderRead {
    /// Net 90-day sentiment.
    pub sentiment: InsiderSentiment,
    /// Signed confidence score in [-15, +15], carried on the candidate
    /// for rationale. Does not feed the composite discovery score.
    pub score: f64,
}

/// Classify 90-day insider activity.
///
/// Bullish when buys outnumber sells more than 2:1 (+3 per buy, capped at
/// +15); bearish when sells outnumber buys more than 2:1 (-2 per sell,
/// capped at -15); neutral otherwise.
#[must_use]
pub fn insider_sentiment(activity: &InsiderActivity) -> InsiderRead {
    let buys = f64::from(activity.buys_90d);
    let sells = f64::from(activity.sells_90d);

    if buys > sells * 2.0 {
        InsiderRead {
            sentiment: InsiderSentiment::Bullish,
            score: (buys * 3.0).min(15.0),
        }
    } else if sells > buys * 2.0 {
        InsiderRead {
            sentiment: InsiderSentiment::Bearish,
            score: (-sells * 2.0).max(-15.0),
        }
    } else {
        InsiderRead {
            sentiment: InsiderSentiment::Neutral,
            score: 0.0,
        }
    }
}
