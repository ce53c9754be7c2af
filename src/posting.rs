use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds from the Unix epoch back to `0001-01-01T00:00:00Z`.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Timestamp of a posting with no `Posted On`, and the watermark's start.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or_default()
}

/// How a posting pays. Hourly is the default until a budget shows up.
#[derive(Debug, Clone, PartialEq)]
pub enum Pricing {
    Hourly { range: [f32; 2] },
    Fixed { budget: i64 },
}

impl Default for Pricing {
    fn default() -> Self {
        Pricing::Hourly { range: [0.0, 0.0] }
    }
}

/// One job listing extracted from a feed item, keyed by `posted_on`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PostingRecord", from = "PostingRecord")]
pub struct Posting {
    pub title: String,
    pub posted_on: DateTime<Utc>,
    pub category: String,
    pub skills: Vec<String>,
    pub country: String,
    pub pricing: Pricing,
}

impl Default for Posting {
    fn default() -> Self {
        Posting {
            title: String::new(),
            posted_on: zero_time(),
            category: String::new(),
            skills: Vec::new(),
            country: String::new(),
            pricing: Pricing::default(),
        }
    }
}

impl Posting {
    pub fn is_hourly(&self) -> bool {
        matches!(self.pricing, Pricing::Hourly { .. })
    }

    /// Notification body: country, pricing mode, and the range or budget.
    pub fn format_body(&self) -> String {
        let mut body = format!("Country: {}\n", self.country);
        match self.pricing {
            Pricing::Hourly { range } => {
                body.push_str(&format!(
                    "Type: Hourly\nHourly Range: ${}-${}\n",
                    range[0], range[1]
                ));
            }
            Pricing::Fixed { budget } => {
                body.push_str(&format!("Type: Fixed price\nBudget: ${}\n", budget));
            }
        }
        body
    }
}

/// Flat on-disk shape. Fields of the inactive pricing mode are zeroed.
#[derive(Serialize, Deserialize)]
struct PostingRecord {
    title: String,
    posted_on: DateTime<Utc>,
    category: String,
    skills: Vec<String>,
    country: String,
    is_hourly: bool,
    hourly_range: [f32; 2],
    budget: i64,
}

impl From<Posting> for PostingRecord {
    fn from(p: Posting) -> Self {
        let (is_hourly, hourly_range, budget) = match p.pricing {
            Pricing::Hourly { range } => (true, range, 0),
            Pricing::Fixed { budget } => (false, [0.0, 0.0], budget),
        };
        PostingRecord {
            title: p.title,
            posted_on: p.posted_on,
            category: p.category,
            skills: p.skills,
            country: p.country,
            is_hourly,
            hourly_range,
            budget,
        }
    }
}

impl From<PostingRecord> for Posting {
    fn from(r: PostingRecord) -> Self {
        let pricing = if r.is_hourly {
            Pricing::Hourly {
                range: r.hourly_range,
            }
        } else {
            Pricing::Fixed { budget: r.budget }
        };
        Posting {
            title: r.title,
            posted_on: r.posted_on,
            category: r.category,
            skills: r.skills,
            country: r.country,
            pricing,
        }
    }
}
