use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::error::ParseError;
use crate::posting::{Posting, Pricing};

const POSTED_ON_LAYOUT: &str = "%B %d, %Y %H:%M";

/// Zone abbreviations with a known offset, in seconds east of UTC.
const KNOWN_ZONES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("EST", -5 * 3600),
    ("EDT", -4 * 3600),
    ("CST", -6 * 3600),
    ("CDT", -5 * 3600),
    ("MST", -7 * 3600),
    ("MDT", -6 * 3600),
    ("PST", -8 * 3600),
    ("PDT", -7 * 3600),
];

/// Posting under construction. Pricing is settled in `finish`, so a budget
/// wins over an hourly range whatever order the labels came in.
#[derive(Default)]
pub struct Draft {
    posting: Posting,
    hourly_range: [f32; 2],
    budget: Option<i64>,
}

impl Draft {
    pub fn new(title: String) -> Self {
        Draft {
            posting: Posting {
                title,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn finish(self) -> Posting {
        let pricing = match self.budget {
            Some(budget) => Pricing::Fixed { budget },
            None => Pricing::Hourly {
                range: self.hourly_range,
            },
        };
        Posting {
            pricing,
            ..self.posting
        }
    }
}

pub type Apply = fn(&mut Draft, &str) -> Result<(), ParseError>;

/// Recognized labels and the rule that applies each one. Exact, case-sensitive.
pub static FIELDS: &[(&str, Apply)] = &[
    ("Posted On", apply_posted_on),
    ("Category", apply_category),
    ("Skills", apply_skills),
    ("Country", apply_country),
    ("Budget", apply_budget),
    ("Hourly Range", apply_hourly_range),
];

pub fn lookup(label: &str) -> Option<Apply> {
    FIELDS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, apply)| *apply)
}

fn apply_posted_on(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    d.posting.posted_on = parse_posted_on(val)?;
    Ok(())
}

fn apply_category(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    d.posting.category = val.to_string();
    Ok(())
}

fn apply_skills(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    d.posting.skills = val.split(", ").map(|s| s.trim().to_string()).collect();
    Ok(())
}

fn apply_country(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    d.posting.country = val.to_string();
    Ok(())
}

fn apply_budget(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    let cleaned = val.replace(['$', ','], "");
    let budget = cleaned.parse::<i64>().map_err(|source| ParseError::Budget {
        value: val.to_string(),
        source,
    })?;
    d.budget = Some(budget);
    Ok(())
}

fn apply_hourly_range(d: &mut Draft, val: &str) -> Result<(), ParseError> {
    let cleaned = val.replace('$', "");
    let parse = |token: &str| {
        token.parse::<f32>().map_err(|source| ParseError::HourlyRange {
            value: val.to_string(),
            source,
        })
    };

    let mut tokens = cleaned.split('-');
    let lower = parse(tokens.next().unwrap_or_default())?;
    let upper = match tokens.next() {
        Some(token) => parse(token)?,
        None => 0.0,
    };
    d.hourly_range = [lower, upper];
    Ok(())
}

/// Parse `January 2, 2006 15:04 UTC`. Unknown all-caps zone abbreviations
/// are read as UTC.
pub fn parse_posted_on(val: &str) -> Result<DateTime<Utc>, ParseError> {
    let fail = |reason: &str| ParseError::PostedOn {
        value: val.to_string(),
        reason: reason.to_string(),
    };

    let (stamp, zone) = val
        .trim()
        .rsplit_once(' ')
        .ok_or_else(|| fail("missing zone abbreviation"))?;
    let offset = zone_offset(zone).ok_or_else(|| fail("unrecognized zone abbreviation"))?;

    let naive = NaiveDateTime::parse_from_str(stamp, POSTED_ON_LAYOUT)
        .map_err(|e| fail(&e.to_string()))?;
    let offset = FixedOffset::east_opt(offset).ok_or_else(|| fail("zone offset out of range"))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| fail("ambiguous local time"))
}

fn zone_offset(zone: &str) -> Option<i32> {
    if let Some((_, secs)) = KNOWN_ZONES.iter().find(|(abbr, _)| *abbr == zone) {
        return Some(*secs);
    }
    let plausible = (3..=5).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_uppercase());
    plausible.then_some(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn apply(label: &str, val: &str) -> Result<Posting, ParseError> {
        let mut d = Draft::new(String::new());
        lookup(label).expect("recognized label")(&mut d, val)?;
        Ok(d.finish())
    }

    #[test]
    fn posted_on_utc() {
        let t = parse_posted_on("January 2, 2006 15:04 UTC").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap());
    }

    #[test]
    fn posted_on_two_digit_day() {
        let t = parse_posted_on("October 17, 2026 08:45 UTC").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 10, 17, 8, 45, 0).unwrap());
    }

    #[test]
    fn posted_on_named_offset() {
        let t = parse_posted_on("January 2, 2006 15:04 MST").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 0).unwrap());
    }

    #[test]
    fn posted_on_unknown_abbreviation_is_utc() {
        let t = parse_posted_on("January 2, 2006 15:04 XYZ").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap());
    }

    #[test]
    fn posted_on_rejects_single_letter_zone() {
        let err = parse_posted_on("January 2, 2006 15:04 Z").unwrap_err();
        assert!(matches!(err, ParseError::PostedOn { .. }));
    }

    #[test]
    fn posted_on_rejects_other_layouts() {
        for bad in [
            "2006-01-02T15:04:05Z",
            "January 2, 2006 15:04",
            "January 2, 2006 15:04 +0100",
            "Jan 32, 2006 15:04 UTC",
            "",
        ] {
            let err = parse_posted_on(bad).unwrap_err();
            assert_eq!(err.label(), "Posted On", "{bad:?} should fail");
        }
    }

    #[test]
    fn skills_split_on_comma_space() {
        let p = apply("Skills", "Rust,Go,  Web Scraping ").unwrap();
        assert_eq!(p.skills, vec!["Rust,Go", "Web Scraping"]);
    }

    #[test]
    fn budget_strips_currency() {
        let p = apply("Budget", "$1,500").unwrap();
        assert_eq!(p.pricing, Pricing::Fixed { budget: 1500 });
    }

    #[test]
    fn budget_rejects_decimal() {
        let err = apply("Budget", "$1,500.50").unwrap_err();
        assert!(matches!(err, ParseError::Budget { .. }));
    }

    #[test]
    fn hourly_range_both_bounds() {
        let p = apply("Hourly Range", "$15.00-$30.50").unwrap();
        assert_eq!(p.pricing, Pricing::Hourly { range: [15.0, 30.5] });
    }

    #[test]
    fn hourly_range_single_bound() {
        let p = apply("Hourly Range", "$25.00").unwrap();
        assert_eq!(p.pricing, Pricing::Hourly { range: [25.0, 0.0] });
    }

    #[test]
    fn hourly_range_rejects_spaced_tokens() {
        let err = apply("Hourly Range", "$15.00 - $30.00").unwrap_err();
        assert!(matches!(err, ParseError::HourlyRange { .. }));
    }

    #[test]
    fn budget_wins_over_range_in_any_order() {
        let mut d = Draft::new(String::new());
        apply_budget(&mut d, "$300").unwrap();
        apply_hourly_range(&mut d, "$10-$20").unwrap();
        assert_eq!(d.finish().pricing, Pricing::Fixed { budget: 300 });
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("Country").is_some());
        assert!(lookup("country").is_none());
        assert!(lookup("Location").is_none());
    }
}
