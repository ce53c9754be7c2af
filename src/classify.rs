use crate::posting::Posting;

/// Countries whose postings are dropped from the filtered snapshot.
pub const DENIED_COUNTRIES: &[&str] = &["India", "Nigeria"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Legit,
    Junk { reason: String },
}

impl Verdict {
    pub fn is_junk(&self) -> bool {
        matches!(self, Verdict::Junk { .. })
    }

    /// Why the posting was rejected; empty when it is legit.
    pub fn reason(&self) -> &str {
        match self {
            Verdict::Legit => "",
            Verdict::Junk { reason } => reason,
        }
    }
}

/// One independent junk predicate. `Some(reason)` means junk.
pub trait Rule: Send + Sync {
    fn check(&self, posting: &Posting) -> Option<String>;
}

pub struct CountryDenylist {
    countries: Vec<String>,
}

impl CountryDenylist {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CountryDenylist {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for CountryDenylist {
    fn check(&self, posting: &Posting) -> Option<String> {
        self.countries
            .iter()
            .any(|c| *c == posting.country)
            .then(|| format!("Country is {}", posting.country))
    }
}

/// Ordered rule list; the first rule that fires decides.
pub struct Classifier {
    rules: Vec<Box<dyn Rule>>,
}

impl Classifier {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Classifier { rules }
    }

    pub fn classify(&self, posting: &Posting) -> Verdict {
        self.rules
            .iter()
            .find_map(|rule| rule.check(posting))
            .map_or(Verdict::Legit, |reason| Verdict::Junk { reason })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(vec![Box::new(CountryDenylist::new(
            DENIED_COUNTRIES.iter().copied(),
        ))])
    }
}
