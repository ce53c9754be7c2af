pub mod fields;
pub mod labels;

use tracing::debug;

use crate::error::ParseError;
use crate::posting::Posting;
use fields::Draft;

/// Suffix the feed appends to every item title.
pub const TITLE_SUFFIX: &str = " - Upwork";

/// Strip trailing characters that belong to `TITLE_SUFFIX`'s character set.
///
/// This is a character-set trim, not a literal strip: "Rust work - Upwork"
/// comes out as "Rust", because "work" is made of suffix characters too.
pub fn trim_title(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| TITLE_SUFFIX.contains(c))
}

/// Two-step pipeline: labeled-field scan → per-label rules → posting.
pub fn extract(title: &str, content: &str) -> Result<Posting, ParseError> {
    let mut draft = Draft::new(trim_title(title).to_string());

    for (label, value) in labels::scan(content) {
        match fields::lookup(&label) {
            Some(apply) => apply(&mut draft, &value)?,
            None => debug!(label = %label, "ignoring unrecognized label"),
        }
    }

    Ok(draft.finish())
}

// ── Tests ──
