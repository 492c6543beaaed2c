//! Component-wise comparison of dot-separated numeric versions
//!
//! Unlike [semver](https://semver.org) the number of components is free and
//! a missing component is not padded with zero: `1.2.1` is newer than `1.2`,
//! while `1.2` is not newer than `1.2.0`.

use std::cmp::Ordering;

/// One parsed component of a version string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component<'a> {
    /// Decimal digits with leading zeros stripped; zero is the empty string
    Number(&'a str),
    /// A token that is not a decimal number, or a side that ran out of tokens
    NotANumber,
}

impl<'a> Component<'a> {
    fn parse(token: Option<&'a str>) -> Self {
        let Some(token) = token.map(str::trim) else {
            return Component::NotANumber;
        };

        // An explicitly empty token ("1..2") reads as zero
        if token.is_empty() {
            return Component::Number("");
        }

        let digits = token.strip_prefix('+').unwrap_or(token);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Component::NotANumber;
        }

        Component::Number(digits.trim_start_matches('0'))
    }
}

/// Orders normalized digit strings by magnitude, without a width limit
fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Relation of the client version to the server version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The server advertises a newer version
    Outdated,
    /// Neither side is newer
    Current,
    /// The client is newer than the server (e.g. not yet deployed)
    Ahead,
}

/// Returns true if `latest` is strictly newer than `current`.
///
/// Components are compared pairwise from the left. The first unequal pair
/// decides: `latest` wins if its number is greater or if `current` has no
/// number at that position. Two non-numeric components count as equal.
pub fn greater_than(latest: &str, current: &str) -> bool {
    let mut latest_tokens = latest.split('.');
    let mut current_tokens = current.split('.');

    loop {
        let (a, b) = (latest_tokens.next(), current_tokens.next());
        if a.is_none() && b.is_none() {
            return false;
        }

        match (Component::parse(a), Component::parse(b)) {
            (Component::Number(a), Component::Number(b)) if a == b => continue,
            (Component::NotANumber, Component::NotANumber) => continue,
            (Component::Number(a), Component::Number(b)) => {
                return cmp_digits(a, b) == Ordering::Greater;
            }
            (_, Component::NotANumber) => return true,
            (Component::NotANumber, Component::Number(_)) => return false,
        }
    }
}

/// Classify `current` against the version advertised by the server
pub fn compare(server: &str, current: &str) -> Staleness {
    if greater_than(server, current) {
        Staleness::Outdated
    } else if greater_than(current, server) {
        Staleness::Ahead
    } else {
        Staleness::Current
    }
}
