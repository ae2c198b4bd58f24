//! Dotted version numbers with an optional textual suffix (e.g. "2.1.0 RC1")

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)*").expect("valid numeric run regex"));

/// A version number made of numeric components plus an optional suffix.
///
/// Ordering rules:
/// - numeric components are compared first, missing trailing components count as 0
///   (so `1.0` equals `1.0.0`)
/// - with equal numbers, an identifier without suffix is greater than one with a
///   suffix, since the suffix marks a pre-release (`2.1.0` > `2.1.0 RC1`)
/// - two suffixes compare as strings
/// - the default identifier (no components, no suffix) is below everything else
#[derive(Debug, Clone, Default)]
pub struct VersionIdentifier {
    segments: Vec<u64>,
    suffix: String,
}

impl VersionIdentifier {
    /// Parse a version string of the form `"<dotted-numbers> [suffix]"`.
    ///
    /// Never fails. Input without a leading number, or with a component too large
    /// to represent, yields an identifier without components whose suffix is the
    /// whole trimmed input.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        let Some(run) = NUMERIC_RUN.find(trimmed) else {
            return Self::unparsable(trimmed);
        };

        match run
            .as_str()
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(segments) => Self {
                segments,
                suffix: trimmed[run.end()..].trim().to_string(),
            },
            Err(_) => Self::unparsable(trimmed),
        }
    }

    fn unparsable(trimmed: &str) -> Self {
        Self {
            segments: Vec::new(),
            suffix: trimmed.to_string(),
        }
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True for the default identifier, which carries no information at all
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.suffix.is_empty()
    }
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let lhs = a.get(i).copied().unwrap_or(0);
            let rhs = b.get(i).copied().unwrap_or(0);
            lhs.cmp(&rhs)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl Ord for VersionIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        compare_segments(&self.segments, &other.segments).then_with(|| {
            match (self.suffix.is_empty(), other.suffix.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.suffix.cmp(&other.suffix),
            }
        })
    }
}

impl PartialOrd for VersionIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionIdentifier {}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric = self
            .segments
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");

        match (numeric.is_empty(), self.suffix.is_empty()) {
            (_, true) => f.write_str(&numeric),
            (true, false) => f.write_str(&self.suffix),
            (false, false) => write!(f, "{} {}", numeric, self.suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", vec![1, 2, 3], "")]
    #[case("2.1.0 RC1", vec![2, 1, 0], "RC1")]
    #[case("  7.0  beta 2 ", vec![7, 0], "beta 2")]
    #[case("3.4RC2", vec![3, 4], "RC2")]
    #[case("10", vec![10], "")]
    #[case("1.2.", vec![1, 2], ".")]
    #[case("garbage", vec![], "garbage")]
    #[case("", vec![], "")]
    #[case("99999999999999999999999.1", vec![], "99999999999999999999999.1")]
    fn parse_splits_numeric_run_and_suffix(
        #[case] input: &str,
        #[case] segments: Vec<u64>,
        #[case] suffix: &str,
    ) {
        let version = VersionIdentifier::parse(input);

        assert_eq!(version.segments(), segments.as_slice());
        assert_eq!(version.suffix(), suffix);
    }

    #[rstest]
    #[case("2.1.0", "2.1.0 RC1", Ordering::Greater)]
    #[case("2.1.0 RC1", "2.0.9", Ordering::Greater)]
    #[case("1.0", "1.0.0", Ordering::Equal)]
    #[case("1.0.1", "1.0", Ordering::Greater)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("3.0 RC2", "3.0 RC1", Ordering::Greater)]
    #[case("3.0 RC1", "3.0 RC1", Ordering::Equal)]
    #[case("2.0 RC1", "1.9.9", Ordering::Greater)]
    #[case("0.0.1", "garbage", Ordering::Greater)]
    fn compare_returns_expected_ordering(
        #[case] lhs: &str,
        #[case] rhs: &str,
        #[case] expected: Ordering,
    ) {
        let lhs = VersionIdentifier::parse(lhs);
        let rhs = VersionIdentifier::parse(rhs);

        assert_eq!(lhs.cmp(&rhs), expected);
        assert_eq!(rhs.cmp(&lhs), expected.reverse());
    }

    #[rstest]
    #[case("0")]
    #[case("0.0.0")]
    #[case("1.0 RC1")]
    #[case("garbage")]
    #[case("")]
    fn default_identifier_is_not_greater_than_any_parsed_identifier(#[case] input: &str) {
        assert!(VersionIdentifier::default() <= VersionIdentifier::parse(input));
    }

    #[rstest]
    #[case("1.2.3", "1.2.3")]
    #[case("2.1.0   RC1", "2.1.0 RC1")]
    #[case("garbage", "garbage")]
    #[case("4.5beta", "4.5 beta")]
    #[case("", "")]
    fn display_formats_numbers_then_suffix(#[case] input: &str, #[case] expected: &str) {
        let version = VersionIdentifier::parse(input);

        assert_eq!(version.to_string(), expected);
        assert_eq!(VersionIdentifier::parse(&version.to_string()), version);
    }

    #[test]
    fn ordering_is_transitive_across_mixed_identifiers() {
        let mut versions: Vec<VersionIdentifier> =
            ["2.0.9", "2.1.0", "", "2.1.0 RC1", "1.0", "2.1.0 RC2", "nonsense"]
                .into_iter()
                .map(VersionIdentifier::parse)
                .collect();
        versions.sort();

        let sorted: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            sorted,
            vec!["", "nonsense", "1.0", "2.0.9", "2.1.0 RC1", "2.1.0 RC2", "2.1.0"]
        );
    }
}
