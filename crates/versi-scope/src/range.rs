use versi_backend::Version;

pub const LATEST_LTS: &str = "22.11.0";
pub const PREVIOUS_LTS: &str = "20.18.0";
pub const OLDEST_LTS: &str = "18.20.0";

type RangeRule = (fn(&str) -> bool, &'static str);

// First match wins.
const RANGE_TABLE: &[RangeRule] = &[
    (below_24, LATEST_LTS),
    (below_23, PREVIOUS_LTS),
    (from_18, OLDEST_LTS),
];

fn from_18(range: &str) -> bool {
    range.contains(">=18.0.0")
}

fn below_24(range: &str) -> bool {
    from_18(range) && range.contains("<24.0.0")
}

fn below_23(range: &str) -> bool {
    from_18(range) && range.contains("<23.0.0")
}

/// Maps the `engines.node` ranges this tool knows about to a concrete
/// version. This is a closed lookup, not a range solver: unknown shapes
/// resolve to `None`.
pub struct RangeMapper;

impl RangeMapper {
    #[must_use]
    pub fn map(range: &str) -> Option<Version> {
        RANGE_TABLE
            .iter()
            .find(|(matches, _)| matches(range))
            .and_then(|(_, version)| Version::from_pin(version))
    }
}
