use std::sync::LazyLock;

use regex::Regex;

// Day components are not matched, so streams longer than a day (`P1DT2H3M`) come out as 0
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid")
});

/// Convert an ISO 8601 time duration (`PT1H2M3S`) to whole seconds
///
/// Anything that does not follow the `PT[nH][nM][nS]` shape yields 0.
pub fn to_seconds(iso: &str) -> u64 {
    let Some(caps) = ISO_DURATION.captures(iso.trim()) else {
        return 0;
    };

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}
