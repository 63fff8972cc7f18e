use std::str::FromStr;

use crate::store::PredictionRecord;
use crate::stress::StressClass;

/// Stress-class facet of a history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl ClassFilter {
    pub fn matches(self, class: StressClass) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Low => class == StressClass::Low,
            ClassFilter::Medium => class == StressClass::Medium,
            ClassFilter::High => class == StressClass::High,
        }
    }
}

impl FromStr for ClassFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ClassFilter::All),
            "low" => Ok(ClassFilter::Low),
            "medium" => Ok(ClassFilter::Medium),
            "high" => Ok(ClassFilter::High),
            other => Err(format!("unknown stress filter: {other}")),
        }
    }
}

fn matches_term(record: &PredictionRecord, term_lower: &str) -> bool {
    if term_lower.is_empty() {
        return true;
    }
    record.date.to_lowercase().contains(term_lower)
        || record
            .inputs
            .field_names()
            .any(|name| name.to_lowercase().contains(term_lower))
}

/// Filter `records` by a free-text term (case-insensitive over the timestamp
/// text and input field names) and a class filter, preserving order.
/// Re-derives on every call; no state.
pub fn filter_records<'a>(
    records: &'a [PredictionRecord],
    term: &str,
    filter: ClassFilter,
) -> Vec<&'a PredictionRecord> {
    let term_lower = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_term(record, &term_lower) && filter.matches(record.result))
        .collect()
}
