use super::super::domain::YearMonth;
use chrono::NaiveDate;
use serde::Serialize;

/// Percentage of `count` over `total`, rounded to one decimal. Zero totals
/// yield `0.0`.
pub fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(count as f64 / total as f64 * 100.0)
}

/// Exact halves go to the even digit, so `1.25` becomes `1.2`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLeadCount {
    pub day: NaiveDate,
    pub label: String,
    pub leads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyLeadCount {
    pub month: YearMonth,
    pub leads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStat {
    pub channel: String,
    pub total_leads: usize,
    pub with_return: usize,
    pub no_response: usize,
    pub negative_responses: usize,
    pub positive_responses: usize,
    pub effective_responses: usize,
    pub return_rate: f64,
    pub positive_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentNoResponseStat {
    pub segment: String,
    pub no_response: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelHighlight {
    pub channel: String,
    pub return_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentHighlight {
    pub segment: String,
    pub no_response: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_efficient_channel: Option<ChannelHighlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_unresponsive_segment: Option<SegmentHighlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub lines: Vec<String>,
}

impl LeadInsights {
    pub fn is_sufficient(&self) -> bool {
        self.notice.is_none()
    }

    pub fn message(&self) -> String {
        self.lines.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(rate(1, 3), 33.3);
        assert_eq!(rate(2, 3), 66.7);
        assert_eq!(rate(3, 3), 100.0);
    }

    #[test]
    fn exact_halves_round_to_even_digit() {
        assert_eq!(rate(1, 80), 1.2);
        assert_eq!(rate(3, 80), 3.8);
        assert_eq!(round_one_decimal(0.25), 0.2);
    }

    #[test]
    fn rate_is_zero_for_zero_total() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(5, 0), 0.0);
    }
}
