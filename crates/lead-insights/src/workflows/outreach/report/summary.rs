use super::super::domain::{LeadRecord, LeadTable, YearMonth};
use super::insights::generate_insights;
use super::views::{
    rate, round_one_decimal, ChannelStat, DailyLeadCount, LeadInsights, MonthlyLeadCount,
    SegmentNoResponseStat,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Every KPI and grouped table the dashboard shows, computed from one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadReport {
    pub total_leads: usize,
    pub latest_day: Option<NaiveDate>,
    pub leads_today: usize,
    pub leads_by_day: Vec<DailyLeadCount>,
    pub leads_by_month: Vec<MonthlyLeadCount>,
    pub channel_stats: Vec<ChannelStat>,
    pub segment_no_response: Vec<SegmentNoResponseStat>,
    pub total_no_response: usize,
    pub percent_no_response: f64,
}

impl LeadReport {
    pub fn build(table: &LeadTable) -> Self {
        let records = table.records();
        let latest_day = table.latest_day();
        let leads_today = latest_day
            .map(|day| records.iter().filter(|record| record.day() == day).count())
            .unwrap_or(0);
        let total_no_response = records.iter().filter(|record| record.is_no_response()).count();

        Self {
            total_leads: records.len(),
            latest_day,
            leads_today,
            leads_by_day: leads_by_day(records),
            leads_by_month: leads_by_month(records),
            channel_stats: channel_stats(records),
            segment_no_response: segment_no_response(records),
            total_no_response,
            percent_no_response: rate(total_no_response, records.len()),
        }
    }

    /// Average of the per-channel return rates.
    pub fn mean_return_rate(&self) -> Option<f64> {
        if self.channel_stats.is_empty() {
            return None;
        }
        let sum: f64 = self.channel_stats.iter().map(|stat| stat.return_rate).sum();
        Some(round_one_decimal(sum / self.channel_stats.len() as f64))
    }

    pub fn segment_no_response_total(&self) -> usize {
        self.segment_no_response
            .iter()
            .map(|stat| stat.no_response)
            .sum()
    }

    pub fn insights(&self) -> LeadInsights {
        generate_insights(&self.channel_stats, &self.segment_no_response)
    }
}

fn leads_by_day(records: &[LeadRecord]) -> Vec<DailyLeadCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.day()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(day, leads)| DailyLeadCount {
            day,
            label: day.format("%d/%m").to_string(),
            leads,
        })
        .collect()
}

fn leads_by_month(records: &[LeadRecord]) -> Vec<MonthlyLeadCount> {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.month()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(month, leads)| MonthlyLeadCount { month, leads })
        .collect()
}

/// One stat per distinct channel, each computed from its own filtered view of
/// the table. Output is ordered by channel name.
fn channel_stats(records: &[LeadRecord]) -> Vec<ChannelStat> {
    let channels: BTreeSet<&str> = records.iter().map(LeadRecord::channel).collect();

    channels
        .into_iter()
        .map(|channel| {
            let rows: Vec<&LeadRecord> = records
                .iter()
                .filter(|record| record.channel() == channel)
                .collect();
            let total_leads = rows.len();
            let no_response = rows.iter().filter(|record| record.is_no_response()).count();
            let with_return = total_leads - no_response;
            let negative_responses = rows.iter().filter(|record| record.is_negative()).count();
            let positive_responses = rows
                .iter()
                .filter(|record| record.positive_response())
                .count();
            let effective_responses = rows
                .iter()
                .filter(|record| record.effective_response())
                .count();

            ChannelStat {
                channel: channel.to_string(),
                total_leads,
                with_return,
                no_response,
                negative_responses,
                positive_responses,
                effective_responses,
                return_rate: rate(with_return, total_leads),
                positive_rate: rate(positive_responses, total_leads),
            }
        })
        .collect()
}

fn segment_no_response(records: &[LeadRecord]) -> Vec<SegmentNoResponseStat> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|record| record.is_no_response()) {
        *counts.entry(record.segment()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(segment, no_response)| SegmentNoResponseStat {
            segment: segment.to_string(),
            no_response,
        })
        .collect()
}
