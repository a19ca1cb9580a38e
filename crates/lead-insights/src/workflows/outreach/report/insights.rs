use super::views::{
    ChannelHighlight, ChannelStat, LeadInsights, SegmentHighlight, SegmentNoResponseStat,
};

const INSUFFICIENT_DATA: &str = "Not enough data to generate insights. Check the channel data.";

/// Picks the channel with the highest return rate and the segment with the
/// most non-responses. Ties keep the first entry in input order.
pub fn generate_insights(
    channel_stats: &[ChannelStat],
    segment_no_response: &[SegmentNoResponseStat],
) -> LeadInsights {
    let Some(best) = first_max_by(channel_stats, |stat| stat.return_rate) else {
        return LeadInsights {
            most_efficient_channel: None,
            most_unresponsive_segment: None,
            recommendation: None,
            notice: Some(INSUFFICIENT_DATA.to_string()),
            lines: vec![INSUFFICIENT_DATA.to_string()],
        };
    };

    let worst = first_max_by(segment_no_response, |stat| stat.no_response as f64);

    let mut lines = vec![format!(
        "Most efficient channel: {} with {:.1}% return rate",
        best.channel, best.return_rate
    )];

    let recommendation = match worst {
        Some(segment) => {
            lines.push(format!(
                "Segment with most non-responses: {} ({} leads without response)",
                segment.segment, segment.no_response
            ));
            format!(
                "Recommendation: focus your efforts on channel {} and review the strategy for segment {}",
                best.channel, segment.segment
            )
        }
        None => format!(
            "Recommendation: keep focusing on channel {} to maximize results",
            best.channel
        ),
    };
    lines.push(recommendation.clone());

    LeadInsights {
        most_efficient_channel: Some(ChannelHighlight {
            channel: best.channel.clone(),
            return_rate: best.return_rate,
        }),
        most_unresponsive_segment: worst.map(|segment| SegmentHighlight {
            segment: segment.segment.clone(),
            no_response: segment.no_response,
        }),
        recommendation: Some(recommendation),
        notice: None,
        lines,
    }
}

fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let value = key(item);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}
