//! Plain-language spending tips derived from the statistics.

use crate::{html::format_currency, stats::Stats};

/// Daily spending is averaged over a fixed month of this many days.
const DAYS_PER_MONTH: f64 = 30.0;

/// A titled tip shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: &'static str,
    pub description: String,
}

/// Generate the tips that apply to `stats`.
///
/// Nothing is generated when nothing has been spent.
pub fn generate_insights(stats: &Stats) -> Vec<Insight> {
    let mut insights = Vec::new();

    if stats.total <= 0.0 {
        return insights;
    }

    if stats.unnecessary > 0.0 {
        let percent = stats.unnecessary / stats.total * 100.0;

        insights.push(Insight {
            title: "Unnecessary Spending",
            description: format!(
                "{percent:.1}% of your expenses ({}) are unnecessary. \
                Consider reducing these to save more.",
                format_currency(stats.unnecessary)
            ),
        });
    }

    // The first category wins ties.
    let top_category = stats
        .categories
        .iter()
        .fold(None, |top, (category, total)| match top {
            Some((_, top_total)) if top_total >= total => top,
            _ => Some((category, total)),
        });

    if let Some((category, total)) = top_category {
        let percent = total / stats.total * 100.0;

        insights.push(Insight {
            title: "Top Spending Category",
            description: format!(
                "You spend the most on {category} ({percent:.1}% of total). \
                Consider if this aligns with your priorities."
            ),
        });
    }

    if stats.potential_savings > 0.0 {
        insights.push(Insight {
            title: "Savings Opportunity",
            description: format!(
                "By following suggested alternatives, you could save up to {} per month!",
                format_currency(stats.potential_savings)
            ),
        });
    }

    insights.push(Insight {
        title: "Daily Average",
        description: format!(
            "Your average daily spending is {}. \
            Setting a daily budget can help you stay on track.",
            format_currency(stats.total / DAYS_PER_MONTH)
        ),
    });

    insights
}
