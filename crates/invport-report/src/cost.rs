use serde::Serialize;

/// Aggregate over the numeric `cost` field, coerced from its stored string
/// form. Absent or unparseable values are excluded entirely, never treated
/// as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    pub total_inventory_value: f64,
    pub average_item_cost: f64,
    pub highest_cost: f64,
    pub lowest_cost: f64,
}

fn parse_cost(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn cost_analysis(costs: &[String]) -> CostAnalysis {
    let values: Vec<f64> = costs.iter().filter_map(|c| parse_cost(c)).collect();
    if values.is_empty() {
        return CostAnalysis::default();
    }
    let total: f64 = values.iter().sum();
    let highest = values.iter().cloned().fold(f64::MIN, f64::max);
    let lowest = values.iter().cloned().fold(f64::MAX, f64::min);
    CostAnalysis {
        total_inventory_value: total,
        average_item_cost: total / values.len() as f64,
        highest_cost: highest,
        lowest_cost: lowest,
    }
}

/// Per-category analytics: item count plus cost sum/average over the
/// parseable costs in that category.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalytics {
    /// `None` groups the uncategorized items.
    pub category: Option<String>,
    pub count: u64,
    pub total_cost: f64,
    pub average_cost: f64,
}

pub fn category_analytics(rows: &[(Option<String>, Option<String>)]) -> Vec<CategoryAnalytics> {
    use std::collections::BTreeMap;

    let mut groups: BTreeMap<Option<String>, (u64, Vec<f64>)> = BTreeMap::new();
    for (category, cost) in rows {
        let entry = groups.entry(category.clone()).or_default();
        entry.0 += 1;
        if let Some(value) = cost.as_deref().and_then(parse_cost) {
            entry.1.push(value);
        }
    }

    let mut analytics: Vec<CategoryAnalytics> = groups
        .into_iter()
        .map(|(category, (count, values))| {
            let total: f64 = values.iter().sum();
            let average = if values.is_empty() {
                0.0
            } else {
                total / values.len() as f64
            };
            CategoryAnalytics {
                category,
                count,
                total_cost: total,
                average_cost: average,
            }
        })
        .collect();
    analytics.sort_by(|a, b| b.count.cmp(&a.count));
    analytics
}
