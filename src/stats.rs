use crate::reshape::LongFormRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub series: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics per series over aggregated long-form rows.
pub fn series_summary(rows: &[LongFormRow]) -> Vec<SeriesSummary> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in rows {
        groups.entry(r.series()).or_default().push(r.value);
    }

    let mut out = Vec::new();
    for (series, mut vals) in groups {
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(SeriesSummary {
            series,
            count,
            min,
            max,
            mean,
            median,
        });
    }
    out
}
