//! Statistical summaries for column profiling.

use super::type_inference::{datetime_parse_rate, parse_datetime};
use crate::types::{CategoryCount, DatetimeSummary, FrequencyTable, Histogram, NumericSummary};
use polars::prelude::*;

/// Arithmetic mean, `None` for no values.
pub(crate) fn calculate_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1). Zero for fewer than two values.
pub(crate) fn calculate_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let mean = calculate_mean(values).unwrap_or(0.0);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Calculate standard deviation of a set of values.
pub(crate) fn calculate_std(values: &[f64]) -> f64 {
    calculate_variance(values).sqrt()
}

/// Moment skewness `sum(((x - mean) / std)^3) / n`. Zero when std is zero.
pub(crate) fn calculate_skewness(values: &[f64]) -> f64 {
    let std = calculate_std(values);
    if std == 0.0 {
        return 0.0;
    }
    let mean = calculate_mean(values).unwrap_or(0.0);
    let n = values.len() as f64;
    values
        .iter()
        .map(|v| ((v - mean) / std).powi(3))
        .sum::<f64>()
        / n
}

/// Quantile of already sorted values, linear interpolation between the
/// closest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Equal-width histogram over sorted values.
pub(crate) fn build_histogram(sorted: &[f64], bins: usize) -> Histogram {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    };

    if min == max || bins <= 1 {
        return Histogram {
            edges: vec![min, max],
            counts: vec![sorted.len()],
        };
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in sorted {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Summarize numeric values. `None` when there are no values.
pub(crate) fn numeric_summary(values: &[f64], bins: usize) -> Option<NumericSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = calculate_mean(&sorted)?;
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let variance = calculate_variance(&sorted);

    Some(NumericSummary {
        count: sorted.len(),
        mean,
        median,
        std_dev: variance.sqrt(),
        variance,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1,
        q3,
        iqr: q3 - q1,
        skewness: calculate_skewness(&sorted),
        histogram: build_histogram(&sorted, bins),
    })
}

/// Value counts, most frequent first (ties by value), truncated to `top_n`
/// with the remainder folded into an "other" bucket.
pub(crate) fn frequency_table(series: &Series, top_n: usize) -> PolarsResult<FrequencyTable> {
    let mut non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(FrequencyTable {
            top: Vec::new(),
            other_count: 0,
            other_distinct: 0,
        });
    }
    // value_counts names its output after the series; keep it clear of "count"
    non_null.rename("value".into());

    let counts_df = non_null.value_counts(true, false, "count".into(), false)?;
    let values = counts_df
        .column("value")?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let counts = counts_df
        .column("count")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;

    let mut ordered: Vec<(String, usize)> = values
        .str()?
        .into_iter()
        .zip(counts.u64()?)
        .filter_map(|(value, count)| Some((value?.to_string(), count? as usize)))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let rest = if ordered.len() > top_n {
        ordered.split_off(top_n)
    } else {
        Vec::new()
    };

    Ok(FrequencyTable {
        top: ordered
            .into_iter()
            .map(|(value, count)| CategoryCount { value, count })
            .collect(),
        other_count: rest.iter().map(|(_, c)| c).sum(),
        other_distinct: rest.len(),
    })
}

/// Earliest/latest parsed value and the parse success rate.
pub(crate) fn datetime_summary(values: &[String]) -> DatetimeSummary {
    let parsed: Vec<_> = values.iter().filter_map(|v| parse_datetime(v)).collect();
    DatetimeSummary {
        earliest: parsed.iter().min().map(|d| d.to_string()),
        latest: parsed.iter().max().map(|d| d.to_string()),
        parse_rate: datetime_parse_rate(values),
    }
}
