//! Numeric classification strategies for choropleth binning.
//!
//! A [`Classifier`] turns a value vector into ordered class break values.
//! Both implementations are deterministic for a given input vector and
//! class count, and their breaks are monotonically non-decreasing.

/// Default number of choropleth classes.
pub const DEFAULT_CLASSES: usize = 5;

/// A classification strategy producing upper class bounds.
pub trait Classifier {
    /// Strategy name for logging and UI legends.
    fn name(&self) -> &'static str;

    /// Computes up to `num_classes` upper break values for `values`.
    ///
    /// Breaks are sorted ascending and the last break equals the maximum
    /// value. Fewer breaks are returned when the data has fewer distinct
    /// values than classes. An empty input yields no breaks.
    fn classify(&self, values: &[f64], num_classes: usize) -> Vec<f64>;
}

/// Jenks natural breaks: minimizes within-class variance.
pub struct NaturalBreaks;

impl Classifier for NaturalBreaks {
    fn name(&self) -> &'static str {
        "NaturalBreaks"
    }

    fn classify(&self, values: &[f64], num_classes: usize) -> Vec<f64> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() || num_classes == 0 {
            return Vec::new();
        }

        let distinct = count_distinct(&sorted);
        let k = num_classes.min(distinct);
        if k <= 1 {
            return vec![sorted[sorted.len() - 1]];
        }

        jenks_breaks(&sorted, k)
    }
}

/// Equal-count quantile classification.
pub struct Quantile;

impl Classifier for Quantile {
    fn name(&self) -> &'static str {
        "Quantile"
    }

    #[allow(clippy::float_cmp)]
    fn classify(&self, values: &[f64], num_classes: usize) -> Vec<f64> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() || num_classes == 0 {
            return Vec::new();
        }

        let n = sorted.len();
        let mut breaks: Vec<f64> = Vec::with_capacity(num_classes);
        for class in 1..=num_classes {
            // Upper bound of each class at the class/num_classes quantile
            let idx = (class * n).div_ceil(num_classes).clamp(1, n) - 1;
            let value = sorted[idx];
            if breaks.last() != Some(&value) {
                breaks.push(value);
            }
        }
        breaks
    }
}

/// Returns the class index (0-based) for a value against sorted breaks.
///
/// Values above the last break land in the last class.
#[must_use]
pub fn class_for(value: f64, breaks: &[f64]) -> usize {
    if breaks.is_empty() {
        return 0;
    }
    breaks
        .iter()
        .position(|&upper| value <= upper)
        .unwrap_or(breaks.len() - 1)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[allow(clippy::float_cmp)]
fn count_distinct(sorted: &[f64]) -> usize {
    let mut distinct = 0;
    let mut previous = None;
    for &value in sorted {
        if previous != Some(value) {
            distinct += 1;
            previous = Some(value);
        }
    }
    distinct
}

/// Fisher-Jenks dynamic program over sorted data.
///
/// `sorted` must be non-empty and `2 <= k <=` the number of distinct
/// values.
fn jenks_breaks(sorted: &[f64], k: usize) -> Vec<f64> {
    let n = sorted.len();

    // lower[l][j]: index (1-based) of the first element of class j in the
    // optimal partition of the first l elements; variance[l][j]: its
    // total within-class variance.
    let mut lower = vec![vec![0usize; k + 1]; n + 1];
    let mut variance = vec![vec![0.0f64; k + 1]; n + 1];

    for j in 1..=k {
        lower[1][j] = 1;
        for row in variance.iter_mut().take(n + 1).skip(2) {
            row[j] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut count = 0.0;
        let mut within_variance = 0.0;

        for m in 1..=l {
            let first = l - m + 1;
            let value = sorted[first - 1];

            count += 1.0;
            sum += value;
            sum_squares += value * value;
            within_variance = sum_squares - (sum * sum) / count;

            if first > 1 {
                for j in 2..=k {
                    let candidate = within_variance + variance[first - 1][j - 1];
                    if variance[l][j] >= candidate {
                        lower[l][j] = first;
                        variance[l][j] = candidate;
                    }
                }
            }
        }

        lower[l][1] = 1;
        variance[l][1] = within_variance;
    }

    let mut breaks = vec![0.0f64; k];
    breaks[k - 1] = sorted[n - 1];

    let mut end = n;
    for j in (2..=k).rev() {
        let first = lower[end][j];
        breaks[j - 2] = sorted[first - 2];
        end = first - 1;
    }

    breaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_breaks_on_clustered_data() {
        // Two obvious clusters; a 2-class split lands between them
        let values = vec![1.0, 2.0, 2.0, 3.0, 20.0, 21.0, 22.0];
        let breaks = NaturalBreaks.classify(&values, 2);

        assert_eq!(breaks.len(), 2);
        assert!((breaks[0] - 3.0).abs() < f64::EPSILON);
        assert!((breaks[1] - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn breaks_are_monotonic_and_deterministic() {
        let values = vec![5.0, 1.0, 9.0, 4.0, 12.0, 0.0, 7.0, 3.0, 15.0];

        let first = NaturalBreaks.classify(&values, 4);
        let second = NaturalBreaks.classify(&values, 4);
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!((first.last().unwrap() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fewer_distinct_values_than_classes() {
        let values = vec![2.0, 2.0, 2.0];
        let breaks = NaturalBreaks.classify(&values, 5);
        assert_eq!(breaks, vec![2.0]);
    }

    #[test]
    fn empty_input_yields_no_breaks() {
        assert!(NaturalBreaks.classify(&[], 5).is_empty());
        assert!(Quantile.classify(&[], 5).is_empty());
    }

    #[test]
    fn quantile_splits_equal_counts() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let breaks = Quantile.classify(&values, 5);
        assert_eq!(breaks, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn class_for_assigns_by_upper_bound() {
        let breaks = vec![2.0, 4.0, 10.0];
        assert_eq!(class_for(0.0, &breaks), 0);
        assert_eq!(class_for(2.0, &breaks), 0);
        assert_eq!(class_for(3.0, &breaks), 1);
        assert_eq!(class_for(10.0, &breaks), 2);
        assert_eq!(class_for(99.0, &breaks), 2);
    }
}
