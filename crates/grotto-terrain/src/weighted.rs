//! Cumulative weighted selection.

use rand::Rng;

use crate::error::ConfigurationError;

/// Entries sorted by descending weight with cumulative fractions in `(0, 1]`.
///
/// A draw `u` in `[0, 1)` selects the first entry whose cumulative fraction is
/// at least `u`. The last fraction is exactly `1.0` so every draw lands.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64)>,
}

impl<T> WeightedTable<T> {
    /// Builds a table from `(item, weight)` pairs. Equal weights keep their
    /// input order.
    ///
    /// # Errors
    ///
    /// Fails on an empty input or a weight that is not finite and positive.
    pub fn new(items: impl IntoIterator<Item = (T, f64)>) -> Result<Self, ConfigurationError> {
        let mut items: Vec<(T, f64)> = items.into_iter().collect();
        if items.is_empty() {
            return Err(ConfigurationError::EmptyWeightTable);
        }
        if let Some(&(_, bad)) = items.iter().find(|(_, w)| !w.is_finite() || *w <= 0.0) {
            return Err(ConfigurationError::InvalidWeight(bad));
        }

        // `sort_by` is stable.
        items.sort_by(|a, b| b.1.total_cmp(&a.1));

        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut running = 0.0;
        for entry in &mut items {
            running += entry.1;
            entry.1 = running / total;
        }
        if let Some(last) = items.last_mut() {
            last.1 = 1.0;
        }
        Ok(Self { entries: items })
    }

    /// The entry selected by `u`.
    pub fn pick(&self, u: f64) -> &T {
        let index = self
            .entries
            .iter()
            .position(|(_, cumulative)| u <= *cumulative)
            .unwrap_or(self.entries.len() - 1);
        &self.entries[index].0
    }

    /// Draws `u` from `rng` and picks.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let u: f64 = rng.random();
        self.pick(u)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(item, cumulative fraction)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.entries.iter().map(|(item, c)| (item, *c))
    }
}
