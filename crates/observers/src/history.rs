use fitkit_core::Observer;

use crate::traits::{HasEdm, HasIteration, HasObjective};

/// One recorded event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub iteration: usize,

    /// `NaN` for events without an objective.
    pub cost: f64,

    pub edm: f64,
}

/// An observer that records the convergence history of a run.
///
/// Pass `&mut History` as the observer to keep the history after the
/// solver returns.
///
/// # Example
///
/// ```
/// use fitkit_core::{FnObjective, ParameterSet};
/// use fitkit_observers::History;
/// use fitkit_solvers::optimization::quasi_newton::{Config, minimize};
///
/// let bowl = FnObjective::new(|p: &[f64]| (p[0] - 3.0).powi(2));
/// let mut params = ParameterSet::new();
/// params.add("x", 0.0, 0.5).unwrap();
///
/// let mut history = History::new();
/// let min = minimize(&bowl, &params, &Config::default(), &mut history).unwrap();
///
/// assert_eq!(history.costs().count(), min.iters);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<Record>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// All records, in the order they were observed.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Costs of the events that carried one.
    pub fn costs(&self) -> impl Iterator<Item = f64> + '_ {
        self.records
            .iter()
            .map(|r| r.cost)
            .filter(|c| !c.is_nan())
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<E, A> Observer<E, A> for History
where
    E: HasIteration + HasObjective + HasEdm,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(Record {
            iteration: event.iteration(),
            cost: event.objective(),
            edm: event.edm(),
        });
        None
    }
}

/// Allows `&mut History` to be passed to solvers that take an observer by
/// value, so the history can be read after the run.
impl<E, A> Observer<E, A> for &mut History
where
    E: HasIteration + HasObjective + HasEdm,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fitkit_core::ParameterSet;
    use fitkit_models::{DataPoint, LeastSquares, Polynomial};
    use fitkit_solvers::optimization::quasi_newton::{Config, Status, minimize};

    #[test]
    fn records_every_event_of_a_fit() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)].map(DataPoint::from);
        let objective = LeastSquares::new(Polynomial::new(1), points);
        let mut params = ParameterSet::new();
        params.add("a", 0.0, 0.1).unwrap();
        params.add("b", 0.0, 0.1).unwrap();

        let mut history = History::new();
        let min = minimize(&objective, &params, &Config::default(), &mut history).unwrap();

        assert_eq!(min.status, Status::Converged);
        assert_eq!(history.costs().count(), min.iters);

        // The final event is the Hessian check that confirmed convergence.
        let last = history.last().unwrap();
        assert_eq!(last.iteration, min.iters);
        assert!(last.cost.is_nan());
        assert_eq!(last.edm, min.edm);

        let costs: Vec<f64> = history.costs().collect();
        assert!(costs.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn starts_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.last(), None);
    }
}
