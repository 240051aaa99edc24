use std::collections::HashSet;

use thiserror::Error;

/// Optional lower and upper limits recorded for a parameter.
///
/// Limits are validated against the starting value but are not enforced
/// during minimization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    /// No limits on either side.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if `value` satisfies every limit that is set.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo) && self.upper.is_none_or(|hi| value <= hi)
    }
}

/// A named free parameter with its starting value and step size.
///
/// The step size sets the scale of finite-difference perturbations and of the
/// initial inverse-Hessian approximation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: f64,
    step: f64,
    bounds: Bounds,
}

impl Parameter {
    /// Creates an unbounded parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite or `step` is not finite and
    /// strictly positive.
    pub fn new(name: impl Into<String>, value: f64, step: f64) -> Result<Self, ParameterError> {
        Self::with_bounds(name, value, step, Bounds::none())
    }

    /// Creates a parameter with recorded limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the value or step is invalid, if a limit is not
    /// finite, if `lower >= upper`, or if `value` lies outside the limits.
    pub fn with_bounds(
        name: impl Into<String>,
        value: f64,
        step: f64,
        bounds: Bounds,
    ) -> Result<Self, ParameterError> {
        let name = name.into();

        if !value.is_finite() {
            return Err(ParameterError::Value { name, value });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(ParameterError::Step { name, step });
        }

        let finite = |limit: Option<f64>| limit.is_none_or(f64::is_finite);
        let ordered = match (bounds.lower, bounds.upper) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => true,
        };
        if !finite(bounds.lower) || !finite(bounds.upper) || !ordered {
            return Err(ParameterError::Bounds { name });
        }
        if !bounds.contains(value) {
            return Err(ParameterError::OutOfBounds { name, value });
        }

        Ok(Self {
            name,
            value,
            step,
            bounds,
        })
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The starting value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The step size.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// The recorded limits.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Errors that can occur when building parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("parameter `{name}` has non-finite starting value {value}")]
    Value { name: String, value: f64 },

    #[error("parameter `{name}` step must be finite and positive, got {step}")]
    Step { name: String, step: f64 },

    #[error("parameter `{name}` limits must be finite with lower < upper")]
    Bounds { name: String },

    #[error("parameter `{name}` starting value {value} is outside its limits")]
    OutOfBounds { name: String, value: f64 },

    #[error("duplicate parameter name `{0}`")]
    DuplicateName(String),
}

/// An ordered set of uniquely named parameters.
///
/// Position in the set is the index solvers and objectives use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unbounded parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is invalid or its name is taken.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: f64,
        step: f64,
    ) -> Result<&mut Self, ParameterError> {
        self.push(Parameter::new(name, value, step)?)
    }

    /// Appends an already constructed parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::DuplicateName`] if the name is taken.
    pub fn push(&mut self, param: Parameter) -> Result<&mut Self, ParameterError> {
        if self.index_of(param.name()).is_some() {
            return Err(ParameterError::DuplicateName(param.name));
        }
        self.params.push(param);
        Ok(self)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the set has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the position of the parameter called `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name() == name)
    }

    /// Iterates over the parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// The starting values in order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(Parameter::value).collect()
    }

    /// The step sizes in order.
    #[must_use]
    pub fn steps(&self) -> Vec<f64> {
        self.params.iter().map(Parameter::step).collect()
    }

    /// The names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }
}

impl TryFrom<Vec<Parameter>> for ParameterSet {
    type Error = ParameterError;

    fn try_from(params: Vec<Parameter>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(params.len());
        for param in &params {
            if !seen.insert(param.name()) {
                return Err(ParameterError::DuplicateName(param.name.clone()));
            }
        }
        Ok(Self { params })
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn builds_ordered_set() {
        let mut set = ParameterSet::new();
        set.add("p0", 0.0, 0.1)
            .unwrap()
            .add("p1", 1.0, 0.2)
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["p0", "p1"]);
        assert_eq!(set.values(), vec![0.0, 1.0]);
        assert_relative_eq!(set.steps()[1], 0.2);
        assert_eq!(set.index_of("p1"), Some(1));
        assert_eq!(set.index_of("p2"), None);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut set = ParameterSet::new();
        set.add("a", 0.0, 0.1).unwrap();

        let err = set.add("a", 1.0, 0.1).unwrap_err();
        assert_eq!(err, ParameterError::DuplicateName("a".into()));
        assert_eq!(set.len(), 1);

        let params = vec![
            Parameter::new("b", 0.0, 1.0).unwrap(),
            Parameter::new("b", 1.0, 1.0).unwrap(),
        ];
        assert!(matches!(
            ParameterSet::try_from(params),
            Err(ParameterError::DuplicateName(_))
        ));
    }

    #[test]
    fn rejects_bad_step() {
        assert!(matches!(
            Parameter::new("a", 0.0, 0.0),
            Err(ParameterError::Step { .. })
        ));
        assert!(matches!(
            Parameter::new("a", 0.0, -1.0),
            Err(ParameterError::Step { .. })
        ));
        assert!(matches!(
            Parameter::new("a", 0.0, f64::NAN),
            Err(ParameterError::Step { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_value() {
        assert!(matches!(
            Parameter::new("a", f64::INFINITY, 0.1),
            Err(ParameterError::Value { .. })
        ));
    }

    #[test]
    fn validates_bounds() {
        let bounds = Bounds {
            lower: Some(0.0),
            upper: Some(1.0),
        };
        let param = Parameter::with_bounds("a", 0.5, 0.1, bounds).unwrap();
        assert_eq!(param.bounds(), bounds);

        assert!(matches!(
            Parameter::with_bounds("a", 2.0, 0.1, bounds),
            Err(ParameterError::OutOfBounds { .. })
        ));

        let inverted = Bounds {
            lower: Some(1.0),
            upper: Some(0.0),
        };
        assert!(matches!(
            Parameter::with_bounds("a", 0.5, 0.1, inverted),
            Err(ParameterError::Bounds { .. })
        ));

        let lower_only = Bounds {
            lower: Some(0.0),
            upper: None,
        };
        assert!(Parameter::with_bounds("a", 10.0, 0.1, lower_only).is_ok());
    }
}
