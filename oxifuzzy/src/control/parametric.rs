use super::{Antecedent, ControlError, ParametricRule, RuleError};
use crate::norms::{BinaryOperator, Operators};

use tracing::{debug, trace};

/// A fuzzy controller with linear consequents.
///
/// Every rule computes a linear function of the crisp inputs, and the
/// response of the controller is the average of those functions weighted
/// by the firing strength of each rule. There is no output domain and
/// no defuzzification.
#[derive(Clone, Debug)]
pub struct Parametric {
    rules: Vec<ParametricRule>,
    input_count: Option<usize>,
    operators: Operators,
}

/// The classic name of a [`Parametric`] controller.
pub type Sugeno = Parametric;

impl Parametric {
    /// Creates a controller with no rules, using [`Operators::probabilistic`].
    pub fn new() -> Parametric {
        Self::with_operators(Operators::probabilistic())
    }

    /// Creates a controller with no rules and the given operators.
    /// Only the t-norm takes part in evaluation.
    pub fn with_operators(operators: Operators) -> Parametric {
        Parametric {
            rules: vec![],
            input_count: None,
            operators,
        }
    }

    /// Adds a decision rule with response `a0 + a1·x1 + ... + an·xn`,
    /// where `coefficients` is `[a0, a1, ..., an]`.
    ///
    /// # Errors
    /// Fails if the antecedent is empty or has a different length than
    /// the previous rules', or if there is not one coefficient per input
    /// plus the bias.
    pub fn add_rule(
        &mut self,
        antecedent: impl Into<Antecedent>,
        coefficients: impl Into<Box<[f64]>>,
    ) -> Result<(), RuleError> {
        self.push_rule(ParametricRule::new(antecedent, coefficients)?)
    }

    /// Adds an already built rule.
    pub fn push_rule(&mut self, rule: ParametricRule) -> Result<(), RuleError> {
        let arity = rule.antecedent().arity();
        match self.input_count {
            Some(expected) if expected != arity => {
                return Err(RuleError::ArityMismatch {
                    expected,
                    found: arity,
                })
            }
            Some(_) => {}
            None => self.input_count = Some(arity),
        }
        debug!(index = self.rules.len(), inputs = arity, "parametric rule added");
        self.rules.push(rule);
        Ok(())
    }

    pub fn set_norm(&mut self, norm: impl BinaryOperator + 'static) {
        self.operators = self.operators.clone().with_norm(norm);
        debug!(norm = self.operators.norm.name(), "norm replaced");
    }

    pub fn set_operators(&mut self, operators: Operators) {
        debug!(operators = ?operators, "operators replaced");
        self.operators = operators;
    }

    pub fn operators(&self) -> &Operators {
        &self.operators
    }

    pub fn rules(&self) -> &[ParametricRule] {
        &self.rules
    }

    pub fn input_count(&self) -> Option<usize> {
        self.input_count
    }

    /// Evaluates a single rule, returning its firing strength and
    /// linear response, or `(0.0, 0.0)` if the strength is not positive.
    pub fn evaluate_rule(
        &self,
        rule: &ParametricRule,
        inputs: &[f64],
    ) -> Result<(f64, f64), ControlError> {
        let arity = rule.antecedent().arity();
        if inputs.len() != arity {
            return Err(ControlError::InputCount {
                expected: arity,
                found: inputs.len(),
            });
        }
        let strength = rule.antecedent().strength(inputs, &*self.operators.norm);
        if strength > 0.0 {
            Ok((strength, rule.response(inputs)))
        } else {
            Ok((0.0, 0.0))
        }
    }

    /// Evaluates the rule at `index` in the rule base.
    pub fn evaluate_rule_at(&self, index: usize, inputs: &[f64]) -> Result<(f64, f64), ControlError> {
        let rule = self.rules.get(index).ok_or(ControlError::RuleIndex {
            index,
            count: self.rules.len(),
        })?;
        self.evaluate_rule(rule, inputs)
    }

    fn weighted_sums(&self, inputs: &[f64]) -> Result<(f64, f64), ControlError> {
        if let Some(expected) = self.input_count {
            if expected != inputs.len() {
                return Err(ControlError::InputCount {
                    expected,
                    found: inputs.len(),
                });
            }
        }
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (index, rule) in self.rules.iter().enumerate() {
            let (strength, response) = self.evaluate_rule(rule, inputs)?;
            if strength > 0.0 {
                trace!(rule = index, strength, response, "rule fired");
            }
            weighted += strength * response;
            total += strength;
        }
        Ok((weighted, total))
    }

    /// Computes the crisp response of the controller to `inputs`,
    /// `Σ(strength·response) / Σ strength`.
    ///
    /// Returns NaN if no rule fired.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::control::Parametric;
    /// use oxifuzzy::membership::Membership;
    ///
    /// let mut controller = Parametric::new();
    /// controller.add_rule(vec![Membership::decreasing_ramp(0.0, 1.0).unwrap()], vec![-1.0, 0.0]).unwrap();
    /// controller.add_rule(vec![Membership::increasing_ramp(0.0, 1.0).unwrap()], vec![1.0, 0.0]).unwrap();
    ///
    /// assert_eq!(controller.evaluate(&[0.5]).unwrap(), 0.0);
    /// assert_eq!(controller.evaluate(&[0.75]).unwrap(), 0.5);
    /// ```
    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64, ControlError> {
        let (weighted, total) = self.weighted_sums(inputs)?;
        if total == 0.0 {
            return Ok(f64::NAN);
        }
        Ok(weighted / total)
    }

    /// Like [`evaluate`], but fails with [`ControlError::NoRuleFired`]
    /// instead of returning NaN.
    ///
    /// [`evaluate`]: Parametric::evaluate
    pub fn evaluate_checked(&self, inputs: &[f64]) -> Result<f64, ControlError> {
        let (weighted, total) = self.weighted_sums(inputs)?;
        if total == 0.0 {
            return Err(ControlError::NoRuleFired);
        }
        Ok(weighted / total)
    }
}

impl Default for Parametric {
    fn default() -> Parametric {
        Parametric::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::Membership;
    use crate::norms::TNorm;

    #[test]
    fn pass_through() {
        let mut controller = Parametric::new();
        controller
            .add_rule(vec![Membership::custom(|_| 1.0)], vec![0.0, 1.0])
            .unwrap();
        for x in -20..=20 {
            let x = x as f64 * 0.37;
            assert_eq!(controller.evaluate(&[x]).unwrap(), x);
        }
    }

    #[test]
    fn weighted_average() {
        let mut controller = Parametric::new();
        controller
            .add_rule(vec![Membership::custom(|_| 0.25)], vec![4.0, 0.0])
            .unwrap();
        controller
            .add_rule(vec![Membership::custom(|_| 0.75)], vec![8.0, 0.0])
            .unwrap();
        assert_eq!(controller.evaluate(&[0.0]).unwrap(), 7.0);
        assert_eq!(controller.evaluate_rule_at(1, &[0.0]), Ok((0.75, 8.0)));
    }

    #[test]
    fn nothing_fired() {
        let mut controller = Parametric::default();
        controller
            .add_rule(vec![Membership::triangle(0.0, 1.0, 2.0).unwrap()], vec![3.0, 1.0])
            .unwrap();
        controller
            .add_rule(vec![Membership::triangle(1.0, 2.0, 3.0).unwrap()], vec![-3.0, 1.0])
            .unwrap();
        assert!(controller.evaluate(&[10.0]).unwrap().is_nan());
        assert_eq!(
            controller.evaluate_checked(&[10.0]),
            Err(ControlError::NoRuleFired)
        );
        assert_eq!(controller.evaluate_rule_at(0, &[10.0]), Ok((0.0, 0.0)));
    }

    #[test]
    fn two_inputs_and_norms() {
        let mut controller = Parametric::new();
        let low = Membership::decreasing_ramp(0.0, 1.0).unwrap();
        controller
            .add_rule(vec![low.clone(), low.clone()], vec![1.0, 1.0, 1.0])
            .unwrap();

        // Probabilistic and: 0.5 · 0.5.
        assert_eq!(controller.evaluate_rule_at(0, &[0.5, 0.5]), Ok((0.25, 2.0)));
        controller.set_norm(TNorm::Zadeh);
        assert_eq!(controller.evaluate_rule_at(0, &[0.5, 0.5]), Ok((0.5, 2.0)));
        assert_eq!(controller.operators().norm.name(), "zadeh and");
        controller.set_operators(Operators::probabilistic());
        assert_eq!(controller.evaluate_rule_at(0, &[0.5, 0.5]), Ok((0.25, 2.0)));
    }

    #[test]
    fn validation() {
        let mf = Membership::gaussian(0.0, 1.0).unwrap();
        let mut controller = Parametric::new();
        assert_eq!(
            controller.add_rule(vec![mf.clone()], vec![1.0, 2.0, 3.0]),
            Err(RuleError::CoefficientCount {
                expected: 2,
                found: 3
            })
        );
        controller.add_rule(vec![mf.clone()], vec![1.0, 2.0]).unwrap();
        assert_eq!(
            controller.add_rule(vec![mf.clone(), mf.clone()], vec![1.0, 2.0, 3.0]),
            Err(RuleError::ArityMismatch {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(controller.rules().len(), 1);
        assert_eq!(
            controller.evaluate(&[1.0, 2.0]),
            Err(ControlError::InputCount {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            controller.evaluate_rule_at(3, &[1.0]),
            Err(ControlError::RuleIndex { index: 3, count: 1 })
        );
    }
}
