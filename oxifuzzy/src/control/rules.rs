use super::RuleError;
use crate::membership::Membership;
use crate::norms::BinaryOperator;
use crate::sets::FuzzySet;

use serde::{Deserialize, Serialize};

/// The condition of a decision rule: one optional membership
/// function per controller input.
///
/// Entry `i` is applied to input `i`; `None` entries ignore
/// their input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Antecedent(Vec<Option<Membership>>);

impl Antecedent {
    pub fn new(terms: Vec<Option<Membership>>) -> Antecedent {
        Antecedent(terms)
    }

    /// The number of inputs the antecedent expects, `None` entries included.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn terms(&self) -> &[Option<Membership>] {
        &self.0
    }

    /// Returns the firing strength of the antecedent for `inputs`.
    ///
    /// The degrees of the `Some` entries are folded left to right with
    /// `norm`, seeded with the first degree; `((d0 ∧ d1) ∧ d2) ∧ ...`.
    /// An antecedent with no `Some` entry has strength 0.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::control::Antecedent;
    /// use oxifuzzy::membership::Membership;
    /// use oxifuzzy::norms::TNorm;
    ///
    /// let antecedent = Antecedent::new(vec![
    ///     Some(Membership::increasing_ramp(0.0, 1.0).unwrap()),
    ///     None,
    ///     Some(Membership::decreasing_ramp(0.0, 1.0).unwrap()),
    /// ]);
    /// assert_eq!(antecedent.strength(&[0.75, 42.0, 0.5], &TNorm::Zadeh), 0.5);
    /// ```
    pub fn strength<O>(&self, inputs: &[f64], norm: &O) -> f64
    where
        O: BinaryOperator + ?Sized,
    {
        self.0
            .iter()
            .zip(inputs)
            .filter_map(|(mf, x)| mf.as_ref().map(|mf| mf.degree(*x)))
            .reduce(|acc, degree| norm.apply(acc, degree))
            .unwrap_or(0.0)
    }

    pub(super) fn validate(&self) -> Result<(), RuleError> {
        if self.0.iter().any(Option::is_some) {
            Ok(())
        } else {
            Err(RuleError::EmptyAntecedent)
        }
    }
}

impl From<Vec<Option<Membership>>> for Antecedent {
    fn from(terms: Vec<Option<Membership>>) -> Antecedent {
        Antecedent(terms)
    }
}

impl From<Vec<Membership>> for Antecedent {
    fn from(terms: Vec<Membership>) -> Antecedent {
        Antecedent(terms.into_iter().map(Some).collect())
    }
}

/// The conclusion of a decision rule, before it is bound
/// to a controller's output domain.
#[derive(Clone, Debug, PartialEq)]
pub enum Consequent {
    /// A membership function, sampled over the output domain when the rule is added.
    Membership(Membership),
    /// A set already sampled over the output domain.
    Set(FuzzySet),
}

impl Consequent {
    /// Resolves the consequent into a fuzzy set over `domain`.
    pub fn resolve(self, domain: &[f64]) -> Result<FuzzySet, RuleError> {
        match self {
            Consequent::Membership(mf) => Ok(mf.fuzzify(domain)),
            Consequent::Set(set) if set.len() == domain.len() => Ok(set),
            Consequent::Set(set) => Err(RuleError::ConsequentLength {
                expected: domain.len(),
                found: set.len(),
            }),
        }
    }
}

impl From<Membership> for Consequent {
    fn from(mf: Membership) -> Consequent {
        Consequent::Membership(mf)
    }
}

impl From<FuzzySet> for Consequent {
    fn from(set: FuzzySet) -> Consequent {
        Consequent::Set(set)
    }
}

/// A decision rule of a [`Controller`](super::Controller), with its
/// consequent sampled over the controller's output domain.
///
/// Rules are built by [`Controller::add_rule`](super::Controller::add_rule),
/// which checks them against the controller. A deserialized rule must
/// still have a non-empty antecedent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleFields")]
pub struct Rule {
    antecedent: Antecedent,
    consequent: FuzzySet,
}

#[derive(Deserialize)]
struct RuleFields {
    antecedent: Antecedent,
    consequent: FuzzySet,
}

impl TryFrom<RuleFields> for Rule {
    type Error = RuleError;

    fn try_from(fields: RuleFields) -> Result<Rule, RuleError> {
        fields.antecedent.validate()?;
        Ok(Rule::new(fields.antecedent, fields.consequent))
    }
}

impl Rule {
    /// Pairs an antecedent with a consequent already sampled over the
    /// output domain. Unchecked; callers validate both.
    pub(crate) fn new(antecedent: Antecedent, consequent: FuzzySet) -> Rule {
        Rule {
            antecedent,
            consequent,
        }
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequent(&self) -> &FuzzySet {
        &self.consequent
    }
}

/// The result of evaluating one rule.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleFiring {
    /// The firing strength of the antecedent.
    pub strength: f64,
    /// The implied output set; `None` when the strength is exactly 0.
    pub implied: Option<FuzzySet>,
}

impl RuleFiring {
    /// Whether the rule contributed to the output.
    pub fn fired(&self) -> bool {
        self.implied.is_some()
    }
}

/// A decision rule of a [`Parametric`](super::Parametric) controller:
/// an antecedent and the coefficients `a0, a1, ..., an` of the linear
/// response `a0 + a1·x1 + ... + an·xn`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParametricRuleFields")]
pub struct ParametricRule {
    antecedent: Antecedent,
    coefficients: Box<[f64]>,
}

#[derive(Deserialize)]
struct ParametricRuleFields {
    antecedent: Antecedent,
    coefficients: Box<[f64]>,
}

impl TryFrom<ParametricRuleFields> for ParametricRule {
    type Error = RuleError;

    fn try_from(fields: ParametricRuleFields) -> Result<ParametricRule, RuleError> {
        ParametricRule::new(fields.antecedent, fields.coefficients)
    }
}

impl ParametricRule {
    /// Creates a new rule.
    ///
    /// # Errors
    /// Fails if the antecedent has no membership function, or if there
    /// is not exactly one coefficient per antecedent entry plus a bias.
    pub fn new(
        antecedent: impl Into<Antecedent>,
        coefficients: impl Into<Box<[f64]>>,
    ) -> Result<ParametricRule, RuleError> {
        let antecedent = antecedent.into();
        let coefficients = coefficients.into();
        antecedent.validate()?;
        if coefficients.len() != antecedent.arity() + 1 {
            return Err(RuleError::CoefficientCount {
                expected: antecedent.arity() + 1,
                found: coefficients.len(),
            });
        }
        Ok(ParametricRule {
            antecedent,
            coefficients,
        })
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns the linear response `a0 + Σ ai·xi` for `inputs`.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::control::ParametricRule;
    /// use oxifuzzy::membership::Membership;
    ///
    /// let rule = ParametricRule::new(
    ///     vec![Membership::gaussian(0.0, 1.0).unwrap(), Membership::gaussian(0.0, 1.0).unwrap()],
    ///     vec![1.0, 2.0, -1.0],
    /// ).unwrap();
    /// assert_eq!(rule.response(&[3.0, 4.0]), 3.0);
    /// ```
    pub fn response(&self, inputs: &[f64]) -> f64 {
        self.coefficients[1..]
            .iter()
            .zip(inputs)
            .fold(self.coefficients[0], |acc, (a, x)| acc + a * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norms::TNorm;

    fn constant(degree: f64) -> Membership {
        Membership::custom(move |_| degree)
    }

    #[test]
    fn strength_skips_missing_terms() {
        let antecedent = Antecedent::new(vec![None, Some(constant(0.25)), None]);
        assert_eq!(antecedent.strength(&[1.0, 2.0, 3.0], &TNorm::Zadeh), 0.25);
        assert_eq!(Antecedent::new(vec![None]).strength(&[1.0], &TNorm::Zadeh), 0.0);
    }

    #[test]
    fn strength_folds_left_to_right() {
        let antecedent = Antecedent::from(vec![constant(0.9), constant(0.5), constant(0.25)]);
        let difference = |x: f64, y: f64| x - y;
        assert_eq!(
            antecedent.strength(&[0.0, 0.0, 0.0], &difference),
            (0.9 - 0.5) - 0.25
        );
        assert_ne!(
            antecedent.strength(&[0.0, 0.0, 0.0], &difference),
            0.9 - (0.5 - 0.25)
        );
    }

    #[test]
    fn validation() {
        assert_eq!(
            Antecedent::new(vec![None, None]).validate(),
            Err(RuleError::EmptyAntecedent)
        );
        assert_eq!(Antecedent::new(vec![]).validate(), Err(RuleError::EmptyAntecedent));
        assert!(Antecedent::from(vec![constant(1.0)]).validate().is_ok());
    }

    #[test]
    fn consequent_resolution() {
        let domain = [0.0, 1.0, 2.0];
        let mf = Membership::triangle(0.0, 1.0, 2.0).unwrap();
        assert_eq!(
            Consequent::from(mf).resolve(&domain).unwrap().values(),
            &[0.0, 1.0, 0.0]
        );
        let set = FuzzySet::new(vec![0.5; 3]);
        assert_eq!(Consequent::from(set.clone()).resolve(&domain), Ok(set));
        assert_eq!(
            Consequent::from(FuzzySet::zeros(2)).resolve(&domain),
            Err(RuleError::ConsequentLength {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn parametric_rule() {
        let rule = ParametricRule::new(vec![constant(1.0)], vec![0.5, 2.0]).unwrap();
        for x in -20..=20 {
            let x = x as f64 / 4.0;
            assert_eq!(rule.response(&[x]), 0.5 + 2.0 * x);
        }
        assert_eq!(
            ParametricRule::new(vec![constant(1.0)], vec![0.5]),
            Err(RuleError::CoefficientCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            ParametricRule::new(Antecedent::new(vec![None]), vec![0.0, 1.0]),
            Err(RuleError::EmptyAntecedent)
        );
    }

    #[test]
    fn deserialized_rules_are_validated() {
        let triangle = Membership::triangle(0.0, 1.0, 2.0).unwrap();
        let rule = ParametricRule::new(vec![triangle.clone()], vec![0.5, 2.0]).unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(serde_json::from_str::<ParametricRule>(&json).unwrap(), rule);

        assert!(serde_json::from_str::<ParametricRule>(
            r#"{"antecedent":[null],"coefficients":[]}"#
        )
        .is_err());
        let too_few = json.replace("[0.5,2.0]", "[0.5]");
        assert!(serde_json::from_str::<ParametricRule>(&too_few).is_err());

        let rule = Rule::new(Antecedent::from(vec![triangle]), FuzzySet::new(vec![0.0, 1.0, 0.0]));
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(serde_json::from_str::<Rule>(&json).unwrap(), rule);
        assert!(serde_json::from_str::<Rule>(r#"{"antecedent":[null],"consequent":[0.0]}"#).is_err());
    }
}
