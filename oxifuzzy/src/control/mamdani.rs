use super::{Antecedent, Consequent, ControlError, Rule, RuleError, RuleFiring};
use crate::defuzzification::{Defuzzifier, Defuzzify};
use crate::membership::Membership;
use crate::norms::{BinaryOperator, Operators, UnaryOperator};
use crate::sets::FuzzySet;

use tracing::{debug, trace};

use std::fmt;
use std::sync::Arc;

/// A fuzzy controller with fuzzy consequents.
///
/// Each rule implies a fuzzy set over the output domain. The implied
/// sets of every fired rule are aggregated, in rule order, and the
/// result is defuzzified into one crisp output.
///
/// The first rule added fixes the number of inputs of the controller.
/// Rules are only ever appended.
#[derive(Clone)]
pub struct Controller {
    domain: Box<[f64]>,
    rules: Vec<Rule>,
    input_count: Option<usize>,
    operators: Operators,
    defuzzifier: Arc<dyn Defuzzify>,
}

/// The classic name of a [`Controller`].
pub type Mamdani = Controller;

impl Controller {
    /// Creates a controller with no rules over the output `domain`,
    /// using [`Operators::mamdani`] and centroid defuzzification.
    pub fn new(domain: impl Into<Box<[f64]>>) -> Controller {
        Self::with_operators(domain, Operators::mamdani(), Defuzzifier::Centroid)
    }

    /// Creates a controller with no rules, the given operators
    /// and defuzzification method.
    pub fn with_operators(
        domain: impl Into<Box<[f64]>>,
        operators: Operators,
        defuzzifier: impl Defuzzify + 'static,
    ) -> Controller {
        Controller {
            domain: domain.into(),
            rules: vec![],
            input_count: None,
            operators,
            defuzzifier: Arc::new(defuzzifier),
        }
    }

    fn prepare_rule(
        &self,
        input_count: Option<usize>,
        antecedent: Antecedent,
        consequent: Consequent,
    ) -> Result<Rule, RuleError> {
        antecedent.validate()?;
        if let Some(expected) = input_count {
            if antecedent.arity() != expected {
                return Err(RuleError::ArityMismatch {
                    expected,
                    found: antecedent.arity(),
                });
            }
        }
        let consequent = consequent.resolve(&self.domain)?;
        Ok(Rule::new(antecedent, consequent))
    }

    fn append_rules(&mut self, rules: Vec<Rule>) {
        for rule in rules {
            self.input_count = self.input_count.or(Some(rule.antecedent().arity()));
            debug!(
                index = self.rules.len(),
                inputs = rule.antecedent().arity(),
                "rule added"
            );
            self.rules.push(rule);
        }
    }

    /// Adds a decision rule.
    ///
    /// A membership consequent is sampled over the output domain once,
    /// here; a fuzzy set consequent must already match the domain.
    ///
    /// # Errors
    /// Fails, leaving the controller untouched, if the antecedent is empty,
    /// if its length differs from the previous rules', or if a fuzzy set
    /// consequent has the wrong length.
    pub fn add_rule(
        &mut self,
        antecedent: impl Into<Antecedent>,
        consequent: impl Into<Consequent>,
    ) -> Result<(), RuleError> {
        let rule = self.prepare_rule(self.input_count, antecedent.into(), consequent.into())?;
        self.append_rules(vec![rule]);
        Ok(())
    }

    /// Adds several rules. Either all of them are added or none is.
    pub fn add_rules<A, C, I>(&mut self, rules: I) -> Result<(), RuleError>
    where
        A: Into<Antecedent>,
        C: Into<Consequent>,
        I: IntoIterator<Item = (A, C)>,
    {
        let mut input_count = self.input_count;
        let mut prepared = vec![];
        for (antecedent, consequent) in rules {
            let rule = self.prepare_rule(input_count, antecedent.into(), consequent.into())?;
            input_count = input_count.or(Some(rule.antecedent().arity()));
            prepared.push(rule);
        }
        self.append_rules(prepared);
        Ok(())
    }

    /// Adds the rules of a two-input decision table.
    ///
    /// Cell `table[i][j]` is the consequent of the rule
    /// `rows[i] and cols[j]`; `None` cells add no rule. Rules are
    /// added row by row. Either the whole table is added or none of it.
    ///
    /// # Errors
    /// Fails if the table is not `rows.len()` by `cols.len()`, or
    /// for any reason [`add_rule`] would.
    ///
    /// [`add_rule`]: Controller::add_rule
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::control::Controller;
    /// use oxifuzzy::membership::flat_saw;
    /// use oxifuzzy::sets::linspace;
    ///
    /// let x = flat_saw((-1.0, 1.0), 2).unwrap();
    /// let y = flat_saw((-1.0, 1.0), 2).unwrap();
    /// let out = flat_saw((-1.0, 1.0), 3).unwrap();
    ///
    /// let mut controller = Controller::new(linspace(-1.0, 1.0, 101));
    /// controller.add_table(&x, &y, &[
    ///     vec![Some(out[0].clone()), Some(out[1].clone())],
    ///     vec![None, Some(out[2].clone())],
    /// ]).unwrap();
    /// assert_eq!(controller.rules().len(), 3);
    /// ```
    pub fn add_table<C>(
        &mut self,
        rows: &[Membership],
        cols: &[Membership],
        table: &[Vec<Option<C>>],
    ) -> Result<(), RuleError>
    where
        C: Clone + Into<Consequent>,
    {
        if table.len() != rows.len() {
            return Err(RuleError::TableRows {
                expected: rows.len(),
                found: table.len(),
            });
        }
        let mut cells: Vec<(Vec<Membership>, Consequent)> = vec![];
        for (i, (row_mf, row)) in rows.iter().zip(table).enumerate() {
            if row.len() != cols.len() {
                return Err(RuleError::TableShape {
                    row: i,
                    expected: cols.len(),
                    found: row.len(),
                });
            }
            for (col_mf, cell) in cols.iter().zip(row) {
                if let Some(consequent) = cell {
                    cells.push((
                        vec![row_mf.clone(), col_mf.clone()],
                        consequent.clone().into(),
                    ));
                }
            }
        }
        self.add_rules(cells)
    }

    /// Replaces the t-norm used to combine antecedent degrees.
    pub fn set_norm(&mut self, norm: impl BinaryOperator + 'static) {
        self.operators.norm = Arc::new(norm);
        debug!(norm = self.operators.norm.name(), "norm replaced");
    }

    pub fn set_conorm(&mut self, conorm: impl BinaryOperator + 'static) {
        self.operators.conorm = Arc::new(conorm);
        debug!(conorm = self.operators.conorm.name(), "conorm replaced");
    }

    pub fn set_negation(&mut self, negation: impl UnaryOperator + 'static) {
        self.operators.negation = Arc::new(negation);
        debug!(negation = self.operators.negation.name(), "negation replaced");
    }

    /// Replaces the implication applied to rule consequents.
    pub fn set_implication(&mut self, implication: impl BinaryOperator + 'static) {
        self.operators.implication = Arc::new(implication);
        debug!(
            implication = self.operators.implication.name(),
            "implication replaced"
        );
    }

    /// Replaces the aggregation of implied sets.
    pub fn set_aggregation(&mut self, aggregation: impl BinaryOperator + 'static) {
        self.operators.aggregation = Arc::new(aggregation);
        debug!(
            aggregation = self.operators.aggregation.name(),
            "aggregation replaced"
        );
    }

    /// Replaces the whole operator bundle.
    pub fn set_operators(&mut self, operators: Operators) {
        debug!(operators = ?operators, "operators replaced");
        self.operators = operators;
    }

    pub fn set_defuzzifier(&mut self, defuzzifier: impl Defuzzify + 'static) {
        self.defuzzifier = Arc::new(defuzzifier);
        debug!(
            defuzzifier = self.defuzzifier.name(),
            "defuzzifier replaced"
        );
    }

    pub fn operators(&self) -> &Operators {
        &self.operators
    }

    pub fn defuzzifier(&self) -> &dyn Defuzzify {
        &*self.defuzzifier
    }

    /// Returns the rules in the order they were added.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn output_domain(&self) -> &[f64] {
        &self.domain
    }

    /// Returns the number of inputs, or `None` if no rule was added yet.
    pub fn input_count(&self) -> Option<usize> {
        self.input_count
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<(), ControlError> {
        match self.input_count {
            Some(expected) if expected != inputs.len() => Err(ControlError::InputCount {
                expected,
                found: inputs.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Evaluates a single rule with this controller's operators.
    ///
    /// A rule whose firing strength is exactly 0 skips the implication
    /// and reports no implied set.
    pub fn evaluate_rule(&self, rule: &Rule, inputs: &[f64]) -> Result<RuleFiring, ControlError> {
        if inputs.len() != rule.antecedent().arity() {
            return Err(ControlError::InputCount {
                expected: rule.antecedent().arity(),
                found: inputs.len(),
            });
        }
        if rule.consequent().len() != self.domain.len() {
            return Err(RuleError::ConsequentLength {
                expected: self.domain.len(),
                found: rule.consequent().len(),
            }
            .into());
        }
        let strength = rule.antecedent().strength(inputs, &*self.operators.norm);
        if strength == 0.0 {
            return Ok(RuleFiring {
                strength,
                implied: None,
            });
        }
        Ok(RuleFiring {
            strength,
            implied: Some(
                rule.consequent()
                    .implied_by(strength, &*self.operators.implication),
            ),
        })
    }

    /// Evaluates the rule at `index` in the rule base.
    pub fn evaluate_rule_at(&self, index: usize, inputs: &[f64]) -> Result<RuleFiring, ControlError> {
        let rule = self.rules.get(index).ok_or(ControlError::RuleIndex {
            index,
            count: self.rules.len(),
        })?;
        self.evaluate_rule(rule, inputs)
    }

    fn aggregate(&self, inputs: &[f64]) -> Result<(FuzzySet, usize), ControlError> {
        self.check_inputs(inputs)?;
        let mut output = FuzzySet::zeros(self.domain.len());
        let mut fired = 0;
        for (index, rule) in self.rules.iter().enumerate() {
            let firing = self.evaluate_rule(rule, inputs)?;
            if let Some(implied) = firing.implied {
                trace!(rule = index, strength = firing.strength, "rule fired");
                output = output.combine(&implied, &*self.operators.aggregation)?;
                fired += 1;
            }
        }
        trace!(fired, height = output.height(), "rules aggregated");
        Ok((output, fired))
    }

    /// Evaluates every rule and aggregates the implied sets,
    /// starting from an all-zero set, in rule order.
    ///
    /// # Errors
    /// Fails if the number of inputs is wrong.
    pub fn evaluate_all(&self, inputs: &[f64]) -> Result<FuzzySet, ControlError> {
        self.aggregate(inputs).map(|(output, _)| output)
    }

    /// Computes the crisp response of the controller to `inputs`.
    ///
    /// Returns NaN if no rule fired.
    ///
    /// # Errors
    /// Fails if the number of inputs is wrong.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::control::Controller;
    /// use oxifuzzy::membership::Membership;
    /// use oxifuzzy::sets::linspace;
    ///
    /// let mut controller = Controller::new(linspace(0.0, 10.0, 101));
    /// controller.add_rule(
    ///     vec![Membership::triangle(0.0, 1.0, 2.0).unwrap()],
    ///     Membership::triangle(4.0, 5.0, 6.0).unwrap(),
    /// ).unwrap();
    ///
    /// assert!((controller.evaluate(&[1.0]).unwrap() - 5.0).abs() < 1e-9);
    /// assert!(controller.evaluate(&[7.0]).unwrap().is_nan());
    /// ```
    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64, ControlError> {
        let (output, fired) = self.aggregate(inputs)?;
        if fired == 0 {
            return Ok(f64::NAN);
        }
        Ok(self.defuzzifier.defuzzify(output.values(), &self.domain))
    }

    /// Like [`evaluate`], but fails with [`ControlError::NoRuleFired`]
    /// instead of returning NaN.
    ///
    /// [`evaluate`]: Controller::evaluate
    pub fn evaluate_checked(&self, inputs: &[f64]) -> Result<f64, ControlError> {
        let (output, fired) = self.aggregate(inputs)?;
        if fired == 0 {
            return Err(ControlError::NoRuleFired);
        }
        Ok(self.defuzzifier.defuzzify(output.values(), &self.domain))
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("domain_len", &self.domain.len())
            .field("rules", &self.rules.len())
            .field("input_count", &self.input_count)
            .field("operators", &self.operators)
            .field("defuzzifier", &self.defuzzifier.name())
            .finish()
    }
}
