use super::{flat_saw, saw, Membership, MembershipError};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

/// A named variable whose values are described by labelled
/// membership functions ("negative", "near zero", ...).
///
/// Terms keep their insertion order, so [`memberships`] can be
/// fed straight into a rule table.
///
/// [`memberships`]: LinguisticVariable::memberships
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "StoredVariable")]
pub struct LinguisticVariable {
    name: String,
    labels: Vec<String>,
    memberships: Vec<Membership>,
    #[serde(skip)]
    index: HashMap<String, usize, RandomState>,
}

#[derive(Deserialize)]
struct StoredVariable {
    name: String,
    labels: Vec<String>,
    memberships: Vec<Membership>,
}

impl TryFrom<StoredVariable> for LinguisticVariable {
    type Error = MembershipError;

    fn try_from(stored: StoredVariable) -> Result<LinguisticVariable, MembershipError> {
        if stored.labels.len() != stored.memberships.len() {
            return Err(MembershipError::TermCount {
                labels: stored.labels.len(),
                memberships: stored.memberships.len(),
            });
        }
        let mut variable = LinguisticVariable::new(stored.name);
        for (label, mf) in stored.labels.into_iter().zip(stored.memberships) {
            variable.add_term(label, mf)?;
        }
        Ok(variable)
    }
}

impl LinguisticVariable {
    /// Creates a variable with no terms.
    pub fn new(name: impl Into<String>) -> LinguisticVariable {
        LinguisticVariable {
            name: name.into(),
            labels: vec![],
            memberships: vec![],
            index: HashMap::default(),
        }
    }

    /// Creates a variable whose terms partition `interval` as
    /// in [`flat_saw`], one term per label.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::membership::LinguisticVariable;
    ///
    /// let error = LinguisticVariable::flat_saw(
    ///     "error",
    ///     (-2.0, 2.0),
    ///     &["negative", "zero", "positive"],
    /// ).unwrap();
    ///
    /// assert_eq!(error.dominant_term(0.1), Some("zero"));
    /// assert_eq!(error.dominant_term(-1.5), Some("negative"));
    /// ```
    pub fn flat_saw(
        name: impl Into<String>,
        interval: (f64, f64),
        labels: &[&str],
    ) -> Result<LinguisticVariable, MembershipError> {
        Self::from_terms(name, labels, flat_saw(interval, labels.len())?)
    }

    /// Creates a variable whose terms partition `interval` as
    /// in [`saw`], one term per label.
    pub fn saw(
        name: impl Into<String>,
        interval: (f64, f64),
        labels: &[&str],
    ) -> Result<LinguisticVariable, MembershipError> {
        Self::from_terms(name, labels, saw(interval, labels.len())?)
    }

    fn from_terms(
        name: impl Into<String>,
        labels: &[&str],
        memberships: Vec<Membership>,
    ) -> Result<LinguisticVariable, MembershipError> {
        let mut variable = LinguisticVariable::new(name);
        for (label, mf) in labels.iter().zip(memberships) {
            variable.add_term(*label, mf)?;
        }
        Ok(variable)
    }

    /// Adds a term, returning the extended variable.
    pub fn with_term(
        mut self,
        label: impl Into<String>,
        mf: Membership,
    ) -> Result<LinguisticVariable, MembershipError> {
        self.add_term(label, mf)?;
        Ok(self)
    }

    /// Adds a term.
    ///
    /// # Errors
    /// Returns [`MembershipError::DuplicateTerm`] if the label is taken.
    pub fn add_term(
        &mut self,
        label: impl Into<String>,
        mf: Membership,
    ) -> Result<(), MembershipError> {
        let label = label.into();
        if self.index.contains_key(&label) {
            return Err(MembershipError::DuplicateTerm(label));
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
        self.memberships.push(mf);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the membership function labelled `label`.
    pub fn term(&self, label: &str) -> Option<&Membership> {
        self.index.get(label).map(|i| &self.memberships[*i])
    }

    /// Returns the membership functions in insertion order.
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    /// Returns the labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the degree of `x` in every term, in insertion order.
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        self.labels
            .iter()
            .zip(&self.memberships)
            .map(|(label, mf)| (label.as_str(), mf.degree(x)))
            .collect()
    }

    /// Returns the first term with the highest degree at `x`,
    /// or `None` if the variable has no terms.
    pub fn dominant_term(&self, x: f64) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (label, degree) in self.fuzzify(x) {
            match best {
                Some((_, top)) if degree <= top => {}
                _ => best = Some((label, degree)),
            }
        }
        best.map(|(label, _)| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature() -> LinguisticVariable {
        LinguisticVariable::new("temperature")
            .with_term("cold", Membership::decreasing_ramp(5.0, 15.0).unwrap())
            .unwrap()
            .with_term("mild", Membership::triangle(5.0, 15.0, 25.0).unwrap())
            .unwrap()
            .with_term("hot", Membership::increasing_ramp(15.0, 25.0).unwrap())
            .unwrap()
    }

    #[test]
    fn term_lookup() {
        let t = temperature();
        assert_eq!(t.name(), "temperature");
        assert_eq!(t.len(), 3);
        assert_eq!(
            t.term("mild"),
            Some(&Membership::triangle(5.0, 15.0, 25.0).unwrap())
        );
        assert_eq!(t.term("freezing"), None);
        assert_eq!(t.labels().collect::<Vec<_>>(), vec!["cold", "mild", "hot"]);
    }

    #[test]
    fn duplicate_term() {
        let result = temperature().with_term("hot", Membership::gaussian(30.0, 2.0).unwrap());
        assert_eq!(
            result.unwrap_err(),
            MembershipError::DuplicateTerm("hot".into())
        );
    }

    #[test]
    fn fuzzify_and_dominant() {
        let t = temperature();
        assert_eq!(
            t.fuzzify(10.0),
            vec![("cold", 0.5), ("mild", 0.5), ("hot", 0.0)]
        );
        // Ties go to the earlier term.
        assert_eq!(t.dominant_term(10.0), Some("cold"));
        assert_eq!(t.dominant_term(20.0), Some("mild"));
        assert_eq!(t.dominant_term(40.0), Some("hot"));
        assert_eq!(LinguisticVariable::new("empty").dominant_term(0.0), None);
    }

    #[test]
    fn partitions() {
        let labels = ["vn", "n", "z", "p", "vp"];
        let v = LinguisticVariable::flat_saw("v", (-6.0, 6.0), &labels).unwrap();
        assert_eq!(v.memberships(), flat_saw((-6.0, 6.0), 5).unwrap().as_slice());
        let v = LinguisticVariable::saw("v", (-6.0, 6.0), &labels).unwrap();
        assert_eq!(v.memberships(), saw((-6.0, 6.0), 5).unwrap().as_slice());
        assert!(LinguisticVariable::flat_saw("v", (0.0, 1.0), &["only"]).is_err());
        assert!(LinguisticVariable::flat_saw("v", (0.0, 1.0), &["a", "a"]).is_err());
    }

    #[test]
    fn serde() {
        let t = temperature();
        let json = serde_json::to_string(&t).unwrap();
        let back: LinguisticVariable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.term("hot"), t.term("hot"));
        assert_eq!(back.memberships(), t.memberships());
        assert!(!json.contains("index"));
    }

    #[test]
    fn inconsistent_terms_are_rejected() {
        let missing = r#"{"name":"v","labels":["a"],"memberships":[]}"#;
        let err = serde_json::from_str::<LinguisticVariable>(missing).unwrap_err();
        assert!(err.to_string().contains("1 labels given for 0"), "{}", err);

        let duplicate = r#"{"name":"v","labels":["a","a"],"memberships":[
            {"Triangle":{"x0":0.0,"x1":1.0,"x2":2.0}},
            {"Triangle":{"x0":1.0,"x1":2.0,"x2":3.0}}
        ]}"#;
        let err = serde_json::from_str::<LinguisticVariable>(duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate term `a`"), "{}", err);

        // A stale index in the input is ignored and rebuilt.
        let stale = r#"{"name":"v","labels":["a"],"index":{"a":7},"memberships":[
            {"Triangle":{"x0":0.0,"x1":1.0,"x2":2.0}}
        ]}"#;
        let v: LinguisticVariable = serde_json::from_str(stale).unwrap();
        assert_eq!(v.term("a"), Some(&Membership::triangle(0.0, 1.0, 2.0).unwrap()));
    }
}
