//! Eligibility predicates.
//!
//! A predicate is a small, closed expression tree over the numeric
//! properties of a subject (a problem or a device). Leaves compare one
//! property against a constant; `And`, `Or` and `Not` compose them. Trees
//! serialize with an internal `type` tag so they can be stored alongside the
//! solutions that own them.

pub mod property;

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub use property::{HardwareProperty, ProblemProperty, Property};

pub type ProblemPredicate = Predicate<ProblemProperty>;
pub type HardwarePredicate = Predicate<HardwareProperty>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Property is an exact multiple of the operand. Never holds for 0.
    Multiple,
}

impl CompareOp {
    pub fn apply(self, lhs: u64, rhs: u64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Multiple => rhs != 0 && lhs % rhs == 0,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Multiple => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Predicate<P> {
    True,
    False,
    Compare { property: P, op: CompareOp, value: u64 },
    And { terms: Vec<Predicate<P>> },
    Or { terms: Vec<Predicate<P>> },
    Not { term: Box<Predicate<P>> },
}

impl<P> Default for Predicate<P> {
    fn default() -> Self {
        Predicate::True
    }
}

impl<P: Property> Predicate<P> {
    pub fn compare(property: P, op: CompareOp, value: u64) -> Self {
        Predicate::Compare { property, op, value }
    }

    pub fn and(terms: impl IntoIterator<Item = Predicate<P>>) -> Self {
        Predicate::And {
            terms: terms.into_iter().collect(),
        }
    }

    pub fn or(terms: impl IntoIterator<Item = Predicate<P>>) -> Self {
        Predicate::Or {
            terms: terms.into_iter().collect(),
        }
    }

    pub fn not(term: Predicate<P>) -> Self {
        Predicate::Not {
            term: Box::new(term),
        }
    }

    pub fn evaluate(&self, subject: &P::Subject) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Compare {
                property,
                op,
                value,
            } => op.apply(property.value(subject), *value),
            Predicate::And { terms } => terms.iter().all(|t| t.evaluate(subject)),
            Predicate::Or { terms } => terms.iter().any(|t| t.evaluate(subject)),
            Predicate::Not { term } => !term.evaluate(subject),
        }
    }

    /// Explain how the predicate evaluates for `subject`.
    ///
    /// Every sub-term is evaluated (no short-circuit) so the explanation is
    /// complete; the outcome always equals [`Predicate::evaluate`].
    pub fn debug_eval(&self, subject: &P::Subject) -> String {
        let mut out = String::new();
        self.write_eval(subject, &mut out);
        out
    }

    fn write_eval(&self, subject: &P::Subject, out: &mut String) -> bool {
        match self {
            Predicate::True => {
                out.push_str("True: 1");
                true
            }
            Predicate::False => {
                out.push_str("False: 0");
                false
            }
            Predicate::Compare {
                property,
                op,
                value,
            } => {
                let actual = property.value(subject);
                let rv = op.apply(actual, *value);
                let _ = write!(
                    out,
                    "({}:{} {} {}): {}",
                    property.name(),
                    actual,
                    op.symbol(),
                    value,
                    u8::from(rv)
                );
                rv
            }
            Predicate::And { terms } => Self::write_terms("And", terms, subject, out, true),
            Predicate::Or { terms } => Self::write_terms("Or", terms, subject, out, false),
            Predicate::Not { term } => {
                out.push_str("Not(");
                let rv = !term.write_eval(subject, out);
                let _ = write!(out, "): {}", u8::from(rv));
                rv
            }
        }
    }

    fn write_terms(
        label: &str,
        terms: &[Predicate<P>],
        subject: &P::Subject,
        out: &mut String,
        all: bool,
    ) -> bool {
        out.push_str(label);
        out.push('(');
        let mut rv = all;
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let term_rv = term.write_eval(subject, out);
            rv = if all { rv && term_rv } else { rv || term_rv };
        }
        let _ = write!(out, "): {}", u8::from(rv));
        rv
    }
}
