//! Pluggable candidate evaluation.
//!
//! There is no real target behind a probe: the built-in probes are the
//! placeholder rules the tool has always shipped with. Callers supply their own
//! [`Probe`] (or a closure) to change the classification.

use crate::core::types::{ProbeError, Verdict};

/// Classifies one candidate.
///
/// Returning `Err` aborts the step: the candidate stays unclassified and the
/// cursor does not move.
pub trait Probe {
    fn evaluate(&self, candidate: &str) -> Result<Verdict, ProbeError>;
}

/// Rejects candidates ending with `suffix`, accepts everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectSuffix {
    suffix: String,
}

impl RejectSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for RejectSuffix {
    fn default() -> Self {
        Self::new("123")
    }
}

impl Probe for RejectSuffix {
    fn evaluate(&self, candidate: &str) -> Result<Verdict, ProbeError> {
        Ok(Verdict::from(!candidate.ends_with(&self.suffix)))
    }
}

/// Rejects every candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectAll;

impl Probe for RejectAll {
    fn evaluate(&self, _candidate: &str) -> Result<Verdict, ProbeError> {
        Ok(Verdict::Rejected)
    }
}

/// Probe backed by a closure. Build one with [`from_fn`] or [`predicate`].
#[derive(Clone, Copy)]
pub struct FnProbe<F>(F);

impl<F> Probe for FnProbe<F>
where
    F: Fn(&str) -> Result<Verdict, ProbeError>,
{
    fn evaluate(&self, candidate: &str) -> Result<Verdict, ProbeError> {
        (self.0)(candidate)
    }
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn evaluate(&self, candidate: &str) -> Result<Verdict, ProbeError> {
        (**self).evaluate(candidate)
    }
}

pub fn from_fn<F>(evaluate: F) -> FnProbe<F>
where
    F: Fn(&str) -> Result<Verdict, ProbeError>,
{
    FnProbe(evaluate)
}

/// Adapt a plain accept/reject predicate into a probe.
pub fn predicate<F>(accept: F) -> FnProbe<impl Fn(&str) -> Result<Verdict, ProbeError>>
where
    F: Fn(&str) -> bool,
{
    FnProbe(move |candidate: &str| Ok(Verdict::from(accept(candidate))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_suffix_defaults_to_123() {
        let probe = RejectSuffix::default();
        assert_eq!(probe.evaluate("999123"), Ok(Verdict::Rejected));
        assert_eq!(probe.evaluate("000000"), Ok(Verdict::Accepted));
        assert_eq!(probe.evaluate("123000"), Ok(Verdict::Accepted));
    }

    #[test]
    fn reject_all_never_accepts() {
        assert_eq!(RejectAll.evaluate("000000"), Ok(Verdict::Rejected));
    }

    #[test]
    fn predicate_wraps_boolean_rule() {
        let probe = predicate(|c| c.starts_with('0'));
        assert_eq!(probe.evaluate("012345"), Ok(Verdict::Accepted));
        assert_eq!(probe.evaluate("112345"), Ok(Verdict::Rejected));
    }

    #[test]
    fn from_fn_can_report_unavailable_target() {
        let probe = from_fn(|_| Err(ProbeError::Unavailable("gone".to_string())));
        assert_eq!(
            probe.evaluate("000000"),
            Err(ProbeError::Unavailable("gone".to_string()))
        );
    }

    #[test]
    fn boxed_probe_delegates() {
        let probe: Box<dyn Probe> = Box::new(RejectAll);
        assert_eq!(probe.evaluate("x"), Ok(Verdict::Rejected));
    }
}
