use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PlanningError, PlanningResult};
use crate::matrix::ScenarioMatrix;
use crate::types::{Signpost, SignpostStatus};

/// Signpost tracker - registers observable indicators and re-weights
/// scenario probabilities when they are observed.
///
/// The update is an additive re-weighting, not Bayesian inference: each
/// scenario scores `prior + Σ weight` over the triggered signposts that
/// target it, and the scores are normalized to sum to 1. It recomputes from
/// the priors every time, so the result depends only on the set of
/// triggered signposts, never on how often the update ran.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SignpostTracker {
    signposts: Vec<Signpost>,
}

/// A signpost paired with the outcome of resolving its target by name.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub signpost: &'a Signpost,
    /// Position of the target in the matrix, or the lookup failure
    pub target: PlanningResult<usize>,
}

impl SignpostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signpost. The target scenario is only looked up when the
    /// signpost is used, so it may name a scenario that does not exist yet.
    pub fn add_signpost(
        &mut self,
        description: impl Into<String>,
        target_scenario: impl Into<String>,
        weight: f64,
    ) -> PlanningResult<()> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(PlanningError::EmptySignpostDescription);
        }
        if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
            return Err(PlanningError::InvalidSignpostWeight {
                description,
                weight,
            });
        }
        if self.find(&description).is_some() {
            return Err(PlanningError::DuplicateSignpost(description));
        }

        let target_scenario = target_scenario.into();
        debug!(
            signpost = %description,
            target = %target_scenario,
            weight,
            "Signpost registered"
        );
        self.signposts.push(Signpost {
            description,
            target_scenario,
            weight,
            status: SignpostStatus::Untriggered,
            triggered_at: None,
        });
        Ok(())
    }

    /// Mark a signpost as observed.
    ///
    /// Triggering is set membership: a second trigger of the same signpost
    /// changes nothing. There is no way back to untriggered.
    pub fn trigger(&mut self, description: &str) -> PlanningResult<()> {
        let index = self
            .find(description)
            .ok_or_else(|| PlanningError::SignpostNotFound(description.to_string()))?;

        let signpost = &mut self.signposts[index];
        if signpost.mark_triggered() {
            info!(
                signpost = %signpost.description,
                target = %signpost.target_scenario,
                weight = signpost.weight,
                "Signpost triggered"
            );
        } else {
            debug!(signpost = %signpost.description, "Signpost already triggered");
        }
        Ok(())
    }

    /// Resolve every signpost's target against `matrix` by current name.
    pub fn resolve<'a>(&'a self, matrix: &ScenarioMatrix) -> Vec<Resolution<'a>> {
        self.signposts
            .iter()
            .map(|signpost| Resolution {
                signpost,
                target: matrix.index_of(&signpost.target_scenario).ok_or_else(|| {
                    PlanningError::ScenarioNotFound(signpost.target_scenario.clone())
                }),
            })
            .collect()
    }

    /// Recompute scenario probabilities from priors and triggered signposts.
    ///
    /// Fails with `ScenarioNotFound` if a triggered signpost names a scenario
    /// the matrix does not have; the matrix is left untouched in that case.
    /// Untriggered signposts contribute nothing and are not resolved.
    pub fn probability_update(&self, matrix: &mut ScenarioMatrix) -> PlanningResult<()> {
        let mut scores: Vec<f64> = matrix.scenarios().iter().map(|s| s.prior).collect();

        for signpost in self.signposts.iter().filter(|s| s.is_triggered()) {
            let index = matrix.index_of(&signpost.target_scenario).ok_or_else(|| {
                PlanningError::ScenarioNotFound(signpost.target_scenario.clone())
            })?;
            scores[index] += signpost.weight;
        }

        let total: f64 = scores.iter().sum();
        // Priors sum to 1 and weights are positive, so total > 0
        for score in scores.iter_mut() {
            *score /= total;
        }

        matrix.set_probabilities(&scores);
        debug!(
            triggered = self.triggered().len(),
            total,
            "Scenario probabilities updated"
        );
        Ok(())
    }

    pub fn signposts(&self) -> &[Signpost] {
        &self.signposts
    }

    pub fn signpost(&self, description: &str) -> PlanningResult<&Signpost> {
        self.find(description)
            .map(|i| &self.signposts[i])
            .ok_or_else(|| PlanningError::SignpostNotFound(description.to_string()))
    }

    pub fn is_triggered(&self, description: &str) -> PlanningResult<bool> {
        Ok(self.signpost(description)?.is_triggered())
    }

    pub fn triggered(&self) -> Vec<&Signpost> {
        self.signposts.iter().filter(|s| s.is_triggered()).collect()
    }

    pub fn pending(&self) -> Vec<&Signpost> {
        self.signposts.iter().filter(|s| !s.is_triggered()).collect()
    }

    fn find(&self, description: &str) -> Option<usize> {
        self.signposts.iter().position(|s| s.description == description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::matrix::generate_matrix;

    fn matrix() -> ScenarioMatrix {
        let mut m = generate_matrix(vec![
            Driver::with_states("AI Progress", ["Breakthrough", "Incremental"]).unwrap(),
            Driver::with_states("Regulation", ["Heavy", "Light"]).unwrap(),
        ])
        .unwrap();
        m.name_scenario(&["Breakthrough", "Light"], "Tech Utopia").unwrap();
        m
    }

    fn probability(m: &ScenarioMatrix, name: &str) -> f64 {
        m.scenario(name).unwrap().probability
    }

    #[test]
    fn add_signpost_validates_weight() {
        let mut tracker = SignpostTracker::new();
        for weight in [0.0, -0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = tracker.add_signpost("x", "Tech Utopia", weight).unwrap_err();
            assert!(err.is_configuration(), "weight {weight} accepted");
        }
        tracker.add_signpost("full weight", "Tech Utopia", 1.0).unwrap();
    }

    #[test]
    fn add_signpost_rejects_duplicates_and_blank_descriptions() {
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("Open weights model beats frontier", "Tech Utopia", 0.3).unwrap();
        assert_eq!(
            tracker
                .add_signpost("Open weights model beats frontier", "Slow Lane", 0.2)
                .unwrap_err(),
            PlanningError::DuplicateSignpost("Open weights model beats frontier".into())
        );
        assert_eq!(
            tracker.add_signpost("", "Tech Utopia", 0.2).unwrap_err(),
            PlanningError::EmptySignpostDescription
        );
    }

    #[test]
    fn trigger_unknown_signpost_is_not_found() {
        let mut tracker = SignpostTracker::new();
        let err = tracker.trigger("EU AI Act repealed").unwrap_err();
        assert_eq!(err, PlanningError::SignpostNotFound("EU AI Act repealed".into()));
    }

    #[test]
    fn update_reweights_target_scenario() {
        let mut m = matrix();
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
        tracker.trigger("Compute cost halves").unwrap();
        tracker.probability_update(&mut m).unwrap();

        assert!((probability(&m, "Tech Utopia") - 0.65 / 1.4).abs() < 1e-9);
        assert!((probability(&m, "Incremental / Heavy") - 0.25 / 1.4).abs() < 1e-9);
        assert!((m.probability_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn untriggered_signposts_do_not_move_probabilities() {
        let mut m = matrix();
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
        tracker.probability_update(&mut m).unwrap();
        for (_, p) in m.probabilities() {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn update_is_a_fixed_point() {
        let mut m = matrix();
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
        tracker.trigger("Compute cost halves").unwrap();

        tracker.probability_update(&mut m).unwrap();
        let first: Vec<f64> = m.probabilities().iter().map(|(_, p)| *p).collect();
        tracker.probability_update(&mut m).unwrap();
        let second: Vec<f64> = m.probabilities().iter().map(|(_, p)| *p).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn double_trigger_counts_once() {
        let mut once = matrix();
        let mut twice = matrix();

        let mut a = SignpostTracker::new();
        a.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
        a.trigger("Compute cost halves").unwrap();
        a.probability_update(&mut once).unwrap();

        let mut b = SignpostTracker::new();
        b.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
        b.trigger("Compute cost halves").unwrap();
        b.trigger("Compute cost halves").unwrap();
        b.probability_update(&mut twice).unwrap();

        assert_eq!(once.probabilities(), twice.probabilities());
        assert_eq!(b.triggered().len(), 1);
    }

    #[test]
    fn triggered_signpost_with_unknown_target_fails_at_update() {
        let mut m = matrix();
        let mut tracker = SignpostTracker::new();
        // Registration does not check the target
        tracker.add_signpost("Moratorium signed", "Frozen Future", 0.5).unwrap();
        tracker.trigger("Moratorium signed").unwrap();

        let before = m.probabilities().iter().map(|(_, p)| *p).collect::<Vec<_>>();
        let err = tracker.probability_update(&mut m).unwrap_err();
        assert_eq!(err, PlanningError::ScenarioNotFound("Frozen Future".into()));
        let after = m.probabilities().iter().map(|(_, p)| *p).collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn rename_retargets_signpost_at_resolution() {
        let mut m = matrix();
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("Moratorium signed", "Frozen Future", 0.5).unwrap();
        assert!(tracker.resolve(&m)[0].target.is_err());

        m.name_scenario(&["Incremental", "Heavy"], "Frozen Future").unwrap();
        let resolved = tracker.resolve(&m);
        assert_eq!(resolved[0].target, Ok(2));

        tracker.trigger("Moratorium signed").unwrap();
        tracker.probability_update(&mut m).unwrap();
        assert!((probability(&m, "Frozen Future") - 0.75 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn pending_and_triggered_partition_signposts() {
        let mut tracker = SignpostTracker::new();
        tracker.add_signpost("a", "Tech Utopia", 0.1).unwrap();
        tracker.add_signpost("b", "Tech Utopia", 0.2).unwrap();
        tracker.trigger("b").unwrap();
        assert_eq!(tracker.pending().len(), 1);
        assert_eq!(tracker.triggered()[0].description, "b");
        assert!(tracker.is_triggered("b").unwrap());
        assert!(!tracker.is_triggered("a").unwrap());
        assert!(tracker.is_triggered("c").is_err());
    }
}
