//! Deterministic risk formulas used when no network is available.

use bina_config::AdaptiveWeights;

use crate::features::{DEFAULT_REACTION_TIME, REACTION_TIME_CEILING, RiskFeatures};

/// Fixed-weight formula.
///
/// ```text
/// accuracy = 0.3·letters + 0.3·words + 0.25·arrange + 0.15·speech
/// time     = min(1, reaction_time / 5)
/// risk     = clamp((1 - accuracy)·0.8 + time·0.2, 0, 1)
/// ```
#[must_use]
pub fn fallback_risk(f: &RiskFeatures) -> f64 {
    let accuracy = f.letters_accuracy * 0.3
        + f.words_accuracy * 0.3
        + f.arrange_accuracy * 0.25
        + f.speech() * 0.15;
    let time_factor = (f.reaction_time() / REACTION_TIME_CEILING).min(1.0);
    (1.0 - accuracy).mul_add(0.8, time_factor * 0.2).clamp(0.0, 1.0)
}

/// Configured-weight formula with a slow-reaction penalty and a consistency
/// penalty on the spread of the four accuracies.
#[must_use]
pub fn adaptive_risk(f: &RiskFeatures, w: &AdaptiveWeights) -> f64 {
    let accuracies = [
        f.letters_accuracy,
        f.words_accuracy,
        f.arrange_accuracy,
        f.speech(),
    ];
    let accuracy = f.letters_accuracy * w.letters_accuracy
        + f.words_accuracy * w.words_accuracy
        + f.arrange_accuracy * w.arrange_accuracy
        + f.speech() * w.speech_accuracy;
    let over = REACTION_TIME_CEILING - DEFAULT_REACTION_TIME;
    let time_penalty = ((f.reaction_time() - DEFAULT_REACTION_TIME) / over).max(0.0) * w.reaction_time;
    let spread_penalty = population_std(&accuracies) * 0.1;
    (1.0 - accuracy + time_penalty + spread_penalty).clamp(0.0, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fallback_perfect_and_zero_scores() {
        assert!(close(fallback_risk(&RiskFeatures::from_accuracies(1.0, 1.0, 1.0)), 0.14));
        assert!(close(fallback_risk(&RiskFeatures::from_accuracies(0.0, 0.0, 0.0)), 0.82));
    }

    #[test]
    fn fallback_slow_reaction_saturates() {
        let f = RiskFeatures {
            speech_accuracy: Some(0.0),
            avg_reaction_time: Some(30.0),
            ..RiskFeatures::from_accuracies(0.0, 0.0, 0.0)
        };
        assert!(close(fallback_risk(&f), 1.0));
    }

    const GRID: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    #[rstest]
    #[case(None)]
    #[case(Some(0.0))]
    #[case(Some(0.5))]
    #[case(Some(2.0))]
    #[case(Some(5.0))]
    #[case(Some(12.5))]
    #[case(Some(120.0))]
    fn risks_stay_in_unit_interval(#[case] reaction_time: Option<f64>) {
        let heavy = AdaptiveWeights {
            reaction_time: 5.0,
            ..AdaptiveWeights::default()
        };
        for l in GRID {
            for w in GRID {
                for a in GRID {
                    for speech in GRID {
                        let f = RiskFeatures {
                            speech_accuracy: Some(speech),
                            avg_reaction_time: reaction_time,
                            ..RiskFeatures::from_accuracies(l, w, a)
                        };
                        for risk in [
                            fallback_risk(&f),
                            adaptive_risk(&f, &AdaptiveWeights::default()),
                            adaptive_risk(&f, &heavy),
                        ] {
                            assert!((0.0..=1.0).contains(&risk), "{f:?} gave {risk}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn fallback_never_decreases_with_slower_reaction() {
        for acc in GRID {
            let mut previous = 0.0;
            for rt in [0.0, 1.0, 2.5, 5.0, 10.0] {
                let f = RiskFeatures {
                    avg_reaction_time: Some(rt),
                    ..RiskFeatures::from_accuracies(acc, acc, acc)
                };
                let risk = fallback_risk(&f);
                assert!(risk >= previous, "acc {acc} rt {rt}: {risk} < {previous}");
                previous = risk;
            }
        }
    }

    #[test]
    fn adaptive_uniform_accuracies_have_no_spread_penalty() {
        let f = RiskFeatures {
            speech_accuracy: Some(0.5),
            ..RiskFeatures::from_accuracies(0.5, 0.5, 0.5)
        };
        // weights sum to 1.0, so accuracy term is 0.5; reaction time at default adds nothing
        assert!(close(adaptive_risk(&f, &AdaptiveWeights::default()), 0.5));
    }

    #[test]
    fn adaptive_spread_and_time_penalties() {
        let f = RiskFeatures {
            speech_accuracy: Some(0.0),
            avg_reaction_time: Some(5.0),
            ..RiskFeatures::from_accuracies(1.0, 1.0, 0.0)
        };
        // accuracy 0.6, time penalty 1.0·0.2, std of [1,1,0,0] is 0.5
        let expected = 1.0 - 0.6 + 0.2 + 0.05;
        assert!(close(adaptive_risk(&f, &AdaptiveWeights::default()), expected));
    }

    #[test]
    fn population_std_matches_hand_computation() {
        assert!(close(population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0));
        assert!(close(population_std(&[]), 0.0));
    }
}
