//! Metric-state invariants across a full decision journey.

use franchise_lab::impact::fallback_impacts;
use franchise_lab::{BusinessStatus, MetricsDelta, MetricsState};

#[test]
fn test_worked_example_journey() {
    let mut state = MetricsState::new();
    assert_eq!(state.cash_flow, 100_000);
    assert_eq!(state.customer_satisfaction, 50);
    assert_eq!(state.growth_potential, 50);
    assert_eq!(state.risk_level, 30);

    state.apply(&MetricsDelta {
        cash_flow: -20_000,
        customer_satisfaction: 10,
        growth_potential: 8,
        risk_level: -5,
    });

    assert_eq!(state.cash_flow, 80_000);
    assert_eq!(state.customer_satisfaction, 60);
    assert_eq!(state.growth_potential, 58);
    assert_eq!(state.risk_level, 25);

    // round(100 * (0.4*0.8 + 0.3*0.60 + 0.2*0.58 - 0.1*0.25)) = 59
    assert_eq!(state.health_score(), 59);
    assert_eq!(state.status(), BusinessStatus::Stable);
    assert_eq!(state.status().label(), "Stable");
}

#[test]
fn test_percentage_fields_stay_in_bounds_across_many_steps() {
    let mut state = MetricsState::new();
    let swings = [
        MetricsDelta { cash_flow: -50_000, customer_satisfaction: 25, growth_potential: -25, risk_level: 25 },
        MetricsDelta { cash_flow: 25_000, customer_satisfaction: -25, growth_potential: 25, risk_level: -25 },
        MetricsDelta { cash_flow: -50_000, customer_satisfaction: 25, growth_potential: 25, risk_level: 25 },
        MetricsDelta { cash_flow: -50_000, customer_satisfaction: 25, growth_potential: 25, risk_level: 25 },
        MetricsDelta { cash_flow: -50_000, customer_satisfaction: -25, growth_potential: -25, risk_level: -25 },
    ];

    for delta in &swings {
        state.apply(delta);
        assert!((0..=100).contains(&state.customer_satisfaction));
        assert!((0..=100).contains(&state.growth_potential));
        assert!((0..=100).contains(&state.risk_level));
    }

    // Cash flow is never clamped and may go deeply negative
    assert_eq!(state.cash_flow, 100_000 - 50_000 + 25_000 - 150_000);
    assert!(state.cash_flow < 0);
}

#[test]
fn test_fallback_engine_deltas_always_within_declared_ranges() {
    let choices = [
        "We will invest in new ovens",
        "Save on supplies and minimize waste",
        "Upgrade customer service quality",
        "An aggressive, ambitious expansion",
        "A safe and secure rollout",
        "Do nothing this quarter",
    ];

    for choice in choices {
        for _ in 0..50 {
            let delta = fallback_impacts(choice);
            assert!((-50_000..=25_000).contains(&delta.cash_flow), "choice: {choice}");
            assert!((-25..=25).contains(&delta.customer_satisfaction), "choice: {choice}");
            assert!((-25..=25).contains(&delta.growth_potential), "choice: {choice}");
            assert!((-25..=25).contains(&delta.risk_level), "choice: {choice}");
        }
    }
}

#[test]
fn test_health_score_extremes_are_clamped() {
    let broke = MetricsState {
        cash_flow: -500_000,
        customer_satisfaction: 0,
        growth_potential: 0,
        risk_level: 100,
    };
    assert_eq!(broke.health_score(), 0);
    assert_eq!(broke.status(), BusinessStatus::Critical);

    let flush = MetricsState {
        cash_flow: 1_000_000,
        customer_satisfaction: 100,
        growth_potential: 100,
        risk_level: 0,
    };
    // 0.4 + 0.3 + 0.2 - 0 = 0.9
    assert_eq!(flush.health_score(), 90);
    assert_eq!(flush.status(), BusinessStatus::Thriving);
}
