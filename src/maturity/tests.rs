use super::*;

fn subs(stages: &[MaturityStage]) -> Vec<SubComponent> {
    stages
        .iter()
        .enumerate()
        .map(|(index, stage)| SubComponent {
            id: format!("sub-{index}"),
            name: format!("Sub {index}"),
            active: true,
            stage: *stage,
        })
        .collect()
}

fn component_with(name: &str, stages: &[MaturityStage]) -> Component {
    Component {
        name: name.to_string(),
        sub_components: subs(stages),
        ..Default::default()
    }
}

fn split(
    high: MaturityStage,
    high_count: usize,
    low: MaturityStage,
    low_count: usize,
) -> Vec<MaturityStage> {
    let mut stages = vec![high; high_count];
    stages.extend(std::iter::repeat_n(low, low_count));
    stages
}

#[test]
fn calculate_stage_returns_the_shared_stage_of_homogeneous_children() {
    for stage in MaturityStage::ALL {
        assert_eq!(calculate_stage(&[stage; 5]), stage);
    }
}

#[test]
fn calculate_stage_is_hypothetical_without_children() {
    assert_eq!(calculate_stage(&[]), MaturityStage::Hypothetical);
    assert_eq!(calculate_l2_maturity(&[]), MaturityStage::Hypothetical);
    assert_eq!(calculate_l1_maturity(&[]), MaturityStage::Hypothetical);
    assert_eq!(calculate_track_maturity(&[]), MaturityStage::Hypothetical);
}

#[test]
fn exactly_eighty_percent_qualifies() {
    let stages = split(MaturityStage::Scaled, 8, MaturityStage::Emerging, 2);
    assert_eq!(calculate_stage(&stages), MaturityStage::Scaled);
}

#[test]
fn seventy_percent_falls_back_to_the_lower_stage() {
    let stages = split(MaturityStage::Scaled, 7, MaturityStage::Emerging, 3);
    assert_eq!(calculate_stage(&stages), MaturityStage::Emerging);

    let stages = split(MaturityStage::Proven, 7, MaturityStage::Hypothetical, 3);
    assert_eq!(calculate_stage(&stages), MaturityStage::Hypothetical);
}

#[test]
fn mixed_children_count_toward_every_stage_they_reach() {
    // 4 scaled + 4 proven = 80% at or above proven.
    let mut stages = split(MaturityStage::Scaled, 4, MaturityStage::Proven, 4);
    stages.extend([MaturityStage::Emerging, MaturityStage::Hypothetical]);
    assert_eq!(calculate_stage(&stages), MaturityStage::Proven);
}

#[test]
fn homogeneous_tree_rolls_up_to_its_leaf_stage_regardless_of_shape() {
    for stage in MaturityStage::ALL {
        let layers = vec![
            Layer {
                name: "Wide".to_string(),
                components: (0..5)
                    .map(|index| component_with(&format!("C{index}"), &[stage; 3]))
                    .collect(),
                ..Default::default()
            },
            Layer {
                name: "Narrow".to_string(),
                components: vec![component_with("Solo", &[stage])],
                ..Default::default()
            },
            Layer {
                name: "Deep".to_string(),
                components: vec![
                    component_with("Many", &[stage; 12]),
                    component_with("Few", &[stage; 2]),
                ],
                ..Default::default()
            },
        ];

        assert_eq!(calculate_track_maturity(&layers), stage);
    }
}

#[test]
fn l1_rollup_uses_derived_component_stages() {
    let mut components = (0..4)
        .map(|index| component_with(&format!("Scaled {index}"), &[MaturityStage::Scaled; 2]))
        .collect::<Vec<Component>>();
    components.push(Component {
        name: "Empty".to_string(),
        ..Default::default()
    });

    assert_eq!(calculate_l1_maturity(&components), MaturityStage::Scaled);

    components.push(Component {
        name: "Also empty".to_string(),
        ..Default::default()
    });
    assert_eq!(calculate_l1_maturity(&components), MaturityStage::Hypothetical);
}

#[test]
fn l2_rollup_reads_legacy_subs_when_preferred_field_is_empty() {
    let component = Component {
        name: "Legacy".to_string(),
        subs: subs(&[MaturityStage::Proven; 3]),
        ..Default::default()
    };

    assert_eq!(
        calculate_l2_maturity(component.sub_components()),
        MaturityStage::Proven
    );
}

#[test]
fn distribution_from_labels_folds_empty_and_unknown_into_hypothetical() {
    let distribution = maturity_distribution_from_labels([
        "proven",
        "",
        "bogus",
        "Scaled",
        "emerging",
        "hypothetical",
        "proven",
    ]);

    assert_eq!(
        distribution,
        MaturityDistribution {
            hypothetical: 3,
            emerging: 1,
            proven: 2,
            scaled: 1,
        }
    );
}

#[test]
fn next_stage_needed_reaches_the_threshold_count() {
    let stages = split(MaturityStage::Proven, 7, MaturityStage::Emerging, 3);
    let analysis = Rollup::default().analyze_stages(&stages);

    assert_eq!(analysis.calculated_stage, MaturityStage::Emerging);
    assert_eq!(analysis.total, 10);
    assert_eq!(analysis.at_or_above[&MaturityStage::Proven], 7);
    assert_eq!(analysis.next_stage_needed, 1);
    assert!((analysis.percentage[&MaturityStage::Proven] - 70.0).abs() < 1e-9);
    assert!((analysis.progress_to_next_stage() - 87.5).abs() < 1e-9);
}

#[test]
fn next_stage_needed_rounds_the_target_up() {
    // ceil(0.8 * 3) = 3 children must be emerging or above.
    let stages = [
        MaturityStage::Emerging,
        MaturityStage::Hypothetical,
        MaturityStage::Hypothetical,
    ];
    let analysis = Rollup::default().analyze_stages(&stages);

    assert_eq!(analysis.calculated_stage, MaturityStage::Hypothetical);
    assert_eq!(analysis.next_stage_needed, 2);
}

#[test]
fn scaled_analysis_has_no_next_stage() {
    let analysis = Rollup::default().analyze_stages(&[MaturityStage::Scaled; 4]);
    assert_eq!(analysis.calculated_stage, MaturityStage::Scaled);
    assert_eq!(analysis.next_stage_needed, 0);
    assert_eq!(analysis.progress_to_next_stage(), 100.0);
}

#[test]
fn empty_analysis_reports_zero_counts() {
    let analysis = analyze_l2_maturity(&[]);
    assert_eq!(analysis.calculated_stage, MaturityStage::Hypothetical);
    assert_eq!(analysis.total, 0);
    assert_eq!(analysis.next_stage_needed, 0);
    assert_eq!(analysis.progress_to_next_stage(), 0.0);
    assert!(analysis.at_or_above.values().all(|count| *count == 0));
}

#[test]
fn analyze_levels_use_derived_child_stages() {
    let components = vec![
        component_with("A", &[MaturityStage::Proven; 2]),
        component_with("B", &[MaturityStage::Emerging; 2]),
    ];
    let l1 = analyze_l1_maturity(&components);
    assert_eq!(l1.distribution.proven, 1);
    assert_eq!(l1.distribution.emerging, 1);
    assert_eq!(l1.calculated_stage, MaturityStage::Emerging);

    let layers = vec![Layer {
        name: "Only".to_string(),
        components,
        ..Default::default()
    }];
    let track = analyze_track_maturity(&layers);
    assert_eq!(track.total, 1);
    assert_eq!(track.distribution.emerging, 1);
}

#[test]
fn custom_threshold_is_applied_and_validated() {
    let rollup = Rollup::with_threshold(0.5).expect("0.5 is a valid threshold");
    let stages = split(MaturityStage::Proven, 5, MaturityStage::Hypothetical, 5);
    assert_eq!(rollup.calculate_stage(&stages), MaturityStage::Proven);
    assert_eq!(calculate_stage(&stages), MaturityStage::Hypothetical);

    assert!(Rollup::with_threshold(0.0).is_none());
    assert!(Rollup::with_threshold(1.5).is_none());
    assert!(Rollup::with_threshold(f64::NAN).is_none());
}

#[test]
fn track_rollup_summarizes_each_level() {
    let model = ValueModel::new(
        Track::Product,
        "product.value_model.yaml",
        vec![
            Layer {
                id: "delivery".to_string(),
                name: "Service Delivery".to_string(),
                components: vec![
                    component_with("Onboarding", &[MaturityStage::Scaled; 4]),
                    component_with(
                        "Support",
                        &[MaturityStage::Proven, MaturityStage::Proven, MaturityStage::Emerging],
                    ),
                ],
                ..Default::default()
            },
            Layer {
                id: "storage".to_string(),
                name: "Energy Storage".to_string(),
                components: vec![component_with("Cells", &[MaturityStage::Emerging; 2])],
                ..Default::default()
            },
        ],
    );

    let rollup = Rollup::default().track_rollup(&model);
    assert_eq!(rollup.track, Track::Product);
    assert_eq!(rollup.layers.len(), 2);

    let delivery = &rollup.layers[0];
    assert_eq!(delivery.components[0].stage, MaturityStage::Scaled);
    assert_eq!(delivery.components[1].stage, MaturityStage::Emerging);
    assert_eq!(delivery.stage, MaturityStage::Emerging);
    assert_eq!(delivery.l3_distribution.total(), 7);
    assert_eq!(delivery.l3_distribution.scaled, 4);
    assert_eq!(delivery.l2_distribution.total(), 2);

    assert_eq!(rollup.layers[1].stage, MaturityStage::Emerging);
    assert_eq!(rollup.stage, MaturityStage::Emerging);
    assert_eq!(rollup.stage, calculate_track_maturity(&model.layers));
    assert_eq!(rollup.l1_distribution.emerging, 2);
}

#[test]
fn analysis_serializes_stage_keyed_maps_with_labels() {
    let analysis = Rollup::default().analyze_stages(&[MaturityStage::Proven; 2]);
    let value = serde_json::to_value(&analysis).expect("analysis should serialize");

    assert_eq!(value["calculated_stage"], "proven");
    assert_eq!(value["at_or_above"]["proven"], 2);
    assert_eq!(value["at_or_above"]["scaled"], 0);
}
