use std::path::Path;

use dn_app::*;
use dn_engine::{EngineOutput, ReplayEngine};
use dn_project::{DuctShapeDef, FittingDef, Project};

fn project() -> Project {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects/office_supply.yaml");
    load_project(&path).unwrap()
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(EngineOutput {
        calculation_valid: true,
        source_noise: 72.0,
        terminal_noise: 41.0,
        total_attenuation: 31.0,
        nc_rating: 36,
        octave_band_spectrum: None,
        path_segments: Vec::new(),
        warnings: Vec::new(),
        error: None,
    })
}

#[test]
fn segment_edit_recalculates_paths_through_it() {
    let mut project = project();
    let engine = engine();
    let config = AnalysisConfig::default();
    let recalc = Recalculator::new(&engine, &config, None);

    let edit = SegmentEdit {
        length_ft: Some(40.0),
        shape: Some(DuctShapeDef::Rectangular {
            width_in: 30.0,
            height_in: 24.0,
        }),
        ..SegmentEdit::default()
    };
    let analyses = recalc.update_segment(&mut project, "s-1", &edit).unwrap();

    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].result.path_id, "p-1");
    // no spectrum from the engine: its rating stands, the comparison is estimated
    assert_eq!(analyses[0].result.nc_rating, 36);
    assert!(analyses[0].comparison.is_some());
    assert_eq!(project.segment("s-1").unwrap().length_ft, 40.0);
    assert!(project.path("p-1").unwrap().last_result.is_some());
}

#[test]
fn non_finite_edits_are_rejected() {
    let mut project = project();
    let engine = engine();
    let config = AnalysisConfig::default();
    let recalc = Recalculator::new(&engine, &config, None);

    let edit = SegmentEdit {
        velocity_fpm: Some(f64::NAN),
        ..SegmentEdit::default()
    };
    assert!(matches!(
        recalc.update_segment(&mut project, "s-2", &edit),
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(project.segment("s-2").unwrap().velocity_fpm, None);

    assert!(matches!(
        recalc.update_segment(&mut project, "s-9", &SegmentEdit::default()),
        Err(AppError::SegmentNotFound(_))
    ));
}

#[test]
fn fitting_and_new_path() {
    let mut project = project();
    let engine = engine();
    let config = AnalysisConfig::default();
    let recalc = Recalculator::new(&engine, &config, None);

    let analyses = recalc
        .add_fitting(
            &mut project,
            "s-2",
            FittingDef {
                fitting_type: "volume_damper".to_string(),
                position_ft: 4.0,
                noise_adjustment_db: Some(2.0),
            },
        )
        .unwrap();
    assert_eq!(analyses.len(), 1);
    assert_eq!(project.segment("s-2").unwrap().fittings.len(), 2);

    let (id, analysis) = recalc
        .create_path(&mut project, "AHU-1 to VAV-3", &["s-1", "s-2"], Some("c-ahu1"))
        .unwrap();
    assert_eq!(project.paths.len(), 2);
    assert_eq!(analysis.result.path_id, id);
    assert!(analysis.result.calculation_valid);

    assert!(matches!(
        recalc.create_path(&mut project, "bad", &["s-1"], Some("c-missing")),
        Err(AppError::ComponentNotFound(_))
    ));
}
