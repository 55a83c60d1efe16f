use dn_project::schema::*;
use dn_project::{ProjectError, load, load_json, load_yaml, save, save_json, save_yaml, validate_project};

fn sample_project() -> Project {
    let mut project = Project::new("Roundtrip");
    project.components.push(ComponentDef {
        id: "c1".to_string(),
        name: "EF-2".to_string(),
        kind: ComponentType::Fan,
        position: PositionDef { x: 10.0, y: 5.0 },
        noise_level_dba: Some(64.0),
        flow_rate_cfm: Some(900.0),
    });
    project.components.push(ComponentDef {
        id: "c2".to_string(),
        name: "G-4".to_string(),
        kind: ComponentType::Grille,
        position: PositionDef { x: 30.0, y: 5.0 },
        noise_level_dba: None,
        flow_rate_cfm: None,
    });

    let mut seg = SegmentDef::rectangular("s1", Some("c1"), Some("c2"), 20.0, 12.0, 10.0);
    seg.order = 1;
    seg.fittings.push(FittingDef {
        fitting_type: "elbow_90".to_string(),
        position_ft: 8.0,
        noise_adjustment_db: Some(2.5),
    });
    project.segments.push(seg);

    let mut path = PathDef::new("p1", "Exhaust 2", &["s1"]);
    path.primary_source_id = Some("c1".to_string());
    path.last_result = Some(CachedResultDef {
        terminal_noise_dba: 41.2,
        nc_rating: 35,
        calculation_valid: true,
        calculated_at: "2026-03-02T10:00:00Z".to_string(),
    });
    project.paths.push(path);

    let mut unit = MechanicalUnitDef::new("u1", "EF-2", "EF");
    unit.outlet_spectrum_json = Some(r#"{"63": 70, "125": 66, "250": 62, "500": 58, "1000": 55, "2000": 51, "4000": 47, "8000": 42}"#.to_string());
    project.mechanical_units.push(unit);
    project
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = Project::new("Empty Project");
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("dn_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_full_project() {
    let project = sample_project();
    let path = std::env::temp_dir().join("dn_project_roundtrip_full.yaml");
    save_yaml(&path, &project).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), project);
}

#[test]
fn roundtrip_json_full_project() {
    let project = sample_project();
    let path = std::env::temp_dir().join("dn_project_roundtrip_full.json");
    save_json(&path, &project).unwrap();
    assert_eq!(load_json(&path).unwrap(), project);
}

#[test]
fn extension_picks_format() {
    let project = sample_project();
    let path = std::env::temp_dir().join("dn_project_roundtrip_ext.yml");
    save(&path, &project).unwrap();
    assert_eq!(load(&path).unwrap(), project);

    let bad = std::env::temp_dir().join("dn_project_roundtrip.toml");
    assert!(matches!(
        save(&bad, &project),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn save_refuses_invalid_project() {
    let mut project = sample_project();
    project.paths[0].segment_ids.push("missing".to_string());
    let path = std::env::temp_dir().join("dn_project_roundtrip_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &project),
        Err(ProjectError::Validation(_))
    ));
}
