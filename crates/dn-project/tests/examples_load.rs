use std::path::Path;

#[test]
fn demo_projects_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");
    let demos = ["office_supply.yaml"];

    for name in demos {
        let path = root.join(name);
        let project = dn_project::load(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        dn_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
        assert!(!project.paths.is_empty(), "{} should define a path", name);
    }
}
