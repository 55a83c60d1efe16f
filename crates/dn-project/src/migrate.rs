//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        1 => migrate_v1_to_v2(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    project.version = 1;
    Ok(project)
}

/// Version 1 files did not store segment order hints. Give every segment
/// without one its position in the file, so stored-order fallbacks stay
/// deterministic.
fn migrate_v1_to_v2(mut project: Project) -> Result<Project, ProjectError> {
    for (idx, segment) in project.segments.iter_mut().enumerate() {
        if segment.order == 0 {
            segment.order = idx as i64 + 1;
        }
    }
    project.version = 2;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SegmentDef;

    #[test]
    fn v1_segments_get_order_hints() {
        let mut project = Project::new("legacy");
        project.version = 1;
        project
            .segments
            .push(SegmentDef::rectangular("s1", Some("a"), Some("b"), 10.0, 12.0, 8.0));
        let mut kept = SegmentDef::rectangular("s2", Some("b"), Some("c"), 10.0, 12.0, 8.0);
        kept.order = 7;
        project.segments.push(kept);

        let migrated = migrate_to_latest(project).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.segments[0].order, 1);
        assert_eq!(migrated.segments[1].order, 7);
    }

    #[test]
    fn latest_is_untouched() {
        let project = Project::new("fresh");
        let migrated = migrate_to_latest(project.clone()).unwrap();
        assert_eq!(migrated, project);
    }
}
