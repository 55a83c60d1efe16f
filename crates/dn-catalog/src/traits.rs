//! Lookup seam over scheduled mechanical units.

use dn_project::{MechanicalUnitDef, Project};

/// Read access to a set of mechanical-unit records.
///
/// Only `units` is required; the lookups are derived from it. Implemented for
/// a whole project snapshot and for plain slices of records.
pub trait UnitCatalog {
    fn units(&self) -> &[MechanicalUnitDef];

    fn unit(&self, id: &str) -> Option<&MechanicalUnitDef> {
        self.units().iter().find(|u| u.id == id)
    }

    /// Case-insensitive exact name lookup.
    fn find_by_name(&self, name: &str) -> Option<&MechanicalUnitDef> {
        let wanted = name.trim();
        self.units()
            .iter()
            .find(|u| u.name.trim().eq_ignore_ascii_case(wanted))
    }

    /// Units whose type contains any of the given fragments (case-insensitive),
    /// in catalog order.
    fn find_by_type(&self, fragments: &[&str]) -> Vec<&MechanicalUnitDef> {
        let fragments: Vec<String> = fragments.iter().map(|f| f.to_ascii_lowercase()).collect();
        self.units()
            .iter()
            .filter(|u| {
                let unit_type = u.unit_type.to_ascii_lowercase();
                fragments.iter().any(|f| unit_type.contains(f.as_str()))
            })
            .collect()
    }
}

impl UnitCatalog for [MechanicalUnitDef] {
    fn units(&self) -> &[MechanicalUnitDef] {
        self
    }
}

impl UnitCatalog for Vec<MechanicalUnitDef> {
    fn units(&self) -> &[MechanicalUnitDef] {
        self
    }
}

impl UnitCatalog for Project {
    fn units(&self) -> &[MechanicalUnitDef] {
        &self.mechanical_units
    }
}
