//! Matching drawn components to scheduled mechanical units.

use dn_project::{ComponentType, MechanicalUnitDef};
use tracing::debug;

use crate::traits::UnitCatalog;

/// How a unit was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    ExactName,
    SoleCandidate,
    NumericTag,
    Substring,
    FirstOfType,
}

#[derive(Debug, Clone, Copy)]
pub struct UnitMatch<'a> {
    pub unit: &'a MechanicalUnitDef,
    pub method: MatchMethod,
}

/// Unit-type name fragments a drawn component type may be scheduled under.
pub fn unit_type_family(kind: ComponentType) -> &'static [&'static str] {
    match kind {
        ComponentType::Ahu => &["AHU", "Air Handl"],
        ComponentType::Fan => &["EF", "SF", "RF", "Fan"],
        ComponentType::Rtu => &["RTU", "Rooftop"],
        ComponentType::Fcu => &["FCU", "Fan Coil"],
        ComponentType::Vav => &["VAV"],
        _ => &[],
    }
}

/// Digits of a tag concatenated in order (`"AHU-12b"` → `"12"`).
pub fn numeric_tag(name: &str) -> String {
    name.chars().filter(char::is_ascii_digit).collect()
}

fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the scheduled unit a drawn component stands for.
///
/// An exact (case-insensitive) name wins outright. Otherwise candidates are
/// the units whose type belongs to the component's family; with several of
/// them the numeric tag decides, then name containment, then catalog order.
pub fn match_unit<'a, C>(catalog: &'a C, name: &str, kind: ComponentType) -> Option<UnitMatch<'a>>
where
    C: UnitCatalog + ?Sized,
{
    if let Some(unit) = catalog.find_by_name(name) {
        return Some(UnitMatch {
            unit,
            method: MatchMethod::ExactName,
        });
    }

    let family = unit_type_family(kind);
    if family.is_empty() {
        return None;
    }
    let candidates = catalog.find_by_type(family);
    let found = match candidates.as_slice() {
        [] => None,
        [only] => Some(UnitMatch {
            unit: *only,
            method: MatchMethod::SoleCandidate,
        }),
        many => Some(pick_among(many, name)),
    };
    if let Some(m) = &found {
        debug!(component = name, unit = %m.unit.name, method = ?m.method, "matched mechanical unit");
    }
    found
}

fn pick_among<'a>(candidates: &[&'a MechanicalUnitDef], name: &str) -> UnitMatch<'a> {
    let tag = numeric_tag(name);
    if !tag.is_empty()
        && let Some(unit) = candidates.iter().copied().find(|u| numeric_tag(&u.name) == tag)
    {
        return UnitMatch {
            unit,
            method: MatchMethod::NumericTag,
        };
    }

    let wanted = normalized(name);
    if !wanted.is_empty()
        && let Some(unit) = candidates.iter().copied().find(|u| {
            let have = normalized(&u.name);
            !have.is_empty() && (have.contains(&wanted) || wanted.contains(&have))
        })
    {
        return UnitMatch {
            unit,
            method: MatchMethod::Substring,
        };
    }

    UnitMatch {
        unit: candidates[0],
        method: MatchMethod::FirstOfType,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> Vec<MechanicalUnitDef> {
        vec![
            MechanicalUnitDef::new("u1", "AHU-1", "AHU"),
            MechanicalUnitDef::new("u2", "AHU-2", "AHU"),
            MechanicalUnitDef::new("u3", "EF-1", "Exhaust Fan"),
            MechanicalUnitDef::new("u4", "Lobby Air Handler", "Air Handling Unit"),
        ]
    }

    #[test]
    fn numeric_tag_extracts_digits() {
        assert_eq!(numeric_tag("AHU-12b"), "12");
        assert_eq!(numeric_tag("EF"), "");
    }

    #[test]
    fn exact_name_wins() {
        let units = units();
        let m = match_unit(units.as_slice(), "ahu-2", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.id, "u2");
        assert_eq!(m.method, MatchMethod::ExactName);
    }

    #[test]
    fn tagged_name_among_two_air_handlers() {
        let units = vec![
            MechanicalUnitDef::new("u1", "AHU-1", "AHU"),
            MechanicalUnitDef::new("u2", "AHU-2", "AHU"),
        ];
        // the name is also an exact match, which is checked before tags
        let m = match_unit(units.as_slice(), "AHU-2", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.name, "AHU-2");
        assert_eq!(m.method, MatchMethod::ExactName);

        let m = match_unit(units.as_slice(), "AHU #2", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.name, "AHU-2");
        assert_eq!(m.method, MatchMethod::NumericTag);
    }

    #[test]
    fn numeric_tag_among_family() {
        let units = units();
        let m = match_unit(units.as_slice(), "AHU 2 (north)", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.name, "AHU-2");
        assert_eq!(m.method, MatchMethod::NumericTag);
    }

    #[test]
    fn substring_when_no_digits() {
        let units = units();
        let m = match_unit(units.as_slice(), "Lobby", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.id, "u4");
        assert_eq!(m.method, MatchMethod::Substring);
    }

    #[test]
    fn first_of_type_fallback() {
        let units = units();
        let m = match_unit(units.as_slice(), "AHU-9", ComponentType::Ahu).unwrap();
        assert_eq!(m.unit.id, "u1");
        assert_eq!(m.method, MatchMethod::FirstOfType);
    }

    #[test]
    fn sole_candidate_and_none() {
        let units = units();
        let m = match_unit(units.as_slice(), "Fan 7", ComponentType::Fan).unwrap();
        assert_eq!(m.unit.id, "u3");
        assert_eq!(m.method, MatchMethod::SoleCandidate);

        assert!(match_unit(units.as_slice(), "VAV-3", ComponentType::Vav).is_none());
        assert!(match_unit(units.as_slice(), "D-1", ComponentType::Diffuser).is_none());
    }
}
