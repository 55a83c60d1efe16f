//! Flat default tables used when a record carries no value of its own.

use dn_project::ComponentType;

/// Noise level assumed for a linked mechanical unit with neither a spectrum
/// nor a scheduled dBA.
pub const DEFAULT_UNIT_DBA: f64 = 50.0;

/// Typical noise level (dBA) of a drawn component type.
pub fn default_noise_level(kind: ComponentType) -> f64 {
    match kind {
        ComponentType::Ahu => 72.0,
        ComponentType::Rtu => 70.0,
        ComponentType::Fan => 65.0,
        ComponentType::Fcu => 48.0,
        ComponentType::Vav => 40.0,
        ComponentType::Damper => 35.0,
        ComponentType::Diffuser | ComponentType::Grille | ComponentType::Terminal => 30.0,
        ComponentType::Elbow | ComponentType::Junction | ComponentType::Branch => 0.0,
        ComponentType::Silencer => 0.0,
        ComponentType::Other => 50.0,
    }
}

/// Default noise adjustment (dB) of a fitting, looked up by its type name.
///
/// Names are matched loosely ("elbow_90", "90 deg elbow" and "Elbow" all hit
/// the elbow row). Unknown fittings contribute nothing.
pub fn default_fitting_adjustment(fitting_type: &str) -> f64 {
    let name = fitting_type.to_ascii_lowercase();
    const TABLE: &[(&str, f64)] = &[
        ("silencer", -10.0),
        ("elbow", 3.0),
        ("tee", 2.0),
        ("wye", 2.0),
        ("branch", 2.0),
        ("junction", 2.0),
        ("damper", 5.0),
        ("transition", 1.0),
        ("reducer", 1.0),
        ("diffuser", 3.0),
        ("grille", 2.0),
        ("takeoff", 2.0),
    ];
    TABLE
        .iter()
        .find(|(key, _)| name.contains(key))
        .map(|&(_, adj)| adj)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_component_type_has_a_level() {
        for kind in ComponentType::ALL {
            assert!(default_noise_level(kind) >= 0.0);
        }
        assert_eq!(default_noise_level(ComponentType::Ahu), 72.0);
    }

    #[test]
    fn fitting_names_match_loosely() {
        assert_eq!(default_fitting_adjustment("elbow_90"), 3.0);
        assert_eq!(default_fitting_adjustment("90 deg Elbow"), 3.0);
        assert_eq!(default_fitting_adjustment("Branch Tee"), 2.0);
        assert_eq!(default_fitting_adjustment("inline silencer"), -10.0);
        assert_eq!(default_fitting_adjustment("access door"), 0.0);
    }
}
