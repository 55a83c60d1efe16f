//! Space-type NC targets and remediation advice.

use std::fmt;
use std::str::FromStr;

use dn_core::OctaveBands;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AcousticsError;
use crate::nc::NcAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    PrivateOffice,
    OpenOffice,
    ConferenceRoom,
    Classroom,
    Library,
    Auditorium,
    Gymnasium,
    HospitalRoom,
    Restaurant,
    Retail,
    Lobby,
    Corridor,
    Residential,
}

/// Recommended and maximum NC for a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpaceCriteria {
    pub recommended_nc: u8,
    pub maximum_nc: u8,
}

impl SpaceType {
    pub const ALL: [SpaceType; 13] = [
        SpaceType::PrivateOffice,
        SpaceType::OpenOffice,
        SpaceType::ConferenceRoom,
        SpaceType::Classroom,
        SpaceType::Library,
        SpaceType::Auditorium,
        SpaceType::Gymnasium,
        SpaceType::HospitalRoom,
        SpaceType::Restaurant,
        SpaceType::Retail,
        SpaceType::Lobby,
        SpaceType::Corridor,
        SpaceType::Residential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpaceType::PrivateOffice => "private_office",
            SpaceType::OpenOffice => "open_office",
            SpaceType::ConferenceRoom => "conference_room",
            SpaceType::Classroom => "classroom",
            SpaceType::Library => "library",
            SpaceType::Auditorium => "auditorium",
            SpaceType::Gymnasium => "gymnasium",
            SpaceType::HospitalRoom => "hospital_room",
            SpaceType::Restaurant => "restaurant",
            SpaceType::Retail => "retail",
            SpaceType::Lobby => "lobby",
            SpaceType::Corridor => "corridor",
            SpaceType::Residential => "residential",
        }
    }

    pub fn criteria(self) -> SpaceCriteria {
        let (recommended_nc, maximum_nc) = match self {
            SpaceType::PrivateOffice => (30, 35),
            SpaceType::OpenOffice => (35, 40),
            SpaceType::ConferenceRoom | SpaceType::Classroom => (25, 30),
            SpaceType::Library => (30, 35),
            SpaceType::Auditorium => (20, 25),
            SpaceType::Gymnasium => (40, 50),
            SpaceType::HospitalRoom => (25, 30),
            SpaceType::Restaurant | SpaceType::Retail => (40, 45),
            SpaceType::Lobby | SpaceType::Corridor => (40, 45),
            SpaceType::Residential => (25, 35),
        };
        SpaceCriteria {
            recommended_nc,
            maximum_nc,
        }
    }

    /// Like `parse`, but unknown names fall back to an open office.
    pub fn lookup(name: &str) -> SpaceType {
        name.parse().unwrap_or_else(|_| {
            debug!(space_type = name, "unknown space type, using open_office");
            SpaceType::OpenOffice
        })
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = AcousticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let alias = match wanted.as_str() {
            "office" => Some(SpaceType::PrivateOffice),
            "conference" | "meeting_room" => Some(SpaceType::ConferenceRoom),
            "gym" => Some(SpaceType::Gymnasium),
            "hospital" | "patient_room" => Some(SpaceType::HospitalRoom),
            _ => None,
        };
        alias
            .or_else(|| Self::ALL.into_iter().find(|t| t.as_str() == wanted))
            .ok_or_else(|| AcousticsError::UnknownSpaceType { name: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// At or below the recommended NC.
    Meets,
    /// Above recommended but within the maximum.
    Acceptable,
    Exceeds,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::Meets => "meets",
            ComplianceStatus::Acceptable => "acceptable",
            ComplianceStatus::Exceeds => "exceeds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardsComparison {
    pub space_type: SpaceType,
    pub criteria: SpaceCriteria,
    pub actual_nc: u8,
    pub status: ComplianceStatus,
    /// dB above the recommended NC (0 when it is met).
    pub reduction_needed: u8,
    pub recommendations: Vec<String>,
}

/// Remediation advice for bringing `current_nc` down to `target_nc`.
///
/// With a spectrum, low- and high-frequency callouts are added when those
/// bands dominate the 1 kHz band.
pub fn recommend_noise_control(
    current_nc: u8,
    target_nc: u8,
    spectrum: Option<&OctaveBands>,
) -> Vec<String> {
    let reduction_needed = current_nc.saturating_sub(target_nc);
    if reduction_needed == 0 {
        return vec![format!(
            "Meets NC-{target_nc}; no additional noise control required"
        )];
    }

    let mut out = Vec::new();
    if reduction_needed <= 5 {
        out.push(format!(
            "Minor reduction of {reduction_needed} dB: add internal duct lining near the terminal"
        ));
        out.push("Select a lower-noise diffuser or reduce its neck velocity".to_string());
    } else if reduction_needed <= 10 {
        out.push(format!(
            "Moderate reduction of {reduction_needed} dB: install a duct silencer downstream of the source"
        ));
        out.push("Reduce duct velocity by upsizing the main run".to_string());
        out.push("Extend lined duct length before the first takeoff".to_string());
    } else {
        out.push(format!(
            "Major reduction of {reduction_needed} dB: review equipment selection and location"
        ));
        out.push("Combine silencers with lined duct and lower system velocities".to_string());
        out.push("Consider rerouting ductwork away from the space".to_string());
    }

    if let Some(spectrum) = spectrum {
        let levels = spectrum.levels();
        let low = (levels[0] + levels[1]) / 2.0;
        let high = (levels[6] + levels[7]) / 2.0;
        let mid = levels[4];
        if low > mid + 10.0 {
            out.push(
                "Low frequencies dominate: favour plenum or elbow treatment and rigid duct over thin liners"
                    .to_string(),
            );
        }
        if high > mid {
            out.push(
                "High frequencies dominate: duct lining and lined elbows are effective here".to_string(),
            );
        }
    }
    out
}

/// Grade an analysis against the targets of a space type.
pub fn compare_to_standards(analysis: &NcAnalysis, space_type: SpaceType) -> StandardsComparison {
    let criteria = space_type.criteria();
    let actual_nc = analysis.nc_rating;
    let status = if actual_nc <= criteria.recommended_nc {
        ComplianceStatus::Meets
    } else if actual_nc <= criteria.maximum_nc {
        ComplianceStatus::Acceptable
    } else {
        ComplianceStatus::Exceeds
    };
    StandardsComparison {
        space_type,
        criteria,
        actual_nc,
        status,
        reduction_needed: actual_nc.saturating_sub(criteria.recommended_nc),
        recommendations: recommend_noise_control(
            actual_nc,
            criteria.recommended_nc,
            Some(&analysis.spectrum),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze_octave_band_data;

    #[test]
    fn space_table() {
        assert_eq!(SpaceType::Auditorium.criteria().recommended_nc, 20);
        assert_eq!(SpaceType::Gymnasium.criteria().maximum_nc, 50);
        for t in SpaceType::ALL {
            let c = t.criteria();
            assert!(c.recommended_nc <= c.maximum_nc, "{t}");
        }
    }

    #[test]
    fn space_names_parse() {
        assert_eq!("Open Office".parse::<SpaceType>().unwrap(), SpaceType::OpenOffice);
        assert_eq!("gym".parse::<SpaceType>().unwrap(), SpaceType::Gymnasium);
        assert!("hangar".parse::<SpaceType>().is_err());
        assert_eq!(SpaceType::lookup("hangar"), SpaceType::OpenOffice);
    }

    #[test]
    fn tiers() {
        assert!(recommend_noise_control(30, 35, None)[0].starts_with("Meets"));
        assert!(recommend_noise_control(40, 35, None)[0].starts_with("Minor"));
        assert!(recommend_noise_control(45, 35, None)[0].starts_with("Moderate"));
        assert!(recommend_noise_control(55, 35, None)[0].starts_with("Major"));
    }

    #[test]
    fn frequency_callouts() {
        let rumble = OctaveBands::new([70.0, 66.0, 55.0, 48.0, 45.0, 40.0, 35.0, 30.0]);
        let advice = recommend_noise_control(50, 35, Some(&rumble));
        assert!(advice.iter().any(|a| a.starts_with("Low frequencies")));
        assert!(!advice.iter().any(|a| a.starts_with("High frequencies")));
    }

    #[test]
    fn comparison_status() {
        let spectrum = OctaveBands::new([60.0, 55.0, 50.0, 48.0, 45.0, 42.0, 40.0, 38.0]);
        let analysis = analyze_octave_band_data(&spectrum, None).unwrap();

        let office = compare_to_standards(&analysis, SpaceType::OpenOffice);
        assert_eq!(office.actual_nc, 45);
        assert_eq!(office.status, ComplianceStatus::Exceeds);
        assert_eq!(office.reduction_needed, 10);
        assert!(office.recommendations[0].starts_with("Moderate"));

        let gym = compare_to_standards(&analysis, SpaceType::Gymnasium);
        assert_eq!(gym.status, ComplianceStatus::Acceptable);

        let lobby = compare_to_standards(&analysis, SpaceType::Restaurant);
        assert_eq!(lobby.status, ComplianceStatus::Acceptable);
    }
}
