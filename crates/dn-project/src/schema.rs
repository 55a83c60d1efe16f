//! Project schema definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
    #[serde(default)]
    pub paths: Vec<PathDef>,
    #[serde(default)]
    pub mechanical_units: Vec<MechanicalUnitDef>,
    #[serde(default)]
    pub spaces: Vec<SpaceDef>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            components: Vec::new(),
            segments: Vec::new(),
            paths: Vec::new(),
            mechanical_units: Vec::new(),
            spaces: Vec::new(),
        }
    }

    pub fn component(&self, id: &str) -> Option<&ComponentDef> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn segment(&self, id: &str) -> Option<&SegmentDef> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_mut(&mut self, id: &str) -> Option<&mut SegmentDef> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    pub fn path(&self, id: &str) -> Option<&PathDef> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn path_mut(&mut self, id: &str) -> Option<&mut PathDef> {
        self.paths.iter_mut().find(|p| p.id == id)
    }

    pub fn mechanical_unit(&self, id: &str) -> Option<&MechanicalUnitDef> {
        self.mechanical_units.iter().find(|u| u.id == id)
    }

    pub fn space(&self, id: &str) -> Option<&SpaceDef> {
        self.spaces.iter().find(|s| s.id == id)
    }

    /// Paths that include the given segment.
    pub fn paths_through_segment(&self, segment_id: &str) -> Vec<String> {
        self.paths
            .iter()
            .filter(|p| p.segment_ids.iter().any(|s| s == segment_id))
            .map(|p| p.id.clone())
            .collect()
    }
}

/// Kind of drawn component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Ahu,
    Fan,
    Rtu,
    Fcu,
    Vav,
    Diffuser,
    Grille,
    Elbow,
    Junction,
    Branch,
    Damper,
    Silencer,
    Terminal,
    Other,
}

impl ComponentType {
    pub const ALL: [ComponentType; 14] = [
        ComponentType::Ahu,
        ComponentType::Fan,
        ComponentType::Rtu,
        ComponentType::Fcu,
        ComponentType::Vav,
        ComponentType::Diffuser,
        ComponentType::Grille,
        ComponentType::Elbow,
        ComponentType::Junction,
        ComponentType::Branch,
        ComponentType::Damper,
        ComponentType::Silencer,
        ComponentType::Terminal,
        ComponentType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Ahu => "ahu",
            ComponentType::Fan => "fan",
            ComponentType::Rtu => "rtu",
            ComponentType::Fcu => "fcu",
            ComponentType::Vav => "vav",
            ComponentType::Diffuser => "diffuser",
            ComponentType::Grille => "grille",
            ComponentType::Elbow => "elbow",
            ComponentType::Junction => "junction",
            ComponentType::Branch => "branch",
            ComponentType::Damper => "damper",
            ComponentType::Silencer => "silencer",
            ComponentType::Terminal => "terminal",
            ComponentType::Other => "other",
        }
    }

    /// Equipment that generates the noise a path carries.
    pub fn is_source(self) -> bool {
        matches!(
            self,
            ComponentType::Ahu | ComponentType::Fan | ComponentType::Rtu | ComponentType::Fcu
        )
    }

    /// Devices where a path delivers air into a space.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ComponentType::Diffuser | ComponentType::Grille | ComponentType::Terminal
        )
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let kind = match key.as_str() {
            "ahu" | "air_handler" | "air_handling_unit" => ComponentType::Ahu,
            "fan" | "exhaust_fan" | "supply_fan" => ComponentType::Fan,
            "rtu" | "rooftop_unit" => ComponentType::Rtu,
            "fcu" | "fan_coil" | "fan_coil_unit" => ComponentType::Fcu,
            "vav" | "vav_box" => ComponentType::Vav,
            "diffuser" => ComponentType::Diffuser,
            "grille" | "register" => ComponentType::Grille,
            "elbow" => ComponentType::Elbow,
            "junction" | "tee" => ComponentType::Junction,
            "branch" | "wye" => ComponentType::Branch,
            "damper" => ComponentType::Damper,
            "silencer" => ComponentType::Silencer,
            "terminal" => ComponentType::Terminal,
            "other" => ComponentType::Other,
            _ => return Err(format!("unknown component type '{s}'")),
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PositionDef {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub kind: ComponentType,
    #[serde(default)]
    pub position: PositionDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_level_dba: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate_cfm: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub id: String,
    #[serde(default)]
    pub from_component_id: Option<String>,
    #[serde(default)]
    pub to_component_id: Option<String>,
    /// Stored position of the segment within its path. Only a hint: the
    /// authoritative order comes from topology.
    #[serde(default)]
    pub order: i64,
    pub length_ft: f64,
    pub shape: DuctShapeDef,
    #[serde(default)]
    pub duct_type: DuctType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation: Option<String>,
    #[serde(default)]
    pub lining_thickness_in: f64,
    #[serde(default)]
    pub fittings: Vec<FittingDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate_cfm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_fpm: Option<f64>,
}

impl SegmentDef {
    /// A plain sheet-metal rectangular run with no fittings.
    pub fn rectangular(
        id: &str,
        from: Option<&str>,
        to: Option<&str>,
        length_ft: f64,
        width_in: f64,
        height_in: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            from_component_id: from.map(str::to_string),
            to_component_id: to.map(str::to_string),
            order: 0,
            length_ft,
            shape: DuctShapeDef::Rectangular {
                width_in,
                height_in,
            },
            duct_type: DuctType::default(),
            insulation: None,
            lining_thickness_in: 0.0,
            fittings: Vec::new(),
            flow_rate_cfm: None,
            velocity_fpm: None,
        }
    }
}

impl dn_graph::DuctEdge for SegmentDef {
    fn edge_key(&self) -> &str {
        &self.id
    }

    fn from_component(&self) -> Option<&str> {
        self.from_component_id.as_deref()
    }

    fn to_component(&self) -> Option<&str> {
        self.to_component_id.as_deref()
    }

    fn order_hint(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DuctShapeDef {
    Rectangular { width_in: f64, height_in: f64 },
    Circular { diameter_in: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuctType {
    #[default]
    SheetMetal,
    FiberglassBoard,
    Flexible,
    Other,
}

impl DuctType {
    pub fn as_str(self) -> &'static str {
        match self {
            DuctType::SheetMetal => "sheet_metal",
            DuctType::FiberglassBoard => "fiberglass_board",
            DuctType::Flexible => "flexible",
            DuctType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingDef {
    pub fitting_type: String,
    /// Distance from the segment's upstream end (ft).
    #[serde(default)]
    pub position_ft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_adjustment_db: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub segment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanical_unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_space_id: Option<String>,
    /// Last calculated values, overwritten on every recalculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<CachedResultDef>,
}

impl PathDef {
    pub fn new(id: &str, name: &str, segment_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            segment_ids: segment_ids.iter().map(|s| s.to_string()).collect(),
            primary_source_id: None,
            mechanical_unit_id: None,
            terminal_component_id: None,
            target_space_id: None,
            last_result: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedResultDef {
    pub terminal_noise_dba: f64,
    pub nc_rating: u8,
    pub calculation_valid: bool,
    pub calculated_at: String,
}

/// Equipment record imported from a mechanical schedule.
///
/// Spectra are stored the way schedules deliver them: JSON objects keyed by
/// band label, e.g. `{"63": 72, "125": 70, ..., "8000": 51}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MechanicalUnitDef {
    pub id: String,
    pub name: String,
    pub unit_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airflow_cfm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_noise_dba: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_spectrum_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiated_spectrum_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet_spectrum_json: Option<String>,
}

impl MechanicalUnitDef {
    pub fn new(id: &str, name: &str, unit_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit_type: unit_type.to_string(),
            airflow_cfm: None,
            base_noise_dba: None,
            inlet_spectrum_json: None,
            radiated_spectrum_json: None,
            outlet_spectrum_json: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceDef {
    pub id: String,
    pub name: String,
    /// Occupancy type used for NC targets, e.g. "private_office".
    pub space_type: String,
}
