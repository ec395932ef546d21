// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Equipment records and their placement conventions.

use core::fmt;
use core::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Kind of plant equipment.
///
/// Unknown type names deserialize to [`EquipmentType::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentType {
    /// Office, warehouse, control room.
    Building,
    /// Gantry or jib crane.
    Crane,
    /// Vertical storage tank.
    Tank,
    /// Ground terrain; never built as equipment geometry.
    Terrain,
    /// Pipe run.
    Pipe,
    /// Inline valve.
    Valve,
    /// Pressurized storage sphere.
    Sphere,
    /// Process vessel (vertical or horizontal).
    Vessel,
    /// Pump with motor.
    Pump,
    /// Moored ship.
    Ship,
    /// Moored barge.
    Barge,
    /// Anything the engine has no dedicated shape for.
    #[serde(other)]
    Other,
}

impl EquipmentType {
    /// Every known kind, in layer order.
    pub const ALL: [Self; 12] = [
        Self::Terrain,
        Self::Building,
        Self::Crane,
        Self::Tank,
        Self::Sphere,
        Self::Vessel,
        Self::Pump,
        Self::Pipe,
        Self::Valve,
        Self::Ship,
        Self::Barge,
        Self::Other,
    ];

    /// Canonical name as used in data files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "Building",
            Self::Crane => "Crane",
            Self::Tank => "Tank",
            Self::Terrain => "Terrain",
            Self::Pipe => "Pipe",
            Self::Valve => "Valve",
            Self::Sphere => "Sphere",
            Self::Vessel => "Vessel",
            Self::Pump => "Pump",
            Self::Ship => "Ship",
            Self::Barge => "Barge",
            Self::Other => "Other",
        }
    }

    /// Tall structures get a larger annotation clearance than squat ones.
    pub const fn is_tall(self) -> bool {
        matches!(
            self,
            Self::Building | Self::Crane | Self::Tank | Self::Sphere | Self::Vessel | Self::Ship
        )
    }

    /// Factory defaults as `(width, height, depth)` for box-like kinds, or the
    /// nominal radius/height pair encoded as `(2r, h, 2r)` for round kinds.
    pub const fn default_dimensions(self) -> Dimensions {
        match self {
            Self::Building => Dimensions::new(5.0, 5.0, 5.0),
            Self::Crane => Dimensions::new(3.0, 10.0, 3.0),
            Self::Tank => Dimensions::new(4.0, 4.0, 4.0),
            Self::Pipe => Dimensions::new(0.4, 5.0, 0.4),
            Self::Valve => Dimensions::new(0.6, 0.6, 0.6),
            Self::Sphere => Dimensions::new(6.0, 6.0, 6.0),
            Self::Vessel => Dimensions::new(2.0, 3.0, 2.0),
            Self::Pump => Dimensions::new(0.6, 0.6, 1.0),
            Self::Ship => Dimensions::new(10.0, 4.0, 40.0),
            Self::Barge => Dimensions::new(8.0, 1.5, 20.0),
            Self::Terrain | Self::Other => Dimensions::new(1.0, 1.0, 1.0),
        }
    }

    /// Default radius for round kinds.
    pub const fn default_radius(self) -> Option<f32> {
        match self {
            Self::Tank => Some(2.0),
            Self::Pipe => Some(0.2),
            Self::Valve => Some(0.3),
            Self::Sphere => Some(3.0),
            Self::Vessel => Some(1.0),
            _ => None,
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(Self::Other))
    }
}

/// Vessel orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Axis along world Y.
    #[default]
    Vertical,
    /// Axis along world X.
    Horizontal,
}

/// How an item's `position` relates to its built shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchoring {
    /// `position` is the bottom of the body; the shape is lifted by half its height.
    Base,
    /// `position` is the shape's center.
    Center,
}

/// How equipment colors are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// Procedural color from the product code.
    #[serde(rename = "Produto", alias = "Product")]
    Product,
    /// Fixed palette per operational state.
    #[serde(rename = "Estado Operacional", alias = "OperationalState")]
    OperationalState,
    /// Each record's own base color.
    #[default]
    #[serde(rename = "Equipamento", alias = "Equipment")]
    Equipment,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "produto" => Ok(Self::Product),
            "operational-state" | "operationalstate" | "state" | "estado operacional" => {
                Ok(Self::OperationalState)
            }
            "equipment" | "equipamento" => Ok(Self::Equipment),
            other => Err(format!("unknown color mode {other:?}")),
        }
    }
}

/// Width/height/depth triple in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub depth: f32,
}

impl Dimensions {
    /// Creates a dimension triple.
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

fn positive(v: Option<f32>) -> Option<f32> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

fn merge<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

fn default_color() -> String {
    "#808080".to_owned()
}

/// One piece of equipment as supplied by the data source.
///
/// Identity is the `tag`; all other attributes may change between passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    /// Unique identifier.
    pub tag: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Equipment kind.
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    /// Owning process system, used for framing and filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sistema: Option<String>,
    /// Plant area, used for filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Operational state label (`operando`, `manutenção`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_state: Option<String>,
    /// Product code handled by the equipment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// World position; see [`Anchoring`].
    pub position: Vec3,
    /// XYZ Euler rotation in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    /// Box dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Dimensions>,
    /// Radius for round kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    /// Height (length, for pipes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Base color as `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Vessel orientation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl EquipmentItem {
    /// Minimal record with defaults for everything but identity, kind and position.
    pub fn new(tag: impl Into<String>, kind: EquipmentType, position: Vec3) -> Self {
        let tag = tag.into();
        Self {
            name: tag.clone(),
            tag,
            kind,
            sistema: None,
            area: None,
            operational_state: None,
            product: None,
            position,
            rotation: None,
            size: None,
            radius: None,
            height: None,
            color: default_color(),
            orientation: None,
            details: None,
        }
    }

    /// Placement convention for this record.
    pub fn anchoring(&self) -> Anchoring {
        match self.kind {
            EquipmentType::Pipe | EquipmentType::Valve | EquipmentType::Sphere => Anchoring::Center,
            EquipmentType::Vessel if self.orientation == Some(Orientation::Horizontal) => {
                Anchoring::Center
            }
            _ => Anchoring::Base,
        }
    }

    /// Radius with factory defaults applied (round kinds only).
    pub fn resolved_radius(&self) -> Option<f32> {
        positive(self.radius).or_else(|| self.kind.default_radius())
    }

    /// Height with factory defaults applied.
    pub fn resolved_height(&self) -> f32 {
        let fallback = self.kind.default_dimensions().height;
        match self.kind {
            EquipmentType::Tank | EquipmentType::Pipe | EquipmentType::Vessel => {
                positive(self.height).unwrap_or(fallback)
            }
            EquipmentType::Sphere | EquipmentType::Valve => {
                self.resolved_radius().map_or(fallback, |r| r * 2.0)
            }
            _ => positive(self.size.map(|s| s.height))
                .or_else(|| positive(self.height))
                .unwrap_or(fallback),
        }
    }

    /// Unrotated body extents with factory defaults applied.
    ///
    /// Horizontal vessels report their length along X.
    pub fn resolved_dimensions(&self) -> Dimensions {
        let d = self.kind.default_dimensions();
        let h = self.resolved_height();
        match (self.kind, self.resolved_radius()) {
            (EquipmentType::Vessel, Some(r)) if self.orientation == Some(Orientation::Horizontal) => {
                Dimensions::new(h, r * 2.0, r * 2.0)
            }
            (_, Some(r)) => Dimensions::new(r * 2.0, h, r * 2.0),
            (_, None) => {
                let s = self.size;
                Dimensions::new(
                    positive(s.map(|s| s.width)).unwrap_or(d.width),
                    h,
                    positive(s.map(|s| s.depth)).unwrap_or(d.depth),
                )
            }
        }
    }

    /// Vertical extent of the body measured from the anchor point upward.
    pub fn extent_above_anchor(&self) -> f32 {
        let h = self.resolved_dimensions().height;
        match self.anchoring() {
            Anchoring::Base => h,
            Anchoring::Center => h * 0.5,
        }
    }

    /// Checks the record is usable by the engine.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.tag.trim().is_empty() {
            return Err(SceneError::EmptyTag);
        }
        if !self.position.is_finite() {
            return Err(SceneError::NonFinite {
                tag: self.tag.clone(),
                field: "position",
            });
        }
        if self.rotation.is_some_and(|r| !r.is_finite()) {
            return Err(SceneError::NonFinite {
                tag: self.tag.clone(),
                field: "rotation",
            });
        }
        Ok(())
    }

    /// Applies a partial update; the tag never changes.
    pub fn apply_patch(&mut self, patch: &EquipmentPatch) {
        let p = patch.clone();
        if let Some(v) = p.name {
            self.name = v;
        }
        if let Some(v) = p.position {
            self.position = v;
        }
        if let Some(v) = p.color {
            self.color = v;
        }
        merge(&mut self.sistema, p.sistema);
        merge(&mut self.area, p.area);
        merge(&mut self.operational_state, p.operational_state);
        merge(&mut self.product, p.product);
        merge(&mut self.rotation, p.rotation);
        merge(&mut self.size, p.size);
        merge(&mut self.radius, p.radius);
        merge(&mut self.height, p.height);
        merge(&mut self.orientation, p.orientation);
        merge(&mut self.details, p.details);
    }
}

/// Partial update for [`EquipmentItem`]. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentPatch {
    /// New display name.
    pub name: Option<String>,
    /// New system.
    pub sistema: Option<String>,
    /// New area.
    pub area: Option<String>,
    /// New operational state.
    pub operational_state: Option<String>,
    /// New product code.
    pub product: Option<String>,
    /// New position.
    pub position: Option<Vec3>,
    /// New rotation.
    pub rotation: Option<Vec3>,
    /// New box dimensions.
    pub size: Option<Dimensions>,
    /// New radius.
    pub radius: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New base color.
    pub color: Option<String>,
    /// New orientation.
    pub orientation: Option<Orientation>,
    /// New notes.
    pub details: Option<String>,
}
