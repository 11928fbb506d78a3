use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PackError;

/// Axis-aligned extent of a box or pallet: width runs along x, depth along y,
/// height along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 3]", from = "[u32; 3]")]
pub struct Dims {
    pub width: u32,
    pub depth: u32,
    pub height: u32,
}

impl Dims {
    pub fn new(width: u32, depth: u32, height: u32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    pub fn volume(&self) -> u64 {
        self.width as u64 * self.depth as u64 * self.height as u64
    }
}

impl From<Dims> for [u32; 3] {
    fn from(d: Dims) -> Self {
        [d.width, d.depth, d.height]
    }
}

impl From<[u32; 3]> for Dims {
    fn from([width, depth, height]: [u32; 3]) -> Self {
        Self::new(width, depth, height)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.depth, self.height)
    }
}

/// Placement origin of an item: its minimum corner on the pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "[u32; 3]", from = "[u32; 3]")]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Position {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for [u32; 3] {
    fn from(p: Position) -> Self {
        [p.x, p.y, p.z]
    }
}

impl From<[u32; 3]> for Position {
    fn from([x, y, z]: [u32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangular,
    Round,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Rectangular => f.write_str("rectangular"),
            Shape::Round => f.write_str("round"),
        }
    }
}

/// One line of the box demand, before expansion into unit instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub depth: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    pub weight: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
    #[serde(default, deserialize_with = "deserialize_opt_u32_from_number")]
    pub type_id: Option<u32>,
    /// Extra length this box may protrude past the pallet's width edge.
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub overage: u32,
}

fn default_true() -> bool {
    true
}

impl BoxSpec {
    pub fn new(width: u32, depth: u32, height: u32, weight: f64, quantity: u32) -> Self {
        Self {
            width,
            depth,
            height,
            weight,
            quantity,
            shape: Shape::Rectangular,
            can_rotate: true,
            type_id: None,
            overage: 0,
        }
    }

    pub fn round(mut self) -> Self {
        self.shape = Shape::Round;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.can_rotate = false;
        self
    }

    pub fn with_type_id(mut self, type_id: u32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn with_overage(mut self, overage: u32) -> Self {
        self.overage = overage;
        self
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.depth, self.height)
    }

    pub fn validate(&self) -> Result<(), PackError> {
        if self.width == 0 || self.depth == 0 || self.height == 0 {
            return Err(PackError::InvalidInput(format!(
                "box dimensions must be non-zero, got {}",
                self.dims()
            )));
        }
        if self.quantity == 0 {
            return Err(PackError::InvalidInput(format!(
                "box {} quantity must be non-zero",
                self.dims()
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(PackError::InvalidInput(format!(
                "box {} weight must be a non-negative number, got {}",
                self.dims(),
                self.weight
            )));
        }
        Ok(())
    }
}

/// Catalog entry from which live pallets are cloned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletType {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub depth: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    pub own_weight: f64,
    pub max_weight: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub type_id: u32,
}

impl PalletType {
    pub fn new(
        width: u32,
        depth: u32,
        height: u32,
        own_weight: f64,
        max_weight: f64,
        type_id: u32,
    ) -> Self {
        Self {
            width,
            depth,
            height,
            own_weight,
            max_weight,
            type_id,
        }
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.depth, self.height)
    }

    pub fn volume(&self) -> u64 {
        self.dims().volume()
    }

    pub fn validate(&self) -> Result<(), PackError> {
        if self.width == 0 || self.depth == 0 || self.height == 0 {
            return Err(PackError::InvalidInput(format!(
                "pallet type {} dimensions must be non-zero, got {}",
                self.type_id,
                self.dims()
            )));
        }
        for (name, value) in [("own_weight", self.own_weight), ("max_weight", self.max_weight)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PackError::InvalidInput(format!(
                    "pallet type {} {name} must be a non-negative number, got {value}",
                    self.type_id
                )));
            }
        }
        Ok(())
    }
}

/// Identity reported for a placed item: the caller's type id when one was
/// given, otherwise a sequence number assigned at expansion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemId {
    Type(u32),
    Unit(u64),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Type(id) => write!(f, "{id}"),
            ItemId::Unit(n) => write!(f, "unit-{n}"),
        }
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemId::Type(id) => serializer.serialize_u32(*id),
            ItemId::Unit(_) => serializer.collect_str(self),
        }
    }
}

/// A single expanded box instance. Only `dims` changes, and only when a
/// placement commits an orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: ItemId,
    pub shape: Shape,
    pub weight: f64,
    pub dims: Dims,
    pub can_rotate: bool,
    pub overage: u32,
}

impl Unit {
    pub fn from_spec(spec: &BoxSpec, id: ItemId) -> Self {
        Self {
            id,
            shape: spec.shape,
            weight: spec.weight,
            dims: spec.dims(),
            can_rotate: spec.can_rotate,
            overage: spec.overage,
        }
    }

    pub fn is_round(&self) -> bool {
        self.shape == Shape::Round
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanItem {
    pub box_id: ItemId,
    pub shape: Shape,
    pub weight: f64,
    pub dimensions: Dims,
    pub position: Position,
}

/// Immutable summary of one finalized pallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRecord {
    pub type_id: u32,
    pub items: Vec<PlanItem>,
    pub load_weight: f64,
    pub total_weight: f64,
    pub total_height: u32,
    pub total_items: usize,
}

impl PlanRecord {
    pub fn round_items(&self) -> usize {
        self.items.iter().filter(|i| i.shape == Shape::Round).count()
    }
}

pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    number_to_u32(value).map_err(de::Error::custom)
}

pub fn deserialize_opt_u32_from_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(value) => number_to_u32(value).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

fn number_to_u32(value: f64) -> Result<u32, String> {
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(format!("expected a non-negative integer, got {value}"));
    }
    Ok(value as u32)
}
