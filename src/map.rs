use std::collections::HashSet;
use std::fmt;

use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::capture_point::CapturePoint;
use crate::host::{HostPoint, SpawnerId};
use crate::team::{Allegiance, Team};


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CapturePointConfig {
    pub id: PointId,
    // Host object backing the point. Used to configure the host objective at setup.
    pub object: HostPoint,
    pub name: String,
    // Parallel lists: the i-th spawner of one team is paired with the i-th spawner of the other.
    #[serde(default)]
    pub vehicle_spawners: EnumMap<Team, Vec<SpawnerId>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    pub capture_points: Vec<CapturePointConfig>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MapConfigError {
    DuplicatePointId(PointId),
    EmptyPointName(PointId),
}

impl fmt::Display for MapConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapConfigError::DuplicatePointId(id) => write!(f, "duplicate capture point id {id}"),
            MapConfigError::EmptyPointName(id) => write!(f, "capture point {id} has no name"),
        }
    }
}

impl std::error::Error for MapConfigError {}

impl MapConfig {
    // Improvement potential. Firestorm is the only map configured so far. Add the rest once their
    // capture point objects and vehicle spawners are placed.
    pub fn firestorm() -> Self {
        let point = |id, object, name: &str, spawners: Vec<u32>| {
            let spawners = spawners.into_iter().map(SpawnerId).collect::<Vec<_>>();
            CapturePointConfig {
                id: PointId(id),
                object: HostPoint(object),
                name: name.to_owned(),
                vehicle_spawners: enum_map! { _ => spawners.clone() },
            }
        };
        MapConfig {
            name: "Firestorm".to_owned(),
            capture_points: vec![
                point(101, 1, "A", vec![1010]),
                point(102, 2, "B", vec![]),
                point(103, 3, "C", vec![]),
                point(104, 4, "D", vec![]),
                point(105, 5, "E", vec![]),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), MapConfigError> {
        let mut seen = HashSet::new();
        for point in &self.capture_points {
            if !seen.insert(point.id) {
                return Err(MapConfigError::DuplicatePointId(point.id));
            }
            if point.name.trim().is_empty() {
                return Err(MapConfigError::EmptyPointName(point.id));
            }
        }
        Ok(())
    }
}


// Point registry. Built once at startup. Maps have a handful of zones, so a linear scan is all the
// lookup we need.
#[derive(Clone, Debug)]
pub struct Map {
    name: String,
    capture_points: Vec<CapturePoint>,
}

impl Map {
    pub fn new(config: &MapConfig) -> Self {
        Map {
            name: config.name.clone(),
            capture_points: config.capture_points.iter().map(CapturePoint::new).collect(),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn capture_points(&self) -> &[CapturePoint] { &self.capture_points }

    // Unknown ids are expected: host events can reference points before the map is set up.
    pub fn capture_point(&self, id: PointId) -> Option<&CapturePoint> {
        self.capture_points.iter().find(|p| p.id() == id)
    }
    pub fn capture_point_mut(&mut self, id: PointId) -> Option<&mut CapturePoint> {
        self.capture_points.iter_mut().find(|p| p.id() == id)
    }

    pub fn point_owners(&self) -> Vec<(PointId, Allegiance)> {
        self.capture_points.iter().map(|p| (p.id(), p.owner())).collect()
    }
}
