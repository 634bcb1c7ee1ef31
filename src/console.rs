//! Console widgets
//!
//! Data behind the non-search console pages: caller geolocation, mission
//! timer and checklist, vitals charts, supervisor bridge, feature cards and
//! the one-click toast actions. All of it is canned demo content.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::defaults;

// ============================================================================
// Caller Geolocator
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CallerLocation {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    pub accuracy: &'static str,
    pub method: &'static str,
}

pub fn caller_location() -> CallerLocation {
    CallerLocation {
        lat: defaults::CALLER_LATITUDE,
        lon: defaults::CALLER_LONGITUDE,
        zoom: defaults::MAP_ZOOM,
        accuracy: "±5m",
        method: "Triangulation",
    }
}

// ============================================================================
// Mission Tracker
// ============================================================================

/// Per-session mission checklist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionChecklist {
    pub location_triangulated: bool,
    pub ems_dispatched: bool,
}

impl Default for MissionChecklist {
    fn default() -> Self {
        Self {
            location_triangulated: true,
            ems_dispatched: false,
        }
    }
}

/// Partial checklist update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistUpdate {
    pub location_triangulated: Option<bool>,
    pub ems_dispatched: Option<bool>,
}

impl MissionChecklist {
    pub fn apply(&mut self, update: &ChecklistUpdate) {
        if let Some(v) = update.location_triangulated {
            self.location_triangulated = v;
        }
        if let Some(v) = update.ems_dispatched {
            self.ems_dispatched = v;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionStatus {
    pub elapsed_secs: u64,
    /// `MM:SS`, minutes not wrapped at 60
    pub timer: String,
    pub timer_label: &'static str,
    pub checklist: MissionChecklist,
}

/// Format whole seconds as `MM:SS`.
pub fn format_timer(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

pub fn mission_status(elapsed_secs: u64, checklist: MissionChecklist) -> MissionStatus {
    MissionStatus {
        elapsed_secs,
        timer: format_timer(elapsed_secs),
        timer_label: "Critical Window",
        checklist,
    }
}

// ============================================================================
// Vitals & Memory
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VitalsSnapshot {
    pub stress: Vec<f64>,
    pub memory_map: Vec<MemoryPoint>,
}

/// Draw a fresh stress series and memory scatter from `rng`.
pub fn vitals_snapshot<R: Rng + ?Sized>(rng: &mut R) -> Result<VitalsSnapshot, NormalError> {
    let stress_dist = Normal::new(defaults::STRESS_MEAN, defaults::STRESS_STD_DEV)?;
    let unit = Normal::new(0.0, 1.0)?;

    let stress = (0..defaults::STRESS_SAMPLES)
        .map(|_| stress_dist.sample(rng))
        .collect();
    let memory_map = (0..defaults::MEMORY_MAP_POINTS)
        .map(|_| MemoryPoint {
            x: unit.sample(rng),
            y: unit.sample(rng),
            z: unit.sample(rng),
        })
        .collect();

    Ok(VitalsSnapshot { stress, memory_map })
}

// ============================================================================
// Supervisor Bridge
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SupervisorFeed {
    pub banner: &'static str,
    pub transcript: &'static str,
}

pub fn supervisor_feed() -> SupervisorFeed {
    SupervisorFeed {
        banner: "SECURE LINE: MONITORING OPERATOR #901",
        transcript: "Operator: Please remain calm...",
    }
}

// ============================================================================
// System Features
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [FeatureCard; 3] = [
    FeatureCard {
        title: "Vector Pulse",
        description: "Qdrant-powered protocol retrieval with semantic search.",
    },
    FeatureCard {
        title: "AI Memory Engine",
        description: "Predictive outcome analysis based on historical clusters.",
    },
    FeatureCard {
        title: "Real-time Geolocation",
        description: "Caller triangulation with ±5m accuracy.",
    },
];

// ============================================================================
// Toast Actions
// ============================================================================

/// One-click console buttons that only acknowledge with a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    DispatchEms,
    SupervisorCall,
    Handover,
}

impl ConsoleAction {
    pub fn toast(self) -> &'static str {
        match self {
            ConsoleAction::DispatchEms => "Dispatching unit...",
            ConsoleAction::SupervisorCall => "Connecting...",
            ConsoleAction::Handover => "Handing over...",
        }
    }
}

impl FromStr for ConsoleAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dispatch_ems" => Ok(ConsoleAction::DispatchEms),
            "supervisor_call" => Ok(ConsoleAction::SupervisorCall),
            "handover" => Ok(ConsoleAction::Handover),
            other => Err(format!("Unknown console action '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_timer_format() {
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(125), "02:05");
        assert_eq!(format_timer(3_661), "61:01");
    }

    #[test]
    fn test_checklist_defaults_and_partial_update() {
        let mut checklist = MissionChecklist::default();
        assert!(checklist.location_triangulated);
        assert!(!checklist.ems_dispatched);

        checklist.apply(&ChecklistUpdate {
            ems_dispatched: Some(true),
            ..Default::default()
        });
        assert!(checklist.location_triangulated);
        assert!(checklist.ems_dispatched);
    }

    #[test]
    fn test_vitals_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let snap = vitals_snapshot(&mut rng).unwrap();
        assert_eq!(snap.stress.len(), 25);
        assert_eq!(snap.memory_map.len(), 50);

        let mean = snap.stress.iter().sum::<f64>() / snap.stress.len() as f64;
        assert!((40.0..110.0).contains(&mean), "mean {mean} far from 75");
    }

    #[test]
    fn test_caller_location_is_fixed() {
        let loc = caller_location();
        assert_eq!(loc.lat, 28.6139);
        assert_eq!(loc.lon, 77.2090);
        assert_eq!(loc.zoom, 12);
    }

    #[test]
    fn test_console_actions() {
        assert_eq!(
            "dispatch_ems".parse::<ConsoleAction>().unwrap().toast(),
            "Dispatching unit..."
        );
        assert_eq!("handover".parse::<ConsoleAction>().unwrap().toast(), "Handing over...");
        assert!("self_destruct".parse::<ConsoleAction>().is_err());
    }
}
