//! Robot state owned by the telemetry service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Latest value of each sensor as sent by the robot; `None` until the first reading
/// arrives or after an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub left_distance: Option<Value>,
    pub right_distance: Option<Value>,
    pub depth: Option<Value>,
    pub pitch: Option<Value>,
    pub roll: Option<Value>,
}

/// Partial sensor reading. The outer `Option` is key presence: `None` leaves the
/// stored value alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorUpdate {
    pub left_distance: Option<Option<Value>>,
    pub right_distance: Option<Option<Value>>,
    pub depth: Option<Option<Value>>,
    pub pitch: Option<Option<Value>>,
    pub roll: Option<Option<Value>>,
}

impl From<Map<String, Value>> for SensorUpdate {
    /// Unknown keys are dropped.
    fn from(mut body: Map<String, Value>) -> Self {
        let mut take = |key: &str| {
            body.remove(key)
                .map(|v| if v.is_null() { None } else { Some(v) })
        };
        Self {
            left_distance: take("left_distance"),
            right_distance: take("right_distance"),
            depth: take("depth"),
            pitch: take("pitch"),
            roll: take("roll"),
        }
    }
}

impl SensorSnapshot {
    pub fn apply(&mut self, update: SensorUpdate) {
        overwrite(&mut self.left_distance, update.left_distance);
        overwrite(&mut self.right_distance, update.right_distance);
        overwrite(&mut self.depth, update.depth);
        overwrite(&mut self.pitch, update.pitch);
        overwrite(&mut self.roll, update.roll);
    }
}

fn overwrite(slot: &mut Option<Value>, value: Option<Option<Value>>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Power flag plus sensors, serialized flat as `{power, left_distance, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RobotState {
    pub power: bool,
    #[serde(flatten)]
    pub sensors: SensorSnapshot,
}

/// Handle to the process-wide robot state. Clones share the same state; every
/// write is a single short critical section.
#[derive(Debug, Clone, Default)]
pub struct TelemetryState {
    inner: Arc<RwLock<RobotState>>,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_power(&self, on: bool) -> bool {
        let mut guard = self.inner.write().await;
        guard.power = on;
        guard.power
    }

    pub async fn ingest(&self, update: SensorUpdate) {
        self.inner.write().await.sensors.apply(update);
    }

    pub async fn snapshot(&self) -> RobotState {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(body: Value) -> SensorUpdate {
        match body {
            Value::Object(map) => SensorUpdate::from(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut s = SensorSnapshot {
            left_distance: Some(json!(1.0)),
            right_distance: Some(json!(2.0)),
            depth: Some(json!(3.0)),
            pitch: None,
            roll: Some(json!(-4.5)),
        };
        s.apply(update(json!({ "depth": 5.0 })));
        assert_eq!(s.depth, Some(json!(5.0)));
        assert_eq!(s.left_distance, Some(json!(1.0)));
        assert_eq!(s.right_distance, Some(json!(2.0)));
        assert_eq!(s.pitch, None);
        assert_eq!(s.roll, Some(json!(-4.5)));
    }

    #[test]
    fn explicit_null_clears_and_unknown_keys_are_dropped() {
        let mut s = SensorSnapshot {
            pitch: Some(json!(10.0)),
            roll: Some(json!(2.0)),
            ..Default::default()
        };
        let u = update(json!({ "pitch": null, "temperature": 20 }));
        assert_eq!(u.pitch, Some(None));
        assert_eq!(u.roll, None);

        s.apply(u);
        assert_eq!(s.pitch, None);
        assert_eq!(s.roll, Some(json!(2.0)));
    }

    #[test]
    fn values_of_any_json_type_are_kept_verbatim() {
        let mut s = SensorSnapshot::default();
        s.apply(update(json!({
            "depth": "5.2",
            "roll": true,
            "pitch": [1, 2],
            "left_distance": { "cm": 12 }
        })));
        assert_eq!(s.depth, Some(json!("5.2")));
        assert_eq!(s.roll, Some(json!(true)));
        assert_eq!(s.pitch, Some(json!([1, 2])));
        assert_eq!(s.left_distance, Some(json!({ "cm": 12 })));
    }

    #[test]
    fn robot_state_serializes_flat() {
        let state = RobotState {
            power: true,
            sensors: SensorSnapshot {
                depth: Some(json!(2.5)),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "power": true,
                "left_distance": null,
                "right_distance": null,
                "depth": 2.5,
                "pitch": null,
                "roll": null
            })
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let a = TelemetryState::new();
        let b = a.clone();
        assert!(!a.snapshot().await.power);
        assert!(b.set_power(true).await);
        assert!(a.snapshot().await.power);
    }

    #[tokio::test]
    async fn separate_instances_are_isolated() {
        let a = TelemetryState::new();
        let b = TelemetryState::new();
        a.ingest(SensorUpdate {
            roll: Some(Some(json!(1.0))),
            ..Default::default()
        })
        .await;
        assert_eq!(b.snapshot().await.sensors.roll, None);
    }
}
