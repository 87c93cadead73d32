use crate::reading::{Quantity, SlotDef};

/// Typed scalar as the realtime database stores it.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f32),
}

impl Value {
    pub fn from_reading(quantity: Quantity, value: f32) -> Self {
        if quantity.encodes_as_int() {
            Value::Int(value.round() as i64)
        } else {
            Value::Float(value)
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Value::from(*v as f64),
        }
    }
}

/// One remote write: hierarchical slash-separated path plus the value to put
/// there. Derived from a slot snapshot, 1:1 for the latest view and 1:many
/// when a log mirror is configured.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadTarget {
    pub path: String,
    pub value: Value,
}

/// Where a node's values land in the database.
///
/// `latest_root` holds the overwritten-in-place view. Nodes with a history
/// path additionally mirror every cycle under `log_root/{epoch}` and stamp
/// both roots with the cycle's timestamp.
#[derive(Clone, Debug)]
pub struct PathScheme {
    pub latest_root: String,
    pub log_root: Option<String>,
}

impl PathScheme {
    pub fn latest(latest_root: impl Into<String>) -> Self {
        Self {
            latest_root: latest_root.into(),
            log_root: None,
        }
    }

    pub fn with_log(latest_root: impl Into<String>, log_root: impl Into<String>) -> Self {
        Self {
            latest_root: latest_root.into(),
            log_root: Some(log_root.into()),
        }
    }
}

/// Expands one snapshot into the writes for this dispatcher cycle.
///
/// The snapshot and `defs` are index-aligned. `timestamp` is only present on
/// nodes that run SNTP; without it the log mirror is skipped even when
/// configured, since log entries are keyed by epoch seconds.
pub fn plan_writes(
    defs: &[SlotDef],
    snapshot: &[f32],
    scheme: &PathScheme,
    timestamp: Option<u64>,
) -> Vec<UploadTarget> {
    debug_assert_eq!(defs.len(), snapshot.len());

    let mut targets = Vec::with_capacity(defs.len() * 2 + 2);

    for (def, &value) in defs.iter().zip(snapshot) {
        targets.push(UploadTarget {
            path: format!("{}/{}", scheme.latest_root, def.key),
            value: Value::from_reading(def.quantity, value),
        });
    }

    if let (Some(log_root), Some(ts)) = (scheme.log_root.as_deref(), timestamp) {
        for (def, &value) in defs.iter().zip(snapshot) {
            targets.push(UploadTarget {
                path: format!("{log_root}/{ts}/{}", def.key),
                value: Value::from_reading(def.quantity, value),
            });
        }
        targets.push(UploadTarget {
            path: format!("{}/timestamp", scheme.latest_root),
            value: Value::Int(ts as i64),
        });
        targets.push(UploadTarget {
            path: format!("{log_root}/{ts}/timestamp"),
            value: Value::Int(ts as i64),
        });
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Quantity;

    const SOIL_DEFS: &[SlotDef] = &[
        SlotDef::new("soil_sensor1/moisture", Quantity::MoisturePct),
        SlotDef::new("soil_sensor2/moisture", Quantity::MoisturePct),
        SlotDef::new("soil_sensor3/moisture", Quantity::MoisturePct),
    ];

    #[test]
    fn latest_only_scheme_is_one_write_per_slot() {
        let scheme = PathScheme::latest("UsersData/u123");
        let targets = plan_writes(SOIL_DEFS, &[12.0, 55.4, 99.6], &scheme, None);

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].path, "UsersData/u123/soil_sensor1/moisture");
        // Moisture goes out as a rounded integer.
        assert_eq!(targets[1].value, Value::Int(55));
        assert_eq!(targets[2].value, Value::Int(100));
    }

    #[test]
    fn log_scheme_mirrors_by_timestamp_and_stamps_both_roots() {
        let defs = &[
            SlotDef::new("sensor1/methane", Quantity::MethanePct),
            SlotDef::new("sensor1/co2", Quantity::Co2Pct),
        ];
        let scheme = PathScheme::with_log("latest/session_001", "sensor_logs/session_001");
        let targets = plan_writes(defs, &[40.0, 12.5], &scheme, Some(1700000000));

        let paths: Vec<&str> = targets.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "latest/session_001/sensor1/methane",
                "latest/session_001/sensor1/co2",
                "sensor_logs/session_001/1700000000/sensor1/methane",
                "sensor_logs/session_001/1700000000/sensor1/co2",
                "latest/session_001/timestamp",
                "sensor_logs/session_001/1700000000/timestamp",
            ]
        );
        assert_eq!(targets[1].value, Value::Float(12.5));
        assert_eq!(targets[4].value, Value::Int(1700000000));
    }

    #[test]
    fn log_mirror_needs_a_timestamp() {
        let scheme = PathScheme::with_log("latest/session_001", "sensor_logs/session_001");
        let targets = plan_writes(SOIL_DEFS, &[1.0, 2.0, 3.0], &scheme, None);
        assert_eq!(targets.len(), 3);
    }
}
