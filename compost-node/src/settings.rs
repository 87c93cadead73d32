use embassy_time::Duration;

// Cadence of every sampling task. Independent of the upload cadence; the
// dispatcher may therefore send a value that is 1-2 sampling intervals stale.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(2);
// Mean report cadence on the climate node.
pub const AGGREGATE_INTERVAL: Duration = Duration::from_secs(5);
// Upload cadence of the soil and climate nodes.
pub const DISPATCH_INTERVAL: Duration = Duration::from_secs(8);
// Upload cadence of the gas node, which also writes a log mirror.
pub const GAS_DISPATCH_INTERVAL: Duration = Duration::from_secs(15);
// The backend session state machine starves without frequent servicing.
pub const SESSION_TICK: Duration = Duration::from_millis(10);
// Photo cadence of the camera node, gated by the single-flight upload gate.
pub const CAPTURE_INTERVAL: Duration = Duration::from_secs(3);
// Wi-Fi link supervision cadence.
pub const WIFI_CHECK_INTERVAL: Duration = Duration::from_secs(5);
