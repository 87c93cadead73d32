use serde::{Deserialize, Serialize};

/// Physical quantity a slot carries. Decides how the value is encoded on the
/// wire: moisture and methane go out as integers, everything else as floats,
/// matching what the dashboard expects per field.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Quantity {
    TemperatureC,
    HumidityPct,
    MoisturePct,
    MethanePct,
    Co2Pct,
}

impl Quantity {
    pub fn encodes_as_int(&self) -> bool {
        matches!(self, Quantity::MoisturePct | Quantity::MethanePct)
    }
}

/// Static description of one shared slot.
#[derive(Copy, Clone, Debug)]
pub struct SlotDef {
    /// Path suffix under the node's database root, e.g. `soil_sensor1/moisture`.
    pub key: &'static str,
    pub quantity: Quantity,
}

impl SlotDef {
    pub const fn new(key: &'static str, quantity: Quantity) -> Self {
        Self { key, quantity }
    }
}

/// One acquired sensor value, addressed at the slot it overwrites.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub slot: usize,
    pub value: f32,
}

impl SensorReading {
    pub const fn new(slot: usize, value: f32) -> Self {
        Self { slot, value }
    }
}
