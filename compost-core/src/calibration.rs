/// Linear raw-to-percent calibration for an analog probe.
///
/// `raw_min` is the reading at 0 % (dry soil, clean air) and `raw_max` the
/// reading at 100 %. The pair is determined per sensor instance during bench
/// calibration and baked into the node configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub raw_min: i32,
    pub raw_max: i32,
}

impl Calibration {
    pub const fn new(raw_min: i32, raw_max: i32) -> Self {
        Self { raw_min, raw_max }
    }

    /// Rescales a raw reading into the 0–100 range, clamping out-of-domain
    /// inputs to the nearest bound.
    pub fn percent(&self, raw: i32) -> f32 {
        let span = (self.raw_max - self.raw_min) as f32;
        let pct = (raw - self.raw_min) as f32 * 100.0 / span;
        pct.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bench values of the soil probes.
    const SOIL: Calibration = Calibration::new(35, 163);

    #[test]
    fn endpoints_map_to_bounds() {
        assert_eq!(SOIL.percent(35), 0.0);
        assert_eq!(SOIL.percent(163), 100.0);
    }

    #[test]
    fn out_of_domain_readings_clamp() {
        assert_eq!(SOIL.percent(10), 0.0);
        assert_eq!(SOIL.percent(200), 100.0);
    }

    #[test]
    fn whole_domain_stays_in_percent_range() {
        for raw in 35..=163 {
            let pct = SOIL.percent(raw);
            assert!((0.0..=100.0).contains(&pct), "raw {raw} mapped to {pct}");
        }
    }

    #[test]
    fn methane_window_midpoint() {
        let mq4 = Calibration::new(200, 4095);
        let pct = mq4.percent((200 + 4095) / 2);
        assert!((pct - 50.0).abs() < 0.05);
    }
}
