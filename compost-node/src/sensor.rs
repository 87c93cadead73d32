//! Sensor sources. Each sampler task owns a set of `SensorSource`s and polls
//! them on the sampling cadence; a source yields one reading per slot it
//! feeds (the DHT probes feed two).

use core::fmt;
use std::rc::Rc;

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{ADCPin, AnyIOPin, InputOutput, PinDriver};
use esp_idf_sys::EspError;

use dht_sensor::DhtReading;

use compost_core::{Calibration, SensorReading};

#[derive(Debug)]
pub enum SensorError {
    Esp(EspError),
    // Checksum/timing failure on the one-wire probes. Transient; the slot
    // keeps its previous value.
    Unreadable,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Esp(err) => write!(f, "sensor peripheral error: {err}"),
            Self::Unreadable => write!(f, "sensor did not answer with a valid frame"),
        }
    }
}

impl From<EspError> for SensorError {
    fn from(err: EspError) -> Self {
        Self::Esp(err)
    }
}

pub trait SensorSource {
    fn acquire(&mut self) -> Result<heapless::Vec<SensorReading, 4>, SensorError>;
}

/// Analog probe mapped onto a percentage slot through its bench calibration.
/// Covers the capacitive soil probes and the MQ-4 methane heads.
pub struct AnalogPercentSource<F> {
    slot: usize,
    calibration: Calibration,
    read_raw: F,
}

impl<F> AnalogPercentSource<F>
where
    F: FnMut() -> Result<u16, EspError>,
{
    pub fn new(slot: usize, calibration: Calibration, read_raw: F) -> Self {
        Self {
            slot,
            calibration,
            read_raw,
        }
    }
}

impl<F> SensorSource for AnalogPercentSource<F>
where
    F: FnMut() -> Result<u16, EspError>,
{
    fn acquire(&mut self) -> Result<heapless::Vec<SensorReading, 4>, SensorError> {
        let raw = (self.read_raw)()?;
        let mut readings = heapless::Vec::new();
        let _ = readings.push(SensorReading::new(
            self.slot,
            self.calibration.percent(i32::from(raw)),
        ));
        Ok(readings)
    }
}

#[derive(Copy, Clone)]
pub enum DhtKind {
    Dht11,
    Dht22,
}

/// DHT11/DHT22 probe on an open-drain pin, feeding a temperature slot and a
/// humidity slot.
pub struct DhtSource {
    kind: DhtKind,
    pin: PinDriver<'static, AnyIOPin, InputOutput>,
    temperature_slot: usize,
    humidity_slot: usize,
}

impl DhtSource {
    pub fn new(
        kind: DhtKind,
        pin: AnyIOPin,
        temperature_slot: usize,
        humidity_slot: usize,
    ) -> Result<Self, SensorError> {
        // The one-wire protocol needs an open-drain pin idling high.
        let mut pin = PinDriver::input_output_od(pin)?;
        pin.set_high()?;

        Ok(Self {
            kind,
            pin,
            temperature_slot,
            humidity_slot,
        })
    }
}

impl SensorSource for DhtSource {
    fn acquire(&mut self) -> Result<heapless::Vec<SensorReading, 4>, SensorError> {
        let (temperature, humidity) = match self.kind {
            DhtKind::Dht11 => {
                let r = dht_sensor::dht11::Reading::read(&mut Ets, &mut self.pin)
                    .map_err(|_| SensorError::Unreadable)?;
                (r.temperature as f32, r.relative_humidity as f32)
            }
            DhtKind::Dht22 => {
                let r = dht_sensor::dht22::Reading::read(&mut Ets, &mut self.pin)
                    .map_err(|_| SensorError::Unreadable)?;
                (r.temperature, r.relative_humidity)
            }
        };

        let mut readings = heapless::Vec::new();
        let _ = readings.push(SensorReading::new(self.temperature_slot, temperature));
        let _ = readings.push(SensorReading::new(self.humidity_slot, humidity));
        Ok(readings)
    }
}

/// MQ-135 gas curve: raw ADC count to CO2 ppm via the sensing resistance.
#[derive(Copy, Clone)]
pub struct Mq135 {
    pub rzero: f32,
    pub rload: f32,
}

// Datasheet power-law fit of the CO2 curve.
const MQ135_PARA: f32 = 116.602_068;
const MQ135_PARB: f32 = -2.769_034_9;

impl Mq135 {
    pub const fn new(rzero: f32, rload: f32) -> Self {
        Self { rzero, rload }
    }

    fn resistance(&self, raw: u16) -> f32 {
        let raw = (raw.max(1)) as f32;
        ((4095.0 / raw) - 1.0) * self.rload
    }

    pub fn ppm(&self, raw: u16) -> f32 {
        MQ135_PARA * (self.resistance(raw) / self.rzero).powf(MQ135_PARB)
    }
}

/// MQ-135 head: raw count -> ppm -> percentage of the configured ppm window.
pub struct Mq135Source<F> {
    slot: usize,
    curve: Mq135,
    window: Calibration,
    read_raw: F,
}

impl<F> Mq135Source<F>
where
    F: FnMut() -> Result<u16, EspError>,
{
    pub fn new(slot: usize, curve: Mq135, window: Calibration, read_raw: F) -> Self {
        Self {
            slot,
            curve,
            window,
            read_raw,
        }
    }
}

impl<F> SensorSource for Mq135Source<F>
where
    F: FnMut() -> Result<u16, EspError>,
{
    fn acquire(&mut self) -> Result<heapless::Vec<SensorReading, 4>, SensorError> {
        let raw = (self.read_raw)()?;
        let ppm = self.curve.ppm(raw);

        let mut readings = heapless::Vec::new();
        let _ = readings.push(SensorReading::new(
            self.slot,
            self.window.percent(ppm.round() as i32),
        ));
        Ok(readings)
    }
}

/// Slot layouts per node family. The climate node interleaves temperature and
/// humidity so `sensor{i}` maps to slots `2i` and `2i + 1`.
pub fn climate_slots(sensor: usize) -> (usize, usize) {
    (2 * sensor, 2 * sensor + 1)
}

fn adc_channel<P>(
    adc: &Rc<AdcDriver<'static, ADC1>>,
    pin: P,
) -> Result<AdcChannelDriver<'static, P, Rc<AdcDriver<'static, ADC1>>>, EspError>
where
    P: ADCPin<Adc = ADC1> + 'static,
{
    let config = AdcChannelConfig {
        attenuation: DB_11,
        calibration: true,
        ..Default::default()
    };
    AdcChannelDriver::new(adc.clone(), pin, &config)
}

/// Wires one analog probe (soil or MQ-4) onto a shared ADC unit.
pub fn analog_percent_probe<P>(
    adc: &Rc<AdcDriver<'static, ADC1>>,
    pin: P,
    slot: usize,
    calibration: Calibration,
) -> Result<Box<dyn SensorSource>, EspError>
where
    P: ADCPin<Adc = ADC1> + 'static,
{
    let adc = adc.clone();
    let mut channel = adc_channel(&adc, pin)?;
    Ok(Box::new(AnalogPercentSource::new(slot, calibration, move || {
        adc.read(&mut channel)
    })))
}

/// Wires one MQ-135 head onto a shared ADC unit.
pub fn mq135_probe<P>(
    adc: &Rc<AdcDriver<'static, ADC1>>,
    pin: P,
    slot: usize,
    curve: Mq135,
    window: Calibration,
) -> Result<Box<dyn SensorSource>, EspError>
where
    P: ADCPin<Adc = ADC1> + 'static,
{
    let adc = adc.clone();
    let mut channel = adc_channel(&adc, pin)?;
    Ok(Box::new(Mq135Source::new(slot, curve, window, move || {
        adc.read(&mut channel)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mq135_ppm_grows_with_adc_count() {
        let curve = Mq135::new(46.0, 22.0);

        // Higher count = lower sensing resistance = more gas.
        assert!(curve.ppm(2000) > curve.ppm(1000));
        assert!(curve.ppm(3000) > curve.ppm(2000));
    }

    #[test]
    fn mq135_reference_point() {
        let curve = Mq135::new(46.0, 22.0);

        // At Rs == RZERO the power law collapses to its scale factor.
        let raw = (4095.0 / (46.0 / 22.0 + 1.0)) as u16;
        let ppm = curve.ppm(raw);
        assert!((ppm - 116.6).abs() < 2.0, "ppm at rzero was {ppm}");
    }

    #[test]
    fn mq135_zero_count_does_not_divide_by_zero() {
        let curve = Mq135::new(46.0, 22.0);
        assert!(curve.ppm(0).is_finite());
    }

    #[test]
    fn climate_slot_layout_interleaves() {
        assert_eq!(climate_slots(0), (0, 1));
        assert_eq!(climate_slots(2), (4, 5));
    }
}
