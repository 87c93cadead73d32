//! OV2640 camera on the AI-Thinker ESP32-CAM board, over the esp32-camera
//! component (see the `extra_components` section in Cargo.toml).

use core::fmt;

use esp_idf_sys::camera::{
    camera_config_t, camera_config_t__bindgen_ty_1, camera_config_t__bindgen_ty_2,
    camera_fb_location_t_CAMERA_FB_IN_DRAM, camera_fb_location_t_CAMERA_FB_IN_PSRAM,
    camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY, esp_camera_deinit, esp_camera_fb_get,
    esp_camera_fb_return, esp_camera_init, framesize_t_FRAMESIZE_SVGA, framesize_t_FRAMESIZE_UXGA,
    pixformat_t_PIXFORMAT_JPEG,
};
use esp_idf_sys::{
    esp, heap_caps_get_total_size, ledc_channel_t_LEDC_CHANNEL_0, ledc_timer_t_LEDC_TIMER_0,
    EspError, MALLOC_CAP_SPIRAM,
};
use log::*;

#[derive(Debug)]
pub enum CaptureError {
    Esp(EspError),
    // The driver returned no frame buffer; seen when the sensor desyncs.
    NoFrame,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Esp(err) => write!(f, "camera driver error: {err}"),
            Self::NoFrame => write!(f, "camera returned no frame"),
        }
    }
}

impl From<EspError> for CaptureError {
    fn from(err: EspError) -> Self {
        Self::Esp(err)
    }
}

/// Initialized camera peripheral. Holding the value keeps the driver
/// installed; dropping it deinitializes the sensor.
pub struct Camera {
    _private: (),
}

impl Camera {
    /// Installs the camera driver with the AI-Thinker pin map. With PSRAM the
    /// sensor runs at UXGA into external frame buffers; without, it falls
    /// back to SVGA in DRAM.
    pub fn init() -> Result<Self, CaptureError> {
        let psram = unsafe { heap_caps_get_total_size(MALLOC_CAP_SPIRAM) } > 0;
        let (frame_size, jpeg_quality, fb_location) = if psram {
            (framesize_t_FRAMESIZE_UXGA, 10, camera_fb_location_t_CAMERA_FB_IN_PSRAM)
        } else {
            (framesize_t_FRAMESIZE_SVGA, 12, camera_fb_location_t_CAMERA_FB_IN_DRAM)
        };
        info!("camera init, psram = {psram}");

        let config = camera_config_t {
            pin_pwdn: 32,
            pin_reset: -1,
            pin_xclk: 0,
            __bindgen_anon_1: camera_config_t__bindgen_ty_1 { pin_sccb_sda: 26 },
            __bindgen_anon_2: camera_config_t__bindgen_ty_2 { pin_sccb_scl: 27 },
            pin_d7: 35,
            pin_d6: 34,
            pin_d5: 39,
            pin_d4: 36,
            pin_d3: 21,
            pin_d2: 19,
            pin_d1: 18,
            pin_d0: 5,
            pin_vsync: 25,
            pin_href: 23,
            pin_pclk: 22,
            xclk_freq_hz: 20_000_000,
            ledc_timer: ledc_timer_t_LEDC_TIMER_0,
            ledc_channel: ledc_channel_t_LEDC_CHANNEL_0,
            pixel_format: pixformat_t_PIXFORMAT_JPEG,
            frame_size,
            jpeg_quality,
            fb_count: 1,
            fb_location,
            grab_mode: camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY,
            ..Default::default()
        };

        esp!(unsafe { esp_camera_init(&config) })?;

        Ok(Self { _private: () })
    }

    /// Grabs one JPEG frame and copies it out of the driver's frame buffer.
    pub fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        let fb = unsafe { esp_camera_fb_get() };
        if fb.is_null() {
            return Err(CaptureError::NoFrame);
        }

        let jpeg = unsafe { core::slice::from_raw_parts((*fb).buf, (*fb).len as usize) }.to_vec();
        unsafe { esp_camera_fb_return(fb) };

        Ok(jpeg)
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        unsafe {
            esp_camera_deinit();
        }
    }
}
