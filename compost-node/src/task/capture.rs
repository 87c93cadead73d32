use embassy_time::Timer;
use log::*;

use compost_core::backend::ObjectStore;
use compost_core::UploadGate;

use crate::backend::QueueingStore;
use crate::camera::Camera;
use crate::configuration::{PHOTO_CONTENT_TYPE, PHOTO_FILE_PATH, PHOTO_OBJECT_PATH};
use crate::settings::CAPTURE_INTERVAL;
use crate::state::SESSION;

/// Camera loop: every 3 s, if the session is ready and no upload is in
/// flight, grab a frame, overwrite the photo file and issue the upload.
/// At most one upload is in flight per node; the gate is claimed right
/// before the upload command and released by its terminal callback, success
/// or error alike. A failed capture leaves the gate untouched so the next
/// tick retries.
pub async fn capture_and_upload(mut camera: Camera, gate: &'static UploadGate) {
    let mut store = QueueingStore;

    loop {
        if SESSION.lock().unwrap().ready() && gate.is_idle() {
            match camera.capture() {
                Ok(jpeg) => {
                    info!("captured photo, {} bytes", jpeg.len());
                    match std::fs::write(PHOTO_FILE_PATH, &jpeg) {
                        Ok(()) => {
                            if gate.try_begin() {
                                store.upload(
                                    PHOTO_FILE_PATH,
                                    PHOTO_OBJECT_PATH,
                                    PHOTO_CONTENT_TYPE,
                                    Box::new(move |result| {
                                        match result {
                                            Ok(()) => info!("photo upload complete"),
                                            Err(err) => warn!("photo upload failed: {err}"),
                                        }
                                        gate.finish();
                                    }),
                                );
                            }
                        }
                        Err(err) => warn!("photo file write failed: {err}"),
                    }
                }
                Err(err) => warn!("capture failed: {err}"),
            }
        }

        Timer::after(CAPTURE_INTERVAL).await;
    }
}
