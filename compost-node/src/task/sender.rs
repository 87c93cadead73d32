use log::*;

use compost_core::backend::RemoteError;

use crate::backend::{RtdbClient, StorageClient, OUTBOUND_UPLOADS, OUTBOUND_WRITES};
use crate::configuration::{DATABASE_URL, STORAGE_BUCKET};
use crate::state::SESSION;

/// Drains the scalar write queue. Each record is performed as one blocking
/// HTTP PUT and its completion callback is invoked with the outcome; a write
/// queued while the session is down completes with `NotReady`.
pub async fn send_writes() {
    let rtdb = RtdbClient::new(DATABASE_URL);

    loop {
        let write = OUTBOUND_WRITES.receive().await;

        let token = SESSION.lock().unwrap().token().map(String::from);
        let result = match token {
            Some(token) => rtdb.put(&write.target.path, &write.target.value, &token),
            None => Err(RemoteError::NotReady),
        };

        (write.done)(result);
    }
}

/// Drains the file upload queue, one upload at a time. The camera node's
/// single-flight gate keeps this queue at depth 0 or 1.
pub async fn send_uploads() {
    let storage = StorageClient::new(STORAGE_BUCKET);

    loop {
        let upload = OUTBOUND_UPLOADS.receive().await;
        debug!("uploading {} to {}", upload.local_path, upload.remote_path);

        let token = SESSION.lock().unwrap().token().map(String::from);
        let result = match token {
            Some(token) => storage.upload(
                &upload.local_path,
                &upload.remote_path,
                &upload.content_type,
                &token,
            ),
            None => Err(RemoteError::NotReady),
        };

        (upload.done)(result);
    }
}
