//! Cloud backend access: the authenticated session the session-keeper task
//! services, the realtime-database and storage clients the sender tasks use,
//! and the outbound queues that make every remote operation fire-and-forget
//! with an asynchronous completion callback.

use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::*;
use serde::Deserialize;

use compost_core::backend::{BackendSession, Completion, ObjectStore, RemoteError, ValueStore};
use compost_core::upload::{UploadTarget, Value};

const SIGN_IN_ENDPOINT: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";
const STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0/b";

// Re-authenticate this long before the token actually expires.
const TOKEN_REFRESH_MARGIN: u64 = 300;
// Sign-in attempts are paced; the keeper ticks every 10 ms.
const AUTH_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    pub api_key: &'static str,
    pub user_email: &'static str,
    pub user_password: &'static str,
}

enum SessionState {
    Disconnected { next_attempt: Instant },
    Ready { uid: String, id_token: String, refresh_at: Instant },
}

/// Email/password session against the cloud identity endpoint: a linear
/// disconnected -> authenticating -> ready sequence, re-entered on token
/// expiry or Wi-Fi loss. `service` is driven every ~10 ms by the session
/// keeper task.
pub struct RtdbSession {
    config: SessionConfig,
    state: SessionState,
}

impl RtdbSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Disconnected {
                next_attempt: Instant::now(),
            },
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready { uid, .. } => Some(uid),
            SessionState::Disconnected { .. } => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready { id_token, .. } => Some(id_token),
            SessionState::Disconnected { .. } => None,
        }
    }

    /// Drops the authenticated state, e.g. after a Wi-Fi loss.
    pub fn invalidate(&mut self) {
        self.state = SessionState::Disconnected {
            next_attempt: Instant::now(),
        };
    }

    fn sign_in(&mut self) -> Result<(), RemoteError> {
        let url = format!("{SIGN_IN_ENDPOINT}?key={}", self.config.api_key);
        let body = serde_json::json!({
            "email": self.config.user_email,
            "password": self.config.user_password,
            "returnSecureToken": true,
        });

        let payload =
            serde_json::to_vec(&body).map_err(|e| RemoteError::Transport(e.to_string()))?;
        let response = http::post_json(&url, &payload)?;
        let auth = parse_sign_in_response(&response)?;

        info!("backend session ready, uid = {}", auth.local_id);
        self.state = SessionState::Ready {
            uid: auth.local_id,
            id_token: auth.id_token,
            refresh_at: Instant::now()
                + Duration::from_secs(auth.expires_in_secs().saturating_sub(TOKEN_REFRESH_MARGIN)),
        };

        Ok(())
    }
}

impl BackendSession for RtdbSession {
    fn ready(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    fn service(&mut self) {
        let due = match &self.state {
            SessionState::Disconnected { next_attempt } => Instant::now() >= *next_attempt,
            SessionState::Ready { refresh_at, .. } => Instant::now() >= *refresh_at,
        };
        if !due {
            return;
        }

        if let Err(err) = self.sign_in() {
            warn!("backend sign-in failed: {err}");
            self.state = SessionState::Disconnected {
                next_attempt: Instant::now() + AUTH_RETRY_DELAY,
            };
        }
    }
}

#[derive(Deserialize)]
struct SignInResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: String,
    // The identity endpoint sends the lifetime as a decimal string.
    #[serde(rename = "expiresIn")]
    expires_in: String,
}

impl SignInResponse {
    fn expires_in_secs(&self) -> u64 {
        self.expires_in.parse().unwrap_or(3600)
    }
}

fn parse_sign_in_response(body: &[u8]) -> Result<SignInResponse, RemoteError> {
    serde_json::from_slice(body).map_err(|e| RemoteError::Transport(e.to_string()))
}

/// Typed scalar writes: `PUT {database_url}/{path}.json?auth={token}`.
#[derive(Copy, Clone)]
pub struct RtdbClient {
    database_url: &'static str,
}

impl RtdbClient {
    pub const fn new(database_url: &'static str) -> Self {
        Self { database_url }
    }

    pub fn put(&self, path: &str, value: &Value, token: &str) -> Result<(), RemoteError> {
        let url = format!(
            "{}/{}.json?auth={}",
            self.database_url.trim_end_matches('/'),
            path,
            token
        );
        let payload =
            serde_json::to_vec(&value.to_json()).map_err(|e| RemoteError::Transport(e.to_string()))?;
        http::put_json(&url, &payload)
    }
}

/// Binary object upload into the storage bucket, by local file reference.
#[derive(Copy, Clone)]
pub struct StorageClient {
    bucket: &'static str,
}

impl StorageClient {
    pub const fn new(bucket: &'static str) -> Self {
        Self { bucket }
    }

    pub fn upload(
        &self,
        local_path: &str,
        remote_path: &str,
        content_type: &str,
        token: &str,
    ) -> Result<(), RemoteError> {
        let payload =
            std::fs::read(local_path).map_err(|e| RemoteError::Transport(e.to_string()))?;
        let url = format!("{STORAGE_ENDPOINT}/{}/o?name={}", self.bucket, remote_path);
        let auth = format!("Firebase {token}");

        http::post_bytes(&url, content_type, &auth, &payload)
    }
}

/// One queued scalar write with its completion observer.
pub struct OutboundWrite {
    pub target: UploadTarget,
    pub done: Completion,
}

/// One queued file upload with its completion observer.
pub struct OutboundUpload {
    pub local_path: String,
    pub remote_path: String,
    pub content_type: String,
    pub done: Completion,
}

pub static OUTBOUND_WRITES: Channel<CriticalSectionRawMutex, OutboundWrite, 16> = Channel::new();
pub static OUTBOUND_UPLOADS: Channel<CriticalSectionRawMutex, OutboundUpload, 2> = Channel::new();

/// Store handed to the dispatcher: operations are queued for the sender task
/// and their completion callbacks fire once the sender has performed them.
pub struct QueueingStore;

impl ValueStore for QueueingStore {
    fn set(&mut self, target: UploadTarget, done: Completion) {
        if let Err(write) = OUTBOUND_WRITES.try_send(OutboundWrite { target, done }) {
            // Consistent with the no-retry semantics: the value will be
            // snapshotted again next cycle anyway.
            let write = write.0;
            warn!("outbound queue full, dropping write to {}", write.target.path);
        }
    }
}

impl ObjectStore for QueueingStore {
    fn upload(&mut self, local_path: &str, remote_path: &str, content_type: &str, done: Completion) {
        let upload = OutboundUpload {
            local_path: local_path.to_owned(),
            remote_path: remote_path.to_owned(),
            content_type: content_type.to_owned(),
            done,
        };
        if let Err(upload) = OUTBOUND_UPLOADS.try_send(upload) {
            let upload = upload.0;
            warn!("upload queue full, dropping upload of {}", upload.local_path);
            // Uploads must always reach a terminal callback or the
            // single-flight gate would stay closed forever.
            (upload.done)(Err(RemoteError::Transport("upload queue full".into())));
        }
    }
}

mod http {
    use embedded_svc::http::Method;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use esp_idf_sys::esp_crt_bundle_attach;

    use compost_core::backend::RemoteError;

    const BUF_SIZE: usize = 1024;

    pub fn post_json(url: &str, payload: &[u8]) -> Result<Vec<u8>, RemoteError> {
        request(Method::Post, url, "application/json", None, payload)
    }

    pub fn put_json(url: &str, payload: &[u8]) -> Result<(), RemoteError> {
        request(Method::Put, url, "application/json", None, payload).map(|_| ())
    }

    pub fn post_bytes(
        url: &str,
        content_type: &str,
        authorization: &str,
        payload: &[u8],
    ) -> Result<(), RemoteError> {
        request(Method::Post, url, content_type, Some(authorization), payload).map(|_| ())
    }

    fn request(
        method: Method,
        url: &str,
        content_type: &str,
        authorization: Option<&str>,
        payload: &[u8],
    ) -> Result<Vec<u8>, RemoteError> {
        let mut client = EspHttpConnection::new(&Configuration {
            buffer_size: Some(BUF_SIZE),
            crt_bundle_attach: Some(esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(transport)?;

        let content_length = payload.len().to_string();
        let headers: heapless::Vec<(&str, &str), 3> = [
            Some(("Content-Type", content_type)),
            Some(("Content-Length", content_length.as_str())),
            authorization.map(|auth| ("Authorization", auth)),
        ]
        .into_iter()
        .flatten()
        .collect();

        client
            .initiate_request(method, url, &headers)
            .map_err(transport)?;

        let mut written = 0;
        while written < payload.len() {
            written += client.write(&payload[written..]).map_err(transport)?;
        }

        client.initiate_response().map_err(transport)?;

        let status = client.status();
        let mut body = Vec::new();
        let mut buf = [0u8; BUF_SIZE];
        loop {
            let read = client.read(&mut buf).map_err(transport)?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&buf[..read]);
        }

        if !(200..300).contains(&status) {
            return Err(RemoteError::Status(status));
        }

        Ok(body)
    }

    fn transport(err: impl std::fmt::Display) -> RemoteError {
        RemoteError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_response_parses() {
        let body = br#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "u-abc123",
            "email": "node@example.com",
            "idToken": "tok.en",
            "registered": true,
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }"#;

        let auth = parse_sign_in_response(body).unwrap();
        assert_eq!(auth.local_id, "u-abc123");
        assert_eq!(auth.id_token, "tok.en");
        assert_eq!(auth.expires_in_secs(), 3600);
    }

    #[test]
    fn malformed_expiry_falls_back_to_an_hour() {
        let body = br#"{"localId": "u", "idToken": "t", "expiresIn": "soon"}"#;
        assert_eq!(parse_sign_in_response(body).unwrap().expires_in_secs(), 3600);
    }
}
