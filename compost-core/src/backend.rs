use thiserror::Error;

use crate::upload::UploadTarget;

/// Failures a remote operation can report through its completion callback.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("backend session is not ready")]
    NotReady,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server rejected the operation with status {0}")]
    Status(u16),
}

/// Completion observer for one outbound operation. Operations are issued
/// fire-and-forget; this is the only place their outcome ever surfaces, and
/// the stock observers just log. At-least-once, no retry.
pub type Completion = Box<dyn FnOnce(Result<(), RemoteError>) + Send>;

/// Typed scalar writes to the realtime database.
pub trait ValueStore {
    fn set(&mut self, target: UploadTarget, done: Completion);
}

/// Binary file upload to the object storage bucket.
pub trait ObjectStore {
    fn upload(&mut self, local_path: &str, remote_path: &str, content_type: &str, done: Completion);
}

/// The backend SDK surface the session keeper drives. `service` must be
/// called every ~10 ms so the connection/auth state machine does not starve;
/// its internals are opaque here.
pub trait BackendSession {
    fn ready(&self) -> bool;
    fn service(&mut self);
}
