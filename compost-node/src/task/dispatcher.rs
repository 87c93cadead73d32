use embassy_time::{Duration, Timer};
use log::*;

use compost_core::dispatch::dispatch_cycle;
use compost_core::{PathScheme, SlotBank, SlotDef};

use crate::backend::QueueingStore;
use crate::services;
use crate::state::SESSION;

/// Where a node's values land in the database. Soil and climate nodes write
/// under the authenticated user; the gas node writes a fixed session root
/// with a timestamped log mirror.
#[derive(Copy, Clone)]
pub enum DatabaseRoot {
    PerUser {
        root: &'static str,
    },
    Fixed {
        latest: &'static str,
        log: Option<&'static str>,
    },
}

impl DatabaseRoot {
    fn scheme(&self, uid: &str) -> PathScheme {
        match *self {
            DatabaseRoot::PerUser { root } => PathScheme::latest(format!("{root}/{uid}")),
            DatabaseRoot::Fixed { latest, log: None } => PathScheme::latest(latest),
            DatabaseRoot::Fixed {
                latest,
                log: Some(log),
            } => PathScheme::with_log(latest, log),
        }
    }
}

/// Scalar upload dispatcher. Each cycle waits out the interval, then — if the
/// backend session is ready — snapshots the bank once and queues one
/// fire-and-forget write per planned target. Cycles where the session is not
/// ready are skipped silently; nothing is ever re-sent.
///
/// `timestamped` nodes key their log mirror by epoch seconds and therefore
/// only make sense after an SNTP sync.
pub async fn dispatch<const N: usize>(
    bank: &'static SlotBank<N>,
    defs: &'static [SlotDef],
    root: DatabaseRoot,
    interval: Duration,
    timestamped: bool,
) {
    let mut store = QueueingStore;

    loop {
        let scheme = {
            let session = SESSION.lock().unwrap();
            if session.ready() {
                Some(root.scheme(session.uid().unwrap_or_default()))
            } else {
                None
            }
        };

        match scheme {
            Some(scheme) => {
                let timestamp = timestamped.then(services::epoch_seconds);
                let issued = dispatch_cycle(bank, defs, &scheme, timestamp, &mut store);
                debug!("dispatched {issued} writes under {}", scheme.latest_root);
            }
            None => debug!("backend session not ready, skipping dispatch cycle"),
        }

        Timer::after(interval).await;
    }
}
