use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use log::*;

use compost_core::backend::BackendSession;

use crate::settings::SESSION_TICK;
use crate::state::{NetworkStateChange, NETWORK_EVENT_CHANNEL, SESSION};

/// Session keeper: services the backend session state machine every 10 ms so
/// sign-in, retry pacing and token refresh all make progress. A Wi-Fi drop
/// invalidates the session immediately instead of waiting for the next
/// request to fail.
pub async fn keep_session() {
    let mut network_events = NETWORK_EVENT_CHANNEL.subscriber().unwrap();

    loop {
        let tick = Timer::after(SESSION_TICK);
        match select(tick, network_events.next_message_pure()).await {
            Either::First(_) => {
                SESSION.lock().unwrap().service();
            }
            Either::Second(NetworkStateChange::WifiDisconnected) => {
                warn!("wifi lost, invalidating backend session");
                SESSION.lock().unwrap().invalidate();
            }
            Either::Second(NetworkStateChange::IpAddressAssigned { ip }) => {
                info!("wifi restored, ip = {ip}");
            }
        }
    }
}
