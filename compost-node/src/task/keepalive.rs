use embassy_time::Timer;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use esp_idf_sys::EspError;
use log::*;

use crate::settings::WIFI_CHECK_INTERVAL;
use crate::state::{NetworkStateChange, NETWORK_EVENT_CHANNEL};

/// Supervises the Wi-Fi link. On a lost link it publishes the disconnect (so
/// the session keeper invalidates its tokens), reconnects, and announces the
/// newly assigned address.
pub async fn supervise_wifi(mut wifi: BlockingWifi<EspWifi<'static>>) {
    let publisher = NETWORK_EVENT_CHANNEL.publisher().unwrap();

    loop {
        Timer::after(WIFI_CHECK_INTERVAL).await;

        if wifi.is_connected().unwrap_or(false) {
            continue;
        }

        warn!("wifi link lost, reconnecting");
        publisher.publish(NetworkStateChange::WifiDisconnected).await;

        match reconnect(&mut wifi) {
            Ok(ip) => {
                publisher
                    .publish(NetworkStateChange::IpAddressAssigned { ip })
                    .await;
            }
            Err(err) => warn!("wifi reconnect failed: {err}"),
        }
    }
}

fn reconnect(
    wifi: &mut BlockingWifi<EspWifi<'static>>,
) -> Result<embedded_svc::ipv4::Ipv4Addr, EspError> {
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("wifi reconnected, ip = {}", ip_info.ip);
    Ok(ip_info.ip)
}
