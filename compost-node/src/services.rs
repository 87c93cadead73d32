/*
 * Compost Box Node
 *
 * MIT license
 *
 * Copyright (c) 2026 Compost Box Project
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 *
 * Apache license, Version 2.0
 *
 * Copyright (c) 2026 Compost Box Project
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
use std::ffi::CString;
use std::time::{SystemTime, UNIX_EPOCH};

use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SyncStatus};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use esp_idf_sys::{esp, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register, EspError};
use log::*;

use crate::configuration::{WIFI_PASS, WIFI_SSID};
use crate::errors::InitError;

pub fn wifi(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    partition: Option<EspDefaultNvsPartition>,
) -> Result<BlockingWifi<EspWifi<'static>>, InitError> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), partition)?, sysloop)?;

    info!("Wifi name {}", WIFI_SSID);

    let auth_method = if WIFI_PASS.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: WIFI_SSID.try_into().unwrap(),
        password: WIFI_PASS.try_into().unwrap(),
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("wifi connected, ip = {}", ip_info.ip);

    Ok(wifi)
}

/// Starts SNTP and blocks until the system clock is synchronized. Only the
/// gas node calls this; its log mirror is keyed by epoch seconds.
pub fn sntp_sync() -> Result<EspSntp<'static>, InitError> {
    let sntp = EspSntp::new_default()?;

    info!("waiting for SNTP time sync");
    while sntp.get_sync_status() != SyncStatus::Completed {
        std::thread::sleep(core::time::Duration::from_millis(100));
    }
    info!("time synchronized, epoch = {}", epoch_seconds());

    Ok(sntp)
}

pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Mounts the SPIFFS partition the camera node stores its photo on. The
/// partition is formatted on first use.
pub fn mount_spiffs(base_path: &str) -> Result<(), EspError> {
    let base_path = CString::new(base_path).unwrap();

    let conf = esp_vfs_spiffs_conf_t {
        base_path: base_path.as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };

    esp!(unsafe { esp_vfs_spiffs_register(&conf) })
}
