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
use compost_core::Calibration;

use crate::backend::SessionConfig;

// Injected at build time from `.env`, see build.rs.
pub const WIFI_SSID: &str = env!("COMPOST_WIFI_SSID");
pub const WIFI_PASS: &str = env!("COMPOST_WIFI_PASS");

pub const API_KEY: &str = env!("COMPOST_API_KEY");
pub const DATABASE_URL: &str = env!("COMPOST_DATABASE_URL");
pub const USER_EMAIL: &str = env!("COMPOST_USER_EMAIL");
pub const USER_PASSWORD: &str = env!("COMPOST_USER_PASSWORD");
pub const STORAGE_BUCKET: &str = env!("COMPOST_STORAGE_BUCKET");

pub const fn session_config() -> SessionConfig {
    SessionConfig {
        api_key: API_KEY,
        user_email: USER_EMAIL,
        user_password: USER_PASSWORD,
    }
}

// Bench calibration of the soil probes: raw ADC reading when dry (0 %) and
// when saturated (100 %).
pub const SOIL_CALIBRATION: Calibration = Calibration::new(35, 163);

// MQ-4 methane: raw ADC window mapped to 0-100 %.
pub const MQ4_CALIBRATION: Calibration = Calibration::new(200, 4095);

// MQ-135 CO2: ppm window mapped to 0-100 % based on typical CO2 levels.
pub const MQ135_PPM_WINDOW: Calibration = Calibration::new(400, 2000);
// rzero/rload from bench calibration against the local atmospheric CO2 level.
pub const MQ135_RZERO: f32 = 46.0;
pub const MQ135_RLOAD: f32 = 22.0;

// Database roots. Soil and climate write under the authenticated user; the
// gas node writes a fixed session with a timestamped log mirror.
pub const USERS_ROOT: &str = "UsersData";
pub const GAS_LATEST_ROOT: &str = "latest/session_001";
pub const GAS_LOG_ROOT: &str = "sensor_logs/session_001";

// Camera node: photo file on the mounted flash filesystem, overwritten every
// cycle, and the fixed object path it is uploaded to.
pub const SPIFFS_BASE_PATH: &str = "/spiffs";
pub const PHOTO_FILE_PATH: &str = "/spiffs/photo.jpg";
pub const PHOTO_OBJECT_PATH: &str = "data/photo.jpg";
pub const PHOTO_CONTENT_TYPE: &str = "image/jpg";
