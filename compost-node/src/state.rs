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
use std::sync::{Arc, Mutex};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::PubSubChannel;
use lazy_static::lazy_static;

use crate::backend::RtdbSession;
use crate::configuration;

lazy_static! {
    /// Backend session shared between the keeper (services it), the
    /// dispatcher (reads readiness and uid) and the sender (reads the token).
    pub static ref SESSION: Arc<Mutex<RtdbSession>> =
        Arc::new(Mutex::new(RtdbSession::new(configuration::session_config())));
}

pub static NETWORK_EVENT_CHANNEL: PubSubChannel<
    CriticalSectionRawMutex,
    NetworkStateChange,
    4,
    4,
    4,
> = PubSubChannel::new();

#[derive(Copy, Clone, Debug)]
pub enum NetworkStateChange {
    WifiDisconnected,
    IpAddressAssigned { ip: embedded_svc::ipv4::Ipv4Addr },
}
