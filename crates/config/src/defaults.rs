/*
 * Copyright 2024 Fluence Labs Limited
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

use crate::unresolved_config::LogLevel;

pub(crate) fn default_suspend_volt_uv() -> u32 {
    1_100_000
}

pub(crate) fn default_suspend_freq_khz() -> u32 {
    816_000
}

pub(crate) fn default_capacity_threshold_percent() -> u8 {
    5
}

pub(crate) fn default_low_battery_khz() -> u32 {
    600_000
}

pub(crate) fn default_boot_window_secs() -> u64 {
    60
}

pub(crate) fn default_deep_suspend() -> bool {
    false
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Error
}
