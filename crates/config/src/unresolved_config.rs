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

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Microvolts;

use super::defaults::default_boot_window_secs;
use super::defaults::default_capacity_threshold_percent;
use super::defaults::default_deep_suspend;
use super::defaults::default_log_level;
use super::defaults::default_low_battery_khz;
use super::defaults::default_suspend_freq_khz;
use super::defaults::default_suspend_volt_uv;
use crate::Battery;
use crate::CoreFreqConfig;
use crate::Logs;
use crate::Suspend;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedCoreFreqConfig {
    #[serde(default)]
    pub suspend: UnresolvedSuspend,
    #[serde(default)]
    pub battery: UnresolvedBattery,
    #[serde(default = "default_deep_suspend")]
    pub deep_suspend: bool,
    #[serde(default)]
    pub logs: UnresolvedLogs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedSuspend {
    #[serde(default = "default_suspend_volt_uv")]
    pub volt_uv: u32,

    #[serde(default = "default_suspend_freq_khz")]
    pub freq_khz: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedBattery {
    #[serde(default = "default_capacity_threshold_percent")]
    pub capacity_threshold_percent: u8,

    #[serde(default = "default_low_battery_khz")]
    pub low_battery_khz: u32,

    #[serde(default = "default_boot_window_secs")]
    pub boot_window_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedLogs {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for UnresolvedSuspend {
    fn default() -> Self {
        Self {
            volt_uv: default_suspend_volt_uv(),
            freq_khz: default_suspend_freq_khz(),
        }
    }
}

impl Default for UnresolvedBattery {
    fn default() -> Self {
        Self {
            capacity_threshold_percent: default_capacity_threshold_percent(),
            low_battery_khz: default_low_battery_khz(),
            boot_window_secs: default_boot_window_secs(),
        }
    }
}

impl Default for UnresolvedLogs {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;

        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl UnresolvedCoreFreqConfig {
    pub fn resolve(self) -> CoreFreqConfig {
        CoreFreqConfig {
            suspend: self.suspend.resolve(),
            battery: self.battery.resolve(),
            deep_suspend: self.deep_suspend,
            logs: self.logs.resolve(),
        }
    }
}

impl UnresolvedSuspend {
    pub fn resolve(self) -> Suspend {
        Suspend {
            volt: Microvolts::new(self.volt_uv),
            freq: KiloHertz::new(self.freq_khz),
        }
    }
}

impl UnresolvedBattery {
    pub fn resolve(self) -> Battery {
        Battery {
            capacity_threshold_percent: self.capacity_threshold_percent,
            low_battery_freq: KiloHertz::new(self.low_battery_khz),
            boot_window: Duration::from_secs(self.boot_window_secs),
        }
    }
}

impl UnresolvedLogs {
    pub fn resolve(self) -> Logs {
        Logs {
            log_level: self.log_level.to_tracing_filter(),
        }
    }
}
