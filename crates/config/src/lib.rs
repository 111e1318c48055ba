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

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

mod config_loader;
mod defaults;
mod unresolved_config;


use std::time::Duration;

use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Microvolts;

pub use config_loader::load_config;
pub use unresolved_config::LogLevel;
pub use unresolved_config::UnresolvedCoreFreqConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreFreqConfig {
    pub suspend: Suspend,
    pub battery: Battery,
    /// Enables the raw register snapshot/restore path for power-domain
    /// collapse. Only boards whose CPU power domain fully loses state
    /// during suspend want this.
    pub deep_suspend: bool,
    pub logs: Logs,
}

/// The safe operating point the cluster is pinned to across PM transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Suspend {
    pub volt: Microvolts,
    pub freq: KiloHertz,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Battery {
    pub capacity_threshold_percent: u8,
    pub low_battery_freq: KiloHertz,
    pub boot_window: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Logs {
    pub log_level: tracing_subscriber::filter::LevelFilter,
}

impl Default for CoreFreqConfig {
    fn default() -> Self {
        UnresolvedCoreFreqConfig::default().resolve()
    }
}

impl Default for Suspend {
    fn default() -> Self {
        Self {
            volt: Microvolts::new(defaults::default_suspend_volt_uv()),
            freq: KiloHertz::new(defaults::default_suspend_freq_khz()),
        }
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            capacity_threshold_percent: defaults::default_capacity_threshold_percent(),
            low_battery_freq: KiloHertz::new(defaults::default_low_battery_khz()),
            boot_window: Duration::from_secs(defaults::default_boot_window_secs()),
        }
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            log_level: defaults::default_log_level().to_tracing_filter(),
        }
    }
}
