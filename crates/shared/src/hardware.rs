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

use thiserror::Error as ThisError;

use crate::types::FreqTableEntry;
use crate::types::Hertz;
use crate::types::Microvolts;

/// Error a clock node reports when it rejects a rate or limit change.
#[derive(ThisError, Debug)]
#[error("clock node rejected the operation: {reason}")]
pub struct ClockError {
    reason: String,
}

impl ClockError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The CPU clock/voltage node of the external DVFS subsystem. A rate change
/// coordinates the clock divider and the supply regulator atomically on the
/// other side of this seam.
pub trait CpuClock: Send + Sync {
    /// Current rate as the hardware reports it.
    fn rate(&self) -> Hertz;

    fn set_rate(&self, rate: Hertz) -> Result<(), ClockError>;

    /// Standing (min, max) limit currently imposed on the node.
    fn rate_limit(&self) -> (Hertz, Hertz);

    fn set_rate_limit(&self, min: Hertz, max: Hertz) -> Result<(), ClockError>;

    fn enable(&self);

    fn disable(&self);

    /// Hardware-validated table, ascending by frequency; None when the board
    /// supplies none.
    fn freq_volt_table(&self) -> Option<Vec<FreqTableEntry>>;

    /// Core supply voltage, if a regulator handle is available.
    fn core_voltage(&self) -> Option<Microvolts>;
}

/// System battery query, percent capacity in [0, 100].
pub trait BatteryGauge: Send + Sync {
    fn capacity_percent(&self) -> u8;
}

/// Gauge used when the board has no fuel gauge; reports a full battery.
pub struct NoGauge;

impl BatteryGauge for NoGauge {
    fn capacity_percent(&self) -> u8 {
        100
    }
}

/// Platform-level power-management hooks driven on reboot.
pub trait PlatformPm: Send + Sync {
    /// Latches the global system status to "rebooting".
    fn note_reboot(&self);

    /// Drops any thermal frequency limiting currently in force.
    fn disable_thermal_limit(&self);
}

/// The clock & reset unit MMIO window used by the deep-suspend snapshot.
/// Offsets are in bytes from the unit base.
pub trait RegisterBus: Send + Sync {
    fn read(&self, offset: u32) -> u32;

    fn write(&self, offset: u32, value: u32);
}
