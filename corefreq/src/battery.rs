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
use std::time::Instant;

use corefreq_shared::hardware::BatteryGauge;
use corefreq_shared::types::KiloHertz;

/// Caps governor requests during the boot window while the battery is
/// nearly empty, so a deeply discharged device survives its own boot.
///
/// The boot latch is one-way: once the window has elapsed the limiter
/// never reactivates, even if capacity drops later.
#[derive(Debug)]
pub struct BatteryLimiter {
    is_booting: bool,
    booted_at: Instant,
    boot_window: Duration,
    capacity_threshold_percent: u8,
    cap: KiloHertz,
}

impl BatteryLimiter {
    pub fn new(cap: KiloHertz, capacity_threshold_percent: u8, boot_window: Duration) -> Self {
        Self {
            is_booting: true,
            booted_at: Instant::now(),
            boot_window,
            capacity_threshold_percent,
            cap,
        }
    }

    /// Moves the boot reference point, so tests can age the limiter.
    pub fn with_boot_instant(mut self, booted_at: Instant) -> Self {
        self.booted_at = booted_at;
        self
    }

    /// Manual governors pin frequencies deliberately and bypass the cap.
    pub fn apply(
        &mut self,
        target: KiloHertz,
        governor_is_dynamic: bool,
        gauge: &dyn BatteryGauge,
    ) -> KiloHertz {
        if !governor_is_dynamic || !self.is_booting {
            return target;
        }

        if self.booted_at.elapsed() > self.boot_window {
            self.is_booting = false;
            return target;
        }

        if target > self.cap && gauge.capacity_percent() <= self.capacity_threshold_percent {
            tracing::info!(
                "battery at or below {}%, capping {} kHz to {} kHz",
                self.capacity_threshold_percent,
                target,
                self.cap
            );
            return self.cap;
        }

        target
    }
}
