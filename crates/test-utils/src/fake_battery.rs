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

use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use corefreq_shared::hardware::BatteryGauge;

/// Gauge reporting a preset capacity; the capacity can be changed mid-test.
#[derive(Debug)]
pub struct FixedBattery {
    capacity: AtomicU8,
}

impl FixedBattery {
    pub fn new(capacity_percent: u8) -> Self {
        Self {
            capacity: AtomicU8::new(capacity_percent),
        }
    }

    pub fn set_capacity(&self, capacity_percent: u8) {
        self.capacity.store(capacity_percent, Ordering::SeqCst);
    }
}

impl BatteryGauge for FixedBattery {
    fn capacity_percent(&self) -> u8 {
        self.capacity.load(Ordering::SeqCst)
    }
}
