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

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use corefreq_shared::hardware::PlatformPm;

#[derive(Debug, Default)]
pub struct FakePlatformPm {
    reboot_noted: AtomicBool,
    thermal_limit_disabled: AtomicBool,
}

impl FakePlatformPm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reboot_noted(&self) -> bool {
        self.reboot_noted.load(Ordering::SeqCst)
    }

    pub fn thermal_limit_disabled(&self) -> bool {
        self.thermal_limit_disabled.load(Ordering::SeqCst)
    }
}

impl PlatformPm for FakePlatformPm {
    fn note_reboot(&self) {
        self.reboot_noted.store(true, Ordering::SeqCst);
    }

    fn disable_thermal_limit(&self) {
        self.thermal_limit_disabled.store(true, Ordering::SeqCst);
    }
}
