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

use corefreq_shared::hardware::RegisterBus;

/// Outcome of waiting for the ARM PLL lock flag. A timeout is reported,
/// not swallowed: the caller decides whether to proceed on an unlocked
/// PLL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PllLock {
    Locked { iterations: u32 },
    TimedOut { budget: u32 },
}

/// Spins on `offset` until `bit` reads set, up to `budget` reads.
pub(crate) fn poll_register(bus: &dyn RegisterBus, offset: u32, bit: u32, budget: u32) -> PllLock {
    for iteration in 0..budget {
        if bus.read(offset) & (1 << bit) != 0 {
            return PllLock::Locked {
                iterations: iteration + 1,
            };
        }
    }
    PllLock::TimedOut { budget }
}
