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

use std::collections::HashMap;

use parking_lot::Mutex;

use corefreq_shared::hardware::RegisterBus;

/// Register window backed by a map, recording every write in order.
///
/// A status bit can be armed to appear after a number of reads of its
/// register, modelling hardware that raises a flag some time after being
/// programmed.
pub struct RecordingBus {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    regs: HashMap<u32, u32>,
    writes: Vec<(u32, u32)>,
    armed: Option<ArmedBit>,
    reads_seen: HashMap<u32, u64>,
}

struct ArmedBit {
    offset: u32,
    bit: u32,
    after_reads: u64,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn preset(&self, offset: u32, value: u32) {
        self.state.lock().regs.insert(offset, value);
    }

    /// After `after_reads` reads of `offset`, reads start reporting `bit` set.
    pub fn arm_bit(&self, offset: u32, bit: u32, after_reads: u64) {
        self.state.lock().armed = Some(ArmedBit {
            offset,
            bit,
            after_reads,
        });
    }

    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.state.lock().writes.clone()
    }
}

impl Default for RecordingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for RecordingBus {
    fn read(&self, offset: u32) -> u32 {
        let mut state = self.state.lock();
        let seen = state.reads_seen.entry(offset).or_insert(0);
        *seen += 1;
        let seen = *seen;

        let mut value = state.regs.get(&offset).copied().unwrap_or(0);
        if let Some(armed) = &state.armed {
            if armed.offset == offset && seen >= armed.after_reads {
                value |= 1 << armed.bit;
            }
        }
        value
    }

    fn write(&self, offset: u32, value: u32) {
        let mut state = self.state.lock();
        state.writes.push((offset, value));
        state.regs.insert(offset, value);
    }
}
