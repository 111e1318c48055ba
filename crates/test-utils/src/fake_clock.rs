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

use parking_lot::Mutex;

use corefreq_shared::hardware::ClockError;
use corefreq_shared::hardware::CpuClock;
use corefreq_shared::types::FreqTableEntry;
use corefreq_shared::types::Hertz;
use corefreq_shared::types::Microvolts;

/// In-memory clock node recording every rate and limit change.
pub struct FakeCpuClock {
    state: Mutex<State>,
}

struct State {
    rate: Hertz,
    limit: (Hertz, Hertz),
    table: Option<Vec<FreqTableEntry>>,
    core_voltage: Option<Microvolts>,
    reject_set_rate: bool,
    set_rate_calls: Vec<Hertz>,
    limit_calls: Vec<(Hertz, Hertz)>,
    enable_count: u32,
    disable_count: u32,
}

impl FakeCpuClock {
    pub fn new(initial_rate: Hertz) -> Self {
        let state = State {
            rate: initial_rate,
            limit: (Hertz::new(0), Hertz::MAX),
            table: None,
            core_voltage: None,
            reject_set_rate: false,
            set_rate_calls: Vec::new(),
            limit_calls: Vec::new(),
            enable_count: 0,
            disable_count: 0,
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_table(self, table: Vec<FreqTableEntry>) -> Self {
        self.state.lock().table = Some(table);
        self
    }

    pub fn with_core_voltage(self, volt: Microvolts) -> Self {
        self.state.lock().core_voltage = Some(volt);
        self
    }

    /// Makes every subsequent set_rate call fail without changing the rate.
    pub fn reject_set_rate(&self) {
        self.state.lock().reject_set_rate = true;
    }

    pub fn set_rate_calls(&self) -> Vec<Hertz> {
        self.state.lock().set_rate_calls.clone()
    }

    pub fn limit_calls(&self) -> Vec<(Hertz, Hertz)> {
        self.state.lock().limit_calls.clone()
    }

    pub fn enable_count(&self) -> u32 {
        self.state.lock().enable_count
    }

    pub fn disable_count(&self) -> u32 {
        self.state.lock().disable_count
    }
}

impl CpuClock for FakeCpuClock {
    fn rate(&self) -> Hertz {
        self.state.lock().rate
    }

    fn set_rate(&self, rate: Hertz) -> Result<(), ClockError> {
        let mut state = self.state.lock();
        state.set_rate_calls.push(rate);
        if state.reject_set_rate {
            return Err(ClockError::new("rate rejected by fake clock"));
        }
        state.rate = rate;
        Ok(())
    }

    fn rate_limit(&self) -> (Hertz, Hertz) {
        self.state.lock().limit
    }

    fn set_rate_limit(&self, min: Hertz, max: Hertz) -> Result<(), ClockError> {
        let mut state = self.state.lock();
        state.limit_calls.push((min, max));
        state.limit = (min, max);
        Ok(())
    }

    fn enable(&self) {
        self.state.lock().enable_count += 1;
    }

    fn disable(&self) {
        self.state.lock().disable_count += 1;
    }

    fn freq_volt_table(&self) -> Option<Vec<FreqTableEntry>> {
        self.state.lock().table.clone()
    }

    fn core_voltage(&self) -> Option<Microvolts> {
        self.state.lock().core_voltage
    }
}
