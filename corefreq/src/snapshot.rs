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

use corefreq_shared::hardware::CpuClock;
use corefreq_shared::hardware::RegisterBus;

mod poll;
mod registers;


pub use poll::PllLock;

use poll::poll_register;
use registers::*;

/// Saved image of the clock & reset unit for deep suspend, where the
/// unit loses power and comes back running from the crystal.
///
/// [`suspend`](Self::suspend) captures the words that must survive;
/// [`resume`](Self::resume) replays them in an order that never clocks
/// the cores off an untrained PLL.
pub struct ClockRegisterSnapshot {
    apll_con: [u32; APLL_CON_COUNT],
    mode_con: u32,
    clksel_con: [u32; CLKSEL_CON_COUNT],
    clkgate_con: [u32; CLKGATE_CON_COUNT],
    glb_srst_fst: u32,
    glb_srst_snd: u32,
    misc_con: u32,
    glb_cnt_th: u32,
    glb_rst_st: u32,
    lock_poll_budget: u32,
}

impl ClockRegisterSnapshot {
    pub fn new() -> Self {
        Self {
            apll_con: [0; APLL_CON_COUNT],
            mode_con: 0,
            clksel_con: [0; CLKSEL_CON_COUNT],
            clkgate_con: [0; CLKGATE_CON_COUNT],
            glb_srst_fst: 0,
            glb_srst_snd: 0,
            misc_con: 0,
            glb_cnt_th: 0,
            glb_rst_st: 0,
            lock_poll_budget: PLL_LOCK_POLL_BUDGET,
        }
    }

    /// Shrinks the lock-wait budget, so tests do not spin 24M reads.
    pub fn with_lock_poll_budget(mut self, budget: u32) -> Self {
        self.lock_poll_budget = budget;
        self
    }

    /// Captures the unit ahead of a power collapse. A suspend that keeps
    /// the unit powered needs no image and is a no-op.
    pub fn suspend(&mut self, bus: &dyn RegisterBus, clock: &dyn CpuClock, power_collapse: bool) {
        if !power_collapse {
            return;
        }

        clock.disable();

        for (index, word) in self.apll_con.iter_mut().enumerate() {
            *word = bus.read(apll_con(index));
            // CON2 carries no write-enable half.
            if index != APLL_CON_COUNT - 1 {
                *word |= WRITE_ENABLE_MASK;
            }
        }
        self.mode_con = MODE_CON_WRITE_MASK | bus.read(MODE_CON);
        for (index, word) in self.clksel_con.iter_mut().enumerate() {
            if clksel_skipped(index) {
                continue;
            }
            *word = bus.read(clksel_con(index));
            if clksel_masked(index) {
                *word |= WRITE_ENABLE_MASK;
            }
        }
        for (index, word) in self.clkgate_con.iter_mut().enumerate() {
            *word = WRITE_ENABLE_MASK | bus.read(clkgate_con(index));
        }
        self.glb_srst_fst = bus.read(GLB_SRST_FST);
        self.glb_srst_snd = bus.read(GLB_SRST_SND);
        self.misc_con = WRITE_ENABLE_MASK | bus.read(MISC_CON);
        self.glb_cnt_th = bus.read(GLB_CNT_TH);
        self.glb_rst_st = bus.read(GLB_RST_ST);

        tracing::debug!("clock unit captured for power collapse");
    }

    /// Replays the captured image after a power collapse and reports how
    /// the PLL lock wait went. Returns None when no collapse happened.
    pub fn resume(
        &self,
        bus: &dyn RegisterBus,
        clock: &dyn CpuClock,
        power_collapse: bool,
    ) -> Option<PllLock> {
        if !power_collapse {
            return None;
        }

        let live_con0 = bus.read(apll_con(0));
        let live_con1 = bus.read(apll_con(1));
        let rate_old = apll_rate_mhz(live_con0, live_con1);
        let rate_new = apll_rate_mhz(self.apll_con[0], self.apll_con[1]);

        // Core dividers widen before the PLL speeds up and narrow only
        // after it has slowed down, so the core clock never overshoots.
        if rate_old <= rate_new {
            bus.write(clksel_con(0), self.clksel_con[0]);
            bus.write(clksel_con(1), self.clksel_con[1]);
        }

        // Park the cores on GPLL/2 while the ARM PLL retrains.
        bus.write(clksel_con(0), CORE_SEL_SAFE);
        for (index, word) in self.apll_con.iter().enumerate() {
            bus.write(apll_con(index), *word);
        }
        let lock = poll_register(bus, apll_con(1), APLL_LOCK_BIT, self.lock_poll_budget);
        if let PllLock::TimedOut { budget } = lock {
            tracing::warn!("ARM PLL not locked after {budget} reads, switching back regardless");
        }
        bus.write(clksel_con(0), CORE_SEL_APLL);

        if rate_old > rate_new {
            bus.write(clksel_con(0), self.clksel_con[0]);
            bus.write(clksel_con(1), self.clksel_con[1]);
        }

        for index in 2..CLKSEL_CON_COUNT {
            if clksel_skipped(index) {
                continue;
            }
            bus.write(clksel_con(index), self.clksel_con[index]);
        }
        for (index, word) in self.clkgate_con.iter().enumerate() {
            bus.write(clkgate_con(index), *word);
        }
        bus.write(GLB_SRST_FST, self.glb_srst_fst);
        bus.write(GLB_SRST_SND, self.glb_srst_snd);
        bus.write(MISC_CON, self.misc_con);
        bus.write(GLB_CNT_TH, self.glb_cnt_th);
        // Mode and reset-status words are kept for the record only;
        // rewriting them would re-trigger mode switches long settled.
        tracing::debug!(
            "clock unit restored, mode {:#010x}, reset status {:#010x}",
            self.mode_con,
            self.glb_rst_st
        );

        clock.enable();
        Some(lock)
    }
}

impl Default for ClockRegisterSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
