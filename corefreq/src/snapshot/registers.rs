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

//! Byte offsets into the clock & reset unit window and the word layouts
//! the snapshot depends on.

pub(crate) const APLL_CON_BASE: u32 = 0x0000;
pub(crate) const APLL_CON_COUNT: usize = 3;
/// Lock flag in APLL_CON1.
pub(crate) const APLL_LOCK_BIT: u32 = 10;

pub(crate) const MODE_CON: u32 = 0x0040;

pub(crate) const CLKSEL_CON_BASE: u32 = 0x0044;
pub(crate) const CLKSEL_CON_COUNT: usize = 35;

pub(crate) const CLKGATE_CON_BASE: u32 = 0x00d0;
pub(crate) const CLKGATE_CON_COUNT: usize = 11;

pub(crate) const GLB_SRST_FST: u32 = 0x0100;
pub(crate) const GLB_SRST_SND: u32 = 0x0104;
pub(crate) const MISC_CON: u32 = 0x0134;
pub(crate) const GLB_CNT_TH: u32 = 0x0140;
pub(crate) const GLB_RST_ST: u32 = 0x0150;

/// The unit honors a low-half write only when the matching high-half
/// enable bits are set, so restored words carry the full enable mask.
pub(crate) const WRITE_ENABLE_MASK: u32 = 0xffff_0000;
/// MODE_CON packs four 2-bit fields; its enable bits sit one per nibble.
pub(crate) const MODE_CON_WRITE_MASK: u32 = 0x1111_0000;

/// CLKSEL_CON0 word parking the cores on GPLL/2 while the ARM PLL retrains.
pub(crate) const CORE_SEL_SAFE: u32 = 0x0080_0080;
/// CLKSEL_CON0 word switching the cores back to the ARM PLL.
pub(crate) const CORE_SEL_APLL: u32 = 0x0080_0000;

pub(crate) const PLL_LOCK_POLL_BUDGET: u32 = 24_000_000;

pub(crate) fn apll_con(index: usize) -> u32 {
    APLL_CON_BASE + (index as u32) * 4
}

pub(crate) fn clksel_con(index: usize) -> u32 {
    CLKSEL_CON_BASE + (index as u32) * 4
}

pub(crate) fn clkgate_con(index: usize) -> u32 {
    CLKGATE_CON_BASE + (index as u32) * 4
}

/// CLKSEL words owned by other drivers; the snapshot leaves them alone.
pub(crate) fn clksel_skipped(index: usize) -> bool {
    matches!(index, 16 | 21 | 22 | 33)
}

/// CLKSEL words whose restore goes through the write-enable convention.
pub(crate) fn clksel_masked(index: usize) -> bool {
    matches!(index, 0..=6 | 9..=15 | 23..=34)
}

/// ARM PLL output in MHz from its CON0/CON1 words, off a 24 MHz
/// reference. Zero divider fields read as 1 so a scrambled register
/// cannot fault the decode.
pub(crate) fn apll_rate_mhz(con0: u32, con1: u32) -> u32 {
    let nr = (con1 & 0x3f).max(1);
    let nf = con0 & 0xfff;
    let no = ((con0 >> 12) & 0x7).max(1);
    let nb = ((con1 >> 6) & 0x7).max(1);
    24 / nr * nf / no / nb
}
