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

use nonempty::NonEmpty;

use corefreq_shared::types::FreqTableEntry;
use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Microvolts;

use crate::errors::TableError;
use crate::request::Relation;

/// Hardware-validated frequency/voltage table, strictly ascending by
/// frequency. Built once at init and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreqTable {
    entries: NonEmpty<FreqTableEntry>,
}

const fn entry(khz: u32, volt_uv: u32) -> FreqTableEntry {
    FreqTableEntry::new(KiloHertz::new(khz), Microvolts::new(volt_uv))
}

impl FreqTable {
    pub fn from_entries(entries: Vec<FreqTableEntry>) -> Result<Self, TableError> {
        for (index, pair) in entries.windows(2).enumerate() {
            if pair[1].khz <= pair[0].khz {
                return Err(TableError::NotAscending { index: index + 1 });
            }
        }
        let entries = NonEmpty::from_vec(entries).ok_or(TableError::Empty)?;
        Ok(Self { entries })
    }

    /// The operating points boards without their own table fall back to.
    pub fn default_table() -> Self {
        let entries = NonEmpty::from((
            entry(312_000, 875_000),
            vec![
                entry(504_000, 925_000),
                entry(816_000, 975_000),
                entry(1_008_000, 1_075_000),
                entry(1_200_000, 1_150_000),
                entry(1_416_000, 1_250_000),
                entry(1_608_000, 1_350_000),
            ],
        ));
        Self { entries }
    }

    /// Largest tabulated frequency not exceeding `max`, or `max` itself if
    /// every entry exceeds it.
    pub fn nearest_not_exceeding(&self, max: KiloHertz) -> KiloHertz {
        match self.search(max, Relation::AtMost) {
            Some(found) => found.khz,
            None => max,
        }
    }

    pub fn search(&self, target: KiloHertz, relation: Relation) -> Option<FreqTableEntry> {
        match relation {
            Relation::AtLeast => self.entries.iter().find(|entry| entry.khz >= target).copied(),
            Relation::AtMost => self
                .entries
                .iter()
                .filter(|entry| entry.khz <= target)
                .last()
                .copied(),
        }
    }

    /// Suspend operating point: the entry with the smallest voltage at or
    /// above `min_volt`. Ties go to the earliest entry.
    pub fn suspend_freq_for(&self, min_volt: Microvolts) -> Option<KiloHertz> {
        self.entries
            .iter()
            .filter(|entry| entry.volt >= min_volt)
            .min_by_key(|entry| entry.volt)
            .map(|entry| entry.khz)
    }

    pub fn min_khz(&self) -> KiloHertz {
        self.entries.first().khz
    }

    pub fn max_khz(&self) -> KiloHertz {
        self.entries.last().khz
    }

    pub fn entries(&self) -> impl Iterator<Item = &FreqTableEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::entry;
    use super::FreqTable;
    use super::Relation;
    use crate::errors::TableError;

    use corefreq_shared::types::KiloHertz;
    use corefreq_shared::types::Microvolts;

    fn small_table() -> FreqTable {
        FreqTable::from_entries(vec![
            entry(312_000, 875_000),
            entry(504_000, 925_000),
            entry(816_000, 975_000),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(FreqTable::from_entries(vec![]), Err(TableError::Empty));
    }

    #[test]
    fn rejects_unsorted_table() {
        let result =
            FreqTable::from_entries(vec![entry(504_000, 925_000), entry(312_000, 875_000)]);
        assert_eq!(result, Err(TableError::NotAscending { index: 1 }));
    }

    #[test]
    fn nearest_not_exceeding_picks_largest_at_or_below() {
        let table = small_table();

        assert_eq!(
            table.nearest_not_exceeding(KiloHertz::new(600_000)),
            KiloHertz::new(504_000)
        );
        assert_eq!(
            table.nearest_not_exceeding(KiloHertz::new(816_000)),
            KiloHertz::new(816_000)
        );
    }

    #[test]
    fn nearest_not_exceeding_passes_through_when_all_entries_exceed() {
        let table = small_table();

        assert_eq!(
            table.nearest_not_exceeding(KiloHertz::new(100_000)),
            KiloHertz::new(100_000)
        );
    }

    #[test]
    fn search_at_most_picks_largest_at_or_below() {
        let table = small_table();

        let found = table
            .search(KiloHertz::new(2_000_000), Relation::AtMost)
            .unwrap();
        assert_eq!(found.khz, KiloHertz::new(816_000));
    }

    #[test]
    fn search_at_least_picks_smallest_at_or_above() {
        let table = small_table();

        let found = table
            .search(KiloHertz::new(400_000), Relation::AtLeast)
            .unwrap();
        assert_eq!(found.khz, KiloHertz::new(504_000));
    }

    #[test]
    fn search_at_least_fails_above_table_max() {
        let table = small_table();

        assert!(table
            .search(KiloHertz::new(2_000_000), Relation::AtLeast)
            .is_none());
    }

    #[test]
    fn search_at_most_fails_below_table_min() {
        let table = small_table();

        assert!(table
            .search(KiloHertz::new(100_000), Relation::AtMost)
            .is_none());
    }

    #[test]
    fn suspend_freq_picks_smallest_voltage_at_or_above() {
        let table = FreqTable::default_table();

        // 1_100_000 uV sits between the 1008 MHz (1.075 V) and
        // 1200 MHz (1.15 V) rows.
        assert_eq!(
            table.suspend_freq_for(Microvolts::new(1_100_000)),
            Some(KiloHertz::new(1_200_000))
        );
        assert_eq!(table.suspend_freq_for(Microvolts::new(2_000_000)), None);
    }
}
