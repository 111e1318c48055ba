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

use std::sync::Arc;

use parking_lot::Mutex;

use corefreq_shared::hardware::CpuClock;
use corefreq_shared::types::Hertz;
use corefreq_shared::types::Policy;

/// Keeps the clock node's standing rate limit in step with governor
/// changes.
///
/// A manual governor (performance, powersave) pins a frequency and must
/// not be fought by the standing limit, so switching to one records the
/// limit currently in force; switching back to a dynamic governor
/// reapplies the recorded limit.
pub struct PolicyNotifier {
    clock: Arc<dyn CpuClock>,
    remembered: Mutex<(Hertz, Hertz)>,
}

impl PolicyNotifier {
    pub fn new(clock: Arc<dyn CpuClock>) -> Self {
        Self {
            clock,
            remembered: Mutex::new((Hertz::new(0), Hertz::MAX)),
        }
    }

    /// Called after the governing policy has been adjusted.
    pub fn on_policy_adjust(&self, policy: &Policy) {
        let mut remembered = self.remembered.lock();
        if policy.governor.is_dynamic() {
            let (min, max) = *remembered;
            if let Err(error) = self.clock.set_rate_limit(min, max) {
                tracing::warn!("failed to reapply rate limit: {error}");
            }
        } else {
            *remembered = self.clock.rate_limit();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use corefreq_shared::hardware::CpuClock;
    use corefreq_shared::types::Governor;
    use corefreq_shared::types::Hertz;
    use corefreq_shared::types::KiloHertz;
    use corefreq_shared::types::Policy;
    use corefreq_test_utils::FakeCpuClock;

    use super::PolicyNotifier;

    fn policy(governor: Governor) -> Policy {
        Policy::new(
            governor,
            KiloHertz::new(312_000),
            KiloHertz::new(1_608_000),
        )
    }

    #[test]
    fn manual_governor_records_limit_without_touching_it() {
        let clock = Arc::new(FakeCpuClock::new(Hertz::new(816_000_000)));
        clock
            .set_rate_limit(Hertz::new(312_000_000), Hertz::new(1_008_000_000))
            .unwrap();
        let notifier = PolicyNotifier::new(clock.clone());

        notifier.on_policy_adjust(&policy(Governor::manual("performance")));

        // Only the priming call above reached the clock.
        assert_eq!(clock.limit_calls().len(), 1);
    }

    #[test]
    fn dynamic_governor_reapplies_recorded_limit() {
        let clock = Arc::new(FakeCpuClock::new(Hertz::new(816_000_000)));
        clock
            .set_rate_limit(Hertz::new(312_000_000), Hertz::new(1_008_000_000))
            .unwrap();
        let notifier = PolicyNotifier::new(clock.clone());

        notifier.on_policy_adjust(&policy(Governor::manual("powersave")));

        // The manual governor lifts the limit while it rules.
        clock.set_rate_limit(Hertz::new(0), Hertz::MAX).unwrap();

        notifier.on_policy_adjust(&policy(Governor::dynamic("ondemand")));
        assert_eq!(
            clock.limit_calls().last().copied(),
            Some((Hertz::new(312_000_000), Hertz::new(1_008_000_000)))
        );
    }

    #[test]
    fn dynamic_governor_without_prior_manual_clears_to_defaults() {
        let clock = Arc::new(FakeCpuClock::new(Hertz::new(816_000_000)));
        let notifier = PolicyNotifier::new(clock.clone());

        notifier.on_policy_adjust(&policy(Governor::dynamic("interactive")));

        assert_eq!(
            clock.limit_calls(),
            vec![(Hertz::new(0), Hertz::MAX)]
        );
    }
}
