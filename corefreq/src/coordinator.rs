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

use corefreq_config::CoreFreqConfig;
use corefreq_shared::hardware::BatteryGauge;
use corefreq_shared::hardware::CpuClock;
use corefreq_shared::types::CoreId;
use corefreq_shared::types::FreqTableEntry;
use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Policy;

use crate::battery::BatteryLimiter;
use crate::errors::FreqError;
use crate::errors::FreqResult;
use crate::gate::AccessGate;
use crate::request::GateAction;
use crate::request::RateRequest;
use crate::table::FreqTable;

#[cfg(test)]
mod tests;

/// One pre- or post-change notification, delivered once per active core.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FreqTransition {
    pub core: CoreId,
    pub old: KiloHertz,
    pub new: KiloHertz,
}

/// Subscriber to frequency transitions. Observers run synchronously under
/// the coordinator lock, in registration order; a non-idempotent request
/// always produces a matched pre/post pair.
pub trait TransitionObserver: Send {
    fn pre_change(&self, transition: &FreqTransition);

    fn post_change(&self, transition: &FreqTransition);
}

/// The hub of the subsystem: resolves governor requests against the table,
/// applies the access gate and the battery cap, and issues the coordinated
/// clock+voltage change.
///
/// A single lock serializes every request; it is the sole mutator of the
/// committed rate and the gate counter.
pub struct FreqCoordinator {
    clock: Arc<dyn CpuClock>,
    battery: Arc<dyn BatteryGauge>,
    active_cores: Vec<CoreId>,
    suspend_freq: KiloHertz,
    inner: Mutex<CoordinatorInner>,
}

struct CoordinatorInner {
    table: Option<FreqTable>,
    /// The frequency this subsystem currently asserts as active on hardware.
    committed: KiloHertz,
    gate: AccessGate,
    limiter: BatteryLimiter,
    observers: Vec<Box<dyn TransitionObserver>>,
}

impl FreqCoordinator {
    pub fn new(
        clock: Arc<dyn CpuClock>,
        battery: Arc<dyn BatteryGauge>,
        active_cores: Vec<CoreId>,
        config: &CoreFreqConfig,
    ) -> Self {
        let hardware_table = clock.freq_volt_table();
        let from_hardware = hardware_table.is_some();
        let table = match hardware_table {
            Some(entries) => match FreqTable::from_entries(entries) {
                Ok(table) => Some(table),
                Err(error) => {
                    tracing::warn!("hardware frequency table is unusable ({error}), scaling disabled");
                    None
                }
            },
            None => Some(FreqTable::default_table()),
        };

        // Boards with their own table pick the suspend point by voltage;
        // the configured frequency is the fallback.
        let suspend_freq = match &table {
            Some(table) if from_hardware => table
                .suspend_freq_for(config.suspend.volt)
                .unwrap_or(config.suspend.freq),
            _ => config.suspend.freq,
        };

        let low_battery_freq = match &table {
            Some(table) => table.nearest_not_exceeding(config.battery.low_battery_freq),
            None => config.battery.low_battery_freq,
        };
        let limiter = BatteryLimiter::new(
            low_battery_freq,
            config.battery.capacity_threshold_percent,
            config.battery.boot_window,
        );

        let committed = clock.rate().to_khz();
        clock.enable();
        tracing::info!(
            "frequency coordinator up, suspend point {} MHz",
            u32::from(suspend_freq) / 1000
        );

        let inner = CoordinatorInner {
            table,
            committed,
            gate: AccessGate::new(),
            limiter,
            observers: Vec::new(),
        };
        Self {
            clock,
            battery,
            active_cores,
            suspend_freq,
            inner: Mutex::new(inner),
        }
    }

    /// Resolves `request` against the table and, when admitted, issues the
    /// coordinated clock+voltage change. Returns the committed frequency.
    pub fn request(&self, policy: &Policy, request: RateRequest) -> FreqResult<KiloHertz> {
        let mut inner = self.inner.lock();

        if inner.table.is_none() {
            return Err(FreqError::NoFreqTable);
        }

        // An Enable rides on a request that must itself be admitted, so it
        // is processed before the gate is consulted.
        if request.gate == GateAction::Enable {
            inner.gate.enable();
        }
        if !inner.gate.is_open() {
            tracing::warn!(
                "denied request for {} kHz: transitions are disabled temporarily",
                request.target
            );
            return Err(FreqError::AccessDenied);
        }
        // An admitted Disable closes the gate right away; it sticks even
        // if the rest of the request fails.
        if request.gate == GateAction::Disable {
            inner.gate.disable();
        }

        let entry = match &inner.table {
            Some(table) => table.search(request.target, request.relation),
            None => None,
        };
        let Some(entry) = entry else {
            tracing::warn!(
                "no frequency match for {} kHz ({:?})",
                request.target,
                request.relation
            );
            return Err(FreqError::NoMatchingFrequency {
                target: request.target,
                relation: request.relation,
            });
        };
        let mut resolved = entry.khz;

        if inner.gate.is_open() && !request.private {
            let governor_is_dynamic = policy.governor.is_dynamic();
            resolved = inner
                .limiter
                .apply(resolved, governor_is_dynamic, self.battery.as_ref());
        }

        let old = inner.committed;
        tracing::debug!(
            "req = {} new = {} (was = {})",
            request.target,
            resolved,
            old
        );
        if resolved == old {
            return Ok(old);
        }

        for core in &self.active_cores {
            let transition = FreqTransition {
                core: *core,
                old,
                new: resolved,
            };
            for observer in &inner.observers {
                observer.pre_change(&transition);
            }
        }

        let set_result = self.clock.set_rate(resolved.to_hertz());

        // The post notification always carries what the hardware really
        // runs at, queried fresh; on failure that is the prior rate.
        let actual = self.clock.rate().to_khz();
        for core in &self.active_cores {
            let transition = FreqTransition {
                core: *core,
                old,
                new: actual,
            };
            for observer in &inner.observers {
                observer.post_change(&transition);
            }
        }
        inner.committed = actual;

        match set_result {
            Ok(()) => Ok(actual),
            Err(source) => Err(FreqError::RateRejected {
                requested: resolved.to_hertz(),
                source,
            }),
        }
    }

    pub fn current_rate(&self) -> KiloHertz {
        self.clock.rate().to_khz()
    }

    /// Checks that the policy bounds fall within the table range.
    pub fn verify(&self, policy: &Policy) -> FreqResult<()> {
        let inner = self.inner.lock();
        let table = inner.table.as_ref().ok_or(FreqError::NoFreqTable)?;

        if policy.min < table.min_khz() || policy.max > table.max_khz() {
            return Err(FreqError::BoundsOutOfTable {
                min: policy.min,
                max: policy.max,
                table_min: table.min_khz(),
                table_max: table.max_khz(),
            });
        }
        Ok(())
    }

    /// Read-only copy of the table for external listing.
    pub fn table_entries(&self) -> FreqResult<Vec<FreqTableEntry>> {
        let inner = self.inner.lock();
        let table = inner.table.as_ref().ok_or(FreqError::NoFreqTable)?;
        Ok(table.entries().copied().collect())
    }

    pub fn register_observer(&self, observer: Box<dyn TransitionObserver>) {
        self.inner.lock().observers.push(observer);
    }

    /// The operating point PM transitions pin the cluster to.
    pub fn suspend_freq(&self) -> KiloHertz {
        self.suspend_freq
    }
}
