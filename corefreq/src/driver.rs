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
use corefreq_shared::hardware::PlatformPm;
use corefreq_shared::hardware::RegisterBus;
use corefreq_shared::types::CoreId;
use corefreq_shared::types::FreqTableEntry;
use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Policy;

use crate::coordinator::FreqCoordinator;
use crate::coordinator::TransitionObserver;
use crate::errors::FreqResult;
use crate::policy::PolicyNotifier;
use crate::request::RateRequest;
use crate::snapshot::ClockRegisterSnapshot;
use crate::snapshot::PllLock;
use crate::transitions::PmDecision;
use crate::transitions::PmEvent;
use crate::transitions::PowerTransitionController;

/// Front door of the subsystem, wiring the coordinator, the policy
/// notifier, the PM transition controller and the deep-suspend snapshot
/// into one context built once at startup.
pub struct CpuFreqDriver {
    coordinator: Arc<FreqCoordinator>,
    policy_notifier: PolicyNotifier,
    transitions: PowerTransitionController,
    snapshot: Mutex<ClockRegisterSnapshot>,
    bus: Option<Arc<dyn RegisterBus>>,
    clock: Arc<dyn CpuClock>,
    deep_suspend_enabled: bool,
}

impl CpuFreqDriver {
    pub fn new(
        clock: Arc<dyn CpuClock>,
        battery: Arc<dyn BatteryGauge>,
        platform: Arc<dyn PlatformPm>,
        bus: Option<Arc<dyn RegisterBus>>,
        active_cores: Vec<CoreId>,
        config: &CoreFreqConfig,
    ) -> Self {
        let coordinator = Arc::new(FreqCoordinator::new(
            clock.clone(),
            battery,
            active_cores,
            config,
        ));
        let policy_notifier = PolicyNotifier::new(clock.clone());
        let transitions =
            PowerTransitionController::new(coordinator.clone(), clock.clone(), platform);

        let deep_suspend_enabled = config.deep_suspend && bus.is_some();
        if config.deep_suspend && bus.is_none() {
            tracing::warn!("deep suspend requested but no register window is available");
        }

        Self {
            coordinator,
            policy_notifier,
            transitions,
            snapshot: Mutex::new(ClockRegisterSnapshot::new()),
            bus,
            clock,
            deep_suspend_enabled,
        }
    }

    pub fn request(&self, policy: &Policy, request: RateRequest) -> FreqResult<KiloHertz> {
        self.coordinator.request(policy, request)
    }

    pub fn current_rate(&self) -> KiloHertz {
        self.coordinator.current_rate()
    }

    pub fn verify(&self, policy: &Policy) -> FreqResult<()> {
        self.coordinator.verify(policy)
    }

    pub fn table_entries(&self) -> FreqResult<Vec<FreqTableEntry>> {
        self.coordinator.table_entries()
    }

    pub fn register_observer(&self, observer: Box<dyn TransitionObserver>) {
        self.coordinator.register_observer(observer)
    }

    pub fn on_policy_adjust(&self, policy: &Policy) {
        self.policy_notifier.on_policy_adjust(policy)
    }

    pub fn on_pm_event(&self, policy: &Policy, event: PmEvent) -> PmDecision {
        self.transitions.on_pm_event(policy, event)
    }

    /// Captures the clock unit if deep suspend is configured and the
    /// suspend will cut its power.
    pub fn deep_suspend(&self, power_collapse: bool) {
        if !self.deep_suspend_enabled {
            return;
        }
        if let Some(bus) = &self.bus {
            self.snapshot
                .lock()
                .suspend(bus.as_ref(), self.clock.as_ref(), power_collapse);
        }
    }

    /// Replays the captured clock unit; None when deep suspend is off or
    /// the power never collapsed.
    pub fn deep_resume(&self, power_collapse: bool) -> Option<PllLock> {
        if !self.deep_suspend_enabled {
            return None;
        }
        let bus = self.bus.as_ref()?;
        self.snapshot
            .lock()
            .resume(bus.as_ref(), self.clock.as_ref(), power_collapse)
    }
}
