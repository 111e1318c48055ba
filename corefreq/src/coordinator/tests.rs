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
use corefreq_shared::hardware::CpuClock;
use corefreq_shared::types::CoreId;
use corefreq_shared::types::FreqTableEntry;
use corefreq_shared::types::Governor;
use corefreq_shared::types::Hertz;
use corefreq_shared::types::KiloHertz;
use corefreq_shared::types::Microvolts;
use corefreq_shared::types::Policy;
use corefreq_test_utils::FakeCpuClock;
use corefreq_test_utils::FixedBattery;

use super::FreqCoordinator;
use super::FreqTransition;
use super::TransitionObserver;
use crate::errors::FreqError;
use crate::request::GateAction;
use crate::request::RateRequest;
use crate::request::Relation;

const KHZ_816: KiloHertz = KiloHertz::new(816_000);
const KHZ_504: KiloHertz = KiloHertz::new(504_000);

fn entry(khz: u32, volt_uv: u32) -> FreqTableEntry {
    FreqTableEntry::new(KiloHertz::new(khz), Microvolts::new(volt_uv))
}

fn small_table() -> Vec<FreqTableEntry> {
    vec![
        entry(312_000, 875_000),
        entry(504_000, 925_000),
        entry(816_000, 975_000),
    ]
}

fn dynamic_policy() -> Policy {
    Policy::new(
        Governor::dynamic("ondemand"),
        KiloHertz::new(312_000),
        KHZ_816,
    )
}

fn coordinator(clock: Arc<FakeCpuClock>, battery: Arc<FixedBattery>) -> FreqCoordinator {
    FreqCoordinator::new(
        clock,
        battery,
        vec![CoreId::new(0), CoreId::new(1)],
        &CoreFreqConfig::default(),
    )
}

#[derive(Clone, Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<(&'static str, FreqTransition)>>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<(&'static str, FreqTransition)> {
        self.events.lock().clone()
    }
}

impl TransitionObserver for RecordingObserver {
    fn pre_change(&self, transition: &FreqTransition) {
        self.events.lock().push(("pre", *transition));
    }

    fn post_change(&self, transition: &FreqTransition) {
        self.events.lock().push(("post", *transition));
    }
}

#[test_log::test]
fn request_resolves_round_down_against_table() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock.clone(), battery);

    let committed = coordinator
        .request(
            &dynamic_policy(),
            RateRequest::new(KiloHertz::new(2_000_000), Relation::AtMost),
        )
        .unwrap();

    assert_eq!(committed, KHZ_816);
    assert_eq!(clock.set_rate_calls(), vec![KHZ_816.to_hertz()]);
}

#[test]
fn request_round_up_above_table_max_fails() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock.clone(), battery);

    let result = coordinator.request(
        &dynamic_policy(),
        RateRequest::new(KiloHertz::new(2_000_000), Relation::AtLeast),
    );

    assert!(matches!(
        result,
        Err(FreqError::NoMatchingFrequency { .. })
    ));
    assert!(clock.set_rate_calls().is_empty());
}

#[test]
fn request_is_idempotent_at_committed_rate() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_816.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock.clone(), battery);

    let observer = RecordingObserver::default();
    coordinator.register_observer(Box::new(observer.clone()));

    let committed = coordinator
        .request(&dynamic_policy(), RateRequest::new(KHZ_816, Relation::AtLeast))
        .unwrap();

    assert_eq!(committed, KHZ_816);
    assert!(clock.set_rate_calls().is_empty());
    assert!(observer.events().is_empty());
}

#[test]
fn observers_see_matched_pairs_per_core() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);

    let observer = RecordingObserver::default();
    coordinator.register_observer(Box::new(observer.clone()));

    coordinator
        .request(&dynamic_policy(), RateRequest::new(KHZ_816, Relation::AtLeast))
        .unwrap();

    let events = observer.events();
    assert_eq!(events.len(), 4);
    let (kinds, transitions): (Vec<_>, Vec<_>) = events.into_iter().unzip();
    assert_eq!(kinds, vec!["pre", "pre", "post", "post"]);
    for transition in transitions {
        assert_eq!(transition.old, KHZ_504);
        assert_eq!(transition.new, KHZ_816);
    }
}

#[test]
fn gate_disable_denies_until_enable() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);
    let policy = dynamic_policy();

    coordinator
        .request(
            &policy,
            RateRequest::new(KHZ_816, Relation::AtLeast).with_gate(GateAction::Disable),
        )
        .unwrap();

    let denied = coordinator.request(&policy, RateRequest::new(KHZ_504, Relation::AtLeast));
    assert!(matches!(denied, Err(FreqError::AccessDenied)));

    let reopened = coordinator.request(
        &policy,
        RateRequest::new(KHZ_504, Relation::AtLeast).with_gate(GateAction::Enable),
    );
    assert_eq!(reopened.unwrap(), KHZ_504);

    // The gate is open again for plain traffic.
    coordinator
        .request(&policy, RateRequest::new(KHZ_816, Relation::AtLeast))
        .unwrap();
}

#[test]
fn nested_disables_need_matching_enables() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);
    let policy = dynamic_policy();

    for _ in 0..2 {
        // Requests carrying a Disable are admitted while the gate is open;
        // the second one is itself denied, leaving its Disable unapplied.
        let _ = coordinator.request(
            &policy,
            RateRequest::new(KHZ_816, Relation::AtLeast).with_gate(GateAction::Disable),
        );
    }

    let after_one_enable = coordinator.request(
        &policy,
        RateRequest::new(KHZ_504, Relation::AtLeast).with_gate(GateAction::Enable),
    );
    assert_eq!(after_one_enable.unwrap(), KHZ_504);
}

#[test]
fn admitted_disable_sticks_even_when_the_request_fails() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);
    let policy = dynamic_policy();

    // The gate closes before the table is searched, so a target no entry
    // satisfies still leaves the gate closed.
    let unmatched = coordinator.request(
        &policy,
        RateRequest::new(KiloHertz::new(2_000_000), Relation::AtLeast)
            .with_gate(GateAction::Disable),
    );
    assert!(matches!(
        unmatched,
        Err(FreqError::NoMatchingFrequency { .. })
    ));

    let denied = coordinator.request(&policy, RateRequest::new(KHZ_816, Relation::AtLeast));
    assert!(matches!(denied, Err(FreqError::AccessDenied)));

    // A matching Enable reopens it.
    let reopened = coordinator.request(
        &policy,
        RateRequest::new(KHZ_816, Relation::AtLeast).with_gate(GateAction::Enable),
    );
    assert_eq!(reopened.unwrap(), KHZ_816);
}

#[test]
fn set_failure_keeps_committed_rate() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock.clone(), battery);

    let observer = RecordingObserver::default();
    coordinator.register_observer(Box::new(observer.clone()));

    clock.reject_set_rate();
    let result = coordinator.request(
        &dynamic_policy(),
        RateRequest::new(KHZ_816, Relation::AtLeast),
    );
    assert!(matches!(result, Err(FreqError::RateRejected { .. })));
    assert_eq!(clock.rate(), KHZ_504.to_hertz());

    // Post notifications carried the actually-true rate.
    let events = observer.events();
    assert_eq!(events.len(), 4);
    for (kind, transition) in events {
        match kind {
            "pre" => assert_eq!(transition.new, KHZ_816),
            _ => assert_eq!(transition.new, KHZ_504),
        }
    }

    // The committed rate is unchanged, so retrying attempts the hardware
    // write again instead of short-circuiting as idempotent.
    let retry = coordinator.request(
        &dynamic_policy(),
        RateRequest::new(KHZ_816, Relation::AtLeast),
    );
    assert!(matches!(retry, Err(FreqError::RateRejected { .. })));
    assert_eq!(clock.set_rate_calls().len(), 2);
}

#[test_log::test]
fn low_battery_caps_dynamic_requests_during_boot() {
    let clock = Arc::new(FakeCpuClock::new(KiloHertz::new(312_000).to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(3));
    let coordinator = coordinator(clock.clone(), battery);

    let committed = coordinator
        .request(&dynamic_policy(), RateRequest::new(KHZ_816, Relation::AtLeast))
        .unwrap();

    // The configured 600 MHz cap lands on the 504 MHz table entry.
    assert_eq!(committed, KHZ_504);
    assert_eq!(clock.set_rate_calls(), vec![KHZ_504.to_hertz()]);
}

#[test]
fn private_requests_bypass_battery_cap() {
    let clock = Arc::new(FakeCpuClock::new(KiloHertz::new(312_000).to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(3));
    let coordinator = coordinator(clock, battery);

    let committed = coordinator
        .request(
            &dynamic_policy(),
            RateRequest::new(KHZ_816, Relation::AtLeast).private(),
        )
        .unwrap();

    assert_eq!(committed, KHZ_816);
}

#[test]
fn manual_governor_bypasses_battery_cap() {
    let clock = Arc::new(FakeCpuClock::new(KiloHertz::new(312_000).to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(3));
    let coordinator = coordinator(clock, battery);

    let policy = Policy::new(
        Governor::manual("performance"),
        KiloHertz::new(312_000),
        KHZ_816,
    );
    let committed = coordinator
        .request(&policy, RateRequest::new(KHZ_816, Relation::AtLeast))
        .unwrap();

    assert_eq!(committed, KHZ_816);
}

#[test]
fn unusable_hardware_table_disables_scaling() {
    // Descending table: unusable, scaling is off for good.
    let clock = Arc::new(
        FakeCpuClock::new(KHZ_504.to_hertz())
            .with_table(vec![entry(816_000, 975_000), entry(312_000, 875_000)]),
    );
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);

    let result = coordinator.request(
        &dynamic_policy(),
        RateRequest::new(KHZ_816, Relation::AtLeast),
    );
    assert!(matches!(result, Err(FreqError::NoFreqTable)));
    assert!(matches!(
        coordinator.verify(&dynamic_policy()),
        Err(FreqError::NoFreqTable)
    ));
}

#[test]
fn verify_checks_policy_bounds_against_table() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);

    assert!(coordinator.verify(&dynamic_policy()).is_ok());

    let too_wide = Policy::new(
        Governor::dynamic("ondemand"),
        KiloHertz::new(100_000),
        KHZ_816,
    );
    assert!(matches!(
        coordinator.verify(&too_wide),
        Err(FreqError::BoundsOutOfTable { .. })
    ));
}

#[test]
fn suspend_freq_derived_from_hardware_table_voltage() {
    // None of the small-table rows reach 1.1 V, so the configured
    // fallback wins.
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let low_volt = coordinator(clock, battery);
    assert_eq!(low_volt.suspend_freq(), KHZ_816);

    // A richer hardware table resolves by voltage instead.
    let rich = vec![
        entry(312_000, 875_000),
        entry(816_000, 975_000),
        entry(1_200_000, 1_150_000),
    ];
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(rich));
    let battery = Arc::new(FixedBattery::new(100));
    let by_voltage = coordinator(clock, battery);
    assert_eq!(by_voltage.suspend_freq(), KiloHertz::new(1_200_000));
}

#[test]
fn table_entries_are_listed_in_order() {
    let clock = Arc::new(FakeCpuClock::new(KHZ_504.to_hertz()).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);

    let entries = coordinator.table_entries().unwrap();
    assert_eq!(entries, small_table());
}

#[test]
fn current_rate_mirrors_hardware() {
    let clock = Arc::new(FakeCpuClock::new(Hertz::new(504_000_000)).with_table(small_table()));
    let battery = Arc::new(FixedBattery::new(100));
    let coordinator = coordinator(clock, battery);

    assert_eq!(coordinator.current_rate(), KHZ_504);
}
