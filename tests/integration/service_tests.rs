//! Integration tests for the PropService → scheduler → actuators pipeline.
//!
//! Time is driven by hand: every `step()` advances the clock by exactly one
//! tick period and runs one host loop pass.

use crate::mock_hw::{MockHardware, RecordingSink};

use propctl::app::events::PropEvent;
use propctl::app::ports::ActuatorId;
use propctl::app::service::PropService;
use propctl::config::{Action, PropConfig};
use propctl::trigger::TriggerState;

struct Harness {
    svc: PropService,
    hw: MockHardware,
    sink: RecordingSink,
    now_ms: u64,
    tick_ms: u64,
}

impl Harness {
    fn new(config: PropConfig) -> Self {
        let tick_ms = u64::from(config.tick_period_ms);
        let mut svc = PropService::new(config);
        let mut sink = RecordingSink::new();
        svc.start(0, &mut sink);
        Self {
            svc,
            hw: MockHardware::new(),
            sink,
            now_ms: 0,
            tick_ms,
        }
    }

    fn step(&mut self) {
        self.now_ms += self.tick_ms;
        self.svc.tick(self.now_ms, &mut self.hw, &mut self.sink);
    }

    fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    fn request(&mut self, raw: &str) -> Option<propctl::http::Response> {
        self.svc.handle_request(raw, &mut self.hw, &mut self.sink)
    }

    fn triggered_count(&self) -> usize {
        self.sink
            .count(|e| matches!(e, PropEvent::Triggered { .. }))
    }
}

// ── Weight trigger ───────────────────────────────────────────

#[test]
fn start_emits_started_event() {
    let h = Harness::new(PropConfig::default());
    assert_eq!(h.sink.events, vec![PropEvent::Started]);
    assert_eq!(h.svc.task_count(), 3);
}

#[test]
fn settled_weight_raises_exactly_once() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1020);

    h.steps(9);
    assert!(h.hw.calls.is_empty(), "nothing may fire before the 10th sample");
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);

    h.step();
    assert!(h.hw.is_on(ActuatorId::WinchUp));
    assert!(!h.hw.is_on(ActuatorId::WinchDown));
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);
    assert_eq!(h.svc.last_reading(), Some(1020));

    h.steps(30);
    assert_eq!(h.hw.calls_for(ActuatorId::WinchUp), vec![true]);
    assert_eq!(h.triggered_count(), 1);
}

#[test]
fn removing_weight_lowers() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1000);
    h.steps(10);
    assert!(h.hw.is_on(ActuatorId::WinchUp));

    h.hw.reading = Some(900);
    h.steps(9);
    assert!(h.hw.is_on(ActuatorId::WinchUp));

    h.step();
    assert!(!h.hw.is_on(ActuatorId::WinchUp));
    assert!(h.hw.is_on(ActuatorId::WinchDown));
    assert_eq!(
        h.sink.events.last(),
        Some(&PropEvent::Released {
            action: Some(Action::Lower)
        })
    );
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);
}

#[test]
fn oscillating_weight_never_triggers() {
    let mut h = Harness::new(PropConfig::default());
    for i in 0..40 {
        h.hw.reading = Some(if i % 2 == 0 { 900 } else { 1020 });
        h.step();
    }
    assert!(h.hw.calls.is_empty());
    assert_eq!(h.triggered_count(), 0);
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);
}

#[test]
fn window_edges_are_inclusive() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(950);
    h.steps(10);
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);

    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1051);
    h.steps(20);
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);
}

#[test]
fn scale_failure_counts_as_outside_window() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1000);
    h.steps(10);
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);

    h.hw.reading = None;
    h.steps(10);
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);
    assert!(h.hw.is_on(ActuatorId::WinchDown));
    assert_eq!(h.svc.last_reading(), None);
}

#[test]
fn runtime_target_and_window_apply_to_next_sample() {
    let mut h = Harness::new(PropConfig::default());
    h.svc.set_target_weight(2000);
    h.svc.set_weight_window(10);
    assert_eq!(h.svc.state().target_weight, 2000);
    assert_eq!(h.svc.state().weight_window, 10);

    h.hw.reading = Some(1000);
    h.steps(20);
    assert_eq!(h.svc.trigger_state(), TriggerState::Untriggered);

    h.hw.reading = Some(2010);
    h.steps(10);
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);
}

#[test]
fn late_pass_catches_up_every_missed_sample() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1000);
    // One pass a full second late runs the trigger task ten times.
    h.svc.tick(1000, &mut h.hw, &mut h.sink);
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);
    assert_eq!(h.triggered_count(), 1);
}

// ── Door variant / game completion ───────────────────────────

#[test]
fn door_preset_opens_and_completes_game() {
    let mut h = Harness::new(PropConfig::door());
    let resp = h.request("/game_complete").expect("route exists");
    assert_eq!(resp.body(), "NOT COMPLETE");

    h.hw.reading = Some(1000);
    h.steps(10);
    assert_eq!(h.hw.calls_for(ActuatorId::Maglock), vec![false]);
    assert_eq!(
        h.sink.count(|e| matches!(e, PropEvent::GameCompleted)),
        1
    );

    let resp = h.request("/game_complete").expect("route exists");
    assert_eq!(resp.body(), "COMPLETE");
}

#[test]
fn door_preset_does_nothing_on_release() {
    let mut h = Harness::new(PropConfig::door());
    h.hw.reading = Some(1000);
    h.steps(10);
    let calls = h.hw.calls.len();

    h.hw.reading = Some(0);
    h.steps(10);
    assert_eq!(h.hw.calls.len(), calls);
    assert_eq!(
        h.sink.events.last(),
        Some(&PropEvent::Released { action: None })
    );
    assert!(h.svc.state().game_complete, "completion stays latched");
}

// ── Override ─────────────────────────────────────────────────

#[test]
fn open_override_suppresses_trigger_until_close() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/open").expect("route exists");
    assert!(h.svc.state().override_engaged);
    assert!(!h.hw.is_on(ActuatorId::Maglock));

    h.hw.reading = Some(1000);
    h.steps(10);
    assert!(h.hw.calls_for(ActuatorId::WinchUp).is_empty());
    assert_eq!(h.triggered_count(), 0);
    assert_eq!(
        h.sink.count(|e| matches!(e, PropEvent::TriggerSuppressed)),
        1
    );
    // The edge is still consumed.
    assert_eq!(h.svc.trigger_state(), TriggerState::Triggered);

    h.request("/close").expect("route exists");
    assert!(!h.svc.state().override_engaged);
    assert!(h.hw.is_on(ActuatorId::Maglock));

    h.hw.reading = Some(0);
    h.steps(10);
    assert!(h.hw.is_on(ActuatorId::WinchDown));
}

// ── Lower-door timeout ───────────────────────────────────────

#[test]
fn lower_door_open_with_timeout_relocks() {
    let mut h = Harness::new(PropConfig::default());
    let resp = h.request("/lower_door/open/500").expect("route exists");
    assert_eq!(resp.status(), "200 OK");
    assert!(!h.hw.is_on(ActuatorId::LowerDoor));
    assert!(h.svc.lower_door_timeout_active());

    h.steps(4);
    assert!(!h.hw.is_on(ActuatorId::LowerDoor));

    h.step();
    assert!(h.hw.is_on(ActuatorId::LowerDoor));
    assert!(!h.svc.lower_door_timeout_active());
    assert_eq!(
        h.sink
            .count(|e| *e == PropEvent::TimeoutFired(Action::LowerDoorClose)),
        1
    );

    h.steps(20);
    assert_eq!(h.hw.calls_for(ActuatorId::LowerDoor), vec![false, true]);
}

#[test]
fn lower_door_open_without_timeout_stays_open() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/lower_door/open").expect("route exists");
    assert!(!h.svc.lower_door_timeout_active());

    h.steps(50);
    assert_eq!(h.hw.calls_for(ActuatorId::LowerDoor), vec![false]);
}

#[test]
fn malformed_timeout_falls_back_to_plain_open() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/lower_door/open/5x0").expect("route exists");
    assert!(!h.svc.lower_door_timeout_active());
    assert!(!h.hw.is_on(ActuatorId::LowerDoor));
}

#[test]
fn lower_door_open_without_timeout_cancels_pending_relock() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/lower_door/open/300").expect("route exists");
    h.request("/lower_door/open").expect("route exists");
    h.steps(10);
    assert_eq!(h.hw.calls_for(ActuatorId::LowerDoor), vec![false, false]);
}

#[test]
fn lower_door_close_cancels_timeout() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/lower_door/open/1000").expect("route exists");
    h.steps(2);
    h.request("/lower_door/close").expect("route exists");
    assert!(h.hw.is_on(ActuatorId::LowerDoor));
    assert!(!h.svc.lower_door_timeout_active());

    h.steps(20);
    assert_eq!(
        h.sink.count(|e| matches!(e, PropEvent::TimeoutFired(_))),
        0
    );
    assert_eq!(h.hw.calls_for(ActuatorId::LowerDoor), vec![false, true]);
}

// ── Request handling ─────────────────────────────────────────

#[test]
fn unmatched_requests_get_no_response() {
    let mut h = Harness::new(PropConfig::default());
    assert!(h.request("/nope").is_none());
    assert!(h.request("").is_none());
    assert!(h.request("POST /raise HTTP/1.1").is_none());
    assert!(h.hw.calls.is_empty());
}

#[test]
fn request_line_is_accepted() {
    let mut h = Harness::new(PropConfig::default());
    let resp = h.request("GET /raise HTTP/1.1").expect("route exists");
    assert_eq!(resp.status(), "200 OK");
    assert!(h.hw.is_on(ActuatorId::WinchUp));

    h.request("GET /stop HTTP/1.1").expect("route exists");
    assert!(!h.hw.is_on(ActuatorId::WinchUp));
    assert!(!h.hw.is_on(ActuatorId::WinchDown));
}

#[test]
fn every_response_carries_cors_header() {
    let mut h = Harness::new(PropConfig::default());
    for path in [
        "/raise", "/lower", "/stop", "/set_target", "/tare", "/open", "/close",
        "/lower_door/open", "/lower_door/close", "/game_complete", "/scale/2", "/get",
    ] {
        let resp = h.request(path).expect("route exists");
        assert_eq!(resp.status(), "200 OK", "{path}");
        assert_eq!(resp.header("access-control-allow-origin"), Some("*"), "{path}");
    }
}

#[test]
fn manual_winch_commands() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/lower").expect("route exists");
    assert!(!h.hw.is_on(ActuatorId::WinchUp));
    assert!(h.hw.is_on(ActuatorId::WinchDown));

    h.request("/raise").expect("route exists");
    assert!(h.hw.is_on(ActuatorId::WinchUp));
    assert!(!h.hw.is_on(ActuatorId::WinchDown));
}

#[test]
fn get_reports_weight_or_empty_body() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(987);
    let resp = h.request("/get").expect("route exists");
    assert_eq!(resp.body(), "987");
    assert!(resp.to_http().ends_with("\r\n\r\n987"));

    h.hw.reading = None;
    let resp = h.request("/get").expect("route exists");
    assert_eq!(resp.status(), "200 OK");
    assert_eq!(resp.body(), "");
}

#[test]
fn set_target_request_captures_reading() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(1234);
    h.request("/set_target").expect("route exists");
    assert_eq!(h.svc.state().target_weight, 1234);
    assert_eq!(
        h.sink.events.last(),
        Some(&PropEvent::TargetUpdated { target: 1234 })
    );

    h.hw.reading = None;
    h.request("/set_target").expect("route exists");
    assert_eq!(h.svc.state().target_weight, 1234, "failed read keeps target");
}

#[test]
fn set_target_button_captures_reading_on_next_pass() {
    let mut h = Harness::new(PropConfig::default());
    h.hw.reading = Some(640);
    h.hw.press_set_target();
    h.step();
    assert_eq!(h.svc.state().target_weight, 640);

    // The press is consumed; a later change is not picked up.
    h.hw.reading = Some(700);
    h.step();
    assert_eq!(h.svc.state().target_weight, 640);
}

#[test]
fn tare_and_scale_reach_the_scale() {
    let mut h = Harness::new(PropConfig::default());
    h.request("/tare").expect("route exists");
    assert_eq!(h.hw.tare_calls, 1);

    h.request("/scale/-7050.5").expect("route exists");
    h.request("/scale").expect("route exists");
    assert_eq!(h.hw.scale_factors, vec!["-7050.5".to_owned()]);
}
