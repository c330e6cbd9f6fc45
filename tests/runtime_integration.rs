//! Control-loop runtime driven through the real channel and executor.
//!
//! The control channel is a process-wide static, so every test here
//! serializes on one lock and drains the channel before starting.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, Mutex, MutexGuard};

use edge_executor::LocalExecutor;

use katapult::app::commands::AppCommand;
use katapult::app::ports::{ActuatorPort, ReleaseState, SessionSendError, SessionSink};
use katapult::app::service::AppService;
use katapult::broadcast::BroadcastHub;
use katapult::channels;
use katapult::config::SystemConfig;
use katapult::runtime::{control_step, ControlState, EXECUTOR_CAP, SharedState};

static CHANNEL_LOCK: Mutex<()> = Mutex::new(());

/// Take the channel for this test and empty any leftovers.
fn exclusive_channel() -> MutexGuard<'static, ()> {
    let guard = match CHANNEL_LOCK.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    while channels::try_recv().is_some() {}
    guard
}

/// Servo mock whose command log outlives the control state.
#[derive(Clone)]
struct SharedServo {
    commands: Arc<Mutex<Vec<ReleaseState>>>,
}

impl SharedServo {
    fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn log(&self) -> Vec<ReleaseState> {
        self.commands.lock().unwrap().clone()
    }
}

impl ActuatorPort for SharedServo {
    fn command(&mut self, state: ReleaseState) {
        self.commands.lock().unwrap().push(state);
    }

    fn commanded_state(&self) -> ReleaseState {
        self.commands
            .lock()
            .unwrap()
            .last()
            .copied()
            .unwrap_or_default()
    }
}

struct QueueSession {
    tx: SyncSender<String>,
}

impl SessionSink for QueueSession {
    fn send_text(&mut self, text: &str) -> Result<(), SessionSendError> {
        match self.tx.try_send(text.to_string()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SessionSendError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(SessionSendError::Disconnected),
        }
    }
}

fn subscribe(id: u32) -> Receiver<String> {
    let (tx, rx) = sync_channel(16);
    assert!(channels::push_add_session(id, Box::new(QueueSession { tx })));
    rx
}

/// Process `steps` queued messages, then give detached edge tasks a few
/// turns to finish.
fn drive(state: &SharedState<SharedServo>, steps: usize) {
    let ex: LocalExecutor<'_, EXECUTOR_CAP> = LocalExecutor::new();
    futures_lite::future::block_on(ex.run(async {
        for _ in 0..steps {
            control_step(&ex, state).await;
        }
        for _ in 0..8 {
            futures_lite::future::yield_now().await;
        }
    }));
}

fn shared_state(servo: SharedServo) -> SharedState<SharedServo> {
    Rc::new(RefCell::new(ControlState {
        app: AppService::new(SystemConfig::default()),
        servo,
        hub: BroadcastHub::new(),
    }))
}

#[test]
fn arm_then_pulse_fires_release_and_broadcasts_in_order() {
    let _guard = exclusive_channel();
    let servo = SharedServo::new();
    let state = shared_state(servo.clone());

    let rx = subscribe(1);
    assert!(channels::push_command(AppCommand::ToggleArm { angle: Some(135) }));
    assert!(channels::push_pulse(1.0));

    drive(&state, 3);

    // Speed was unknown at the pulse, so the release is immediate.
    assert_eq!(servo.log(), vec![ReleaseState::Active]);
    assert!(!state.borrow().app.is_armed());
    assert!(!channels::armed_mirror());

    let texts: Vec<String> = rx.try_iter().collect();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("TRIGGER_STATE_UPDATE") && texts[0].contains("true"));
    assert!(texts[1].contains("TRIGGER_STATE_UPDATE") && texts[1].contains("false"));
    assert!(texts[2].contains("RPM_UPDATE"));
}

#[test]
fn armed_mirror_tracks_command_processing() {
    let _guard = exclusive_channel();
    let servo = SharedServo::new();
    let state = shared_state(servo);

    assert!(channels::push_command(AppCommand::ToggleArm { angle: Some(90) }));
    drive(&state, 1);
    assert!(channels::armed_mirror());

    assert!(channels::push_command(AppCommand::ToggleArm { angle: None }));
    drive(&state, 1);
    assert!(!channels::armed_mirror());
}

#[test]
fn disarm_queued_behind_pulse_suppresses_the_release() {
    let _guard = exclusive_channel();
    let servo = SharedServo::new();
    let state = shared_state(servo.clone());

    assert!(channels::push_command(AppCommand::ToggleArm { angle: Some(135) }));
    drive(&state, 1);

    // Both messages sit in the queue; the disarm is dispatched before
    // the edge task gets its first poll, so the plan sees a disarmed
    // trigger and only the tracker update remains.
    assert!(channels::push_pulse(1.0));
    assert!(channels::push_command(AppCommand::ToggleArm { angle: None }));
    drive(&state, 2);

    assert!(servo.log().is_empty());
    assert!(!state.borrow().app.is_armed());
}

#[test]
fn pulses_advance_the_speed_estimate() {
    let _guard = exclusive_channel();
    let servo = SharedServo::new();
    let state = shared_state(servo);

    for i in 0..3 {
        assert!(channels::push_pulse(f64::from(i) * 0.5));
    }
    drive(&state, 3);

    let rpm = state.borrow().app.average_rpm();
    assert!((rpm - 120.0).abs() < 1e-9, "rpm {}", rpm);
}

#[test]
fn removed_session_stops_receiving() {
    let _guard = exclusive_channel();
    let servo = SharedServo::new();
    let state = shared_state(servo);

    let rx = subscribe(7);
    assert!(channels::push_pulse(1.0));
    drive(&state, 2);
    assert_eq!(rx.try_iter().count(), 1);

    assert!(channels::push_remove_session(7));
    assert!(channels::push_pulse(2.0));
    drive(&state, 2);
    assert_eq!(rx.try_iter().count(), 0);
    assert_eq!(state.borrow().hub.session_count(), 0);
}

#[test]
fn full_queue_drops_new_pulses() {
    let _guard = exclusive_channel();

    let mut accepted = 0;
    while channels::push_pulse(0.0) {
        accepted += 1;
        assert!(accepted <= 64, "queue never filled");
    }
    assert_eq!(accepted, 32);

    while channels::try_recv().is_some() {}
    assert!(channels::push_pulse(0.0));
    while channels::try_recv().is_some() {}
}
