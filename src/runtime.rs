//! Async control-loop runtime.
//!
//! Runs in one thread using `edge-executor` for cooperative multi-task
//! scheduling and `async-io-mini` for reactor-driven timers (no
//! busy-spinning). One long-lived future drains the control channel;
//! every accepted pulse edge spawns an independent detached task so a
//! pending delayed release never blocks the next edge or an inbound
//! command:
//!
//! ```text
//!  ┌────────────────────────────────────────────────────────────┐
//!  │  Control Thread                                            │
//!  │  ┌──────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on (drives reactor + futures)   │  │
//!  │  │  ┌──────────────────────────────────────────────────┐│  │
//!  │  │  │  edge_executor::LocalExecutor                    ││  │
//!  │  │  │                                                  ││  │
//!  │  │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐        ││  │
//!  │  │  │  │ channel  │  │ edge #n  │  │ edge #n+1│  ...   ││  │
//!  │  │  │  │ drain    │  │ wait+fire│  │ wait+fire│        ││  │
//!  │  │  │  └──────────┘  └──────────┘  └──────────┘        ││  │
//!  │  │  └──────────────────────────────────────────────────┘│  │
//!  │  └──────────────────────────────────────────────────────┘  │
//!  └────────────────────────────────────────────────────────────┘
//! ```
//!
//! State is shared between the tasks through `Rc<RefCell<..>>` — the
//! executor is single-threaded, so borrows never contend; they only
//! have to be released across `await` points. An in-flight release is
//! never cancelled: once its wait starts it always fires the servo and
//! re-broadcasts the disarmed state, even if a disarm raced in.

use core::cell::RefCell;
use std::rc::Rc;

use edge_executor::LocalExecutor;
use log::info;

use crate::app::ports::ActuatorPort;
use crate::app::service::AppService;
use crate::broadcast::BroadcastHub;
use crate::channels::{self, CtrlMsg, PulseMsg};

/// Maximum concurrently scheduled tasks: the channel drain plus one per
/// in-flight delayed release.
pub const EXECUTOR_CAP: usize = 16;

/// Everything the control loop owns. Single logical writer.
pub struct ControlState<HW> {
    pub app: AppService,
    pub servo: HW,
    pub hub: BroadcastHub,
}

/// Shared handle used by the per-edge tasks.
pub type SharedState<HW> = Rc<RefCell<ControlState<HW>>>;

/// Handle one pulse edge, start to finish.
///
/// Step 1 (armed only): size the wait from the *pre-edge* speed
/// estimate, suspend cooperatively, open the gate, disarm. Step 2
/// (always): record the edge into the tracker and broadcast the new
/// average. The borrow is dropped across the timer await so other
/// edges and commands proceed during the wait.
pub async fn handle_pulse_edge<HW: ActuatorPort>(state: SharedState<HW>, pulse: PulseMsg) {
    let planned = state.borrow().app.plan_release();

    if let Some(delay) = planned {
        if !delay.is_zero() {
            async_io_mini::Timer::after(delay).await;
        }
        let mut s = state.borrow_mut();
        let ControlState { app, servo, hub } = &mut *s;
        app.complete_release(servo, hub);
        channels::set_armed_mirror(app.is_armed());
    }

    let mut s = state.borrow_mut();
    let ControlState { app, hub, .. } = &mut *s;
    app.record_pulse(pulse.t_secs, hub);
}

/// Receive and dispatch exactly one control message.
///
/// Pulses are handed to a fresh detached task on `ex`; everything else
/// mutates state inline, preserving one sequential timeline for all
/// trigger/servo mutation.
pub async fn control_step<'a, HW: ActuatorPort + 'static>(
    ex: &LocalExecutor<'a, EXECUTOR_CAP>,
    state: &SharedState<HW>,
) where
    HW: 'a,
{
    match channels::recv().await {
        CtrlMsg::Pulse(pulse) => {
            ex.spawn(handle_pulse_edge(state.clone(), pulse)).detach();
        }
        CtrlMsg::Command(cmd) => {
            let mut s = state.borrow_mut();
            let ControlState { app, servo, hub } = &mut *s;
            app.handle_command(cmd, servo, hub);
            channels::set_armed_mirror(app.is_armed());
        }
        CtrlMsg::AddSession { id, sink } => {
            state.borrow_mut().hub.add_session(id, sink);
        }
        CtrlMsg::RemoveSession { id } => {
            state.borrow_mut().hub.remove_session(id);
        }
    }
}

/// Entry point for the control thread. Never returns.
///
/// Takes ownership of the application service, the servo driver, and
/// the broadcast hub; everything downstream reaches them through the
/// shared handle.
pub fn run_control_loop<HW: ActuatorPort + 'static>(app: AppService, servo: HW, hub: BroadcastHub) {
    let ex: LocalExecutor<'_, EXECUTOR_CAP> = LocalExecutor::new();
    let state: SharedState<HW> = Rc::new(RefCell::new(ControlState { app, servo, hub }));

    info!("control loop started (task-per-edge, cap {})", EXECUTOR_CAP);

    futures_lite::future::block_on(ex.run(async {
        loop {
            control_step(&ex, &state).await;
        }
    }));
}
