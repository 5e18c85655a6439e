//! Flow control and the frame loop.
//!
//! A "flow" is one self-contained piece of gameplay (the crane, the physics
//! step, the lose watch, ...) that reads input, updates the shared state and
//! emits events each frame. The [`FrameDriver`] owns the shared state, runs all
//! flows in registration order and routes their events.
//!
//! # User-facing types
//!
//! - [`Flow<S, E>`] is the trait for gameplay units driven every frame
//! - [`Out<E>`] is the output of every lifecycle hook
//! - [`FrameDriver<S, E>`] owns the state and the flows
//!
//! # Lifecycle Flow
//!
//! Each frame:
//! 1. Call `on_init` on every flow (first frame only)
//! 2. Call `on_update` on every flow, in registration order
//! 3. After each flow, offer the events it emitted to every flow via `on_custom_events`
//! 4. Queue events nobody consumed in the outbox for the host
//! 5. Tell the input source the frame is over (resets edge-triggered state)

use std::collections::VecDeque;

use instant::{Duration, Instant};

use crate::input::Input;

///
/// This is the Output Type for every lifecycle hook.
///
/// `Out::Events` carries events that are delivered to every flow in turn right
/// after the emitting hook returns. An event that no flow consumes ends up in the
/// driver's outbox.
///
/// `Empty` is the default output used when nothing happened worth telling.
///
pub enum Out<E> {
    Events(Vec<E>),
    Empty,
}

impl<E> Default for Out<E> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<E> Out<E> {
    pub fn event(event: E) -> Self {
        Self::Events(vec![event])
    }
}

/// Trait for implementing a piece of frame-driven gameplay.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once before the first update
/// 2. `on_update()` is called every frame with the elapsed time `dt`
/// 3. `on_custom_events()` is called for every event emitted by any flow
///
pub trait Flow<S, E> {
    /// Initialize the flow, e.g. spawn the first block.
    fn on_init(&mut self, state: &mut S) -> Out<E>;

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt` and the input as polled
    /// for this frame.
    fn on_update(&mut self, input: &dyn Input, state: &mut S, dt: Duration) -> Out<E>;

    /// Handle events emitted by flows.
    ///
    /// Returns the event if it was not consumed, allowing it to be passed to
    /// the next flow. Returning `None` means the event was consumed.
    fn on_custom_events(&mut self, state: &mut S, event: E) -> Option<E>;
}

pub struct FrameDriver<S, E> {
    state: S,
    flows: Vec<Box<dyn Flow<S, E>>>,
    outbox: VecDeque<E>,
    initialized: bool,
    frame: u64,
}

impl<S, E> FrameDriver<S, E> {
    pub fn new(state: S, flows: Vec<Box<dyn Flow<S, E>>>) -> Self {
        Self {
            state,
            flows,
            outbox: VecDeque::new(),
            initialized: false,
            frame: 0,
        }
    }

    pub fn add_flow(&mut self, flow: Box<dyn Flow<S, E>>) {
        self.flows.push(flow);
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs `on_init` on every flow. Called by the first [`FrameDriver::step`]
    /// when not done explicitly.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for idx in 0..self.flows.len() {
            let out = self.flows[idx].on_init(&mut self.state);
            self.handle_flow_output(out);
        }
    }

    /// Advances every flow by one frame.
    pub fn step(&mut self, input: &mut dyn Input, dt: Duration) {
        self.init();
        for idx in 0..self.flows.len() {
            let out = self.flows[idx].on_update(&*input, &mut self.state, dt);
            self.handle_flow_output(out);
        }
        input.end_frame();
        self.frame += 1;
    }

    /// Steps with a fixed `dt` until `stop` holds or `max_frames` ran.
    ///
    /// Returns the number of frames stepped.
    pub fn run_frames(
        &mut self,
        input: &mut dyn Input,
        dt: Duration,
        max_frames: u64,
        mut stop: impl FnMut(&S) -> bool,
    ) -> u64 {
        let mut stepped = 0;
        while stepped < max_frames && !stop(&self.state) {
            self.step(input, dt);
            stepped += 1;
        }
        stepped
    }

    /// Steps in real time, pacing frames to `frame_time`, while `keep_going`
    /// holds. `poll` is invoked before each frame to feed the input source;
    /// `on_event` receives the frame's unconsumed events afterwards, so the
    /// outbox is empty between frames.
    pub fn run_realtime<I: Input>(
        &mut self,
        input: &mut I,
        frame_time: Duration,
        mut poll: impl FnMut(&mut I, &S),
        mut on_event: impl FnMut(E, &S),
        mut keep_going: impl FnMut(&S) -> bool,
    ) {
        if let Err(e) = env_logger::try_init() {
            log::debug!("logger already initialized: {}", e);
        }
        let mut last_time = Instant::now();
        while keep_going(&self.state) {
            poll(input, &self.state);
            let dt = last_time.elapsed();
            last_time = Instant::now();
            self.step(input, dt);
            while let Some(event) = self.outbox.pop_front() {
                on_event(event, &self.state);
            }
            let spent = last_time.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            }
        }
    }

    /// Takes all events no flow consumed, oldest first.
    pub fn drain_events(&mut self) -> Vec<E> {
        self.outbox.drain(..).collect()
    }

    fn handle_flow_output(&mut self, out: Out<E>) {
        match out {
            Out::Events(events) => {
                for event in events {
                    let state = &mut self.state;
                    let result = self
                        .flows
                        .iter_mut()
                        .try_fold(event, |event, flow| flow.on_custom_events(state, event));
                    if let Some(event) = result {
                        self.outbox.push_back(event);
                    }
                }
            }
            Out::Empty => (),
        }
    }
}
