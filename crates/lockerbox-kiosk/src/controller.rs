//! The kiosk controller.
//!
//! A single timed loop that owns the peripherals, the session and the state
//! machine. Each [`Controller::tick`] reads the clock once, takes the newest
//! inventory snapshot and does the non-blocking work for the current state.
//! Output leaves the controller only through the display and outbound queues;
//! the controller never touches the network.

use crate::clock::{Clock, SystemClock};
use crate::display::{DisplayCommand, fit_line};
use crate::error::{KioskError, Result};
use crate::messages;
use crate::queue::offer;
use crate::session::{SessionMode, SessionState};
use crate::state_machine::{KioskState, StateMachine, StateTransition};
use lockerbox_core::{InventorySnapshot, KioskConfig, PendingMutation, UniversalPassword};
use lockerbox_hardware::{Peripherals, SoundId};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Timing and credentials the controller needs from the configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub password: UniversalPassword,
    pub keypad_timeout: Duration,
    pub door_timeout: Duration,
    pub reminder_interval: Duration,
    pub message_hold: Duration,
    pub weight_offset: f64,
}

impl ControllerConfig {
    pub fn from_config(config: &KioskConfig) -> Self {
        Self {
            password: config.kiosk.universal_password.clone(),
            keypad_timeout: config.timing.keypad_timeout(),
            door_timeout: config.timing.door_timeout(),
            reminder_interval: config.timing.reminder_interval(),
            message_hold: config.timing.message_hold(),
            weight_offset: config.scale.weight_offset,
        }
    }
}

/// Queues connecting the four actors.
#[derive(Debug)]
pub struct KioskChannels {
    pub snapshot_tx: mpsc::Sender<InventorySnapshot>,
    pub snapshot_rx: mpsc::Receiver<InventorySnapshot>,
    pub display_tx: mpsc::Sender<DisplayCommand>,
    pub display_rx: mpsc::Receiver<DisplayCommand>,
    pub outbound_tx: mpsc::Sender<PendingMutation>,
    pub outbound_rx: mpsc::Receiver<PendingMutation>,
}

impl KioskChannels {
    /// Create all three queues with the same capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (snapshot_tx, snapshot_rx) = mpsc::channel(capacity);
        let (display_tx, display_rx) = mpsc::channel(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
        Self {
            snapshot_tx,
            snapshot_rx,
            display_tx,
            display_rx,
            outbound_tx,
            outbound_rx,
        }
    }
}

/// Drives one kiosk through its sessions.
pub struct Controller<C: Clock = SystemClock> {
    config: ControllerConfig,
    clock: C,
    peripherals: Peripherals,
    machine: StateMachine,
    session: SessionState,
    snapshot: InventorySnapshot,
    snapshot_rx: mpsc::Receiver<InventorySnapshot>,
    display_tx: mpsc::Sender<DisplayCommand>,
    outbound_tx: mpsc::Sender<PendingMutation>,
    idle_since: Instant,
    reminder_shown: bool,
    hold_until: Option<Instant>,
    pending: Vec<PendingMutation>,
}

impl<C: Clock> std::fmt::Debug for Controller<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.machine.current_state())
            .field("session", &self.session)
            .field("snapshot_items", &self.snapshot.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<C: Clock> Controller<C> {
    pub fn new(
        config: ControllerConfig,
        clock: C,
        peripherals: Peripherals,
        snapshot_rx: mpsc::Receiver<InventorySnapshot>,
        display_tx: mpsc::Sender<DisplayCommand>,
        outbound_tx: mpsc::Sender<PendingMutation>,
    ) -> Self {
        let now = clock.now();
        Self {
            config,
            clock,
            peripherals,
            machine: StateMachine::new(),
            session: SessionState::default(),
            snapshot: InventorySnapshot::new(),
            snapshot_rx,
            display_tx,
            outbound_tx,
            idle_since: now,
            reminder_shown: false,
            hold_until: None,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> KioskState {
        self.machine.current_state()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The inventory snapshot the controller is matching codes against.
    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &VecDeque<StateTransition> {
        self.machine.history()
    }

    /// Weight of the box contents after the last successful session.
    pub fn baseline(&self) -> f64 {
        self.session.baseline
    }

    /// Take the current scale reading as the empty-box baseline.
    ///
    /// A failing scale leaves the baseline at zero.
    pub async fn calibrate(&mut self) {
        match self.peripherals.weight().await {
            Ok(weight) => {
                self.session.baseline = weight;
                info!(baseline = weight, "Scale calibrated");
            }
            Err(e) => warn!(error = %e, "Scale calibration failed, using 0.0 kg baseline"),
        }
    }

    /// Calibrate, then tick forever at the given period.
    pub async fn run(mut self, tick: Duration) {
        self.peripherals.log_devices().await;
        self.calibrate().await;
        self.show(messages::IDLE_REMINDER.show());
        info!(tick_ms = tick.as_millis() as u64, "Controller started");

        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// One pass of the control loop.
    pub async fn tick(&mut self) {
        let now = self.clock.now();
        self.drain_snapshots();

        let state = self.machine.current_state();
        let result = match state {
            KioskState::Idle => self.step_idle(now).await,
            KioskState::AwaitingCode => self.step_awaiting(now).await,
            KioskState::DepositFlow | KioskState::PickupFlow => self.step_door(now).await,
            KioskState::Finalizing => self.finalize(now).await,
        };

        if let Err(e) = result {
            self.abort(e, now).await;
        }
    }

    fn drain_snapshots(&mut self) {
        let mut newest = None;
        while let Ok(snapshot) = self.snapshot_rx.try_recv() {
            newest = Some(snapshot);
        }
        if let Some(snapshot) = newest {
            debug!(items = snapshot.len(), "Inventory snapshot received");
            self.snapshot = snapshot;
        }
    }

    async fn step_idle(&mut self, now: Instant) -> Result<()> {
        if self.hold_until.is_some_and(|until| now < until) {
            while let Some(key) = self.peripherals.read_key_char().await? {
                debug!(key = %key, "Discarding key during message hold");
            }
            return Ok(());
        }
        self.hold_until = None;

        if let Some(key) = self.peripherals.read_key_char().await? {
            self.transition(KioskState::AwaitingCode, now)?;
            self.accept_key(key, now);
            if self.session.is_code_complete() {
                return self.evaluate_code(now).await;
            }
            return self.step_awaiting(now).await;
        }

        if !self.reminder_shown && now.duration_since(self.idle_since) >= self.config.reminder_interval {
            self.reminder_shown = true;
            self.show(messages::IDLE_REMINDER.show());
        }
        Ok(())
    }

    async fn step_awaiting(&mut self, now: Instant) -> Result<()> {
        while let Some(key) = self.peripherals.read_key_char().await? {
            self.accept_key(key, now);
            if self.session.is_code_complete() {
                return self.evaluate_code(now).await;
            }
        }

        if self.session.code_deadline.is_some_and(|deadline| now >= deadline) {
            info!(typed = self.session.buffer.len(), "Code entry timed out");
            self.show(messages::KEYPAD_TIMEOUT.show());
            self.peripherals.play_sound(SoundId::Rejected).await?;
            self.return_to_idle(now)?;
        }
        Ok(())
    }

    fn accept_key(&mut self, key: char, now: Instant) {
        self.session.push_key(key);
        self.session.code_deadline = Some(now + self.config.keypad_timeout);
        debug!(typed = self.session.buffer.len(), "Key accepted");
        self.show(DisplayCommand::static_text(
            messages::CODE_PROMPT,
            self.session.buffer.clone(),
        ));
    }

    async fn evaluate_code(&mut self, now: Instant) -> Result<()> {
        let code = self.session.buffer.clone();

        if self.config.password.matches(&code) {
            info!("Universal password accepted");
            return self.start_pickup(now).await;
        }

        if let Some(item) = self.snapshot.get(&code).cloned() {
            info!(code = %item.tracking_code, description = %item.description, "Tracking code matched");
            return self.start_deposit(item, now).await;
        }

        info!(code = %code, "Tracking code rejected");
        self.show(messages::CODE_REJECTED.show());
        self.peripherals.play_sound(SoundId::Rejected).await?;
        self.return_to_idle(now)
    }

    async fn start_pickup(&mut self, now: Instant) -> Result<()> {
        self.transition(KioskState::PickupFlow, now)?;
        self.session.mode = SessionMode::OwnerPickup;

        self.peripherals.unlock_door().await?;
        self.peripherals.play_sound(SoundId::OwnerOpen).await?;
        self.show(messages::OWNER_OPEN.show());
        self.session.door_deadline = Some(now + self.config.door_timeout);
        Ok(())
    }

    async fn start_deposit(&mut self, item: lockerbox_core::OpenItem, now: Instant) -> Result<()> {
        self.transition(KioskState::DepositFlow, now)?;
        self.session.mode = SessionMode::Deposit;

        self.show(DisplayCommand::paged(
            messages::DEPOSIT_FOR,
            fit_line(&item.description),
        ));
        self.session.item = Some(item);

        self.show(messages::POSE_FOR_PHOTO.page());
        self.peripherals.play_sound(SoundId::PoseForPhoto).await?;
        self.peripherals.play_sound(SoundId::Shutter).await?;
        let photo = self.peripherals.capture_photo().await?;
        debug!(photo = %photo.path().display(), "Courier photo captured");
        self.session.photo = Some(photo);

        self.peripherals.unlock_door().await?;
        self.peripherals.play_sound(SoundId::PlaceItem).await?;
        self.show(messages::PLACE_ITEM.show());
        self.session.door_deadline = Some(now + self.config.door_timeout);
        Ok(())
    }

    async fn step_door(&mut self, now: Instant) -> Result<()> {
        let closed = self.peripherals.door_closed().await?;
        if !closed {
            if !self.session.door_seen_open {
                debug!("Door opened");
            }
            self.session.door_seen_open = true;
        } else if self.session.door_seen_open {
            return match self.session.mode {
                SessionMode::Deposit => self.close_deposit(now).await,
                SessionMode::OwnerPickup => self.close_pickup(now).await,
                SessionMode::None => Err(KioskError::Session("door session without a mode")),
            };
        }

        if self.session.door_deadline.is_some_and(|deadline| now >= deadline) {
            warn!(state = %self.machine.current_state(), "Door still open, reminding user");
            self.peripherals.play_sound(SoundId::CloseDoor).await?;
            self.show(messages::CLOSE_DOOR.show());
            self.session.door_deadline = Some(now + self.config.door_timeout);
        }
        Ok(())
    }

    async fn close_deposit(&mut self, now: Instant) -> Result<()> {
        self.peripherals.lock_door().await?;
        let weight = self.peripherals.weight().await?;
        let threshold = self.session.baseline + self.config.weight_offset;

        if hundredths(weight) > hundredths(threshold) {
            let item = self
                .session
                .item
                .clone()
                .ok_or(KioskError::Session("deposit without an item"))?;
            let photo = self
                .session
                .photo
                .as_ref()
                .map(|photo| photo.bytes().clone())
                .ok_or(KioskError::Session("deposit without a photo"))?;

            info!(code = %item.tracking_code, weight, baseline = self.session.baseline, "Package received");
            self.session.baseline = weight;
            self.snapshot.remove(item.tracking_code.as_str());
            self.pending = PendingMutation::for_deposit(item, photo, self.clock.local_time());

            self.transition(KioskState::Finalizing, now)?;
            return self.finalize(now).await;
        }

        info!(weight, threshold, "No package detected");
        self.show(messages::NO_ITEM.show());
        self.peripherals.play_sound(SoundId::Rejected).await?;
        self.discard_photo().await;
        self.return_to_idle(now)
    }

    async fn close_pickup(&mut self, now: Instant) -> Result<()> {
        self.peripherals.lock_door().await?;
        let weight = self.peripherals.weight().await?;
        info!(weight, previous = self.session.baseline, "Pickup complete, baseline updated");
        self.session.baseline = weight;
        self.show(messages::PICKUP_DONE.page());

        self.transition(KioskState::Finalizing, now)?;
        self.finalize(now).await
    }

    /// Queue the session's mutations and confirm to the user.
    ///
    /// Baseline and snapshot are already committed when this runs, so the
    /// mutations are queued before anything that can fail.
    async fn finalize(&mut self, now: Instant) -> Result<()> {
        for mutation in std::mem::take(&mut self.pending) {
            debug!(kind = %mutation.kind(), code = %mutation.tracking_code(), "Queueing mutation");
            offer(&self.outbound_tx, mutation, "outbound");
        }

        self.show(messages::THANK_YOU.show());
        if let Err(e) = self.peripherals.play_sound(SoundId::Accepted).await {
            warn!(error = %e, "Failed to play confirmation sound");
        }

        self.discard_photo().await;
        self.return_to_idle(now)
    }

    /// Abandon the session after a failed step.
    ///
    /// The state is read after the failed step, since a step may already have
    /// moved into a door session before failing.
    async fn abort(&mut self, err: KioskError, now: Instant) {
        let state = self.machine.current_state();
        error!(state = %state, error = %err, "Session aborted");

        if state.is_door_session() {
            if let Err(e) = self.peripherals.lock_door().await {
                error!(error = %e, "Failed to re-lock door");
            }
        }
        self.discard_photo().await;
        self.pending.clear();

        self.show(messages::DEVICE_ERROR.show());
        if let Err(e) = self.peripherals.play_sound(SoundId::Rejected).await {
            error!(error = %e, "Failed to play error sound");
        }

        let transition = self.machine.reset(now);
        info!(from = %transition.from, "Forced reset to Idle");
        self.settle_idle(now);
    }

    async fn discard_photo(&mut self) {
        if let Some(photo) = self.session.photo.take() {
            if let Err(e) = self.peripherals.delete_photo(&photo).await {
                warn!(error = %e, photo = %photo.path().display(), "Failed to delete photo");
            }
        }
    }

    fn return_to_idle(&mut self, now: Instant) -> Result<()> {
        self.transition(KioskState::Idle, now)?;
        self.settle_idle(now);
        Ok(())
    }

    /// Reset the session and hold the last message on screen.
    fn settle_idle(&mut self, now: Instant) {
        self.session.reset();
        self.idle_since = now;
        self.reminder_shown = false;
        self.hold_until = Some(now + self.config.message_hold);
    }

    fn transition(&mut self, to: KioskState, now: Instant) -> Result<()> {
        let transition = self.machine.transition_to(to, now)?;
        info!(from = %transition.from, to = %transition.to, "State transition");
        Ok(())
    }

    fn show(&self, command: DisplayCommand) {
        offer(&self.display_tx, command, "display");
    }
}

/// Kilograms as whole hundredths, the scale's reporting resolution.
fn hundredths(kg: f64) -> i64 {
    (kg * 100.0).round() as i64
}
