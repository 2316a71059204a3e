//! Dashboard orchestration: submit, toggle, reset.
//!
//! A submission moves through explicit phases:
//!
//! `Idle → Validating → AwaitingResponse → Rendering → Idle`
//!
//! The HTTP exchange runs on a worker thread and reports back over a channel,
//! so the event loop stays responsive while a request is in flight. Every
//! submission gets a sequence number; only the response to the newest one is
//! applied. Reset invalidates whatever is still in flight.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::dashboard::form::build_query;
use crate::dashboard::mode::ModeToggle;
use crate::dashboard::render::{RenderSurfaces, ResultRenderer, ScrollAnchor};
use crate::dashboard::temporal::TemporalContextResolver;
use crate::data::client::{ClientFailure, PredictionService};
use crate::domain::{DashboardSettings, FormInputs, ListingQuery, PredictionResult};

/// Where the latest submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    AwaitingResponse { seq: u64 },
    Rendering,
}

/// Everything the dashboard displays or edits. One per dashboard instance.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub inputs: FormInputs,
    pub mode: ModeToggle,
    pub surfaces: RenderSurfaces,
    /// Most recent failed submission, cleared by the next success or a reset.
    pub last_failure: Option<ClientFailure>,
}

/// A worker's answer for one submission.
#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    /// Neighborhood of the query that produced this answer.
    pub neighborhood: String,
    pub outcome: Result<PredictionResult, ClientFailure>,
}

/// What applying a completion did to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Rendered { seq: u64 },
    /// The request failed; displayed state was left untouched.
    Failed { seq: u64, failure: ClientFailure },
    /// A newer submission (or a reset) superseded this one.
    Stale { seq: u64 },
}

pub struct DashboardController {
    service: Arc<dyn PredictionService>,
    temporal: TemporalContextResolver,
    renderer: ResultRenderer,
    session: DashboardSession,
    phase: Phase,
    latest_seq: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl DashboardController {
    pub fn new(
        service: Arc<dyn PredictionService>,
        temporal: TemporalContextResolver,
        settings: &DashboardSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let session = DashboardSession {
            inputs: FormInputs::default(),
            mode: ModeToggle::new(&temporal),
            surfaces: RenderSurfaces::default(),
            last_failure: None,
        };
        Self {
            service,
            temporal,
            renderer: ResultRenderer::new(settings),
            session,
            phase: Phase::Idle,
            latest_seq: 0,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Mutable access to the raw form values (typing into widgets).
    pub fn inputs_mut(&mut self) -> &mut FormInputs {
        &mut self.session.inputs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.phase, Phase::AwaitingResponse { .. })
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    /// Resolve the date context and build the payload, entering `AwaitingResponse`.
    fn prepare(&mut self) -> (u64, ListingQuery) {
        self.phase = Phase::Validating;
        let seasonal = self
            .temporal
            .resolve(self.session.mode.mode(), &self.session.inputs.manual_date);
        let query = build_query(&self.session.inputs, seasonal);

        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.phase = Phase::AwaitingResponse { seq };
        (seq, query)
    }

    /// Dispatch a submission to a worker thread. Returns its sequence number.
    ///
    /// The result arrives through [`DashboardController::poll`] or
    /// [`DashboardController::wait`].
    pub fn submit(&mut self) -> u64 {
        let (seq, query) = self.prepare();
        tracing::info!(
            seq,
            neighborhood = %query.neighborhood,
            month = query.seasonal.month,
            day = query.seasonal.day,
            "submitting prediction query"
        );

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let outcome = service.predict(&query);
            // The controller may be gone (app quit); nothing left to update.
            let _ = tx.send(Completion {
                seq,
                neighborhood: query.neighborhood,
                outcome,
            });
        });
        seq
    }

    /// Submit and apply on the calling thread.
    pub fn submit_blocking(&mut self, viewport_width: u16, now: Instant) -> Applied {
        let (seq, query) = self.prepare();
        let outcome = self.service.predict(&query);
        self.apply(
            Completion {
                seq,
                neighborhood: query.neighborhood,
                outcome,
            },
            viewport_width,
            now,
        )
    }

    /// Apply every completion that has already arrived.
    pub fn poll(&mut self, viewport_width: u16, now: Instant) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            applied.push(self.apply(completion, viewport_width, now));
        }
        applied
    }

    /// Block up to `timeout` for the next completion and apply it.
    pub fn wait(&mut self, timeout: Duration, viewport_width: u16, now: Instant) -> Option<Applied> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(self.apply(completion, viewport_width, now)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn apply(&mut self, completion: Completion, viewport_width: u16, now: Instant) -> Applied {
        let seq = completion.seq;
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "ignoring superseded prediction response");
            return Applied::Stale { seq };
        }

        match completion.outcome {
            Ok(result) => {
                self.phase = Phase::Rendering;
                self.renderer.render(
                    &mut self.session.surfaces,
                    &result,
                    &completion.neighborhood,
                    viewport_width,
                    now,
                );
                self.session.last_failure = None;
                self.phase = Phase::Idle;
                tracing::info!(seq, price = result.price, tier = %result.tier, "prediction rendered");
                Applied::Rendered { seq }
            }
            Err(failure) => {
                tracing::warn!(seq, error = %failure, "prediction failed; keeping current display");
                self.session.last_failure = Some(failure.clone());
                self.phase = Phase::Idle;
                Applied::Failed { seq, failure }
            }
        }
    }

    /// Flip Auto/Manual.
    pub fn toggle_mode(&mut self) {
        let session = &mut self.session;
        session.mode.toggle(&mut session.inputs.manual_date, &self.temporal);
    }

    /// Move keyboard focus onto or off the date input.
    pub fn set_date_focus(&mut self, focused: bool) {
        if focused {
            self.session.mode.focus();
        } else {
            self.session.mode.blur();
        }
    }

    /// Scroll the stacked layout (user-driven; rendering schedules its own scroll).
    pub fn scroll_to(&mut self, anchor: ScrollAnchor) {
        self.session.surfaces.scroll = anchor;
    }

    /// Restore the initial dashboard: default inputs, hidden panels, default map,
    /// empty chart slots, Auto mode with a fresh status label.
    pub fn reset(&mut self, now: Instant) {
        if let Phase::AwaitingResponse { seq } = self.phase {
            tracing::debug!(seq, "reset discards in-flight submission");
        }
        // Any completion still in flight now carries an outdated sequence number.
        self.latest_seq += 1;
        self.phase = Phase::Idle;

        self.session.inputs = FormInputs::default();
        self.session.surfaces.reset(now);
        self.session.mode.force_auto(&self.temporal);
        self.session.last_failure = None;
        tracing::info!("dashboard reset");
    }

    /// Advance time-driven UI work. Returns `true` if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.session.surfaces.poll_scroll(now)
    }
}
