// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The watchdog: periodic reconciliation of the agent fleet.
//!
//! Every tick loads all sessions, batches one external ticket-status
//! lookup, then reconciles each non-completed session against
//! observable reality: closed tickets force completion, dead terminals
//! terminate, quiet sessions climb the escalation ladder, recovered
//! sessions reset. Ticks are serialized; nothing in a tick may crash
//! the supervisor. Per-session failures are logged and skipped so the
//! rest of the fleet is still processed, and external-collaborator
//! failures are fail-open by construction.

use crate::broker::{MailBroker, SendRequest};
use crate::health::{self, HealthAction, HealthCheck, HealthThresholds};
use crate::nudge::NudgeSender;
use crate::{completion, escalation, EngineError};
use ovs_adapters::{
    FailureEntry, LearnAdapter, MuxAdapter, NotifyAdapter, TrackerAdapter, TriageAdapter,
    TriageRequest, TriageVerdict,
};
use ovs_core::{
    event_type, AgentSession, Clock, EventLevel, MailPriority, MailType, NudgeMarker,
    SessionState, StructuredEvent,
};
use ovs_storage::{
    CurrentRun, EventsStore, MailStore, MetricsRow, MetricsStore, RunCompleteMarker, SessionStore,
    StateLayout,
};
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sender name the watchdog uses for mail it originates.
pub const WATCHDOG_AGENT: &str = "watchdog";

/// Mulch domain for watchdog failure records.
const LEARN_DOMAIN: &str = "orchestration";

/// Watchdog timing and feature configuration.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Delay between ticks.
    pub interval_ms: u64,
    /// Activity age at which a session counts as stalled.
    pub stale_ms: u64,
    /// Activity age marking a deep stall; must exceed `stale_ms`.
    pub zombie_ms: u64,
    /// Elapsed time per escalation-ladder rung.
    pub nudge_interval_ms: u64,
    /// Invoke the triage collaborator at ladder level 2.
    pub triage_enabled: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval_ms: 60_000,
            stale_ms: 300_000,
            zombie_ms: 1_200_000,
            nudge_interval_ms: 60_000,
            triage_enabled: false,
        }
    }
}

impl WatchdogConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.interval_ms == 0 {
            return Err(EngineError::InvalidThresholds("interval_ms must be > 0".into()));
        }
        if self.nudge_interval_ms == 0 {
            return Err(EngineError::InvalidThresholds(
                "nudge_interval_ms must be > 0".into(),
            ));
        }
        self.thresholds().validate()
    }

    fn thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            stale_ms: self.stale_ms,
            zombie_ms: self.zombie_ms,
        }
    }
}

/// Snapshot handed to the health-check callback after each session
/// evaluation.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub agent_name: String,
    pub state: SessionState,
    pub action: HealthAction,
    pub escalation_level: u8,
    pub note: Option<String>,
}

type HealthCallback = Arc<dyn Fn(&HealthReport) + Send + Sync>;

/// The supervisor's periodic reconciler.
pub struct Watchdog<M, T, L, R, N, C>
where
    M: MuxAdapter,
    T: TrackerAdapter,
    L: LearnAdapter,
    R: TriageAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    config: WatchdogConfig,
    project_root: PathBuf,
    sessions: SessionStore,
    mail: MailStore,
    broker: MailBroker<C>,
    nudger: NudgeSender<C>,
    events: EventsStore,
    metrics: MetricsStore,
    current_run: CurrentRun,
    run_marker: RunCompleteMarker,
    mux: M,
    tracker: T,
    learn: L,
    triage: R,
    notify: N,
    clock: C,
    on_health_check: Option<HealthCallback>,
}

impl<M, T, L, R, N, C> Watchdog<M, T, L, R, N, C>
where
    M: MuxAdapter,
    T: TrackerAdapter,
    L: LearnAdapter,
    R: TriageAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        project_root: impl Into<PathBuf>,
        layout: &StateLayout,
        config: WatchdogConfig,
        mux: M,
        tracker: T,
        learn: L,
        triage: R,
        notify: N,
        clock: C,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            project_root: project_root.into(),
            sessions: SessionStore::open(layout)?,
            mail: MailStore::open(layout)?,
            broker: MailBroker::open(layout, clock.clone())?,
            nudger: NudgeSender::open(layout, clock.clone())?,
            events: EventsStore::open(layout)?,
            metrics: MetricsStore::open(layout)?,
            current_run: CurrentRun::open(layout)?,
            run_marker: RunCompleteMarker::open(layout)?,
            mux,
            tracker,
            learn,
            triage,
            notify,
            clock,
            on_health_check: None,
        })
    }

    /// Register an operator-surface callback fired after every session
    /// evaluation.
    pub fn with_health_callback(
        mut self,
        callback: impl Fn(&HealthReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_health_check = Some(Arc::new(callback));
        self
    }

    /// Run ticks until `shutdown` flips true. The first tick fires
    /// immediately. An in-flight tick always completes; shutdown only
    /// cancels the scheduling.
    pub async fn run(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            self.tick().await;
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(self.config.interval_ms)) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("watchdog stopping");
                        return;
                    }
                }
            }
        }
    }

    /// One reconciliation pass over the fleet. Never fails; every
    /// error inside is logged and contained.
    pub async fn tick(&self) {
        let now = self.clock.now_ms();

        let sessions = match self.sessions.get_all() {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(error = %e, "session load failed, skipping tick");
                return;
            }
        };

        // One batched ticket lookup per tick; fail-open to the empty set
        let bead_ids: Vec<String> = sessions
            .iter()
            .filter(|s| s.state != SessionState::Completed && s.has_bead())
            .map(|s| s.bead_id.clone())
            .collect();
        let closed = self.tracker.closed_ids(&self.project_root, &bead_ids).await;

        for session in sessions
            .iter()
            .filter(|s| s.state != SessionState::Completed)
        {
            if let Err(e) = self.evaluate_session(session, &closed, now).await {
                warn!(agent = %session.agent_name, error = %e, "session evaluation failed");
            }
        }

        self.check_run_completion(now).await;
    }

    async fn evaluate_session(
        &self,
        session: &AgentSession,
        closed_beads: &HashSet<String>,
        now: u64,
    ) -> Result<(), EngineError> {
        // Closed external ticket forces completion; no liveness probe,
        // no escalation evaluation
        if session.has_bead() && closed_beads.contains(&session.bead_id) {
            return self.autocomplete_from_bead(session, now);
        }

        let alive = match self.mux.is_alive(&session.tmux_session).await {
            Ok(alive) => alive,
            Err(e) => {
                // A failed probe is not a dead terminal; never kill on
                // missing evidence
                warn!(agent = %session.agent_name, error = %e, "liveness probe failed, assuming alive");
                true
            }
        };

        let check = health::evaluate(session, alive, now, &self.config.thresholds());
        if let Some(note) = &check.note {
            debug!(agent = %session.agent_name, note = %note, "reconciliation note");
        }

        if check.new_state != session.state {
            self.sessions
                .update_state(&session.agent_name, check.new_state)?;
        }

        self.fire_health_callback(session, &check);

        match check.action {
            HealthAction::None => {
                if session.stalled_since.is_some() || session.escalation_level > 0 {
                    // Recovery clears the ladder
                    self.sessions
                        .update_escalation(&session.agent_name, 0, None)?;
                    info!(agent = %session.agent_name, "recovered from stall");
                }
            }
            HealthAction::Investigate => {
                self.record_event(
                    StructuredEvent::new(
                        session.agent_name.as_str(),
                        event_type::HEALTH_CHECK,
                        EventLevel::Warn,
                    )
                    .with_session_id(session.id.as_str())
                    .with_data(json!({ "note": check.note })),
                    now,
                );
            }
            HealthAction::Terminate => {
                self.terminate_session(
                    session,
                    "terminated: terminal session gone",
                    0,
                    None,
                    alive,
                    now,
                )
                .await;
            }
            HealthAction::Escalate => {
                self.escalate_session(session, now).await?;
            }
        }
        Ok(())
    }

    fn autocomplete_from_bead(
        &self,
        session: &AgentSession,
        now: u64,
    ) -> Result<(), EngineError> {
        self.sessions
            .update_state(&session.agent_name, SessionState::Completed)?;
        info!(agent = %session.agent_name, bead = %session.bead_id, "bead closed, autocompleting");

        self.record_event(
            StructuredEvent::new(
                session.agent_name.as_str(),
                event_type::BEAD_CLOSED_AUTOCOMPLETE,
                EventLevel::Info,
            )
            .with_session_id(session.id.as_str())
            .with_data(json!({ "bead_id": session.bead_id })),
            now,
        );

        // The session only terminates now if it was still live
        if !session.state.is_terminal() {
            self.record_metrics(session, "completed", now);
        }
        Ok(())
    }

    async fn escalate_session(
        &self,
        session: &AgentSession,
        now: u64,
    ) -> Result<(), EngineError> {
        let Some(stalled_since) = session.stalled_since else {
            // First detection: start the ladder at level 0
            self.sessions
                .update_escalation(&session.agent_name, 0, Some(now))?;
            self.record_event(
                StructuredEvent::new(
                    session.agent_name.as_str(),
                    event_type::ESCALATION,
                    EventLevel::Warn,
                )
                .with_session_id(session.id.as_str())
                .with_data(json!({ "level": 0, "age_ms": session.activity_age_ms(now) })),
                now,
            );
            self.first_stall_inbox_nudge(session, now);
            return Ok(());
        };

        let expected =
            escalation::expected_level(now, stalled_since, self.config.nudge_interval_ms);
        if expected <= session.escalation_level {
            return Ok(());
        }

        self.sessions
            .update_escalation(&session.agent_name, expected, Some(stalled_since))?;
        self.record_event(
            StructuredEvent::new(session.agent_name.as_str(), event_type::ESCALATION, EventLevel::Warn)
                .with_session_id(session.id.as_str())
                .with_data(json!({ "level": expected })),
            now,
        );

        match escalation::LadderStep::for_level(expected) {
            escalation::LadderStep::Warn => {}
            escalation::LadderStep::Nudge => self.send_report_request(session, now),
            escalation::LadderStep::Triage => {
                if self.config.triage_enabled {
                    self.run_triage(session, now).await;
                } else {
                    debug!(agent = %session.agent_name, "triage disabled, ladder continues");
                }
            }
            escalation::LadderStep::Terminate => {
                self.terminate_session(
                    session,
                    "progressive escalation reached terminal level",
                    0,
                    None,
                    true,
                    now,
                )
                .await;
            }
        }
        Ok(())
    }

    /// Pre-level-1 courtesy: an agent that stalls while sitting on
    /// unread mail may simply not know it has instructions waiting.
    fn first_stall_inbox_nudge(&self, session: &AgentSession, now: u64) {
        let unread = match self.mail.get_unread(&session.agent_name) {
            Ok(unread) => unread,
            Err(e) => {
                warn!(agent = %session.agent_name, error = %e, "unread lookup failed");
                return;
            }
        };
        if unread.is_empty() {
            return;
        }
        let marker = NudgeMarker::new(
            WATCHDOG_AGENT,
            "unread-mail",
            escalation::unread_mail_subject(unread.len(), &session.agent_name),
            now,
        );
        match self.nudger.deliver(&session.agent_name, marker, true) {
            Ok(delivery) if !delivery.delivered => {
                debug!(agent = %session.agent_name, reason = ?delivery.reason, "inbox nudge skipped");
            }
            Ok(_) => {}
            Err(e) => warn!(agent = %session.agent_name, error = %e, "inbox nudge failed"),
        }
    }

    /// Ladder level 1: force a low-priority status-report request.
    fn send_report_request(&self, session: &AgentSession, now: u64) {
        let request = SendRequest::new(
            WATCHDOG_AGENT,
            session.agent_name.as_str(),
            "status check",
            escalation::report_request_body(&session.agent_name, session.activity_age_ms(now)),
            MailType::Status,
            MailPriority::Low,
        );
        if let Err(e) = self.broker.send(&request, true) {
            warn!(agent = %session.agent_name, error = %e, "report-request send failed");
        }
    }

    /// Ladder level 2: hand the stalled agent to the triage
    /// collaborator and act on its verdict.
    async fn run_triage(&self, session: &AgentSession, now: u64) {
        let verdict = self
            .triage
            .assess(&TriageRequest {
                agent_name: session.agent_name.clone(),
                project_root: self.project_root.clone(),
                last_activity: session.last_activity,
            })
            .await;
        info!(agent = %session.agent_name, ?verdict, "triage verdict");

        match verdict {
            TriageVerdict::Terminate => {
                self.terminate_session(
                    session,
                    "terminated by triage verdict",
                    1,
                    Some("terminate"),
                    true,
                    now,
                )
                .await;
            }
            TriageVerdict::Retry => {
                let marker = NudgeMarker::new(
                    WATCHDOG_AGENT,
                    "recovery",
                    "triage suggests you resume; please continue your task",
                    now,
                );
                if let Err(e) = self.nudger.deliver(&session.agent_name, marker, true) {
                    warn!(agent = %session.agent_name, error = %e, "recovery nudge failed");
                }
            }
            TriageVerdict::Extend => {}
        }
    }

    /// Kill a session and record the failure. Every side effect is
    /// best-effort: a lost metrics row or notification must not stop
    /// the tick.
    async fn terminate_session(
        &self,
        session: &AgentSession,
        reason: &str,
        tier: u8,
        triage_suggestion: Option<&str>,
        kill_terminal: bool,
        now: u64,
    ) {
        let mut tags = vec![
            format!("capability:{}", session.capability),
            format!("tier:{tier}"),
        ];
        if let Some(suggestion) = triage_suggestion {
            tags.push(format!("triage:{suggestion}"));
        }
        let entry = FailureEntry {
            kind: "agent-failure".to_string(),
            description: format!("{}: {}", session.agent_name, reason),
            tags,
            evidence_bead: session.has_bead().then(|| session.bead_id.clone()),
        };
        if let Err(e) = self.learn.record(&self.project_root, LEARN_DOMAIN, &entry).await {
            warn!(agent = %session.agent_name, error = %e, "failure record dropped");
        }

        if kill_terminal {
            if let Err(e) = self.mux.kill_session(&session.tmux_session).await {
                warn!(agent = %session.agent_name, error = %e, "terminal kill failed");
            }
        }

        if let Err(e) = self
            .sessions
            .update_state(&session.agent_name, SessionState::Zombie)
        {
            warn!(agent = %session.agent_name, error = %e, "zombie transition failed");
        }

        self.record_metrics(session, "zombie", now);
        self.record_event(
            StructuredEvent::new(
                session.agent_name.as_str(),
                event_type::AGENT_TERMINATED,
                EventLevel::Error,
            )
            .with_session_id(session.id.as_str())
            .with_data(json!({ "reason": reason, "tier": tier })),
            now,
        );

        if let Err(e) = self
            .notify
            .notify(
                "Overstory agent terminated",
                &format!("{} ({}): {}", session.agent_name, session.capability, reason),
            )
            .await
        {
            warn!(agent = %session.agent_name, error = %e, "terminate notification failed");
        }
    }

    /// Fire the run-completion detector for the active run, if any.
    /// The dedup marker read is the only hard once-only boundary;
    /// later failures may at worst repeat the notification.
    async fn check_run_completion(&self, now: u64) {
        let run_id = match self.current_run.read() {
            Ok(Some(run_id)) => run_id,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "current-run read failed");
                return;
            }
        };

        let sessions = match self.sessions.get_by_run(&run_id) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "run session load failed");
                return;
            }
        };
        let workers: Vec<AgentSession> = sessions
            .into_iter()
            .filter(|s| !completion::is_completion_exempt(s.capability))
            .collect();
        if workers.is_empty() {
            return;
        }
        if workers.iter().any(|w| w.state != SessionState::Completed) {
            return;
        }

        match self.run_marker.read() {
            Ok(Some(notified)) if notified == run_id => return,
            Ok(_) => {}
            // Unreadable marker: proceed; a double notification beats
            // a lost one
            Err(e) => warn!(error = %e, "run-complete marker read failed"),
        }

        info!(run_id = %run_id, workers = workers.len(), "run complete");
        let (subject, body) = completion::run_complete_message(&run_id, &workers);
        let request = SendRequest::new(
            WATCHDOG_AGENT,
            "coordinator",
            subject,
            body,
            MailType::Result,
            MailPriority::High,
        );
        if let Err(e) = self.broker.send(&request, true) {
            warn!(run_id = %run_id, error = %e, "run-complete mail failed");
        }

        self.record_event(
            StructuredEvent::new(WATCHDOG_AGENT, event_type::RUN_COMPLETE, EventLevel::Info)
                .with_run_id(run_id.as_str())
                .with_data(json!({ "workers": workers.len() })),
            now,
        );

        if let Err(e) = self.run_marker.write(&run_id) {
            warn!(run_id = %run_id, error = %e, "run-complete marker write failed");
        }
    }

    fn fire_health_callback(&self, session: &AgentSession, check: &HealthCheck) {
        if let Some(callback) = &self.on_health_check {
            callback(&HealthReport {
                agent_name: session.agent_name.clone(),
                state: check.new_state,
                action: check.action,
                escalation_level: session.escalation_level,
                note: check.note.clone(),
            });
        }
    }

    fn record_event(&self, event: StructuredEvent, now: u64) {
        if let Err(e) = self.events.append(event, now) {
            warn!(error = %e, "event append failed");
        }
    }

    fn record_metrics(&self, session: &AgentSession, outcome: &str, now: u64) {
        let row = MetricsRow {
            agent_name: session.agent_name.clone(),
            capability: session.capability,
            run_id: session.run_id.clone(),
            outcome: outcome.to_string(),
            started_at: session.started_at,
            ended_at: now,
            duration_ms: now.saturating_sub(session.started_at),
            total_tokens: None,
            total_cost_usd: None,
        };
        if let Err(e) = self.metrics.append(&row) {
            warn!(agent = %session.agent_name, error = %e, "metrics row dropped");
        }
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
