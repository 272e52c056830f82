//! Form controller: owns the configuration form, its baseline and the
//! operational status, and drives submit / start / stop / name refresh.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use pumpsim_domain::error::{CollaboratorError, InvalidStateError, PumpSimError};
use pumpsim_domain::event::{FormChange, FormEvent};
use pumpsim_domain::form::{ConfigurationForm, FieldUpdate};
use pumpsim_domain::snapshot::FormSnapshot;
use pumpsim_domain::status::OperationalStatus;
use pumpsim_domain::view::FormView;

use crate::event_bus::FormEventBus;
use crate::ports::{ConfigApplier, NameProvider};

/// How long a name refresh waits for the naming service by default.
pub const DEFAULT_NAMING_TIMEOUT: Duration = Duration::from_secs(5);

const NAMING_SERVICE: &str = "naming service";

struct FormState {
    form: ConfigurationForm,
    baseline: ConfigurationForm,
    status: OperationalStatus,
}

impl FormState {
    fn dirty(&self) -> bool {
        self.form != self.baseline
    }

    fn view(&self) -> FormView {
        FormView::new(self.form.clone(), self.status, self.dirty())
    }
}

fn lock_state(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What happened to a name refresh once the naming service answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new name was written into the form.
    Applied(String),
    /// The controller was dropped before the answer arrived.
    Discarded,
}

/// Handle on a pending name refresh.
///
/// Dropping the handle does not cancel the refresh.
pub struct RefreshHandle {
    task: JoinHandle<Result<RefreshOutcome, PumpSimError>>,
}

impl RefreshHandle {
    /// Wait for the refresh to finish.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::Collaborator`] when the naming service fails,
    /// times out, or the refresh task panics.
    pub async fn outcome(self) -> Result<RefreshOutcome, PumpSimError> {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(CollaboratorError::failed(NAMING_SERVICE, err).into()),
        }
    }
}

/// Application service for the "Basic Information" card.
///
/// All mutations are synchronous and take the state lock briefly; the lock is
/// never held across an `.await`. The only asynchronous boundary is the name
/// refresh, which runs as a spawned task holding a weak reference to the state
/// so that dropping the controller discards late answers.
pub struct FormController<N, A> {
    state: Arc<Mutex<FormState>>,
    naming: Arc<N>,
    applier: A,
    events: FormEventBus,
    naming_timeout: Duration,
}

impl<N, A> FormController<N, A>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync,
{
    /// Create an idle controller holding the default form.
    pub fn new(naming: N, applier: A) -> Self {
        Self::with_status(naming, applier, OperationalStatus::Idle)
    }

    /// Create a controller that is still loading its initial configuration.
    ///
    /// Call [`finish_loading`](Self::finish_loading) once it is available.
    pub fn loading(naming: N, applier: A) -> Self {
        Self::with_status(naming, applier, OperationalStatus::Loading)
    }

    fn with_status(naming: N, applier: A, status: OperationalStatus) -> Self {
        let form = ConfigurationForm::default();
        Self {
            state: Arc::new(Mutex::new(FormState {
                baseline: form.clone(),
                form,
                status,
            })),
            naming: Arc::new(naming),
            applier,
            events: FormEventBus::default(),
            naming_timeout: DEFAULT_NAMING_TIMEOUT,
        }
    }

    /// Bound how long a name refresh waits for the naming service.
    #[must_use]
    pub fn with_naming_timeout(mut self, timeout: Duration) -> Self {
        self.naming_timeout = timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        lock_state(&self.state)
    }

    /// Current values and control flags.
    pub fn view(&self) -> FormView {
        self.lock().view()
    }

    pub fn status(&self) -> OperationalStatus {
        self.lock().status
    }

    /// Whether the form differs from its last saved baseline.
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty()
    }

    /// Observe every change made through this controller.
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    /// Update one field and recompute the dirty flag.
    #[tracing::instrument(skip(self), fields(field = %update.field()))]
    pub fn set_field(&self, update: FieldUpdate) -> FormView {
        let field = update.field();
        let view = {
            let mut state = self.lock();
            state.form.apply(update);
            state.view()
        };
        self.events.publish(FormChange::FieldChanged {
            field,
            dirty: view.dirty,
        });
        view
    }

    /// Validate the form, hand a snapshot to the applier, and make it the new
    /// baseline.
    ///
    /// The dirty flag is recomputed against the submitted values, so edits
    /// made while the applier was busy stay dirty.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::Validation`] when the pump type is unset, or
    /// the applier's error; in both cases the baseline is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self) -> Result<FormSnapshot, PumpSimError> {
        let snapshot = {
            let state = self.lock();
            state.form.validate()?;
            FormSnapshot::capture(&state.form)
        };

        if let Err(err) = self.applier.apply(snapshot.clone()).await {
            tracing::warn!(snapshot = %snapshot.id(), error = %err, "applying configuration failed");
            return Err(err);
        }

        let dirty = {
            let mut state = self.lock();
            state.baseline = snapshot.form().clone();
            state.dirty()
        };
        tracing::info!(snapshot = %snapshot.id(), dirty, "configuration submitted");
        self.events.publish(FormChange::Submitted {
            snapshot: snapshot.id(),
        });
        Ok(snapshot)
    }

    /// Ask the naming service for a new name and write it into the form when
    /// it arrives.
    ///
    /// Concurrent refreshes are not serialized: the last answer to arrive wins.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::InvalidState`] unless the pump is idle.
    #[tracing::instrument(skip(self))]
    pub fn request_refresh_name(&self) -> Result<RefreshHandle, PumpSimError> {
        self.lock().status.ensure_can_refresh_name()?;

        let state = Arc::downgrade(&self.state);
        let naming = Arc::clone(&self.naming);
        let events = self.events.clone();
        let timeout = self.naming_timeout;

        let task = tokio::spawn(async move {
            let name = match tokio::time::timeout(timeout, naming.request_name()).await {
                Ok(Ok(name)) => name,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "name refresh failed");
                    return Err(err);
                }
                Err(_) => {
                    tracing::warn!(?timeout, "name refresh timed out");
                    return Err(CollaboratorError::Timeout {
                        collaborator: NAMING_SERVICE,
                        after: timeout,
                    }
                    .into());
                }
            };

            let Some(state) = state.upgrade() else {
                tracing::debug!(%name, "controller dropped before name arrived, discarding");
                return Ok(RefreshOutcome::Discarded);
            };

            let dirty = {
                let mut state = lock_state(&state);
                state.form.name.clone_from(&name);
                state.dirty()
            };
            tracing::info!(%name, "pump name refreshed");
            events.publish(FormChange::NameRefreshed {
                name: name.clone(),
                dirty,
            });
            Ok(RefreshOutcome::Applied(name))
        });

        Ok(RefreshHandle { task })
    }

    /// Idle → Running.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::InvalidState`] unless the pump is idle.
    #[tracing::instrument(skip(self))]
    pub fn start(&self) -> Result<FormView, PumpSimError> {
        self.transition(OperationalStatus::start)
    }

    /// Running → Idle.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::InvalidState`] unless the pump is running.
    #[tracing::instrument(skip(self))]
    pub fn stop(&self) -> Result<FormView, PumpSimError> {
        self.transition(OperationalStatus::stop)
    }

    /// Loading → Idle, optionally installing a freshly fetched baseline.
    ///
    /// The status change and the new baseline land under one lock, so no edit
    /// can slip in between them.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::InvalidState`] unless the controller is loading.
    #[tracing::instrument(skip(self, baseline))]
    pub fn finish_loading(
        &self,
        baseline: Option<ConfigurationForm>,
    ) -> Result<FormView, PumpSimError> {
        let replaced = baseline.is_some();
        let (from, view) = {
            let mut state = self.lock();
            let from = state.status;
            state.status = from.finish_loading()?;
            if let Some(form) = baseline {
                state.baseline = form.clone();
                state.form = form;
            }
            (from, state.view())
        };
        tracing::info!(%from, to = %view.status, replaced, "initial configuration loaded");
        self.events.publish(FormChange::StatusChanged {
            from,
            to: view.status,
        });
        if replaced {
            self.events.publish(FormChange::BaselineReplaced);
        }
        Ok(view)
    }

    fn transition(
        &self,
        step: impl FnOnce(OperationalStatus) -> Result<OperationalStatus, InvalidStateError>,
    ) -> Result<FormView, PumpSimError> {
        let (from, view) = {
            let mut state = self.lock();
            let from = state.status;
            state.status = step(from)?;
            (from, state.view())
        };
        tracing::info!(%from, to = %view.status, "operational status changed");
        self.events.publish(FormChange::StatusChanged {
            from,
            to: view.status,
        });
        Ok(view)
    }

    /// Replace both the current values and the baseline, e.g. with a freshly
    /// fetched configuration. Clears the dirty flag.
    pub fn replace_baseline(&self, form: ConfigurationForm) -> FormView {
        let view = {
            let mut state = self.lock();
            state.baseline = form.clone();
            state.form = form;
            state.view()
        };
        self.events.publish(FormChange::BaselineReplaced);
        view
    }

    /// Discard unsaved edits.
    pub fn reset(&self) -> FormView {
        let view = {
            let mut state = self.lock();
            state.form = state.baseline.clone();
            state.view()
        };
        self.events.publish(FormChange::Reset);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pumpsim_domain::error::ValidationError;
    use pumpsim_domain::form::{BatteryThreshold, PumpType, ReservoirLevel};
    use pumpsim_domain::status::StatusAction;
    use std::collections::VecDeque;
    use std::future::Future;
    use tokio::sync::Notify;

    /// Hands out names from a queue, optionally waiting for a signal first.
    #[derive(Default)]
    struct QueuedNames {
        names: Mutex<VecDeque<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl QueuedNames {
        fn with(names: &[&str]) -> Self {
            Self {
                names: Mutex::new(names.iter().map(ToString::to_string).collect()),
                gate: None,
            }
        }

        fn gated(names: &[&str], gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::with(names)
            }
        }
    }

    impl NameProvider for QueuedNames {
        fn request_name(&self) -> impl Future<Output = Result<String, PumpSimError>> + Send {
            let next = self.names.lock().unwrap().pop_front();
            let gate = self.gate.clone();
            async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                next.ok_or_else(|| CollaboratorError::failed(NAMING_SERVICE, "no names left").into())
            }
        }
    }

    struct NeverAnswers;

    impl NameProvider for NeverAnswers {
        fn request_name(&self) -> impl Future<Output = Result<String, PumpSimError>> + Send {
            std::future::pending()
        }
    }

    #[derive(Default)]
    struct RecordingApplier {
        applied: Mutex<Vec<FormSnapshot>>,
        fail: bool,
    }

    impl ConfigApplier for RecordingApplier {
        fn apply(
            &self,
            snapshot: FormSnapshot,
        ) -> impl Future<Output = Result<(), PumpSimError>> + Send {
            let result = if self.fail {
                Err(CollaboratorError::failed("pump", "unreachable").into())
            } else {
                self.applied.lock().unwrap().push(snapshot);
                Ok(())
            };
            async move { result }
        }
    }

    fn make_controller() -> FormController<QueuedNames, RecordingApplier> {
        FormController::new(QueuedNames::with(&["UHH00002TI"]), RecordingApplier::default())
    }

    fn reservoir(units: i64) -> FieldUpdate {
        FieldUpdate::ReservoirLevel(ReservoirLevel::clamped(units))
    }

    #[test]
    fn should_start_idle_clean_with_defaults() {
        let ctrl = make_controller();
        let view = ctrl.view();
        assert_eq!(view.form, ConfigurationForm::default());
        assert_eq!(view.status, OperationalStatus::Idle);
        assert!(!view.dirty);
        assert!(!view.can_submit);
    }

    #[test]
    fn should_become_dirty_when_field_differs_from_baseline() {
        let ctrl = make_controller();
        let view = ctrl.set_field(reservoir(150));
        assert!(view.dirty);
        assert!(view.can_submit);
    }

    #[test]
    fn should_become_clean_again_when_edit_is_reverted() {
        let ctrl = make_controller();
        ctrl.set_field(FieldUpdate::PumpType(PumpType::Wired));
        let view = ctrl.set_field(FieldUpdate::PumpType(PumpType::Wireless));
        assert!(!view.dirty);
    }

    #[test]
    fn should_stay_clean_when_field_set_to_current_value() {
        let ctrl = make_controller();
        let view = ctrl.set_field(FieldUpdate::BatteryThreshold(BatteryThreshold::Full));
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn should_submit_snapshot_and_clear_dirty() {
        let ctrl = make_controller();
        ctrl.set_field(reservoir(150));

        let snapshot = ctrl.submit().await.unwrap();

        assert_eq!(snapshot.form().reservoir_level.units(), 150);
        assert_eq!(snapshot.form().pump_type, PumpType::Wireless);
        assert_eq!(snapshot.form().battery_threshold, BatteryThreshold::Full);
        assert_eq!(snapshot.form().name, "");
        assert!(!ctrl.is_dirty());
        assert_eq!(ctrl.applier.applied.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_return_snapshot_equal_to_current_values() {
        let ctrl = make_controller();
        ctrl.set_field(FieldUpdate::PumpType(PumpType::Wired));
        ctrl.set_field(FieldUpdate::BatteryThreshold(BatteryThreshold::Half));

        let snapshot = ctrl.submit().await.unwrap();
        assert_eq!(snapshot.form(), &ctrl.view().form);
    }

    #[tokio::test]
    async fn should_reject_submit_when_pump_type_unset() {
        let ctrl = make_controller();
        ctrl.set_field(FieldUpdate::PumpType(PumpType::Unset));

        let result = ctrl.submit().await;

        assert!(matches!(
            result,
            Err(PumpSimError::Validation(ValidationError::UnsetPumpType))
        ));
        assert!(ctrl.is_dirty());
        assert!(ctrl.applier.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_keep_dirty_when_applier_fails() {
        let ctrl = FormController::new(
            QueuedNames::default(),
            RecordingApplier {
                fail: true,
                ..RecordingApplier::default()
            },
        );
        ctrl.set_field(reservoir(10));

        let result = ctrl.submit().await;

        assert!(matches!(result, Err(PumpSimError::Collaborator(_))));
        assert!(ctrl.is_dirty());
    }

    #[tokio::test]
    async fn should_allow_submit_when_clean() {
        let ctrl = make_controller();
        let snapshot = ctrl.submit().await.unwrap();
        assert_eq!(snapshot.form(), &ConfigurationForm::default());
    }

    #[test]
    fn should_start_from_idle_and_stop_from_running() {
        let ctrl = make_controller();
        assert_eq!(ctrl.start().unwrap().status, OperationalStatus::Running);
        assert_eq!(ctrl.stop().unwrap().status, OperationalStatus::Idle);
    }

    #[test]
    fn should_reject_start_while_running() {
        let ctrl = make_controller();
        ctrl.start().unwrap();
        assert!(matches!(
            ctrl.start(),
            Err(PumpSimError::InvalidState(InvalidStateError {
                action: StatusAction::Start,
                status: OperationalStatus::Running,
            }))
        ));
    }

    #[test]
    fn should_reject_stop_while_idle() {
        let ctrl = make_controller();
        assert!(matches!(ctrl.stop(), Err(PumpSimError::InvalidState(_))));
    }

    #[test]
    fn should_reject_start_and_stop_while_loading() {
        let ctrl = FormController::loading(QueuedNames::default(), RecordingApplier::default());
        assert!(ctrl.start().is_err());
        assert!(ctrl.stop().is_err());
        assert_eq!(ctrl.status(), OperationalStatus::Loading);
    }

    #[test]
    fn should_finish_loading_with_fetched_baseline() {
        let ctrl = FormController::loading(QueuedNames::default(), RecordingApplier::default());
        let fetched = ConfigurationForm::builder()
            .name("ABC12345DE")
            .reservoir_level(80)
            .build()
            .unwrap();

        let view = ctrl.finish_loading(Some(fetched.clone())).unwrap();

        assert_eq!(view.status, OperationalStatus::Idle);
        assert_eq!(view.form, fetched);
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn should_publish_status_then_baseline_when_loading_finishes() {
        let ctrl = FormController::loading(QueuedNames::default(), RecordingApplier::default());
        let mut rx = ctrl.subscribe();
        let fetched = ConfigurationForm::builder().reservoir_level(10).build().unwrap();

        ctrl.finish_loading(Some(fetched)).unwrap();

        assert_eq!(
            rx.recv().await.unwrap().change,
            FormChange::StatusChanged {
                from: OperationalStatus::Loading,
                to: OperationalStatus::Idle,
            }
        );
        assert_eq!(rx.recv().await.unwrap().change, FormChange::BaselineReplaced);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn should_keep_form_untouched_when_finish_loading_is_refused() {
        let ctrl = make_controller();
        ctrl.set_field(FieldUpdate::ReservoirLevel(ReservoirLevel::clamped(42)));
        let fetched = ConfigurationForm::builder().reservoir_level(10).build().unwrap();

        assert!(ctrl.finish_loading(Some(fetched)).is_err());

        let view = ctrl.view();
        assert_eq!(view.form.reservoir_level.units(), 42);
        assert!(view.dirty);
    }

    #[test]
    fn should_reject_finish_loading_when_already_idle() {
        let ctrl = make_controller();
        assert!(ctrl.finish_loading(None).is_err());
    }

    #[test]
    fn should_refuse_refresh_while_running() {
        let ctrl = make_controller();
        ctrl.start().unwrap();

        let result = ctrl.request_refresh_name();

        assert!(matches!(
            result,
            Err(PumpSimError::InvalidState(InvalidStateError {
                action: StatusAction::RefreshName,
                status: OperationalStatus::Running,
            }))
        ));
    }

    #[test]
    fn should_refuse_refresh_while_loading() {
        let ctrl = FormController::loading(QueuedNames::default(), RecordingApplier::default());
        assert!(matches!(
            ctrl.request_refresh_name(),
            Err(PumpSimError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn should_apply_refreshed_name_when_idle() {
        let ctrl = make_controller();

        let outcome = ctrl.request_refresh_name().unwrap().outcome().await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Applied("UHH00002TI".to_string()));
        let view = ctrl.view();
        assert_eq!(view.form.name, "UHH00002TI");
        assert!(view.dirty);
    }

    #[tokio::test]
    async fn should_let_last_answer_win() {
        let ctrl = FormController::new(
            QueuedNames::with(&["AAA11111AA", "BBB22222BB"]),
            RecordingApplier::default(),
        );

        let first = ctrl.request_refresh_name().unwrap();
        first.outcome().await.unwrap();
        let second = ctrl.request_refresh_name().unwrap();
        second.outcome().await.unwrap();

        assert_eq!(ctrl.view().form.name, "BBB22222BB");
    }

    #[tokio::test]
    async fn should_discard_name_when_controller_dropped() {
        let gate = Arc::new(Notify::new());
        let ctrl = FormController::new(
            QueuedNames::gated(&["LATE0000NM"], Arc::clone(&gate)),
            RecordingApplier::default(),
        );
        let handle = ctrl.request_refresh_name().unwrap();

        drop(ctrl);
        gate.notify_one();

        assert_eq!(handle.outcome().await.unwrap(), RefreshOutcome::Discarded);
    }

    #[tokio::test]
    async fn should_time_out_slow_naming_service() {
        let ctrl = FormController::new(NeverAnswers, RecordingApplier::default())
            .with_naming_timeout(Duration::from_millis(20));

        let result = ctrl.request_refresh_name().unwrap().outcome().await;

        assert!(matches!(
            result,
            Err(PumpSimError::Collaborator(CollaboratorError::Timeout { .. }))
        ));
        assert_eq!(ctrl.view().form.name, "");
    }

    #[tokio::test]
    async fn should_report_naming_failure() {
        let ctrl = FormController::new(QueuedNames::default(), RecordingApplier::default());
        let result = ctrl.request_refresh_name().unwrap().outcome().await;
        assert!(matches!(
            result,
            Err(PumpSimError::Collaborator(CollaboratorError::Failed { .. }))
        ));
    }

    #[test]
    fn should_reset_edits_to_baseline() {
        let ctrl = make_controller();
        ctrl.set_field(FieldUpdate::Name("edited".to_string()));
        let view = ctrl.reset();
        assert_eq!(view.form.name, "");
        assert!(!view.dirty);
    }

    #[test]
    fn should_replace_baseline_and_clear_dirty() {
        let ctrl = make_controller();
        ctrl.set_field(reservoir(5));
        let fetched = ConfigurationForm::builder().reservoir_level(200).build().unwrap();

        let view = ctrl.replace_baseline(fetched);

        assert_eq!(view.form.reservoir_level.units(), 200);
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn should_notify_subscribers_of_changes() {
        let ctrl = make_controller();
        let mut rx = ctrl.subscribe();

        ctrl.set_field(reservoir(150));
        ctrl.start().unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first.change,
            FormChange::FieldChanged {
                field: pumpsim_domain::form::FormField::ReservoirLevel,
                dirty: true,
            }
        );
        let second = rx.recv().await.unwrap();
        assert_eq!(
            second.change,
            FormChange::StatusChanged {
                from: OperationalStatus::Idle,
                to: OperationalStatus::Running,
            }
        );
    }

    #[tokio::test]
    async fn should_walk_through_edit_submit_start_scenario() {
        let ctrl = make_controller();
        assert!(!ctrl.is_dirty());

        ctrl.set_field(reservoir(150));
        assert!(ctrl.is_dirty());

        let snapshot = ctrl.submit().await.unwrap();
        assert_eq!(snapshot.form().reservoir_level.units(), 150);
        assert!(!ctrl.is_dirty());

        ctrl.start().unwrap();
        assert!(matches!(
            ctrl.request_refresh_name(),
            Err(PumpSimError::InvalidState(_))
        ));
    }
}
