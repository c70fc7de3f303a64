use crate::core::compensation;
use crate::core::draft_store::{DraftStore, GIG_DRAFT_KEY};
use crate::core::schedule::Schedule;
use crate::core::sequencer::compute_redirect;
use crate::core::validators::{LocationTimeInput, StepInput, ValidatedStep};
use crate::domain::model::GigDraft;
use crate::domain::ports::KeyValueStore;
use crate::domain::steps::{GigField, GigStep, Route, GIG_STEPS};
use chrono::{DateTime, FixedOffset};

/// Wizard state. Only the sequencer decides a redirect; the controller just
/// records it and hands it to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Resolving,
    Editing(GigStep),
    Redirecting(Route),
}

/// 交給路由器執行的導覽動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Push(Route),
    /// Replaces the current history entry so Back does not bounce into a redirect loop.
    Replace(Route),
}

impl Navigation {
    pub fn target(&self) -> Option<Route> {
        match self {
            Navigation::Stay => None,
            Navigation::Push(route) | Navigation::Replace(route) => Some(*route),
        }
    }
}

pub struct GigWizard<S: KeyValueStore> {
    store: DraftStore<S>,
    key: String,
    draft: GigDraft,
    state: WizardState,
}

impl<S: KeyValueStore> GigWizard<S> {
    pub fn new(store: DraftStore<S>) -> Self {
        Self::with_key(store, GIG_DRAFT_KEY)
    }

    pub fn with_key(store: DraftStore<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let draft = store.load(&key, GigDraft::default());
        tracing::debug!("📂 Loaded gig draft '{}' (empty: {})", key, draft.is_empty());

        Self {
            store,
            key,
            draft,
            state: WizardState::Resolving,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn draft(&self) -> &GigDraft {
        &self.draft
    }

    pub fn current_step(&self) -> Option<GigStep> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            _ => None,
        }
    }

    /// (current screen, total screens) for the progress indicator.
    pub fn progress(&self) -> (usize, usize) {
        let current = self.current_step().map(|s| s.index()).unwrap_or(1);
        (current, GigStep::SCREEN_COUNT)
    }

    pub fn enter_step(&mut self, step: GigStep) -> Navigation {
        self.state = WizardState::Resolving;

        match compute_redirect(&GIG_STEPS, step.index(), &self.draft) {
            Some(route) => {
                tracing::debug!("↩️ Step {} incomplete prerequisites, redirecting to {}", step, route);
                self.state = WizardState::Redirecting(route);
                Navigation::Replace(route)
            }
            None => {
                tracing::debug!("📝 Editing step {} of {}", step.index(), GigStep::SCREEN_COUNT);
                self.state = WizardState::Editing(step);
                Navigation::Stay
            }
        }
    }

    /// Resolves a route the way a page mount would. The entry route always
    /// forwards to the first step; routes outside the gig steps are not
    /// owned by this wizard and leave the router where it is.
    pub fn enter_route(&mut self, route: Route) -> Navigation {
        match route {
            Route::GigEntry => {
                let first = GigStep::Title.route();
                self.state = WizardState::Redirecting(first);
                Navigation::Replace(first)
            }
            Route::GigStep(step) => self.enter_step(step),
            _ => Navigation::Stay,
        }
    }

    /// 合併已驗證的步驟資料並前往下一個畫面
    pub fn submit_step(&mut self, validated: ValidatedStep) -> Navigation {
        let step = validated.step();
        if self.current_step() != Some(step) {
            tracing::debug!("Submitting step {} while in state {:?}", step, self.state);
        }

        shallow_merge(&mut self.draft, validated.patch(), step.fields());

        // 寫入失敗仍繼續，重新載入時可能遺失此步驟
        if !self.store.save(&self.key, &self.draft) {
            tracing::warn!("⚠️ Step {} kept in memory only", step);
        }

        self.state = WizardState::Resolving;
        Navigation::Push(step.next_route())
    }

    /// Never validates and never mutates the draft.
    pub fn go_back(&mut self) -> Navigation {
        match self.current_step().and_then(|step| step.previous()) {
            Some(previous) => {
                self.state = WizardState::Resolving;
                Navigation::Push(previous.route())
            }
            None => Navigation::Stay,
        }
    }

    /// Form values to show when a step is opened, taken from the draft.
    pub fn initial_input(&self, step: GigStep, now: DateTime<FixedOffset>) -> StepInput {
        let draft = &self.draft;
        match step {
            GigStep::Title => StepInput::Title(draft.title.clone().unwrap_or_default()),
            GigStep::Description => {
                StepInput::Description(draft.description.clone().unwrap_or_default())
            }
            GigStep::Labels => StepInput::Labels(draft.labels.clone().unwrap_or_default()),
            GigStep::LocationTime => {
                let defaults = Schedule::default_for(now);
                StepInput::LocationTime(LocationTimeInput {
                    location: draft.location.clone(),
                    start: draft.start_date_time.or(Some(defaults.start)),
                    end: draft.end_date_time.or(Some(defaults.end)),
                    time_zone: draft.time_zone.clone().unwrap_or_default(),
                })
            }
            GigStep::Compensation => StepInput::Compensation(
                draft.compensation.map(compensation::format).unwrap_or_default(),
            ),
        }
    }

    /// Clears the persisted draft after publishing or when the user abandons it.
    pub fn discard(&mut self) {
        self.store.clear(&self.key);
        self.draft = GigDraft::default();
        self.state = WizardState::Resolving;
        tracing::info!("🗑️ Gig draft discarded");
    }
}

/// 只覆寫該步驟擁有的欄位
pub fn shallow_merge(draft: &mut GigDraft, patch: &GigDraft, fields: &[GigField]) {
    for field in fields {
        match field {
            GigField::Title => draft.title = patch.title.clone(),
            GigField::Description => draft.description = patch.description.clone(),
            GigField::Labels => draft.labels = patch.labels.clone(),
            GigField::Location => draft.location = patch.location.clone(),
            GigField::StartDateTime => draft.start_date_time = patch.start_date_time,
            GigField::EndDateTime => draft.end_date_time = patch.end_date_time,
            GigField::TimeZone => draft.time_zone = patch.time_zone.clone(),
            GigField::Compensation => draft.compensation = patch.compensation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::validators::validate_step;
    use crate::domain::model::GigLocation;
    use crate::utils::error::{Result, WizardError};
    use rust_decimal::Decimal;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-18T10:07:00+03:00").unwrap()
    }

    fn submit(wizard: &mut GigWizard<impl KeyValueStore>, input: StepInput) -> Navigation {
        let step = input.step();
        assert_eq!(wizard.enter_step(step), Navigation::Stay);
        let validated = validate_step(&input, now()).unwrap();
        wizard.submit_step(validated)
    }

    fn location_time() -> StepInput {
        StepInput::LocationTime(LocationTimeInput {
            location: Some(GigLocation::Virtual),
            start: Some(DateTime::parse_from_rfc3339("2026-10-20T09:00:00+03:00").unwrap()),
            end: Some(DateTime::parse_from_rfc3339("2026-10-20T16:00:00+03:00").unwrap()),
            time_zone: "Africa/Nairobi".to_string(),
        })
    }

    struct QuotaExceeded;

    impl KeyValueStore for QuotaExceeded {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(WizardError::StorageError {
                message: "quota exceeded".to_string(),
            })
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_full_sequence_reaches_review() {
        let storage = MemoryStorage::new();
        let mut wizard = GigWizard::new(DraftStore::new(&storage));

        assert_eq!(
            submit(&mut wizard, StepInput::Title("Pitch my startup".into())),
            Navigation::Push(Route::GigStep(GigStep::Description))
        );
        submit(&mut wizard, StepInput::Description("d".repeat(60)));
        submit(&mut wizard, StepInput::Labels(vec!["pitch".into()]));
        submit(&mut wizard, location_time());
        assert_eq!(
            submit(&mut wizard, StepInput::Compensation("250".into())),
            Navigation::Push(Route::GigReview)
        );

        // 重新載入後草稿仍在
        let reloaded = GigWizard::new(DraftStore::new(&storage));
        assert_eq!(reloaded.draft(), wizard.draft());
        assert_eq!(reloaded.draft().compensation, Some(Decimal::new(250, 0)));
    }

    #[test]
    fn test_entry_route_forwards_to_first_step() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        let nav = wizard.enter_route(Route::GigEntry);
        assert_eq!(nav, Navigation::Replace(Route::GigStep(GigStep::Title)));
        assert_eq!(
            wizard.state(),
            WizardState::Redirecting(Route::GigStep(GigStep::Title))
        );

        // 跟著導向後進入編輯
        let target = nav.target().unwrap();
        assert_eq!(wizard.enter_route(target), Navigation::Stay);
        assert_eq!(wizard.state(), WizardState::Editing(GigStep::Title));
    }

    #[test]
    fn test_step_route_goes_through_sequencer() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        let route = Route::from_path("/gigs/new/label").unwrap();
        assert_eq!(
            wizard.enter_route(route),
            Navigation::Replace(Route::GigStep(GigStep::Title))
        );

        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        let route = Route::from_path("/gigs/new/description").unwrap();
        assert_eq!(wizard.enter_route(route), Navigation::Stay);
        assert_eq!(wizard.current_step(), Some(GigStep::Description));
    }

    #[test]
    fn test_foreign_routes_do_not_redirect() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        for route in [Route::GigReview, Route::SignUpRole] {
            assert_eq!(wizard.enter_route(route), Navigation::Stay);
            assert_eq!(wizard.state(), WizardState::Resolving);
        }
    }

    #[test]
    fn test_entering_ahead_redirects_to_first_gap() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        let nav = wizard.enter_step(GigStep::Labels);
        assert_eq!(nav, Navigation::Replace(Route::GigStep(GigStep::Title)));
        assert_eq!(
            wizard.state(),
            WizardState::Redirecting(Route::GigStep(GigStep::Title))
        );
        assert_eq!(wizard.current_step(), None);
    }

    #[test]
    fn test_submit_only_touches_own_fields() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        submit(&mut wizard, StepInput::Description("d".repeat(60)));
        let before = wizard.draft().clone();

        wizard.enter_step(GigStep::Title);
        let retitled = validate_step(&StepInput::Title("Walk the expo".into()), now()).unwrap();
        wizard.submit_step(retitled);

        let after = wizard.draft();
        assert_eq!(after.title.as_deref(), Some("Walk the expo"));
        assert_eq!(after.description, before.description);
        assert_eq!(after.labels, before.labels);
        assert_eq!(after.compensation, before.compensation);
    }

    #[test]
    fn test_shallow_merge_ignores_foreign_fields_in_patch() {
        let mut draft = GigDraft {
            title: Some("Original".to_string()),
            ..Default::default()
        };
        let patch = GigDraft {
            title: Some("Replaced".to_string()),
            compensation: Some(Decimal::new(99, 0)),
            ..Default::default()
        };
        shallow_merge(&mut draft, &patch, GigStep::Compensation.fields());
        assert_eq!(draft.title.as_deref(), Some("Original"));
        assert_eq!(draft.compensation, Some(Decimal::new(99, 0)));
    }

    #[test]
    fn test_back_never_validates_or_mutates() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        wizard.enter_step(GigStep::Description);
        let before = wizard.draft().clone();

        assert_eq!(
            wizard.go_back(),
            Navigation::Push(Route::GigStep(GigStep::Title))
        );
        assert_eq!(wizard.draft(), &before);

        wizard.enter_step(GigStep::Title);
        assert_eq!(wizard.go_back(), Navigation::Stay);
    }

    #[test]
    fn test_persistence_failure_still_advances_in_memory() {
        let mut wizard = GigWizard::new(DraftStore::new(QuotaExceeded));
        let nav = submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        assert_eq!(nav, Navigation::Push(Route::GigStep(GigStep::Description)));
        assert_eq!(wizard.enter_step(GigStep::Description), Navigation::Stay);
    }

    #[test]
    fn test_discard_clears_everything() {
        let storage = MemoryStorage::new();
        let mut wizard = GigWizard::new(DraftStore::new(&storage));
        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        wizard.discard();

        assert!(wizard.draft().is_empty());
        assert_eq!(storage.get(GIG_DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn test_initial_input_prefills_from_draft() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));

        assert_eq!(
            wizard.initial_input(GigStep::Title, now()),
            StepInput::Title("Pitch my startup".into())
        );
        assert_eq!(
            wizard.initial_input(GigStep::Compensation, now()),
            StepInput::Compensation(String::new())
        );
        match wizard.initial_input(GigStep::LocationTime, now()) {
            StepInput::LocationTime(input) => {
                assert_eq!(input.start, Some(Schedule::default_for(now()).start));
            }
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_progress_counts_review_screen() {
        let mut wizard = GigWizard::new(DraftStore::new(MemoryStorage::new()));
        assert_eq!(wizard.progress(), (1, 6));
        submit(&mut wizard, StepInput::Title("Pitch my startup".into()));
        wizard.enter_step(GigStep::Description);
        assert_eq!(wizard.progress(), (2, 6));
    }
}
