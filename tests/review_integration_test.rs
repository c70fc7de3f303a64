use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use gig_wizard::core::draft_store::GIG_DRAFT_KEY;
use gig_wizard::core::reconciler::ReviewOrigin;
use gig_wizard::core::validators::{validate_step, LocationTimeInput, StepInput};
use gig_wizard::domain::model::GigLocation;
use gig_wizard::domain::ports::{FixedClock, KeyValueStore};
use gig_wizard::domain::steps::{GigField, GigStep, Route};
use gig_wizard::{
    ApiClient, DraftStore, FileStorage, GigWizard, Navigation, Reconciliation, ReviewReconciler,
    WizardError,
};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use std::time::Duration;
use tempfile::TempDir;

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-18T10:07:00+03:00").unwrap()
}

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn offline_api() -> Result<ApiClient> {
    Ok(ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1))?)
}

fn submit(wizard: &mut GigWizard<FileStorage>, input: StepInput) -> Navigation {
    let step = input.step();
    assert_eq!(wizard.enter_step(step), Navigation::Stay);
    let validated = validate_step(&input, now()).unwrap();
    wizard.submit_step(validated)
}

fn steps_one_to_three(wizard: &mut GigWizard<FileStorage>) {
    submit(wizard, StepInput::Title("Pitch deck rehearsal".to_string()));
    submit(
        wizard,
        StepInput::Description(
            "Sit in on a startup pitch rehearsal and give honest feedback afterwards.".to_string(),
        ),
    );
    submit(
        wizard,
        StepInput::Labels(vec!["pitch".to_string(), "startup".to_string()]),
    );
}

/// 完整流程：草稿寫入檔案，重新開啟後仍可進入 review
#[tokio::test]
async fn test_file_backed_wizard_reaches_review() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("drafts");

    {
        let mut wizard = GigWizard::new(DraftStore::new(FileStorage::new(&data_dir)));
        steps_one_to_three(&mut wizard);
    }

    // 新的程序從檔案讀回草稿
    let mut wizard = GigWizard::new(DraftStore::new(FileStorage::new(&data_dir)));
    assert_eq!(
        wizard.draft().labels,
        Some(vec!["pitch".to_string(), "startup".to_string()])
    );

    let nav = submit(
        &mut wizard,
        StepInput::LocationTime(LocationTimeInput {
            location: Some(GigLocation::Virtual),
            start: Some(at("2026-10-20T09:00:00+03:00")),
            end: Some(at("2026-10-20T16:00:00+03:00")),
            time_zone: "Africa/Nairobi".to_string(),
        }),
    );
    assert_eq!(nav, Navigation::Push(Route::GigStep(GigStep::Compensation)));

    let nav = submit(&mut wizard, StepInput::Compensation("250".to_string()));
    assert_eq!(nav, Navigation::Push(Route::GigReview));

    let store = DraftStore::new(FileStorage::new(&data_dir));
    let api = offline_api()?;
    let clock = FixedClock(now());
    let outcome = ReviewReconciler::new(&store, &api, &clock)
        .reconcile(None)
        .await?;

    match outcome {
        Reconciliation::Review(review) => {
            assert_eq!(review.origin, ReviewOrigin::Draft);
            assert_eq!(review.gig.compensation, Some(Decimal::new(250, 0)));
            assert_eq!(review.gig.time_zone.as_deref(), Some("Africa/Nairobi"));
        }
        other => panic!("expected review, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_review_redirects_to_first_incomplete_step() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut wizard = GigWizard::new(DraftStore::new(FileStorage::new(temp_dir.path())));
    submit(&mut wizard, StepInput::Title("Pitch deck rehearsal".to_string()));
    submit(
        &mut wizard,
        StepInput::Description(
            "Sit in on a startup pitch rehearsal and give honest feedback afterwards.".to_string(),
        ),
    );

    let store = DraftStore::new(FileStorage::new(temp_dir.path()));
    let api = offline_api()?;
    let clock = FixedClock(now());
    let outcome = ReviewReconciler::new(&store, &api, &clock)
        .reconcile(None)
        .await?;

    match outcome {
        Reconciliation::Redirect { route, issues } => {
            assert_eq!(route, Route::GigStep(GigStep::Labels));
            assert!(issues.get(GigField::Labels).is_some());
            assert!(issues.get(GigField::Compensation).is_some());
            assert!(issues.get(GigField::Title).is_none());
        }
        other => panic!("expected redirect, got {:?}", other),
    }

    // 直接開啟第 5 步也會被導回第 3 步
    let mut wizard = GigWizard::new(DraftStore::new(FileStorage::new(temp_dir.path())));
    assert_eq!(
        wizard.enter_step(GigStep::Compensation),
        Navigation::Replace(Route::GigStep(GigStep::Labels))
    );
    Ok(())
}

#[tokio::test]
async fn test_review_without_draft_goes_to_entry() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = DraftStore::new(FileStorage::new(temp_dir.path()));
    let api = offline_api()?;
    let clock = FixedClock(now());

    let outcome = ReviewReconciler::new(&store, &api, &clock)
        .reconcile(None)
        .await?;
    assert_eq!(outcome.redirect_route(), Some(Route::GigEntry));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_draft_file_falls_back_to_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = FileStorage::new(temp_dir.path());
    storage.set(GIG_DRAFT_KEY, "{not json")?;

    let mut wizard = GigWizard::new(DraftStore::new(FileStorage::new(temp_dir.path())));
    assert!(wizard.draft().is_empty());
    assert_eq!(
        wizard.enter_step(GigStep::Description),
        Navigation::Replace(Route::GigStep(GigStep::Title))
    );
    Ok(())
}

#[tokio::test]
async fn test_remote_review_is_fetched_from_backend() -> Result<()> {
    let server = MockServer::start();

    let review_mock = server.mock(|when, then| {
        when.method(GET).path("/api/gigs/42/review/");
        then.status(200).json_body(serde_json::json!({
            "id": 42,
            "title": "Trade show booth help",
            "description": "Help staff our booth at the regional trade show for one afternoon.",
            "labels": ["trade show"],
            "location": {
                "locationType": "physical",
                "venue": {
                    "google_place_id": "ChIJp0lN2HIRLxgRTJKXslQCz_c",
                    "name": "KICC",
                    "address": "Harambee Ave, Nairobi",
                    "location": {"country": "Kenya", "stateRegion": "Nairobi County", "city": "Nairobi"}
                }
            },
            "startDateTime": "2026-11-02T13:00:00+03:00",
            "endDateTime": "2026-11-02T18:00:00+03:00",
            "timeZone": "Africa/Nairobi",
            "compensation": "120.00"
        }));
    });

    // 本地沒有草稿也不影響遠端 review
    let temp_dir = TempDir::new()?;
    let store = DraftStore::new(FileStorage::new(temp_dir.path()));
    let api = ApiClient::new(&server.url("/api/"), Duration::from_secs(5))?;
    let clock = FixedClock(now());

    let outcome = ReviewReconciler::new(&store, &api, &clock)
        .reconcile(Some("42"))
        .await?;

    match outcome {
        Reconciliation::Review(review) => {
            assert_eq!(review.origin, ReviewOrigin::Remote("42".to_string()));
            assert_eq!(review.gig.title.as_deref(), Some("Trade show booth help"));
            assert_eq!(review.gig.compensation, Some(Decimal::new(12000, 2)));
            match review.gig.location {
                Some(GigLocation::Physical { venue }) => {
                    assert_eq!(venue.name, "KICC");
                    assert_eq!(venue.location.city, "Nairobi");
                }
                other => panic!("unexpected location {:?}", other),
            }
        }
        other => panic!("expected review, got {:?}", other),
    }

    review_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_remote_review_not_found() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/gigs/missing/review/");
        then.status(404).json_body(serde_json::json!({"detail": "Not found."}));
    });

    let temp_dir = TempDir::new()?;
    let store = DraftStore::new(FileStorage::new(temp_dir.path()));
    let api = ApiClient::new(&server.url("/api"), Duration::from_secs(5))?;
    let clock = FixedClock(now());

    let err = ReviewReconciler::new(&store, &api, &clock)
        .reconcile(Some("missing"))
        .await
        .unwrap_err();

    match err {
        WizardError::HttpStatusError { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body["detail"], "Not found.");
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}
