use crate::core::compensation;
use crate::core::schedule::{MIN_DURATION_MINUTES, MIN_LEAD_MINUTES};
use crate::domain::model::{GigDraft, GigLocation};
use crate::domain::steps::{GigField, GigStep};
use chrono::{DateTime, Duration, FixedOffset};
use std::collections::BTreeMap;

/// 欄位錯誤：每個欄位只保留第一個訊息，依欄位順序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, String>);

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn single(field: F, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn first(&self) -> Option<(F, &str)> {
        self.0.iter().next().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result<T>(self, ok: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(ok)
        } else {
            Err(self)
        }
    }
}

impl<F: Ord + Copy> Default for FieldErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// A step's data after its own schema approved it. Only the validators in this
/// module construct one, so the wizard never merges unchecked input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStep {
    step: GigStep,
    patch: GigDraft,
}

impl ValidatedStep {
    pub fn step(&self) -> GigStep {
        self.step
    }

    pub fn patch(&self) -> &GigDraft {
        &self.patch
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTimeInput {
    pub location: Option<GigLocation>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub time_zone: String,
}

/// Raw form state for one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    Title(String),
    Description(String),
    Labels(Vec<String>),
    LocationTime(LocationTimeInput),
    Compensation(String),
}

impl StepInput {
    pub fn step(&self) -> GigStep {
        match self {
            StepInput::Title(_) => GigStep::Title,
            StepInput::Description(_) => GigStep::Description,
            StepInput::Labels(_) => GigStep::Labels,
            StepInput::LocationTime(_) => GigStep::LocationTime,
            StepInput::Compensation(_) => GigStep::Compensation,
        }
    }
}

pub fn validate_step(
    input: &StepInput,
    now: DateTime<FixedOffset>,
) -> Result<ValidatedStep, FieldErrors<GigField>> {
    let mut errors = FieldErrors::new();
    let mut patch = GigDraft::default();

    match input {
        StepInput::Title(raw) => match check_title(raw) {
            Ok(title) => patch.title = Some(title),
            Err(msg) => errors.insert(GigField::Title, msg),
        },
        StepInput::Description(raw) => match check_description(raw) {
            Ok(description) => patch.description = Some(description),
            Err(msg) => errors.insert(GigField::Description, msg),
        },
        StepInput::Labels(labels) => match check_labels(labels) {
            Ok(labels) => patch.labels = Some(labels),
            Err(msg) => errors.insert(GigField::Labels, msg),
        },
        StepInput::LocationTime(input) => {
            check_location_time(input, &mut errors, &mut patch);
            if let Some(start) = input.start {
                if start < now + Duration::minutes(MIN_LEAD_MINUTES) {
                    errors.insert(
                        GigField::StartDateTime,
                        "Start time must be at least 30 minutes from now",
                    );
                }
            }
        }
        StepInput::Compensation(raw) => match compensation::parse(raw) {
            Ok(amount) => patch.compensation = Some(amount),
            Err(msg) => errors.insert(GigField::Compensation, msg),
        },
    }

    errors.into_result(ValidatedStep {
        step: input.step(),
        patch,
    })
}

/// 整份草稿一次驗證（review 使用）
pub fn validate_gig(
    draft: &GigDraft,
    now: DateTime<FixedOffset>,
) -> Result<(), FieldErrors<GigField>> {
    let mut errors = FieldErrors::new();

    match draft.title.as_deref() {
        Some(raw) => {
            if let Err(msg) = check_title(raw) {
                errors.insert(GigField::Title, msg);
            }
        }
        None => errors.insert(GigField::Title, "Title is required"),
    }

    match draft.description.as_deref() {
        Some(raw) => {
            if let Err(msg) = check_description(raw) {
                errors.insert(GigField::Description, msg);
            }
        }
        None => errors.insert(GigField::Description, "Description is required"),
    }

    if let Err(msg) = check_labels(draft.labels.as_deref().unwrap_or_default()) {
        errors.insert(GigField::Labels, msg);
    }

    let schedule = LocationTimeInput {
        location: draft.location.clone(),
        start: draft.start_date_time,
        end: draft.end_date_time,
        time_zone: draft.time_zone.clone().unwrap_or_default(),
    };
    check_location_time(&schedule, &mut errors, &mut GigDraft::default());
    if let Some(start) = draft.start_date_time {
        if start <= now {
            errors.insert(GigField::StartDateTime, "Start date and time must be in the future");
        }
    }

    match draft.compensation {
        Some(amount) => {
            if let Err(msg) = compensation::check_amount(amount) {
                errors.insert(GigField::Compensation, msg);
            }
        }
        None => errors.insert(GigField::Compensation, compensation::REQUIRED_MESSAGE),
    }

    errors.into_result(())
}

fn check_title(raw: &str) -> Result<String, String> {
    let title = raw.trim();
    let len = title.chars().count();
    if len < 3 {
        return Err("Title must be at least 3 characters long".to_string());
    }
    if len > 100 {
        return Err("Title must be at most 100 characters long".to_string());
    }
    Ok(title.to_string())
}

fn check_description(raw: &str) -> Result<String, String> {
    let description = raw.trim();
    if description.chars().count() < 50 {
        return Err("Description must be at least 50 characters long".to_string());
    }
    Ok(description.to_string())
}

fn check_labels(labels: &[String]) -> Result<Vec<String>, String> {
    let mut kept: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() || kept.iter().any(|k| k.eq_ignore_ascii_case(label)) {
            continue;
        }
        kept.push(label.to_string());
    }

    if kept.is_empty() {
        return Err("At least one label is required".to_string());
    }
    Ok(kept)
}

fn check_location(location: &GigLocation) -> Result<(), String> {
    let venue = match location {
        GigLocation::Virtual => return Ok(()),
        GigLocation::Physical { venue } => venue,
    };

    let name_len = venue.name.trim().chars().count();
    if name_len == 0 {
        return Err("Venue name is required".to_string());
    }
    if name_len < 3 {
        return Err("Venue name must be at least 3 characters long".to_string());
    }
    if name_len > 100 {
        return Err("Venue name must be at most 100 characters long".to_string());
    }
    if venue.location.country.trim().is_empty() {
        return Err("Country is required".to_string());
    }
    if venue.location.state_region.trim().is_empty() {
        return Err("State/Region is required".to_string());
    }
    if venue.location.city.trim().is_empty() {
        return Err("City is required".to_string());
    }
    Ok(())
}

fn check_location_time(
    input: &LocationTimeInput,
    errors: &mut FieldErrors<GigField>,
    patch: &mut GigDraft,
) {
    match &input.location {
        Some(location) => match check_location(location) {
            Ok(()) => patch.location = Some(location.clone()),
            Err(msg) => errors.insert(GigField::Location, msg),
        },
        None => errors.insert(GigField::Location, "Add a physical or virtual location"),
    }

    match input.start {
        Some(start) => patch.start_date_time = Some(start),
        None => errors.insert(GigField::StartDateTime, "Start date and time is required"),
    }

    match input.end {
        Some(end) => {
            if let Some(start) = input.start {
                if end < start + Duration::minutes(MIN_DURATION_MINUTES) {
                    errors.insert(
                        GigField::EndDateTime,
                        "End time must be at least 15 minutes after the start time",
                    );
                }
            }
            patch.end_date_time = Some(end);
        }
        None => errors.insert(GigField::EndDateTime, "End date and time is required"),
    }

    let time_zone = input.time_zone.trim();
    if time_zone.is_empty() {
        errors.insert(GigField::TimeZone, "Time zone is required");
    } else {
        patch.time_zone = Some(time_zone.to_string());
    }
}

/// Re-validated on every change; `is_valid` drives the Next control.
#[derive(Debug, Clone)]
pub struct StepForm {
    input: StepInput,
    result: Result<ValidatedStep, FieldErrors<GigField>>,
}

impl StepForm {
    pub fn new(input: StepInput, now: DateTime<FixedOffset>) -> Self {
        let result = validate_step(&input, now);
        Self { input, result }
    }

    pub fn change(&mut self, input: StepInput, now: DateTime<FixedOffset>) {
        self.result = validate_step(&input, now);
        self.input = input;
    }

    pub fn input(&self) -> &StepInput {
        &self.input
    }

    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }

    pub fn errors(&self) -> Option<&FieldErrors<GigField>> {
        self.result.as_ref().err()
    }

    pub fn submit(self) -> Result<ValidatedStep, FieldErrors<GigField>> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Geolocation, Venue};
    use rust_decimal::Decimal;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        at("2026-10-18T10:07:00+03:00")
    }

    fn venue(name: &str) -> GigLocation {
        GigLocation::Physical {
            venue: Venue {
                place_id: "ChIJ".to_string(),
                name: name.to_string(),
                address: "Harambee Ave".to_string(),
                location: Geolocation {
                    country: "Kenya".to_string(),
                    state_region: "Nairobi County".to_string(),
                    city: "Nairobi".to_string(),
                },
            },
        }
    }

    #[test]
    fn test_title_patch_only_carries_title() {
        let validated = validate_step(&StepInput::Title("  Pitch my idea ".to_string()), now()).unwrap();
        assert_eq!(validated.step(), GigStep::Title);
        assert_eq!(validated.patch().title.as_deref(), Some("Pitch my idea"));
        assert!(validated.patch().description.is_none());
    }

    #[test]
    fn test_title_length_rules() {
        let errors = validate_step(&StepInput::Title("ab".to_string()), now()).unwrap_err();
        assert_eq!(
            errors.get(GigField::Title),
            Some("Title must be at least 3 characters long")
        );
        assert!(validate_step(&StepInput::Title("x".repeat(101)), now()).is_err());
    }

    #[test]
    fn test_description_minimum() {
        assert!(validate_step(&StepInput::Description("short".to_string()), now()).is_err());
        assert!(validate_step(&StepInput::Description("d".repeat(50)), now()).is_ok());
    }

    #[test]
    fn test_labels_dedupe_and_require_one() {
        let validated = validate_step(
            &StepInput::Labels(vec!["Pitch".into(), "pitch".into(), " ".into(), "startup".into()]),
            now(),
        )
        .unwrap();
        assert_eq!(
            validated.patch().labels,
            Some(vec!["Pitch".to_string(), "startup".to_string()])
        );
        assert!(validate_step(&StepInput::Labels(vec![]), now()).is_err());
    }

    #[test]
    fn test_location_time_cross_field_rules() {
        let input = LocationTimeInput {
            location: Some(GigLocation::Virtual),
            start: Some(at("2026-10-18T10:20:00+03:00")),
            end: Some(at("2026-10-18T10:25:00+03:00")),
            time_zone: "Africa/Nairobi".to_string(),
        };
        let errors = validate_step(&StepInput::LocationTime(input), now()).unwrap_err();
        assert!(errors.get(GigField::StartDateTime).is_some());
        assert!(errors.get(GigField::EndDateTime).is_some());
        assert!(errors.get(GigField::Location).is_none());
    }

    #[test]
    fn test_location_time_valid_patch() {
        let input = LocationTimeInput {
            location: Some(venue("KICC")),
            start: Some(at("2026-10-20T09:00:00+03:00")),
            end: Some(at("2026-10-20T16:00:00+03:00")),
            time_zone: "Africa/Nairobi".to_string(),
        };
        let validated = validate_step(&StepInput::LocationTime(input), now()).unwrap();
        let patch = validated.patch();
        assert!(patch.location.is_some());
        assert_eq!(patch.time_zone.as_deref(), Some("Africa/Nairobi"));
        assert!(patch.title.is_none() && patch.compensation.is_none());
    }

    #[test]
    fn test_venue_rules() {
        let input = LocationTimeInput {
            location: Some(venue("KI")),
            start: Some(at("2026-10-20T09:00:00+03:00")),
            end: Some(at("2026-10-20T16:00:00+03:00")),
            time_zone: "Africa/Nairobi".to_string(),
        };
        let errors = validate_step(&StepInput::LocationTime(input), now()).unwrap_err();
        assert_eq!(
            errors.get(GigField::Location),
            Some("Venue name must be at least 3 characters long")
        );
    }

    #[test]
    fn test_compensation_sanitized_before_coercion() {
        let validated =
            validate_step(&StepInput::Compensation("12.345abc".to_string()), now()).unwrap();
        assert_eq!(validated.patch().compensation, Some(Decimal::new(1234, 2)));

        let errors = validate_step(&StepInput::Compensation(String::new()), now()).unwrap_err();
        assert_eq!(errors.get(GigField::Compensation), Some("This field is required"));
    }

    #[test]
    fn test_step_form_tracks_validity_on_change() {
        let mut form = StepForm::new(StepInput::Title(String::new()), now());
        assert!(!form.is_valid());
        assert!(form.errors().is_some());

        form.change(StepInput::Title("Network at the summit".to_string()), now());
        assert!(form.is_valid());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_whole_gig_errors_in_field_order() {
        let draft = GigDraft {
            title: Some("Pitch my idea".to_string()),
            description: Some("d".repeat(60)),
            ..Default::default()
        };
        let errors = validate_gig(&draft, now()).unwrap_err();
        assert_eq!(errors.first().map(|(f, _)| f), Some(GigField::Labels));
        assert!(errors.get(GigField::Compensation).is_some());
    }

    #[test]
    fn test_whole_gig_rejects_past_start() {
        let draft = GigDraft {
            title: Some("Pitch my idea".to_string()),
            description: Some("d".repeat(60)),
            labels: Some(vec!["pitch".to_string()]),
            location: Some(GigLocation::Virtual),
            start_date_time: Some(at("2026-10-18T09:00:00+03:00")),
            end_date_time: Some(at("2026-10-18T12:00:00+03:00")),
            time_zone: Some("Africa/Nairobi".to_string()),
            compensation: Some(Decimal::new(50, 0)),
        };
        let errors = validate_gig(&draft, now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|(f, _)| f), Some(GigField::StartDateTime));
    }

    fn complete_draft(compensation: Decimal) -> GigDraft {
        GigDraft {
            title: Some("Pitch my idea".to_string()),
            description: Some("d".repeat(60)),
            labels: Some(vec!["pitch".to_string()]),
            location: Some(GigLocation::Virtual),
            start_date_time: Some(at("2026-10-20T09:00:00+03:00")),
            end_date_time: Some(at("2026-10-20T12:00:00+03:00")),
            time_zone: Some("Africa/Nairobi".to_string()),
            compensation: Some(compensation),
        }
    }

    #[test]
    fn test_whole_gig_rejects_out_of_range_stored_compensation() {
        assert!(validate_gig(&complete_draft(Decimal::new(50, 0)), now()).is_ok());
        assert!(validate_gig(&complete_draft(compensation::MAX_COMPENSATION), now()).is_ok());

        // 負數不可被當成正數通過
        let errors = validate_gig(&complete_draft(Decimal::new(-50, 0)), now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(GigField::Compensation), Some("Must be at least $5"));

        let errors = validate_gig(&complete_draft(Decimal::new(499, 2)), now()).unwrap_err();
        assert_eq!(errors.get(GigField::Compensation), Some("Must be at least $5"));

        let errors = validate_gig(&complete_draft(Decimal::new(100000001, 2)), now()).unwrap_err();
        assert_eq!(
            errors.get(GigField::Compensation),
            Some("Must be at most $1,000,000")
        );
    }
}
