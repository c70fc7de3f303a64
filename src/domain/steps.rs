//! Step tables and client-side routes for the gig-creation and sign-up wizards.

use crate::domain::model::{GigDraft, Role};
use std::fmt;

/// 客戶端路由，不經過伺服器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    GigEntry,
    GigStep(GigStep),
    GigReview,
    SignUpRole,
    SignUpForm,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::GigEntry => "/gigs/new",
            Route::GigStep(step) => step.path(),
            Route::GigReview => "/gigs/review",
            Route::SignUpRole => "/signup",
            Route::SignUpForm => "/signup/form",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "/gigs/new" => Some(Route::GigEntry),
            "/gigs/review" => Some(Route::GigReview),
            "/signup" => Some(Route::SignUpRole),
            "/signup/form" => Some(Route::SignUpForm),
            _ => GigStep::ALL
                .iter()
                .find(|step| step.path() == path)
                .map(|step| Route::GigStep(*step)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GigStep {
    Title = 1,
    Description = 2,
    Labels = 3,
    LocationTime = 4,
    Compensation = 5,
}

impl GigStep {
    pub const ALL: [GigStep; 5] = [
        GigStep::Title,
        GigStep::Description,
        GigStep::Labels,
        GigStep::LocationTime,
        GigStep::Compensation,
    ];

    /// Screens shown in the progress bar, review included.
    pub const SCREEN_COUNT: usize = 6;

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<GigStep> {
        GigStep::ALL.iter().copied().find(|step| step.index() == index)
    }

    pub fn path(&self) -> &'static str {
        match self {
            GigStep::Title => "/gigs/new/title",
            GigStep::Description => "/gigs/new/description",
            GigStep::Labels => "/gigs/new/label",
            GigStep::LocationTime => "/gigs/new/location-time",
            GigStep::Compensation => "/gigs/new/compensation",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GigStep::Title => "Title",
            GigStep::Description => "Description",
            GigStep::Labels => "Labels",
            GigStep::LocationTime => "Location & Time",
            GigStep::Compensation => "Compensation",
        }
    }

    pub fn fields(&self) -> &'static [GigField] {
        GIG_STEPS[self.index() - 1].fields
    }

    pub fn next(&self) -> Option<GigStep> {
        GigStep::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<GigStep> {
        GigStep::from_index(self.index() - 1)
    }

    pub fn route(&self) -> Route {
        Route::GigStep(*self)
    }

    /// 下一個畫面：最後一步之後是 review
    pub fn next_route(&self) -> Route {
        self.next().map(Route::GigStep).unwrap_or(Route::GigReview)
    }

    pub fn next_screen_name(&self) -> &'static str {
        self.next().map(|s| s.name()).unwrap_or("Review & Publish")
    }
}

impl fmt::Display for GigStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GigField {
    Title,
    Description,
    Labels,
    Location,
    StartDateTime,
    EndDateTime,
    TimeZone,
    Compensation,
}

impl GigField {
    pub const ALL: [GigField; 8] = [
        GigField::Title,
        GigField::Description,
        GigField::Labels,
        GigField::Location,
        GigField::StartDateTime,
        GigField::EndDateTime,
        GigField::TimeZone,
        GigField::Compensation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            GigField::Title => "title",
            GigField::Description => "description",
            GigField::Labels => "labels",
            GigField::Location => "location",
            GigField::StartDateTime => "startDateTime",
            GigField::EndDateTime => "endDateTime",
            GigField::TimeZone => "timeZone",
            GigField::Compensation => "compensation",
        }
    }

    /// 欄位到所屬步驟路由的靜態對照表
    pub fn owning_route(&self) -> Route {
        match self {
            GigField::Title => Route::GigStep(GigStep::Title),
            GigField::Description => Route::GigStep(GigStep::Description),
            GigField::Labels => Route::GigStep(GigStep::Labels),
            GigField::Location
            | GigField::StartDateTime
            | GigField::EndDateTime
            | GigField::TimeZone => Route::GigStep(GigStep::LocationTime),
            GigField::Compensation => Route::GigStep(GigStep::Compensation),
        }
    }
}

impl fmt::Display for GigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of a wizard's step table.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition<F: 'static> {
    pub index: usize,
    pub fields: &'static [F],
    pub route: Route,
}

/// Answers whether a draft carries a usable value for a field.
pub trait FieldPresence<F> {
    fn is_present(&self, field: F) -> bool;
}

pub const GIG_STEPS: [StepDefinition<GigField>; 5] = [
    StepDefinition {
        index: 1,
        fields: &[GigField::Title],
        route: Route::GigStep(GigStep::Title),
    },
    StepDefinition {
        index: 2,
        fields: &[GigField::Description],
        route: Route::GigStep(GigStep::Description),
    },
    StepDefinition {
        index: 3,
        fields: &[GigField::Labels],
        route: Route::GigStep(GigStep::Labels),
    },
    StepDefinition {
        index: 4,
        fields: &[
            GigField::Location,
            GigField::StartDateTime,
            GigField::EndDateTime,
            GigField::TimeZone,
        ],
        route: Route::GigStep(GigStep::LocationTime),
    },
    StepDefinition {
        index: 5,
        fields: &[GigField::Compensation],
        route: Route::GigStep(GigStep::Compensation),
    },
];

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl FieldPresence<GigField> for GigDraft {
    fn is_present(&self, field: GigField) -> bool {
        match field {
            GigField::Title => has_text(&self.title),
            GigField::Description => has_text(&self.description),
            GigField::Labels => self.labels.as_ref().is_some_and(|l| !l.is_empty()),
            GigField::Location => self.location.is_some(),
            GigField::StartDateTime => self.start_date_time.is_some(),
            GigField::EndDateTime => self.end_date_time.is_some(),
            GigField::TimeZone => has_text(&self.time_zone),
            GigField::Compensation => self.compensation.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignUpStepField {
    Role,
    Account,
}

/// 註冊流程的暫存狀態：僅角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignUpDraft {
    pub role: Option<Role>,
}

impl FieldPresence<SignUpStepField> for SignUpDraft {
    fn is_present(&self, field: SignUpStepField) -> bool {
        match field {
            SignUpStepField::Role => self.role.is_some(),
            // 帳號資料只在送出時存在，不會暫存
            SignUpStepField::Account => false,
        }
    }
}

pub const SIGN_UP_STEPS: [StepDefinition<SignUpStepField>; 2] = [
    StepDefinition {
        index: 1,
        fields: &[SignUpStepField::Role],
        route: Route::SignUpRole,
    },
    StepDefinition {
        index: 2,
        fields: &[SignUpStepField::Account],
        route: Route::SignUpForm,
    },
];
