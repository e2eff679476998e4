// ABOUTME: Application controller owning the food log, profile, and goals snapshots
// ABOUTME: Coordinates onboarding, AI-assisted logging, views, and research over the pure core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

//! # Nutrition Tracker
//!
//! [`NutritionTracker`] is the single owner of mutable state. Every view is
//! computed by the pure functions in `calai_intelligence` over the current
//! snapshot; every mutation is persisted through the [`StateRepository`]
//! before it is committed in memory, so a failed save leaves the tracker
//! unchanged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use calai_core::constants::storage_keys;
use calai_core::models::{
    DailyGoals, EntryId, EstimateRequest, FoodEstimate, FoodLogEntry, MealType, PlanSource,
    ProfileInput, ResearchAnswer, ResolvedPlan, UserProfile,
};
use calai_intelligence::{
    analytics, build_context_summary, compare, compute_plan_or_default, group_history, sum_totals,
    AnalyticsRange, AnalyticsView, DayGroup, GoalComparison, Metric, NutrientTotals,
    NutritionLabel, PlanConfig, TimeWindow,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::advisor::NutritionAdvisor;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::store::{LogStore, StateRepository};

/// Today's intake against the goals
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    /// Local calendar date shown
    pub date: NaiveDate,
    /// Unrounded totals of the day
    pub totals: NutrientTotals,
    /// Progress against the goals
    pub comparison: GoalComparison,
    /// The day's entries, most recent first
    pub entries: Vec<&'a FoodLogEntry>,
}

/// Clears the in-flight flag when an estimation finishes or is abandoned
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> AppResult<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::request_in_flight())?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Top-level controller for a single user's nutrition data
pub struct NutritionTracker {
    repository: Arc<dyn StateRepository>,
    advisor: Option<Arc<dyn NutritionAdvisor>>,
    plan_config: PlanConfig,
    log: LogStore,
    profile: Option<UserProfile>,
    goals: DailyGoals,
    estimating: AtomicBool,
}

impl NutritionTracker {
    /// Load persisted state
    ///
    /// Missing goals start at the initial 2200 kcal plan.
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error if a snapshot cannot be read,
    /// or `ResourceAlreadyExists` if the stored log repeats an id.
    pub async fn load(
        repository: Arc<dyn StateRepository>,
        advisor: Option<Arc<dyn NutritionAdvisor>>,
        plan_config: PlanConfig,
    ) -> AppResult<Self> {
        let log = LogStore::from_entries(repository.load_logs().await?)?;
        let profile = repository.load_profile().await?;
        let goals = repository
            .load_goals()
            .await?
            .unwrap_or_else(DailyGoals::initial);

        info!(
            entries = log.len(),
            onboarded = profile.is_some(),
            collaborator = advisor.is_some(),
            "Nutrition tracker loaded"
        );

        Ok(Self {
            repository,
            advisor,
            plan_config,
            log,
            profile,
            goals,
            estimating: AtomicBool::new(false),
        })
    }

    /// No profile stored yet
    #[must_use]
    pub const fn needs_onboarding(&self) -> bool {
        self.profile.is_none()
    }

    /// Current profile
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Current goals
    #[must_use]
    pub const fn goals(&self) -> &DailyGoals {
        &self.goals
    }

    /// All entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[FoodLogEntry] {
        self.log.all()
    }

    /// Whether an AI collaborator is configured
    #[must_use]
    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    /// Whether an estimation is outstanding
    #[must_use]
    pub fn is_estimating(&self) -> bool {
        self.estimating.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Profile and goals
    // ------------------------------------------------------------------

    /// Validate the onboarding form, then store the profile and its plan
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input (nothing is stored) or
    /// a storage error if persisting fails.
    pub async fn complete_onboarding(&mut self, input: ProfileInput) -> AppResult<ResolvedPlan> {
        let profile = input.into_profile()?;
        self.set_profile(profile).await
    }

    /// Replace the profile and recompute the goals
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid profile or a storage error
    /// if persisting fails. A failed save leaves the previous profile and
    /// goals in place, in memory and in the repository.
    pub async fn set_profile(&mut self, profile: UserProfile) -> AppResult<ResolvedPlan> {
        profile.validate()?;
        let plan = self.resolve_plan(&profile).await;

        // Goals go first so a stored profile always has its own goals
        self.repository.save_goals(&plan.goals).await?;
        AppLogger::log_storage_operation("save", storage_keys::GOALS, true);
        if let Err(e) = self.repository.save_profile(&profile).await {
            AppLogger::log_storage_operation("save", storage_keys::PROFILE, false);
            if let Err(restore) = self.repository.save_goals(&self.goals).await {
                warn!(error = %restore, "Failed to restore previous goals");
            }
            return Err(e);
        }
        AppLogger::log_storage_operation("save", storage_keys::PROFILE, true);

        self.profile = Some(profile);
        self.goals = plan.goals.clone();
        Ok(plan)
    }

    /// Goals for a profile: collaborator first, then the local formula, then defaults
    pub async fn resolve_plan(&self, profile: &UserProfile) -> ResolvedPlan {
        let plan = match &self.advisor {
            Some(advisor) => match advisor.compute_plan(profile).await {
                Ok(goals) => ResolvedPlan {
                    goals,
                    source: PlanSource::Collaborator,
                },
                Err(e) => {
                    warn!(error = %e, "Collaborator plan unavailable, computing locally");
                    compute_plan_or_default(profile, &self.plan_config)
                }
            },
            None => compute_plan_or_default(profile, &self.plan_config),
        };
        AppLogger::log_plan_resolved(
            &plan.source.to_string(),
            plan.goals.calories_kcal,
            plan.goals.protein_grams,
        );
        plan
    }

    // ------------------------------------------------------------------
    // Food logging
    // ------------------------------------------------------------------

    /// Ask the collaborator to identify food items
    ///
    /// At most one estimation runs at a time. Nothing is stored; pass the
    /// result to [`NutritionTracker::accept_estimates`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty request, `RequestInFlight`
    /// while another estimation is outstanding, `ExternalServiceUnavailable`
    /// without a collaborator, or the collaborator's estimation error.
    pub async fn analyze_food(&self, request: &EstimateRequest) -> AppResult<Vec<FoodEstimate>> {
        request.validate()?;
        let advisor = self
            .advisor
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable("No AI collaborator is configured"))?;

        let _guard = InFlightGuard::acquire(&self.estimating)?;
        let estimates = advisor.estimate_food(request).await?;
        debug!(items = estimates.len(), "Food estimation finished");
        Ok(estimates)
    }

    /// Store accepted estimates as entries sharing one creation instant
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log cannot be saved; the log is then
    /// unchanged.
    pub async fn accept_estimates(
        &mut self,
        estimates: Vec<FoodEstimate>,
        meal_type: MealType,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<EntryId>> {
        let entries = estimates
            .into_iter()
            .map(|estimate| estimate.into_entry(meal_type, now))
            .collect();
        self.append_entries(entries).await
    }

    /// Estimate and store in one step
    ///
    /// # Errors
    ///
    /// Any error of [`NutritionTracker::analyze_food`] or
    /// [`NutritionTracker::accept_estimates`]; the log is unchanged on error.
    pub async fn log_food(
        &mut self,
        request: &EstimateRequest,
        meal_type: MealType,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<EntryId>> {
        let estimates = self.analyze_food(request).await?;
        self.accept_estimates(estimates, meal_type, now).await
    }

    /// Append a batch of entries atomically and persist the log
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` for a repeated id or a storage error;
    /// the log is unchanged in both cases.
    pub async fn append_entries(&mut self, entries: Vec<FoodLogEntry>) -> AppResult<Vec<EntryId>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntryId> = entries.iter().map(FoodLogEntry::id).collect();
        let batch_calories: f64 = entries.iter().map(FoodLogEntry::calories).sum();

        let next = self.log.with_appended(entries)?;
        if let Err(e) = self.repository.save_logs(next.all()).await {
            AppLogger::log_storage_operation("save", storage_keys::LOGS, false);
            return Err(e);
        }
        AppLogger::log_storage_operation("save", storage_keys::LOGS, true);

        self.log = next;
        AppLogger::log_entries_appended(ids.len(), batch_calories, self.log.len());
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Today's totals, progress, and entries
    #[must_use]
    pub fn dashboard<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> DashboardView<'_> {
        let window = TimeWindow::today(now, tz);
        let totals = sum_totals(self.log.all(), &window, tz);
        let mut entries: Vec<&FoodLogEntry> = self
            .log
            .all()
            .iter()
            .rev()
            .filter(|e| window.contains(e, tz))
            .collect();
        entries.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        DashboardView {
            date: calai_intelligence::local_date(now, tz),
            totals,
            comparison: compare(&totals, &self.goals),
            entries,
        }
    }

    /// Bucketed series for a range and metric
    #[must_use]
    pub fn analytics<Tz: TimeZone>(
        &self,
        range: AnalyticsRange,
        metric: Metric,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> AnalyticsView {
        analytics(self.log.all(), range, metric, now, tz)
    }

    /// Entries grouped by local day, newest first
    #[must_use]
    pub fn history<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DayGroup<'_>> {
        group_history(self.log.all(), tz)
    }

    /// Nutrition label of one entry
    #[must_use]
    pub fn label(&self, id: EntryId) -> Option<NutritionLabel> {
        self.log.get(id).map(NutritionLabel::for_entry)
    }

    /// Digest handed to the research collaborator, when onboarded
    #[must_use]
    pub fn context_summary<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Option<String> {
        self.profile
            .as_ref()
            .map(|profile| build_context_summary(self.log.all(), profile, &self.goals, now, tz))
    }

    // ------------------------------------------------------------------
    // Research
    // ------------------------------------------------------------------

    /// Answer a nutrition question
    ///
    /// Collaborator failures produce an apology answer instead of an error.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty question.
    pub async fn ask<Tz: TimeZone>(
        &self,
        question: &str,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> AppResult<ResearchAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::missing_field("question"));
        }

        let Some(advisor) = &self.advisor else {
            warn!("Research requested without a collaborator");
            return Ok(ResearchAnswer::apology());
        };

        let context = self.context_summary(now, tz);
        match advisor.research_query(question, context.as_deref()).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                warn!(error = %e, "Research query failed");
                Ok(ResearchAnswer::apology())
            }
        }
    }
}
