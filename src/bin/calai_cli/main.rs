// ABOUTME: CalAI CLI - command-line front end for the nutrition tracker
// ABOUTME: Onboarding, AI food logging, dashboard, analytics, history, labels, and research questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors
//!
//! Usage:
//! ```bash
//! # Create a profile and compute daily goals
//! calai-cli onboard --name Sam --age 30 --gender male --height 180 --weight 80
//!
//! # Log food from a description and/or photo
//! calai-cli log "two eggs and toast" --meal breakfast
//! calai-cli log --image lunch.jpg --meal lunch
//!
//! # Today's progress
//! calai-cli dashboard
//!
//! # Protein over the last 7 days
//! calai-cli analytics --range week --metric protein
//!
//! # Ask a question grounded in your log
//! calai-cli ask "Am I eating enough protein?"
//! ```

mod commands;
mod helpers;

use std::sync::Arc;

use anyhow::Result;
use calai::advisor::{LlmNutritionAdvisor, NutritionAdvisor};
use calai::config::{AppConfig, IntelligenceConfig};
use calai::llm::GeminiProvider;
use calai::logging::LoggingConfig;
use calai::store::FileRepository;
use calai::tracker::NutritionTracker;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "calai-cli",
    about = "CalAI nutrition tracker",
    long_about = "Log food with AI estimation, track calories and macros against personalized goals, and ask nutrition questions."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create or replace the profile and recompute daily goals
    Onboard {
        /// Display name
        #[arg(long, default_value = "")]
        name: String,

        /// Age in years
        #[arg(long)]
        age: Option<String>,

        /// male, female, or other
        #[arg(long)]
        gender: Option<String>,

        /// Height in centimeters
        #[arg(long)]
        height: Option<String>,

        /// Weight in kilograms
        #[arg(long)]
        weight: Option<String>,

        /// sedentary, light, moderate, active, or very_active
        #[arg(long)]
        activity: Option<String>,

        /// lose_weight, maintain, or gain_muscle
        #[arg(long)]
        goal: Option<String>,
    },

    /// Show the profile and current goals
    Profile,

    /// Estimate food with the AI collaborator and add it to the log
    Log {
        /// What you ate
        #[arg(default_value = "")]
        description: String,

        /// JPEG photo of the meal
        #[arg(long)]
        image: Option<String>,

        /// breakfast, lunch, dinner, or snack
        #[arg(long, default_value = "snack")]
        meal: String,

        /// Show the estimate without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Today's totals and progress against goals
    Dashboard,

    /// Charted totals over a range
    Analytics {
        /// day, week, or month
        #[arg(long, default_value = "week")]
        range: String,

        /// calories, protein, carbs, fat, or a micronutrient name
        #[arg(long, default_value = "calories")]
        metric: String,
    },

    /// All entries grouped by day
    History,

    /// Nutrition facts of one entry
    Label {
        /// Entry id
        id: String,
    },

    /// Ask a nutrition question
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

fn build_advisor(config: &AppConfig) -> Result<Option<Arc<dyn NutritionAdvisor>>> {
    let Some(api_key) = config.gemini.api_key.clone() else {
        info!("GEMINI_API_KEY not set, AI features disabled");
        return Ok(None);
    };
    let provider = GeminiProvider::with_timeout(api_key, config.gemini.timeout())?
        .with_default_model(config.gemini.model.clone());
    let advisor: Arc<dyn NutritionAdvisor> = Arc::new(LlmNutritionAdvisor::new(provider));
    Ok(Some(advisor))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    logging.init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.into();
    }

    let repository = Arc::new(FileRepository::new(config.data_dir.clone()));
    let advisor = build_advisor(&config)?;
    let mut tracker = NutritionTracker::load(
        repository,
        advisor,
        IntelligenceConfig::global().plan.clone(),
    )
    .await?;

    match cli.command {
        Command::Onboard {
            name,
            age,
            gender,
            height,
            weight,
            activity,
            goal,
        } => {
            let defaults = calai_core::models::ProfileInput::with_defaults();
            let input = calai_core::models::ProfileInput {
                name,
                age: age.unwrap_or(defaults.age),
                gender: gender.unwrap_or(defaults.gender),
                height: height.unwrap_or(defaults.height),
                weight: weight.unwrap_or(defaults.weight),
                activity_level: activity.unwrap_or(defaults.activity_level),
                goal: goal.unwrap_or(defaults.goal),
            };
            commands::profile::onboard(&mut tracker, input).await?;
        }
        Command::Profile => commands::profile::show(&tracker),
        Command::Log {
            description,
            image,
            meal,
            dry_run,
        } => {
            commands::food::log(&mut tracker, description, image, &meal, dry_run).await?;
        }
        Command::Dashboard => commands::insights::dashboard(&tracker),
        Command::Analytics { range, metric } => {
            commands::insights::analytics(&tracker, &range, &metric)?;
        }
        Command::History => commands::food::history(&tracker),
        Command::Label { id } => commands::food::label(&tracker, &id)?,
        Command::Ask { question } => {
            commands::insights::ask(&tracker, &question.join(" ")).await?;
        }
    }

    Ok(())
}
