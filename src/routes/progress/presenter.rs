//! Plain-text rendering of a user's daily progress.
//!
//! Headline and supporting values are always shown; detail lines only when the
//! strategy produced them. The algorithm name is displayed as-is.

use std::fmt::{self, Write};

use crate::algorithms::AlgorithmResult;
use super::{Gamification, Progress};

pub const STEP_GOAL: i64 = 10_000;
pub const CALORIE_GOAL: i64 = 2_000;

pub fn render_dashboard(progress: &Progress) -> Result<String, fmt::Error> {
    let mut out = String::new();

    if let Some(gamification) = &progress.gamification {
        render_gamification(&mut out, gamification)?;
        writeln!(out)?;
    }

    render_card(&mut out, "Daily Steps", "steps", STEP_GOAL, &progress.steps)?;
    writeln!(out, "  Calories: {}", progress.steps.secondary_value())?;
    if let Some(details) = &progress.steps.details {
        writeln!(out, "  Distance: {} km", details.distance_km)?;
        writeln!(out, "  Stride: {}m", details.average_stride)?;
        writeln!(out, "  Intensity: {}", details.intensity.as_str())?;
    }
    writeln!(out)?;

    render_card(&mut out, "Calories Burned", "calories", CALORIE_GOAL, &progress.calories)?;
    writeln!(out, "  Activity: {} min", progress.calories.secondary_value())?;
    if let Some(details) = &progress.calories.details {
        writeln!(out, "  Intensity: {}", details.intensity_level.as_str())?;
        writeln!(out, "  Burn rate: {:.1} cal/min", details.burn_rate)?;
        writeln!(out, "  Type: {}", details.activity_type.as_str())?;
    }

    Ok(out)
}

fn render_card<T: AlgorithmResult>(
    out: &mut String,
    title: &str,
    unit: &str,
    goal: i64,
    result: &T,
) -> fmt::Result {
    writeln!(out, "{} [{}]", title, result.algorithm())?;
    writeln!(
        out,
        "  {} / {} {} ({}%)",
        result.total_value(),
        goal,
        unit,
        percent_of(result.total_value(), goal)
    )
}

fn render_gamification(out: &mut String, gamification: &Gamification) -> fmt::Result {
    writeln!(
        out,
        "Streak: {} days (best {})",
        gamification.current_streak, gamification.best_streak
    )?;
    writeln!(out, "Achievements:")?;
    for achievement in &gamification.achievements {
        let mark = if achievement.unlocked { "x" } else { " " };
        writeln!(
            out,
            "  [{}] {} - {}",
            mark, achievement.title, achievement.description
        )?;
    }
    Ok(())
}

/// Progress toward `goal`, capped at 100
fn percent_of(value: i64, goal: i64) -> i64 {
    if goal <= 0 {
        return 100;
    }
    (value.max(0) * 100 / goal).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::calories::{ActivityType, CalorieDetails, DailyCalories, IntensityLevel};
    use crate::algorithms::steps::{DailySteps, StepDetails};
    use crate::algorithms::Algorithm;

    fn simple_progress() -> Progress {
        Progress {
            steps: DailySteps {
                steps: 7500,
                calories: 300,
                algorithm: Algorithm::Simple,
                details: None,
            },
            calories: DailyCalories {
                calories: 250,
                activity_minutes: 50,
                algorithm: Algorithm::Simple,
                details: None,
            },
            gamification: None,
        }
    }

    #[test]
    fn test_renders_without_details() {
        let text = render_dashboard(&simple_progress()).unwrap();

        assert!(text.contains("Daily Steps [simple]"));
        assert!(text.contains("7500 / 10000 steps (75%)"));
        assert!(text.contains("Calories Burned [simple]"));
        assert!(text.contains("250 / 2000 calories (12%)"));
        assert!(text.contains("Activity: 50 min"));
        assert!(!text.contains("Burn rate"));
        assert!(!text.contains("Distance"));
        assert!(!text.contains("Streak"));
    }

    #[test]
    fn test_renders_details_and_gamification() {
        let mut progress = simple_progress();
        progress.steps.algorithm = Algorithm::Enhanced;
        progress.steps.details = Some(StepDetails {
            average_stride: 0.8,
            distance_km: 6.0,
            intensity: IntensityLevel::Moderate,
        });
        progress.calories.algorithm = Algorithm::MlPowered;
        progress.calories.details = Some(CalorieDetails {
            intensity_level: IntensityLevel::High,
            burn_rate: 8.26,
            activity_type: ActivityType::Swimming,
        });
        progress.gamification = Some(Gamification::demo());

        let text = render_dashboard(&progress).unwrap();
        assert!(text.starts_with("Streak: 7 days (best 14)"));
        assert!(text.contains("[x] Week Warrior"));
        assert!(text.contains("[ ] Fitness Legend"));
        assert!(text.contains("Distance: 6 km"));
        assert!(text.contains("Intensity: moderate"));
        assert!(text.contains("Calories Burned [ml-powered]"));
        assert!(text.contains("Burn rate: 8.3 cal/min"));
        assert!(text.contains("Type: swimming"));
    }

    #[test]
    fn test_percent_is_capped() {
        assert_eq!(percent_of(12_000, STEP_GOAL), 100);
        assert_eq!(percent_of(0, STEP_GOAL), 0);
        assert_eq!(percent_of(1_999, CALORIE_GOAL), 99);
    }
}
