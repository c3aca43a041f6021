use crate::commands::CommandResult;
use trellis_core::config::{AppConfig, LoadOptions};
use trellis_core::domain::suggestion::CombinationProfile;
use trellis_core::errors::DomainError;
use trellis_core::resolver::{resolve, ResolvedSuggestions};
use trellis_db::repositories::{SqlSuggestionSetRepository, SuggestionSetRepository};
use trellis_db::connect_with_settings;

pub fn run(space: &str, sunlight: &str, experience: &str, time: &str, purpose: &str) -> CommandResult {
    let profile = match CombinationProfile::new(space, sunlight, experience, time, purpose) {
        Ok(profile) => profile,
        Err(error) => {
            return CommandResult::failure("suggest", "validation", error.to_string(), 6);
        }
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "suggest",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "suggest",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let repository = SqlSuggestionSetRepository::new(pool.clone());
        let sets = repository
            .list_active()
            .await
            .map_err(|error| ("repository", error.to_string(), 4u8))?;

        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(sets)
    });

    let sets = match result {
        Ok(sets) => sets,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("suggest", error_class, message, exit_code);
        }
    };

    match resolve(&sets, &profile) {
        Ok(resolved) => CommandResult::success("suggest", format_resolution(&resolved)),
        Err(error @ DomainError::UnknownCombination { .. }) => {
            CommandResult::failure("suggest", "not_found", error.to_string(), 7)
        }
        Err(error) => CommandResult::failure("suggest", "validation", error.to_string(), 6),
    }
}

fn format_resolution(resolved: &ResolvedSuggestions) -> String {
    let plant_lines: Vec<String> = resolved
        .set
        .plants
        .iter()
        .map(|plant| format!("  - {} ({}, {})", plant.name, plant.growing_time, plant.difficulty))
        .collect();

    format!(
        "{} match for `{}`: {}\n{}",
        resolved.quality.as_str(),
        resolved.requested_key,
        resolved.set.message,
        plant_lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use trellis_core::domain::plant::{PlantCategory, Space, Sunlight};
    use trellis_core::domain::suggestion::{
        CombinationProfile, SuggestionPlant, SuggestionSet,
    };
    use trellis_core::resolver::resolve;

    use super::format_resolution;

    #[test]
    fn formatted_resolution_names_quality_key_and_plants() {
        let set = SuggestionSet {
            id: "starter".to_string(),
            space: "small".to_string(),
            sunlight: "full_sun".to_string(),
            experience: "beginner".to_string(),
            time: "low".to_string(),
            purpose: "food".to_string(),
            message: "Easy wins for a sunny sill.".to_string(),
            plants: vec![SuggestionPlant {
                name: "Cherry Tomato".to_string(),
                category: PlantCategory::Vegetable,
                description: "Container tomato".to_string(),
                image_url: "/img/cherry-tomato.jpg".to_string(),
                growing_time: "55-65 days".to_string(),
                sunlight: Sunlight::FullSun,
                space: Space::Small,
                difficulty: "easy".to_string(),
                price: Decimal::new(499, 2),
            }],
            active: true,
        };

        let profile = CombinationProfile::canonical_default();
        let resolved = resolve(&[set], &profile).expect("should resolve");
        let output = format_resolution(&resolved);

        assert!(output.starts_with("exact match for `small-full_sun-beginner-low-food`"));
        assert!(output.contains("Easy wins for a sunny sill."));
        assert!(output.contains("  - Cherry Tomato (55-65 days, easy)"));
    }
}
