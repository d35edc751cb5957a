//! `rhetor list` - print the challenge catalog.

use anyhow::{Result, bail};
use rhetor_core::challenge::{ChallengeRepository, Difficulty};
use rhetor_infrastructure::TomlChallengeRepository;

pub async fn run(difficulty: Option<&str>) -> Result<()> {
    let repository = TomlChallengeRepository::default_location()?;

    let challenges = match difficulty {
        Some(filter) => {
            repository
                .find_by_difficulty(parse_difficulty(filter)?)
                .await?
        }
        None => repository.list_all().await?,
    };

    if challenges.is_empty() {
        println!("No challenges match.");
        return Ok(());
    }

    for challenge in challenges {
        println!(
            "{:<18} {:<28} {:?}  {} min  {} pts",
            challenge.id,
            challenge.title,
            challenge.difficulty,
            challenge.time_limit_secs / 60,
            challenge.points,
        );
        println!("    {}", challenge.description);
        println!("    Motion: \"{}\"", challenge.motion);
    }

    Ok(())
}

fn parse_difficulty(value: &str) -> Result<Difficulty> {
    match value.to_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => bail!("unknown difficulty '{other}' (expected easy, medium, or hard)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(parse_difficulty("Hard").unwrap(), Difficulty::Hard);
        assert_eq!(parse_difficulty("easy").unwrap(), Difficulty::Easy);
        assert!(parse_difficulty("brutal").is_err());
    }
}
