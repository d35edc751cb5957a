//! `rhetor practice` - run an interactive practice session.
//!
//! Bridges the terminal to the session engine: stdin lines become user
//! turns (or slash commands), and snapshot updates from the engine are
//! rendered as they arrive. The engine neither knows nor cares that the
//! text came from a keyboard.

use anyhow::{Context, Result};
use rhetor_application::{EngineConfig, ProgressService, SessionController};
use rhetor_core::RhetorError;
use rhetor_core::challenge::{ChallengeDefinition, ChallengeRepository};
use rhetor_core::session::{Phase, Session, SessionConfig, Speaker};
use rhetor_infrastructure::{TomlChallengeRepository, TomlProgressStore};
use rhetor_interaction::{GeminiOpponent, OpponentAgent, ScriptedOpponent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(challenge_id: &str, remote: bool, prep_secs: u32, rounds: u32) -> Result<()> {
    let repository = TomlChallengeRepository::default_location()?;
    let challenge = repository
        .find_by_id(challenge_id)
        .await?
        .ok_or_else(|| RhetorError::not_found("challenge", challenge_id))
        .context("see `rhetor list` for available challenges")?;

    let agent: Arc<dyn OpponentAgent> = if remote {
        Arc::new(GeminiOpponent::try_from_env()?)
    } else {
        Arc::new(ScriptedOpponent::new())
    };

    let progress = ProgressService::new(Arc::new(TomlProgressStore::default_location()?));
    let config = EngineConfig {
        session: SessionConfig {
            prep_secs,
            max_rounds: rounds.max(1),
        },
        ..EngineConfig::default()
    };

    print_briefing(&challenge, prep_secs);

    let controller = SessionController::start(challenge, agent, progress.clone(), config);
    let mut snapshot = controller.subscribe();
    let mut renderer = Renderer::default();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            changed = snapshot.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = snapshot.borrow_and_update().clone();
                renderer.render(&session);
                if session.phase == Phase::Results {
                    print_summary(&session, &progress).await;
                    break;
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "" => {}
                    "/start" => { controller.start_exchange().await; }
                    "/pause" => { controller.pause().await; }
                    "/resume" => { controller.resume().await; }
                    "/reset" => { controller.reset().await; }
                    "/quit" => break,
                    turn => { controller.submit_turn(turn).await; }
                }
            }
        }
    }

    controller.stop().await;
    Ok(())
}

fn print_briefing(challenge: &ChallengeDefinition, prep_secs: u32) {
    println!("=== {} ({:?}, {} pts) ===", challenge.title, challenge.difficulty, challenge.points);
    println!("Motion: \"{}\"", challenge.motion);
    println!("Prompt: {}", challenge.prompt);
    println!();
    println!("Arguments you may want to use:");
    for argument in &challenge.key_arguments.supporting {
        println!("  - {argument}");
    }
    println!();
    println!(
        "Preparation: {} | Exchange: {}",
        format_time(prep_secs),
        format_time(challenge.time_limit_secs)
    );
    println!("Type your argument and press enter to debate.");
    println!("Commands: /start /pause /resume /reset /quit");
    println!();
}

async fn print_summary(session: &Session, progress: &ProgressService) {
    let summary = session.summary();
    println!();
    println!("=== Challenge Complete! ===");
    println!("Time used:  {}", format_time(summary.elapsed_secs));
    println!("Exchanges:  {}", summary.exchanges);
    println!("XP earned:  +{}", summary.points);
    if let Some(score) = summary.average_score {
        println!("Avg score:  {score}/100");
    }
    match progress.overview().await {
        Ok(record) => println!("Total XP:   {} (level {})", record.points, record.level),
        Err(err) => tracing::warn!(error = %err, "could not load progress totals"),
    }
}

/// Incremental terminal renderer over session snapshots.
///
/// Tracks how much of the message log has been printed so that resolved
/// placeholders are printed exactly once, and detects resets by the
/// session id changing.
#[derive(Default)]
struct Renderer {
    session_id: Option<String>,
    last_phase: Option<Phase>,
    printed: usize,
    thinking_shown: bool,
    last_timer: Option<u32>,
}

impl Renderer {
    fn render(&mut self, session: &Session) {
        if self.session_id.as_deref() != Some(&session.id) {
            // New attempt (first snapshot or a reset).
            if self.session_id.is_some() {
                println!();
                println!("Session reset. Back to preparation.");
            }
            *self = Renderer::default();
            self.session_id = Some(session.id.clone());
        }

        if self.last_phase != Some(session.phase) {
            self.last_phase = Some(session.phase);
            println!();
            println!("--- {} ---", session.phase.title());
            if session.phase == Phase::Exchange {
                println!("Round {}/{}", session.round, session.max_rounds);
            }
        }

        while self.printed < session.messages.len() {
            let message = &session.messages[self.printed];
            if message.pending {
                if !self.thinking_shown {
                    println!("[opponent is thinking...]");
                    self.thinking_shown = true;
                }
                break;
            }
            let speaker = match message.speaker {
                Speaker::User => "You",
                Speaker::Counterpart => "Opponent",
            };
            println!("{speaker}: {}", message.content);
            self.printed += 1;
            self.thinking_shown = false;
        }

        if session.phase != Phase::Results
            && session.running
            && self.last_timer != Some(session.time_remaining)
            && (session.time_remaining % 30 == 0 || session.time_remaining <= 5)
        {
            self.last_timer = Some(session.time_remaining);
            println!("[{} remaining]", format_time(session.time_remaining));
        }
    }
}

fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(605), "10:05");
    }
}
