//! Purchase confirmation countdown.
//!
//! Gives the user a last chance to cancel before a card is charged. A
//! blocking stdin reader signals on a one-slot channel when Enter is
//! pressed; the foreground loop redraws a progress bar once per tick and
//! whichever finishes first wins.

use std::io::{self, Write};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::debug;

/// Cells in the progress bar.
const BAR_WIDTH: u64 = 40;

const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The time ran out; proceed.
    Elapsed,
    /// The user cancelled.
    Cancelled,
}

/// Urgency marker for the seconds left.
fn marker(remaining: u64) -> &'static str {
    if remaining > 6 {
        "🟢"
    } else if remaining > 3 {
        "🟡"
    } else {
        "🔴"
    }
}

/// Renders one countdown line.
pub fn render_tick(remaining: u64, total: u64) -> String {
    let total = total.max(1);
    let progress = total.saturating_sub(remaining);
    let filled = usize::try_from(progress * BAR_WIDTH / total).unwrap_or(0);
    let empty = usize::try_from(BAR_WIDTH).unwrap_or(0).saturating_sub(filled);

    format!(
        "  {} Ordering in {remaining:>2} s [{}{}] (Enter = cancel)",
        marker(remaining),
        BAR_FULL.to_string().repeat(filled),
        BAR_EMPTY.to_string().repeat(empty)
    )
}

/// Counts down `seconds` on stdout, cancellable with Enter.
pub async fn run(seconds: u64) -> io::Result<Outcome> {
    let (tx, rx) = mpsc::channel(1);

    // Any return from stdin (a line or EOF) cancels.
    tokio::task::spawn_blocking(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let _ = tx.blocking_send(());
    });

    run_with(seconds, Duration::from_secs(1), rx, &mut io::stdout()).await
}

/// Countdown loop over an arbitrary cancel source and writer.
pub async fn run_with<W: Write>(
    seconds: u64,
    tick: Duration,
    mut cancel: mpsc::Receiver<()>,
    out: &mut W,
) -> io::Result<Outcome> {
    let mut ticker = interval(tick);
    let mut remaining = seconds;

    loop {
        tokio::select! {
            biased;

            Some(()) = cancel.recv() => {
                debug!(remaining, "Countdown cancelled");
                writeln!(out)?;
                return Ok(Outcome::Cancelled);
            }
            _ = ticker.tick() => {
                if remaining == 0 {
                    writeln!(out)?;
                    return Ok(Outcome::Elapsed);
                }
                write!(out, "\r{}", render_tick(remaining, seconds))?;
                out.flush()?;
                remaining -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tick_bar() {
        let first = render_tick(10, 10);
        assert!(first.contains("🟢"));
        assert!(first.contains(&BAR_EMPTY.to_string().repeat(40)));

        let half = render_tick(5, 10);
        assert!(half.contains("🟡"));
        assert!(half.contains(&format!("{}{}", "█".repeat(20), "░".repeat(20))));

        let last = render_tick(1, 10);
        assert!(last.contains("🔴"));
        assert!(last.contains(&format!("{}░", "█".repeat(36))));
    }

    #[test]
    fn test_marker_thresholds() {
        assert_eq!(marker(7), "🟢");
        assert_eq!(marker(6), "🟡");
        assert_eq!(marker(4), "🟡");
        assert_eq!(marker(3), "🔴");
    }

    #[tokio::test]
    async fn test_cancel_wins() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(()).await.unwrap();

        let mut out = Vec::new();
        let outcome = run_with(10, Duration::from_millis(5), rx, &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(!String::from_utf8(out).unwrap().contains("Ordering"));
    }

    #[tokio::test]
    async fn test_elapses_without_cancel() {
        let (_tx, rx) = mpsc::channel(1);

        let mut out = Vec::new();
        let outcome = run_with(3, Duration::from_millis(1), rx, &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Elapsed);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Ordering in").count(), 3);
        assert!(text.contains(" 1 s"));
    }
}
