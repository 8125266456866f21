// src/cli/progress.rs — Terminal progress renderer for real-time cycle feedback

use crate::agent::types::StageEvent;

/// Build a progress callback that writes formatted output to stderr.
///
/// All progress output goes to stderr so stdout remains clean for results.
/// Returns a closure suitable for `Agent::with_progress()`.
pub fn terminal_progress() -> impl Fn(StageEvent) + Send + 'static {
    move |event| match event {
        StageEvent::AttemptStart {
            attempt,
            max_attempts,
        } => {
            eprintln!("[attempt {}/{}] planning...", attempt, max_attempts);
        }
        StageEvent::PlanReady { attempt, chars } => {
            eprintln!("[attempt {}] plan ready ({} chars)", attempt, chars);
        }
        StageEvent::CodeReady { attempt, lines } => {
            eprintln!("[attempt {}] code ready ({} lines)", attempt, lines);
        }
        StageEvent::TestFailed { attempt, summary } => {
            eprintln!("[attempt {}] test failed: {}", attempt, summary);
        }
        StageEvent::Solved {
            attempts,
            parser_path,
        } => {
            eprintln!(
                "[done] parser written to {} after {} attempt(s)",
                parser_path.display(),
                attempts,
            );
        }
        StageEvent::Exhausted { attempts } => {
            eprintln!("[halt] attempts exhausted after {} attempt(s)", attempts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Helper that captures progress output into a Vec instead of stderr.
    fn capturing_progress() -> (
        impl Fn(StageEvent) + Send + 'static,
        Arc<Mutex<Vec<String>>>,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let cb = move |event: StageEvent| {
            let msg = match event {
                StageEvent::AttemptStart {
                    attempt,
                    max_attempts,
                } => format!("[attempt {}/{}] planning...", attempt, max_attempts),
                StageEvent::PlanReady { attempt, chars } => {
                    format!("[attempt {}] plan ready ({} chars)", attempt, chars)
                }
                StageEvent::CodeReady { attempt, lines } => {
                    format!("[attempt {}] code ready ({} lines)", attempt, lines)
                }
                StageEvent::TestFailed { attempt, summary } => {
                    format!("[attempt {}] test failed: {}", attempt, summary)
                }
                StageEvent::Solved {
                    attempts,
                    parser_path,
                } => format!(
                    "[done] parser written to {} after {} attempt(s)",
                    parser_path.display(),
                    attempts,
                ),
                StageEvent::Exhausted { attempts } => {
                    format!("[halt] attempts exhausted after {} attempt(s)", attempts)
                }
            };
            log_clone.lock().unwrap().push(msg);
        };
        (cb, log)
    }

    #[test]
    fn test_attempt_start_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::AttemptStart {
            attempt: 1,
            max_attempts: 3,
        });
        let msgs = log.lock().unwrap();
        assert_eq!(msgs[0], "[attempt 1/3] planning...");
    }

    #[test]
    fn test_plan_ready_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::PlanReady {
            attempt: 2,
            chars: 812,
        });
        let msgs = log.lock().unwrap();
        assert_eq!(msgs[0], "[attempt 2] plan ready (812 chars)");
    }

    #[test]
    fn test_code_ready_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::CodeReady {
            attempt: 1,
            lines: 42,
        });
        let msgs = log.lock().unwrap();
        assert_eq!(msgs[0], "[attempt 1] code ready (42 lines)");
    }

    #[test]
    fn test_test_failed_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::TestFailed {
            attempt: 2,
            summary: "row count mismatch: got 4 rows, expected 5".into(),
        });
        let msgs = log.lock().unwrap();
        assert!(msgs[0].starts_with("[attempt 2] test failed:"));
        assert!(msgs[0].contains("row count mismatch"));
    }

    #[test]
    fn test_solved_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::Solved {
            attempts: 2,
            parser_path: PathBuf::from("parsers/icici_parser.py"),
        });
        let msgs = log.lock().unwrap();
        assert!(msgs[0].starts_with("[done]"));
        assert!(msgs[0].contains("icici_parser.py"));
        assert!(msgs[0].contains("2 attempt(s)"));
    }

    #[test]
    fn test_exhausted_format() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::Exhausted { attempts: 3 });
        let msgs = log.lock().unwrap();
        assert_eq!(msgs[0], "[halt] attempts exhausted after 3 attempt(s)");
    }

    #[test]
    fn test_full_cycle_sequence() {
        let (cb, log) = capturing_progress();
        cb(StageEvent::AttemptStart {
            attempt: 1,
            max_attempts: 3,
        });
        cb(StageEvent::PlanReady {
            attempt: 1,
            chars: 640,
        });
        cb(StageEvent::CodeReady {
            attempt: 1,
            lines: 38,
        });
        cb(StageEvent::TestFailed {
            attempt: 1,
            summary: "header mismatch".into(),
        });
        cb(StageEvent::AttemptStart {
            attempt: 2,
            max_attempts: 3,
        });
        cb(StageEvent::PlanReady {
            attempt: 2,
            chars: 701,
        });
        cb(StageEvent::CodeReady {
            attempt: 2,
            lines: 45,
        });
        cb(StageEvent::Solved {
            attempts: 2,
            parser_path: PathBuf::from("parsers/demo_parser.py"),
        });

        let msgs = log.lock().unwrap();
        assert_eq!(msgs.len(), 8);
        assert!(msgs[0].starts_with("[attempt 1/3]"));
        assert!(msgs[3].contains("test failed"));
        assert!(msgs[4].starts_with("[attempt 2/3]"));
        assert!(msgs[7].starts_with("[done]"));
    }
}
