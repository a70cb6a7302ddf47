use tracing::{debug, warn};

pub type SideEffectError = Box<dyn std::error::Error + Send + Sync>;

type SideEffect = Box<dyn FnOnce() -> Result<(), SideEffectError> + Send>;

/// Ordered side effects that run once the primary write has committed.
///
/// Failures are logged and counted, never returned to the caller of the lifecycle operation.
pub struct PostCommit {
    operation: &'static str,
    effects: Vec<(&'static str, SideEffect)>,
}

/// What happened when the hooks ran.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostCommitReport {
    pub succeeded: usize,
    pub failed: Vec<String>,
}

impl PostCommit {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            effects: Vec::new(),
        }
    }

    pub fn push<F>(&mut self, label: &'static str, effect: F)
    where
        F: FnOnce() -> Result<(), SideEffectError> + Send + 'static,
    {
        self.effects.push((label, Box::new(effect)));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn run(self) -> PostCommitReport {
        let mut report = PostCommitReport::default();
        for (label, effect) in self.effects {
            match effect() {
                Ok(()) => {
                    debug!(operation = self.operation, effect = label, "side effect applied");
                    report.succeeded += 1;
                }
                Err(err) => {
                    warn!(
                        operation = self.operation,
                        effect = label,
                        error = %err,
                        "post-commit side effect failed"
                    );
                    report.failed.push(format!("{label}: {err}"));
                }
            }
        }
        report
    }
}

impl std::fmt::Debug for PostCommit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.effects.iter().map(|(label, _)| *label).collect();
        f.debug_struct("PostCommit")
            .field("operation", &self.operation)
            .field("effects", &labels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn failures_do_not_stop_later_effects() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = PostCommit::new("test");

        let first = log.clone();
        hooks.push("first", move || {
            first.lock().expect("log mutex").push("first");
            Ok(())
        });
        hooks.push("broken", || Err("notification store offline".into()));
        let last = log.clone();
        hooks.push("last", move || {
            last.lock().expect("log mutex").push("last");
            Ok(())
        });

        assert_eq!(hooks.len(), 3);
        let report = hooks.run();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, vec!["broken: notification store offline"]);
        assert_eq!(*log.lock().expect("log mutex"), vec!["first", "last"]);
    }

    #[test]
    fn empty_hook_list_reports_nothing() {
        let hooks = PostCommit::new("noop");
        assert!(hooks.is_empty());
        assert_eq!(hooks.run(), PostCommitReport::default());
    }
}
