use super::{BranchOutcome, CleanupOutcome, ItemOutcome, ItemReport};

/// Prints one line per decision and the final totals.
///
/// A captured reporter keeps the lines instead of printing them, which is what
/// the tests read back.
pub struct SummaryReporter {
    outcome: CleanupOutcome,
    dry_run: bool,
    echo: bool,
    lines: Vec<String>,
}

impl SummaryReporter {
    pub fn new(dry_run: bool) -> Self {
        Self {
            outcome: CleanupOutcome::default(),
            dry_run,
            echo: true,
            lines: Vec::new(),
        }
    }

    pub fn captured(dry_run: bool) -> Self {
        Self {
            echo: false,
            ..Self::new(dry_run)
        }
    }

    pub fn outcome(&self) -> CleanupOutcome {
        self.outcome
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn record(&mut self, report: &ItemReport) {
        self.outcome.record(&report.outcome);

        for warning in &report.warnings {
            self.emit(format!("  ⚠️  {}: {}", report.name, warning));
        }
        self.emit(describe(report));
    }

    /// A warning that belongs to the run rather than to one item.
    pub fn warn(&mut self, message: &str) {
        self.emit(format!("⚠️  {}", message));
    }

    /// Emits the totals line and hands back the counts.
    pub fn finish(&mut self) -> CleanupOutcome {
        let summary = format_summary(&self.outcome, self.dry_run);
        self.emit(String::new());
        self.emit(summary);
        self.outcome
    }

    fn emit(&mut self, line: String) {
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }
}

pub fn format_summary(outcome: &CleanupOutcome, dry_run: bool) -> String {
    let removed_label = if dry_run { "Would remove" } else { "Removed" };
    format!(
        "Processed: {}, {}: {}, Skipped: {}",
        outcome.processed, removed_label, outcome.removed, outcome.skipped
    )
}

fn describe(report: &ItemReport) -> String {
    match &report.outcome {
        ItemOutcome::Removed { branch } => format!(
            "  ✅ Removed {}{}",
            report.name,
            describe_branch(&report.name, branch)
        ),
        ItemOutcome::WouldRemove { branch } => format!(
            "  🔍 Would remove {}{}",
            report.name,
            describe_branch(&report.name, branch)
        ),
        ItemOutcome::Skipped(reason) => format!("  ⏭️  Skipped {}: {}", report.name, reason),
    }
}

/// Branch items carry their own name, so only the forced marker is worth adding.
fn describe_branch(item: &str, branch: &BranchOutcome) -> String {
    match branch {
        BranchOutcome::NotRequested | BranchOutcome::NoBranch => String::new(),
        BranchOutcome::Deleted { name, forced } if name == item => {
            if *forced {
                " (forced)".to_string()
            } else {
                String::new()
            }
        }
        BranchOutcome::WouldDelete { name } if name == item => String::new(),
        BranchOutcome::Deleted { name, forced: false } => format!(" (branch '{}' deleted)", name),
        BranchOutcome::Deleted { name, forced: true } => {
            format!(" (branch '{}' force-deleted)", name)
        }
        BranchOutcome::WouldDelete { name } => format!(" (would delete branch '{}')", name),
        BranchOutcome::Kept { name, .. } => format!(" (branch '{}' kept)", name),
    }
}
