//! Aggregation container for validation issues.
//!
//! A [`ValidationContext`] is created per validation call, populated
//! synchronously, and then either discarded or frozen behind an `Arc` by the
//! result cache. Contexts nest: each rule writes into its own child context,
//! and the parent is invalid if any descendant holds a blocking issue.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::{Issue, Severity};

/// Severity-classified issues for one validation operation, plus nested
/// child operations.
#[derive(Clone, Debug)]
pub struct ValidationContext {
    system_name: String,
    operation_name: String,
    issues: Vec<Issue>,
    children: Vec<ValidationContext>,
    metadata: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    started: Instant,
    duration: Option<Duration>,
}

impl ValidationContext {
    /// Creates an empty context for `operation` within `system`.
    pub fn new(system: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            system_name: system.into(),
            operation_name: operation.into(),
            issues: Vec::new(),
            children: Vec::new(),
            metadata: BTreeMap::new(),
            created_at: Utc::now(),
            completed_at: None,
            started: Instant::now(),
            duration: None,
        }
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn children(&self) -> &[ValidationContext] {
        &self.children
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Measured duration once [`complete`](Self::complete) has been called.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Duration if completed, otherwise time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.duration.unwrap_or_else(|| self.started.elapsed())
    }

    /// Appends an issue to this context.
    pub fn add_issue(&mut self, severity: Severity, message: impl Into<String>) {
        self.issues.push(Issue::new(severity, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add_issue(Severity::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.add_issue(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add_issue(Severity::Error, message);
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.add_issue(Severity::Critical, message);
    }

    /// Nests `child` under this context. The child keeps its own issues.
    pub fn add_child_context(&mut self, child: ValidationContext) {
        self.children.push(child);
    }

    /// Flattens `other` into this context: its issues and children are
    /// appended here, and its metadata fills keys this context lacks.
    ///
    /// Used for sibling composition; use [`add_child_context`] for nesting.
    ///
    /// [`add_child_context`]: Self::add_child_context
    pub fn merge_context(&mut self, other: ValidationContext) {
        self.issues.extend(other.issues);
        self.children.extend(other.children);
        for (key, value) in other.metadata {
            self.metadata.entry(key).or_insert(value);
        }
    }

    /// Clears all issues and children. Names and metadata are kept.
    pub fn reset(&mut self) {
        self.issues.clear();
        self.children.clear();
        self.completed_at = None;
        self.duration = None;
        self.started = Instant::now();
    }

    /// Stamps the completion time and measured duration.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
        self.duration = Some(self.started.elapsed());
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True if no issue in this context or any descendant is blocking.
    pub fn is_valid(&self) -> bool {
        self.walk()
            .all(|ctx| ctx.issues.iter().all(|issue| !issue.is_blocking()))
    }

    /// Depth-first, pre-order iteration over this context and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Iterates every issue in this context and its descendants.
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.walk().flat_map(|ctx| ctx.issues.iter())
    }

    /// Number of issues with exactly `severity`, counted transitively.
    pub fn count(&self, severity: Severity) -> usize {
        self.all_issues()
            .filter(|issue| issue.severity() == severity)
            .count()
    }

    /// Number of issues, counted transitively.
    pub fn issue_count(&self) -> usize {
        self.walk().map(|ctx| ctx.issues.len()).sum()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.all_issues().map(Issue::severity).max()
    }

    /// Messages of every blocking issue, in tree order.
    pub fn blocking_messages(&self) -> Vec<&str> {
        self.all_issues()
            .filter(|issue| issue.is_blocking())
            .map(Issue::message)
            .collect()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize, verbose: bool) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let status = if self.is_valid() { "ok" } else { "FAILED" };
        writeln!(
            f,
            "{indent}{}::{} [{status}]",
            self.system_name, self.operation_name
        )?;
        for issue in &self.issues {
            writeln!(f, "{indent}  {issue}")?;
        }
        for child in &self.children {
            if verbose || child.issue_count() > 0 {
                child.render(f, depth + 1, verbose)?;
            }
        }
        Ok(())
    }
}

/// Renders the context as an indented tree.
///
/// The alternate form (`{:#}`) also lists children that produced no issues.
impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0, f.alternate())
    }
}

/// Iterator returned by [`ValidationContext::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a ValidationContext>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ValidationContext;

    fn next(&mut self) -> Option<Self::Item> {
        let ctx = self.stack.pop()?;
        self.stack.extend(ctx.children.iter().rev());
        Some(ctx)
    }
}
