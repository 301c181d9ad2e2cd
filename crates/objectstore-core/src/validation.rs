//! Semantic validation protocol.
//!
//! Validation is a separate top-down pass over an already-constructed
//! component tree. Components never throw for semantic problems themselves;
//! they report issues to a shared [`ValidationContext`] and the context alone
//! decides whether an issue is accumulated or escalated into a hard error.
//!
//! The calling convention every component follows:
//!
//! 1. call [`ValidationContext::begin_validation`] first; a [`ValidationFlow::Skip`]
//!    result permits (but does not force) an early return,
//! 2. check its own required-field invariants, reporting violations through
//!    [`ValidationContext::error`] / [`ValidationContext::warning`],
//! 3. recurse into children inside a [`ValidationContext::push_parent`] scope,
//!    so issue paths reflect structural ancestry. The scope guard keeps the
//!    parent stack balanced even when an escalated error unwinds the pass.
//!
//! Issues travel as an integer code plus message arguments, always supplied
//! together; rendering codes into human text happens elsewhere.

use serde::Serialize;

use crate::chain::Ancestor;
use crate::component::Component;
use crate::error::{Error, Result};

/// Error codes reported through the validation channel.
///
/// Codes are stable identifiers resolved to message text by external
/// tooling; only the pairing of code and arguments is guaranteed here.
pub mod codes {
    /// A required field is empty or missing. Args: component, field.
    pub const REQUIRED_FIELD_MISSING: u32 = 1001;
    /// A name does not satisfy the component naming rules. Args: name.
    pub const INVALID_NAME: u32 = 1002;
    /// A referenced value is absent where the operator requires one. Args: operator.
    pub const MISSING_OPERAND: u32 = 1003;
    /// An id is outside its legal range. Args: id.
    pub const INVALID_ID_VALUE: u32 = 1004;
    /// A set that must carry at least one entry is empty. Args: component.
    pub const EMPTY_SET: u32 = 1005;
    /// Two sibling entries share a name that must be unique. Args: name.
    pub const DUPLICATE_ENTRY: u32 = 1006;
}

/// Outcome of [`ValidationContext::begin_validation`].
///
/// `Skip` is advisory: a component may stop early, but partial validation
/// must remain safe, so implementations are free to ignore it. Nothing in
/// the context becomes inconsistent either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFlow {
    /// Keep validating this component.
    Continue,
    /// The context has seen enough; the component may return early.
    Skip,
}

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One reported validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Stable error code, see [`codes`].
    pub code: u32,
    /// Message arguments paired with the code.
    pub args: Vec<String>,
    /// Structural path of the reporting component, e.g.
    /// `PSXRole[2]/PSXPropertySet/PSXProperty`.
    pub path: String,
}

/// A validation issue escalated into a hard failure by the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed at \"{path}\" (code {code})")]
pub struct ValidationFailure {
    pub code: u32,
    pub args: Vec<String>,
    pub path: String,
}

/// Escalation policy for a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Escalate the first error into a hard failure.
    pub fail_fast: bool,
    /// After this many errors, `begin_validation` answers `Skip` and any
    /// further error escalates. `None` accumulates without limit.
    pub max_errors: Option<usize>,
}

/// Result of a completed validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// How many components entered validation.
    pub components_visited: usize,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// JSON rendering for the external error channel.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Stateful collaborator threaded through a `validate` call tree.
///
/// Owns its parent stack independently of the parse-time chain; components
/// push themselves around child recursion via [`push_parent`].
///
/// [`push_parent`]: ValidationContext::push_parent
#[derive(Debug, Default)]
pub struct ValidationContext {
    options: ValidationOptions,
    /// Originating session identifier; absent for offline validation.
    session: Option<String>,
    parents: Vec<Ancestor>,
    issues: Vec<ValidationIssue>,
    visited: usize,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ValidationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Attach the originating session identifier.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Originating session, if the pass runs on behalf of one.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Announce that a component is about to validate its own state.
    ///
    /// Must be the first context call a component makes. Answers `Skip`
    /// once the configured error budget is exhausted; callers may ignore
    /// the answer, and either choice leaves the context consistent.
    pub fn begin_validation(&mut self, node_name: &'static str, detail: &str) -> ValidationFlow {
        self.visited += 1;
        tracing::debug!(component = node_name, detail, "validating component");
        if self.budget_exhausted() {
            return ValidationFlow::Skip;
        }
        ValidationFlow::Continue
    }

    /// Report an error for the named component.
    ///
    /// Accumulates the issue, then escalates into an `Err` when the policy
    /// says so: immediately under `fail_fast`, or once the error budget is
    /// exceeded. Callers propagate with `?`; guard-based scopes keep all
    /// stacks balanced while the failure unwinds.
    pub fn error(&mut self, node_name: &'static str, code: u32, args: &[&str]) -> Result<()> {
        let issue = self.record(Severity::Error, node_name, code, args);
        if self.options.fail_fast || self.budget_exceeded() {
            return Err(Error::Validation(ValidationFailure {
                code: issue.code,
                args: issue.args,
                path: issue.path,
            }));
        }
        Ok(())
    }

    /// Report a warning for the named component. Warnings never escalate.
    pub fn warning(&mut self, node_name: &'static str, code: u32, args: &[&str]) {
        self.record(Severity::Warning, node_name, code, args);
    }

    /// Push a parent frame around child validation.
    ///
    /// Returns a guard that derefs to the context and pops on drop.
    pub fn push_parent(&mut self, ancestor: Ancestor) -> ValidationScope<'_> {
        let restore_len = self.parents.len();
        self.parents.push(ancestor);
        ValidationScope {
            ctx: self,
            restore_len,
        }
    }

    /// Depth of the validation parent stack.
    pub fn parent_depth(&self) -> usize {
        self.parents.len()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Finish the pass and hand back the accumulated report.
    pub fn into_report(self) -> ValidationReport {
        ValidationReport {
            issues: self.issues,
            components_visited: self.visited,
        }
    }

    fn record(
        &mut self,
        severity: Severity,
        node_name: &'static str,
        code: u32,
        args: &[&str],
    ) -> ValidationIssue {
        let issue = ValidationIssue {
            severity,
            code,
            args: args.iter().map(|a| (*a).to_string()).collect(),
            path: self.path_for(node_name),
        };
        self.issues.push(issue.clone());
        issue
    }

    fn path_for(&self, node_name: &'static str) -> String {
        let mut out = String::new();
        for ancestor in &self.parents {
            push_segment(&mut out, ancestor.node_name, ancestor.id);
        }
        push_segment(&mut out, node_name, 0);
        out
    }

    fn budget_exhausted(&self) -> bool {
        self.options
            .max_errors
            .is_some_and(|max| self.error_count() >= max)
    }

    fn budget_exceeded(&self) -> bool {
        self.options
            .max_errors
            .is_some_and(|max| self.error_count() > max)
    }
}

fn push_segment(out: &mut String, name: &str, id: i32) {
    if !out.is_empty() {
        out.push('/');
    }
    out.push_str(name);
    if id != 0 {
        use std::fmt::Write;
        let _ = write!(out, "[{id}]");
    }
}

/// Guard returned by [`ValidationContext::push_parent`]; pops on drop.
#[derive(Debug)]
pub struct ValidationScope<'a> {
    ctx: &'a mut ValidationContext,
    restore_len: usize,
}

impl std::ops::Deref for ValidationScope<'_> {
    type Target = ValidationContext;

    fn deref(&self) -> &ValidationContext {
        self.ctx
    }
}

impl std::ops::DerefMut for ValidationScope<'_> {
    fn deref_mut(&mut self) -> &mut ValidationContext {
        self.ctx
    }
}

impl Drop for ValidationScope<'_> {
    fn drop(&mut self) {
        self.ctx.parents.truncate(self.restore_len);
    }
}

/// Run a full validation pass over one component tree.
///
/// Builds a fresh context, drives the recursive pass, and returns the
/// report. An escalated failure propagates as the `Err` arm.
#[tracing::instrument(level = "debug", skip(component, options))]
pub fn run_validation<T: Component>(
    component: &T,
    options: ValidationOptions,
) -> Result<ValidationReport> {
    let mut ctx = ValidationContext::with_options(options);
    component.validate(&mut ctx)?;
    let report = ctx.into_report();
    tracing::debug!(
        components = report.components_visited,
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validation pass completed"
    );
    Ok(report)
}
