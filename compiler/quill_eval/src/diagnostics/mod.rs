//! Call stack tracking for error attribution.
//!
//! - `CallStack`: live frames, pushed on every call, with an optional depth
//!   limit
//! - `StackSnapshot`: owned copy of the frames taken when an error is first
//!   observed, stored on `EvalError`
//!
//! Snapshots are copies: later pushes and pops never change a snapshot an
//! error already carries.

use std::fmt;
use std::sync::Arc;

use quill_ir::{ExprId, SharedArena};

use crate::errors::{stack_overflow, EvalError};

/// Longest source excerpt kept in a snapshot frame.
const MAX_EXCERPT: usize = 80;

/// Where a call was made.
#[derive(Clone, Debug)]
pub struct CallSite {
    pub arena: SharedArena,
    pub expr: ExprId,
}

impl CallSite {
    fn excerpt(&self) -> String {
        excerpt(&self.arena.display(self.expr))
    }
}

/// A single frame in the live call stack.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Function or method name.
    pub name: Arc<str>,
    /// Call site (not the definition). `None` for the root frame and for
    /// calls made by the host.
    pub site: Option<CallSite>,
}

impl CallFrame {
    pub fn new(name: impl Into<Arc<str>>, site: Option<CallSite>) -> Self {
        CallFrame {
            name: name.into(),
            site,
        }
    }

    /// The frame every execution starts with.
    pub fn root() -> Self {
        CallFrame::new("<script>", None)
    }
}

/// Live call stack of one execution.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    /// Frames exempt from the depth limit.
    base: usize,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited (native stack growth).
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            base: 0,
            max_depth,
        }
    }

    /// Stack holding only the root `<script>` frame, which does not count
    /// against `max_depth`.
    pub fn with_root(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: vec![CallFrame::root()],
            base: 1,
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit. The frame is not pushed
    /// on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len().saturating_sub(self.base) >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Copy the current frames, most recent first. `origin` is the source of
    /// the expression that raised the error.
    pub fn capture(&self, origin: Option<String>) -> StackSnapshot {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| SnapshotFrame {
                name: f.name.to_string(),
                call_site: f.site.as_ref().map(CallSite::excerpt),
            })
            .collect();
        StackSnapshot {
            origin: origin.map(|o| excerpt(&o)),
            frames,
        }
    }
}

/// One frame of a [`StackSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotFrame {
    pub name: String,
    /// Source excerpt of the call expression.
    pub call_site: Option<String>,
}

/// Immutable copy of the call stack at an error site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackSnapshot {
    origin: Option<String>,
    frames: Vec<SnapshotFrame>,
}

impl StackSnapshot {
    /// Frames, most recent call first.
    pub fn frames(&self) -> &[SnapshotFrame] {
        &self.frames
    }

    /// Source excerpt of the expression that raised the error.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for StackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        if let Some(origin) = &self.origin {
            writeln!(f, "  at `{origin}`")?;
        }
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(site) = &frame.call_site {
                write!(f, " (called at `{site}`)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn excerpt(source: &str) -> String {
    if source.chars().count() <= MAX_EXCERPT {
        return source.to_string();
    }
    let mut short: String = source.chars().take(MAX_EXCERPT - 3).collect();
    short.push_str("...");
    short
}
