//! Slash-delimited location tracking during traversal.

use std::fmt;

/// The route from an entry point's root to the node being visited.
///
/// `step_into` and `step_back` must be called in matched pairs around every
/// descent. Segment boundaries are remembered, so a name that itself contains
/// `/` is still removed as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubPath {
    path: String,
    marks: Vec<usize>,
}

impl SubPath {
    /// Create an empty sub-path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, separated by `/` unless the path is empty.
    pub fn step_into(&mut self, segment: &str) {
        self.marks.push(self.path.len());
        if !self.path.is_empty() {
            self.path.push('/');
        }
        self.path.push_str(segment);
    }

    /// Remove the most recently appended segment. No-op when empty.
    pub fn step_back(&mut self) {
        match self.marks.pop() {
            Some(len) => self.path.truncate(len),
            None => self.path.clear(),
        }
    }

    /// Current path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check if no segment is active.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of active segments.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }
}

impl fmt::Display for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_into_no_leading_separator() {
        let mut path = SubPath::new();
        path.step_into("Root");
        assert_eq!(path.as_str(), "Root");
        path.step_into("Child");
        assert_eq!(path.as_str(), "Root/Child");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn test_step_back_restores_previous() {
        let mut path = SubPath::new();
        path.step_into("Root");
        path.step_into("Child");
        path.step_back();
        assert_eq!(path.as_str(), "Root");
        path.step_back();
        assert!(path.is_empty());
    }

    #[test]
    fn test_step_back_on_empty_is_noop() {
        let mut path = SubPath::new();
        path.step_back();
        assert!(path.is_empty());
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn test_segment_containing_separator() {
        let mut path = SubPath::new();
        path.step_into("Root");
        path.step_into("Left/Right");
        assert_eq!(path.as_str(), "Root/Left/Right");
        path.step_back();
        assert_eq!(path.as_str(), "Root");
    }
}
