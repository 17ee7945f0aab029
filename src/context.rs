//! Per-emission state shared across drawables

use std::collections::HashSet;

use crate::color::Color;

/// Tracks what has already been written during one emission pass.
///
/// A fresh context is created for every `draw`/`get` call so repeated passes
/// produce identical output.
#[derive(Debug, Default)]
pub struct Context {
    icon_colors: HashSet<Color>,
    info_markers: usize,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the icon for `color` is being written.
    ///
    /// Returns `false` if it was already written in this pass.
    pub fn claim_icon(&mut self, color: Color) -> bool {
        self.icon_colors.insert(color)
    }

    pub fn has_icon(&self, color: Color) -> bool {
        self.icon_colors.contains(&color)
    }

    /// Take the next info window index, starting from 0.
    pub fn next_info_index(&mut self) -> usize {
        let index = self.info_markers;
        self.info_markers += 1;
        index
    }

    /// Number of markers with info windows written so far
    pub fn info_markers(&self) -> usize {
        self.info_markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_icon_once() {
        let mut ctx = Context::new();
        assert!(ctx.claim_icon(Color::RED));
        assert!(!ctx.claim_icon(Color::RED));
        assert!(ctx.claim_icon(Color::BLACK));
        assert!(ctx.has_icon(Color::RED));
    }

    #[test]
    fn test_info_indices_are_sequential() {
        let mut ctx = Context::new();
        assert_eq!(ctx.next_info_index(), 0);
        assert_eq!(ctx.next_info_index(), 1);
        assert_eq!(ctx.info_markers(), 2);
    }
}
