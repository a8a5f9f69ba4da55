//! Core state for the segmented code input.

use crate::error::{OtpInputError, OtpInputResult};
use serde::Serialize;
use tracing::trace;

/// Default number of code cells (matches the provider's email codes).
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Render snapshot for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    /// The digit shown in the cell, if any.
    pub digit: Option<char>,
    /// Whether the cell currently holds input focus.
    pub focused: bool,
    /// Whether the cell has a digit (drives the filled style).
    pub filled: bool,
}

/// Segmented code input state.
///
/// Holds N single-digit cells that together represent one verification
/// code. All mutation goes through the editing operations below so the
/// invariants hold at a single choke point: the buffer never exceeds N
/// characters and every present character is a decimal digit.
///
/// Deleting a digit clears its cell without shifting later digits; the
/// cells keep their index positions until the owner replaces the whole
/// value.
#[derive(Debug, Clone)]
pub struct OtpInput {
    cells: Vec<Option<char>>,
    focus: Option<usize>,
    disabled: bool,
}

impl Default for OtpInput {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpInput {
    /// Create an input with the default six cells.
    pub fn new() -> Self {
        Self {
            cells: vec![None; DEFAULT_CODE_LENGTH],
            focus: None,
            disabled: false,
        }
    }

    /// Create an input with a custom cell count.
    ///
    /// # Errors
    /// Returns `OtpInputError::InvalidLength` when `length` is zero.
    pub fn with_length(length: usize) -> OtpInputResult<Self> {
        if length == 0 {
            return Err(OtpInputError::InvalidLength(length));
        }
        Ok(Self {
            cells: vec![None; length],
            focus: None,
            disabled: false,
        })
    }

    /// Number of cells.
    pub fn max_len(&self) -> usize {
        self.cells.len()
    }

    /// Number of filled cells.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when no cell holds a digit.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// True when every cell holds a digit.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The digit at cell `index`, if present.
    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// The logical code string: all present digits in cell order.
    pub fn value(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    /// The currently focused cell, if any.
    pub fn focused_index(&self) -> Option<usize> {
        self.focus
    }

    /// Whether editing is currently disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Per-cell render snapshot for the presentation layer.
    pub fn cells(&self) -> Vec<CellView> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, digit)| CellView {
                digit: *digit,
                focused: self.focus == Some(i),
                filled: digit.is_some(),
            })
            .collect()
    }

    /// Replace the full value from the owner (e.g. a resend reset).
    ///
    /// Non-digit characters are dropped and the result is truncated to
    /// the cell count; characters are redistributed across cells by
    /// index. Focus is left untouched. This operation is available even
    /// while the input is disabled since it is owner-driven, not user
    /// input.
    pub fn set_value(&mut self, raw: &str) {
        let sanitized = sanitize(raw, self.max_len());
        self.assign(&sanitized);
    }

    /// Clear every cell. Equivalent to `set_value("")`.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Bulk-set from a paste or platform autofill source.
    ///
    /// Strips non-digits, truncates to the cell count, replaces the
    /// whole buffer, and moves focus to the first empty cell (or the
    /// last cell when the buffer is now full).
    pub fn paste(&mut self, raw: &str) {
        if self.disabled {
            return;
        }
        let sanitized = sanitize(raw, self.max_len());
        trace!(digits = sanitized.len(), "bulk code entry");
        self.assign(&sanitized);
        self.focus = Some(if sanitized.len() < self.max_len() {
            sanitized.len()
        } else {
            self.max_len() - 1
        });
    }

    /// Apply a raw text-change event from cell `index`.
    ///
    /// A single digit fills the cell and advances focus; empty text
    /// clears the cell (without shifting its neighbors) and retreats
    /// focus; two or more digits are treated as a paste.
    pub fn edit_cell(&mut self, index: usize, raw: &str) {
        if self.disabled || index >= self.max_len() {
            return;
        }
        let sanitized = sanitize(raw, usize::MAX);
        match sanitized.len() {
            0 => {
                self.cells[index] = None;
                self.focus = Some(index.saturating_sub(1));
            }
            1 => {
                self.cells[index] = sanitized.chars().next();
                self.focus = Some((index + 1).min(self.max_len() - 1));
            }
            _ => self.paste(&sanitized),
        }
    }

    /// Handle a physical backspace in an already-empty cell.
    ///
    /// An empty cell cannot emit a text-change event for backspace, so
    /// the key event drives the focus retreat directly.
    pub fn backspace_at_empty(&mut self, index: usize) {
        if self.disabled || index >= self.max_len() {
            return;
        }
        if self.cells[index].is_none() && index > 0 {
            self.focus = Some(index - 1);
        }
    }

    /// Record focus acquisition on cell `index`.
    pub fn focus(&mut self, index: usize) {
        if self.disabled || index >= self.max_len() {
            return;
        }
        self.focus = Some(index);
    }

    /// Record loss of focus.
    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Enable or disable user editing.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn assign(&mut self, digits: &str) {
        let mut chars = digits.chars();
        for cell in &mut self.cells {
            *cell = chars.next();
        }
    }
}

/// Strip non-digits and truncate to `max` characters.
fn sanitize(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_input_is_empty_with_no_focus() {
        for n in 1..=8 {
            let input = OtpInput::with_length(n).unwrap();
            assert!(input.is_empty());
            assert_eq!(input.value(), "");
            assert_eq!(input.focused_index(), None);
            assert_eq!(input.max_len(), n);
        }
    }

    #[test]
    fn test_default_length_is_six() {
        assert_eq!(OtpInput::new().max_len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let err = OtpInput::with_length(0).unwrap_err();
        assert_eq!(err, OtpInputError::InvalidLength(0));
    }

    #[test]
    fn test_single_digit_edit_advances_focus() {
        let mut input = OtpInput::new();
        input.edit_cell(0, "1");
        assert_eq!(input.cell(0), Some('1'));
        assert_eq!(input.focused_index(), Some(1));

        // Last cell: focus stays put.
        input.edit_cell(5, "9");
        assert_eq!(input.cell(5), Some('9'));
        assert_eq!(input.focused_index(), Some(5));
    }

    #[test]
    fn test_sequential_edits_fill_the_code() {
        let mut input = OtpInput::new();
        for (i, d) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
            input.edit_cell(i, d);
        }
        assert_eq!(input.value(), "123456");
        assert!(input.is_full());
        assert_eq!(input.focused_index(), Some(5));
    }

    #[test]
    fn test_empty_edit_clears_cell_without_compacting() {
        let mut input = OtpInput::new();
        input.set_value("123456");

        input.edit_cell(2, "");
        assert_eq!(input.cell(1), Some('2'));
        assert_eq!(input.cell(2), None);
        assert_eq!(input.cell(3), Some('4'));
        assert_eq!(input.value(), "12456");
        assert_eq!(input.focused_index(), Some(1));
    }

    #[test]
    fn test_empty_edit_at_first_cell_keeps_focus_at_zero() {
        let mut input = OtpInput::new();
        input.set_value("12");
        input.edit_cell(0, "");
        assert_eq!(input.cell(0), None);
        assert_eq!(input.focused_index(), Some(0));
    }

    #[test]
    fn test_edit_strips_non_digits() {
        let mut input = OtpInput::new();
        input.edit_cell(0, "a7!");
        assert_eq!(input.cell(0), Some('7'));
    }

    #[test]
    fn test_paste_sets_buffer_and_focuses_first_empty_cell() {
        let mut input = OtpInput::new();
        input.paste("123");
        assert_eq!(input.value(), "123");
        assert_eq!(input.focused_index(), Some(3));
    }

    #[test]
    fn test_paste_full_code_focuses_last_cell() {
        let mut input = OtpInput::new();
        input.paste("123456");
        assert_eq!(input.value(), "123456");
        assert_eq!(input.focused_index(), Some(5));
    }

    #[test]
    fn test_paste_truncates_excess_digits() {
        let mut input = OtpInput::new();
        input.paste("1234567890");
        assert_eq!(input.value(), "123456");
    }

    #[test]
    fn test_paste_strips_formatting() {
        let mut input = OtpInput::new();
        input.paste("12-34 56");
        assert_eq!(input.value(), "123456");
    }

    #[test]
    fn test_multi_digit_edit_delegates_to_paste() {
        let mut input = OtpInput::new();
        // iOS autofill delivers the whole code through one cell.
        input.edit_cell(3, "987654");
        assert_eq!(input.value(), "987654");
        assert_eq!(input.focused_index(), Some(5));
    }

    #[test]
    fn test_set_value_redistributes_without_moving_focus() {
        let mut input = OtpInput::new();
        input.focus(4);
        input.set_value("42");
        assert_eq!(input.cell(0), Some('4'));
        assert_eq!(input.cell(1), Some('2'));
        assert_eq!(input.cell(2), None);
        assert_eq!(input.focused_index(), Some(4));
    }

    #[test]
    fn test_set_value_overwrites_previous_contents() {
        let mut input = OtpInput::new();
        input.set_value("123456");
        input.set_value("78");
        assert_eq!(input.value(), "78");
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_backspace_at_empty_cell_retreats_focus() {
        let mut input = OtpInput::new();
        input.set_value("12");
        input.focus(2);
        input.backspace_at_empty(2);
        assert_eq!(input.focused_index(), Some(1));
        // Buffer untouched.
        assert_eq!(input.value(), "12");
    }

    #[test]
    fn test_backspace_at_filled_cell_is_a_no_op() {
        let mut input = OtpInput::new();
        input.set_value("123");
        input.focus(1);
        input.backspace_at_empty(1);
        assert_eq!(input.focused_index(), Some(1));
    }

    #[test]
    fn test_backspace_at_first_cell_is_a_no_op() {
        let mut input = OtpInput::new();
        input.focus(0);
        input.backspace_at_empty(0);
        assert_eq!(input.focused_index(), Some(0));
    }

    #[test]
    fn test_disabled_input_ignores_user_operations() {
        let mut input = OtpInput::new();
        input.set_value("12");
        input.set_disabled(true);

        input.edit_cell(2, "3");
        input.paste("999999");
        input.backspace_at_empty(2);
        input.focus(0);

        assert_eq!(input.value(), "12");
        assert_eq!(input.focused_index(), None);

        // Owner-driven reset still works while disabled.
        input.set_value("");
        assert!(input.is_empty());
    }

    #[test]
    fn test_blur_clears_focus() {
        let mut input = OtpInput::new();
        input.focus(3);
        assert_eq!(input.focused_index(), Some(3));
        input.blur();
        assert_eq!(input.focused_index(), None);
    }

    #[test]
    fn test_out_of_range_operations_are_ignored() {
        let mut input = OtpInput::new();
        input.edit_cell(6, "1");
        input.focus(6);
        input.backspace_at_empty(6);
        assert!(input.is_empty());
        assert_eq!(input.focused_index(), None);
    }

    #[test]
    fn test_cell_views_reflect_focus_and_fill() {
        let mut input = OtpInput::new();
        input.set_value("12");
        input.focus(1);

        let views = input.cells();
        assert_eq!(views.len(), 6);
        assert!(views[0].filled && !views[0].focused);
        assert!(views[1].filled && views[1].focused);
        assert!(!views[2].filled && !views[2].focused);
        assert_eq!(views[1].digit, Some('2'));
    }

    #[test]
    fn test_clear_resets_every_cell() {
        let mut input = OtpInput::new();
        input.set_value("123456");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.value(), "");
    }
}
