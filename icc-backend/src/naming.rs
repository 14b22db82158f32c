//! Label generation for lowered control flow
//!
//! `if`, `while` and value-producing comparisons each draw from their own
//! counter. Counters start at 1 and never reset, so every label in the
//! program is unique. `break` and `continue` find their targets on an
//! explicit stack of the loops currently being lowered.

use icc_common::LabelId;

/// Labels of one `if` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfLabels {
    pub false_label: String,
    pub end_label: String,
}

/// Labels of one `while` loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopLabels {
    pub test_label: String,
    pub end_label: String,
}

/// Labels of one comparison that materializes 0 or 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareLabels {
    pub true_label: String,
    pub false_label: String,
    pub end_label: String,
}

#[derive(Debug, Default)]
pub struct LabelGenerator {
    if_count: LabelId,
    while_count: LabelId,
    cmp_count: LabelId,
    loops: Vec<LoopLabels>,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_if(&mut self) -> IfLabels {
        self.if_count += 1;
        IfLabels {
            false_label: format!("_if_false_label_{}", self.if_count),
            end_label: format!("_if_end_label_{}", self.if_count),
        }
    }

    pub fn next_while(&mut self) -> LoopLabels {
        self.while_count += 1;
        LoopLabels {
            test_label: format!("_while_test_label_{}", self.while_count),
            end_label: format!("_while_end_label_{}", self.while_count),
        }
    }

    pub fn next_compare(&mut self) -> CompareLabels {
        self.cmp_count += 1;
        CompareLabels {
            true_label: format!("_cmp_true_label_{}", self.cmp_count),
            false_label: format!("_cmp_false_label_{}", self.cmp_count),
            end_label: format!("_cmp_end_label_{}", self.cmp_count),
        }
    }

    pub fn enter_loop(&mut self, labels: LoopLabels) {
        self.loops.push(labels);
    }

    pub fn exit_loop(&mut self) -> Option<LoopLabels> {
        self.loops.pop()
    }

    /// Innermost loop being lowered
    pub fn current_loop(&self) -> Option<&LoopLabels> {
        self.loops.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counters_are_independent() {
        let mut gen = LabelGenerator::new();
        assert_eq!(gen.next_if().false_label, "_if_false_label_1");
        assert_eq!(gen.next_while().test_label, "_while_test_label_1");
        assert_eq!(gen.next_if().end_label, "_if_end_label_2");
        assert_eq!(gen.next_compare().true_label, "_cmp_true_label_1");
        assert_eq!(gen.next_while().end_label, "_while_end_label_2");
    }

    #[test]
    fn test_loop_stack() {
        let mut gen = LabelGenerator::new();
        assert_eq!(gen.current_loop(), None);

        let outer = gen.next_while();
        gen.enter_loop(outer.clone());
        let inner = gen.next_while();
        gen.enter_loop(inner.clone());
        assert_eq!(gen.current_loop(), Some(&inner));

        assert_eq!(gen.exit_loop(), Some(inner));
        assert_eq!(gen.current_loop(), Some(&outer));
    }
}
