//! Property-based tests for alignment and layout using proptest.

use proptest::prelude::*;

use consolegrid::align::{align, display_width};
use consolegrid::layout::{clamp_budget, plan, MeasuredColumn};

// ============================================================================
// Strategies
// ============================================================================

fn measured_strategy() -> impl Strategy<Value = MeasuredColumn> {
    ("[A-Za-z]{0,12}", 0usize..200).prop_map(|(name, content_width)| MeasuredColumn {
        name,
        content_width,
        auto_generated: true,
    })
}

// ============================================================================
// Alignment
// ============================================================================

proptest! {
    #[test]
    fn aligned_rows_have_cell_width(source in "[a-z0-9 ]{0,60}", width in 1usize..30) {
        let aligned = align(&source, width);
        for line in aligned.lines() {
            prop_assert_eq!(display_width(line), width);
        }
    }

    #[test]
    fn aligned_text_covers_all_rows(source in "[a-z0-9]{0,60}", width in 1usize..30) {
        let aligned = align(&source, width);
        let len = source.chars().count();
        prop_assert_eq!(aligned.row_count(), len.div_ceil(width).max(1));
        prop_assert_eq!(display_width(&aligned.text()), aligned.row_count() * width);
        prop_assert_eq!(aligned.unused_padding(), aligned.row_count() * width - len);
    }

    #[test]
    fn aligned_text_keeps_source_centered(source in "[a-z]{1,40}", width in 1usize..30) {
        let text = align(&source, width).text();
        let left = text.len() - text.trim_start().len();
        let right = text.len() - text.trim_end().len();
        prop_assert_eq!(text.trim(), source.as_str());
        prop_assert!(left == right || left == right + 1);
    }

    #[test]
    fn align_is_deterministic(source in ".{0,20}", width in 0usize..20) {
        prop_assert_eq!(align(&source, width), align(&source, width));
    }
}

// ============================================================================
// Layout
// ============================================================================

proptest! {
    #[test]
    fn planned_widths_are_positive(
        columns in prop::collection::vec(measured_strategy(), 0..8),
        available in 0usize..400,
    ) {
        let layout = plan(&columns, available, None);
        prop_assert_eq!(layout.columns.len(), columns.len());
        for column in &layout.columns {
            prop_assert!(column.rendered_width >= 1);
            prop_assert_eq!(column.header.cell_width(), column.rendered_width);
        }
        prop_assert_eq!(layout.total_width, layout.widths().iter().sum::<usize>());
    }

    #[test]
    fn fitting_columns_keep_natural_widths(
        columns in prop::collection::vec(measured_strategy(), 1..8),
    ) {
        let natural: usize = columns.iter().map(|c| c.content_width).sum();
        let layout = plan(&columns, natural, None);
        prop_assert!(!layout.clamped);
        for (planned, measured) in layout.columns.iter().zip(&columns) {
            prop_assert_eq!(planned.rendered_width, measured.content_width.max(1));
        }
    }

    #[test]
    fn clamped_columns_take_the_budget(
        columns in prop::collection::vec(measured_strategy(), 1..8),
        available in 0usize..400,
    ) {
        let layout = plan(&columns, available, None);
        if layout.clamped {
            let budget = clamp_budget(available, columns.len());
            for column in &layout.columns {
                let expected = if column.content_width > budget {
                    budget
                } else {
                    column.content_width.max(1)
                };
                prop_assert_eq!(column.rendered_width, expected);
            }
        }
    }

    #[test]
    fn row_number_column_comes_first(
        columns in prop::collection::vec(measured_strategy(), 0..5),
        count in 1usize..100_000,
    ) {
        let layout = plan(&columns, 10_000, Some(count));
        let has_nr = columns.iter().any(|c| c.name == "Nr");
        prop_assert_eq!(layout.columns.len(), columns.len() + usize::from(!has_nr));
        if !has_nr {
            prop_assert_eq!(layout.columns[0].name.as_str(), "Nr");
            prop_assert_eq!(layout.columns[0].rendered_width, count.to_string().len().max(2));
        }
    }
}
