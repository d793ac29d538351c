use std::cmp::Ordering;

use crate::fragment::Fragment;

/// Marker inserted between fragments whose horizontal gap indicates a
/// column boundary rather than a word break.
pub const COLUMN_SEPARATOR: &str = " / ";

/// Tuning knobs for the reconstruction pass. `line_tolerance` is the
/// vertical band (page units) within which fragments belong to one line;
/// renderers with inconsistent baselines need a wider band. `column_gap`
/// is the horizontal distance beyond which adjacent fragments are split
/// into separate columns.
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub line_tolerance: f32,
    pub column_gap: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            line_tolerance: 3.0,
            column_gap: 10.0,
        }
    }
}

impl LayoutOptions {
    pub fn with_line_tolerance(tolerance: f32) -> Self {
        LayoutOptions {
            line_tolerance: tolerance,
            ..LayoutOptions::default()
        }
    }
}

/// Rebuild text lines from positioned fragments: cluster by y within the
/// tolerance band (top of page first), order each cluster by x, and join
/// with either a space or the column separator depending on the gap.
pub fn lines_from_fragments(mut fragments: Vec<Fragment>, options: &LayoutOptions) -> Vec<String> {
    fragments.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut clusters: Vec<(f32, Vec<Fragment>)> = Vec::new();
    for fragment in fragments {
        match clusters.last_mut() {
            Some((anchor_y, group)) if (*anchor_y - fragment.y).abs() <= options.line_tolerance => {
                group.push(fragment);
            }
            _ => clusters.push((fragment.y, vec![fragment])),
        }
    }

    clusters
        .into_iter()
        .map(|(_, group)| join_line(group, options.column_gap))
        .filter(|line| !line.is_empty())
        .collect()
}

fn join_line(mut group: Vec<Fragment>, column_gap: f32) -> String {
    group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let mut line = String::new();
    let mut prev_end: Option<f32> = None;
    for fragment in group {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(end) = prev_end {
            let gap = fragment.x - end;
            line.push_str(if gap > column_gap {
                COLUMN_SEPARATOR
            } else {
                " "
            });
        }
        line.push_str(text);
        prev_end = Some(fragment.x + fragment.width);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32, width: f32) -> Fragment {
        Fragment {
            text: text.to_string(),
            x,
            y,
            width,
        }
    }

    #[test]
    fn clusters_fragments_on_the_same_baseline() {
        let lines = lines_from_fragments(
            vec![
                frag("CIELO", 60.0, 700.5, 30.0),
                frag("03/11/2025", 10.0, 700.0, 45.0),
                frag("150,00", 200.0, 699.2, 30.0),
            ],
            &LayoutOptions::default(),
        );
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("03/11/2025"));
    }

    #[test]
    fn splits_lines_outside_tolerance() {
        let lines = lines_from_fragments(
            vec![
                frag("first", 10.0, 700.0, 20.0),
                frag("second", 10.0, 680.0, 25.0),
            ],
            &LayoutOptions::default(),
        );
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn wider_tolerance_merges_ragged_baselines() {
        let frags = vec![
            frag("a", 10.0, 500.0, 5.0),
            frag("b", 30.0, 495.5, 5.0),
        ];
        let strict = lines_from_fragments(frags.clone(), &LayoutOptions::default());
        assert_eq!(strict.len(), 2);

        let loose = lines_from_fragments(frags, &LayoutOptions::with_line_tolerance(5.0));
        assert_eq!(loose.len(), 1);
    }

    #[test]
    fn top_of_page_comes_first() {
        let lines = lines_from_fragments(
            vec![
                frag("bottom", 10.0, 100.0, 20.0),
                frag("top", 10.0, 700.0, 20.0),
            ],
            &LayoutOptions::default(),
        );
        assert_eq!(lines, vec!["top".to_string(), "bottom".to_string()]);
    }

    #[test]
    fn large_gap_becomes_column_separator() {
        let lines = lines_from_fragments(
            vec![
                frag("03/11/2025", 10.0, 700.0, 45.0),
                frag("CR CPS", 58.0, 700.0, 30.0),   // gap of 3 → same column
                frag("1.234,56", 300.0, 700.0, 40.0), // gap of 212 → new column
            ],
            &LayoutOptions::default(),
        );
        assert_eq!(lines[0], "03/11/2025 CR CPS / 1.234,56");
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(lines_from_fragments(vec![], &LayoutOptions::default()).is_empty());
    }
}
