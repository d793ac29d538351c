/// Helpers for fixed-width TXT statements: column boundaries are derived
/// from the positions of the header labels themselves, then every data
/// line is sliced at those positions. Offsets are in characters, not
/// bytes — accented header labels must not skew the columns.

/// Decode statement bytes: UTF-8 when valid, otherwise Latin-1 (the
/// usual encoding of legacy bank exports).
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

/// Character offsets where each label starts in the header line, in the
/// order given. `None` when a label is absent or the labels are not in
/// left-to-right order.
pub fn column_offsets(header: &str, labels: &[&str]) -> Option<Vec<usize>> {
    let mut offsets = Vec::with_capacity(labels.len());
    for label in labels {
        let byte_pos = header.find(label)?;
        offsets.push(header[..byte_pos].chars().count());
    }
    if !offsets.windows(2).all(|w| w[0] < w[1]) {
        return None;
    }
    Some(offsets)
}

/// Slice a data line at the header-derived offsets; each field is
/// trimmed. Short lines yield empty trailing fields.
pub fn slice_columns(line: &str, offsets: &[usize]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    (0..offsets.len())
        .map(|i| {
            let start = offsets[i].min(chars.len());
            let end = offsets
                .get(i + 1)
                .copied()
                .unwrap_or(chars.len())
                .min(chars.len());
            chars[start..end.max(start)]
                .iter()
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect()
}

/// The dashed rule conventionally printed under a header line.
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| matches!(c, '-' | '=' | '+' | ' '))
}
