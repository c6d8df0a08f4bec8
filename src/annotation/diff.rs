//! Word-level diff between the previous and current source text, rendered as a
//! short "Added / Removed" note for translators.

use crate::text::clean_comment;

/// Largest LCS table built for one changed span. Beyond it the span is
/// reported as removed then added as a whole.
const MAX_TABLE_CELLS: usize = 1 << 20;

/// Kind of a diff part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Equal,
    Added,
    Removed,
}

/// A run of consecutive tokens sharing the same [`ChangeKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPart {
    pub kind: ChangeKind,
    pub value: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Word,
    Space,
    Symbol,
}

fn classify(c: char) -> TokenClass {
    if c.is_alphanumeric() || c == '_' {
        TokenClass::Word
    } else if c.is_whitespace() {
        TokenClass::Space
    } else {
        TokenClass::Symbol
    }
}

/// Splits text into word runs, whitespace runs and single symbols.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenClass> = None;

    for (offset, c) in text.char_indices() {
        let class = classify(c);
        let continues = current == Some(class) && class != TokenClass::Symbol;
        if !continues && offset > start {
            tokens.extend(text.get(start..offset));
            start = offset;
        }
        current = Some(class);
    }
    tokens.extend(text.get(start..).filter(|rest| !rest.is_empty()));
    tokens
}

/// Diffs two texts token by token.
///
/// Inside a changed hunk removals are emitted before additions.
#[must_use]
pub fn diff_words(previous: &str, current: &str) -> Vec<DiffPart> {
    let old = tokenize(previous);
    let new = tokenize(current);

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(old.len().min(new.len()) - prefix)
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = old.get(prefix..old.len() - suffix).unwrap_or_default();
    let new_middle = new.get(prefix..new.len() - suffix).unwrap_or_default();

    let mut ops: Vec<(ChangeKind, &str)> = Vec::with_capacity(old.len().max(new.len()));
    ops.extend(old.iter().take(prefix).map(|t| (ChangeKind::Equal, *t)));
    ops.extend(lcs_ops(old_middle, new_middle));
    ops.extend(old.iter().skip(old.len() - suffix).map(|t| (ChangeKind::Equal, *t)));

    coalesce(ops)
}

/// Edit script over two token slices from a longest-common-subsequence table.
fn lcs_ops<'t>(old: &[&'t str], new: &[&'t str]) -> Vec<(ChangeKind, &'t str)> {
    let width = new.len() + 1;
    if (old.len() + 1).saturating_mul(width) > MAX_TABLE_CELLS {
        return replace_whole(old, new);
    }
    // table[i * width + j] = LCS length of old[i..] and new[j..]
    let mut table = vec![0_u32; (old.len() + 1) * width];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            let value = if old.get(i) == new.get(j) {
                table.get((i + 1) * width + j + 1).copied().unwrap_or(0) + 1
            } else {
                let down = table.get((i + 1) * width + j).copied().unwrap_or(0);
                let right = table.get(i * width + j + 1).copied().unwrap_or(0);
                down.max(right)
            };
            if let Some(cell) = table.get_mut(i * width + j) {
                *cell = value;
            }
        }
    }
    let at = |i: usize, j: usize| table.get(i * width + j).copied().unwrap_or(0);

    let mut ops = Vec::with_capacity(old.len() + new.len());
    let (mut i, mut j) = (0, 0);
    while let (Some(a), Some(b)) = (old.get(i), new.get(j)) {
        if a == b {
            ops.push((ChangeKind::Equal, *a));
            i += 1;
            j += 1;
        } else if at(i + 1, j) >= at(i, j + 1) {
            ops.push((ChangeKind::Removed, *a));
            i += 1;
        } else {
            ops.push((ChangeKind::Added, *b));
            j += 1;
        }
    }
    ops.extend(old.iter().skip(i).map(|t| (ChangeKind::Removed, *t)));
    ops.extend(new.iter().skip(j).map(|t| (ChangeKind::Added, *t)));
    ops
}

/// Every old token removed, then every new token added.
fn replace_whole<'t>(old: &[&'t str], new: &[&'t str]) -> Vec<(ChangeKind, &'t str)> {
    old.iter()
        .map(|t| (ChangeKind::Removed, *t))
        .chain(new.iter().map(|t| (ChangeKind::Added, *t)))
        .collect()
}

/// Joins consecutive operations of the same kind into parts.
///
/// Removals and additions of one hunk are grouped so a replaced phrase reads
/// as one removed part followed by one added part.
fn coalesce(ops: Vec<(ChangeKind, &str)>) -> Vec<DiffPart> {
    let mut parts: Vec<DiffPart> = Vec::new();
    let mut pending_added: Option<DiffPart> = None;

    for (kind, token) in ops {
        if kind == ChangeKind::Added {
            pending_added
                .get_or_insert_with(|| DiffPart { kind, value: String::new() })
                .value
                .push_str(token);
            continue;
        }
        if kind == ChangeKind::Equal
            && let Some(added) = pending_added.take()
        {
            parts.push(added);
        }
        match parts.last_mut() {
            Some(last) if last.kind == kind => last.value.push_str(token),
            _ => parts.push(DiffPart { kind, value: token.to_string() }),
        }
    }
    parts.extend(pending_added);
    parts
}

/// Describes how `current` differs from `previous` for a translator.
///
/// Returns `Added: ...` and/or `Removed: ...` paragraphs, or an empty string
/// when nothing but whitespace changed.
#[must_use]
pub fn describe_change(previous: &str, current: &str) -> String {
    let mut added = String::new();
    let mut removed = String::new();

    for part in diff_words(previous, current) {
        if part.value.trim().is_empty() {
            continue;
        }
        let bucket = match part.kind {
            ChangeKind::Added => &mut added,
            ChangeKind::Removed => &mut removed,
            ChangeKind::Equal => continue,
        };
        bucket.push(' ');
        bucket.push_str(&part.value);
    }

    [("Added", added), ("Removed", removed)]
        .into_iter()
        .filter_map(|(heading, bucket)| {
            let cleaned = single_line(&clean_comment(&bucket));
            (!cleaned.is_empty()).then(|| format!("{heading}: {cleaned}"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
