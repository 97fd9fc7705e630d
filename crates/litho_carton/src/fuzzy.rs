//! Fuzzy name matching for "did you mean" suggestions.

/// Levenshtein distance over chars, case-insensitive.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().map(|c| c.to_ascii_lowercase()).collect();
    let b: Vec<char> = b.chars().map(|c| c.to_ascii_lowercase()).collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Find the closest candidate to `name`.
///
/// A candidate qualifies when its distance is at most `max_distance` and
/// smaller than the length of `name`, so very short names never get
/// unrelated suggestions. Ties keep the first candidate.
pub fn suggest<'c, I>(name: &str, candidates: I, max_distance: usize) -> Option<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    let limit = max_distance.min(name.chars().count().saturating_sub(1));
    let mut best: Option<(&'c str, usize)> = None;

    for candidate in candidates {
        if candidate.eq_ignore_ascii_case(name) {
            continue;
        }
        let distance = edit_distance(name, candidate);
        if distance > limit {
            continue;
        }
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(candidate, _)| candidate)
}
