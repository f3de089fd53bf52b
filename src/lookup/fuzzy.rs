// Sun Jan 18 2026 - Alex

pub fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Best ratio of the shorter string against every same-length window of the longer one.
fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }

    long.windows(short.len())
        .map(|window| ratio(short, window))
        .fold(0.0, f64::max)
}

fn normalize(s: &str) -> Vec<char> {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .collect()
}

/// Relevance of `candidate` to a partially typed `query`, from 0 to 100.
pub fn score(query: &str, candidate: &str) -> u8 {
    let query = normalize(query);
    let candidate = normalize(candidate);

    let best = ratio(&query, &candidate).max(partial_ratio(&query, &candidate));
    (best * 100.0).round().clamp(0.0, 100.0) as u8
}
