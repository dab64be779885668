//! Delimited text splitting

const CANDIDATES: [char; 3] = [',', ';', '\t'];

/// Non-blank lines inspected when sniffing the delimiter
const SNIFF_LINES: usize = 10;

/// Guess the delimiter from the leading non-blank lines
///
/// Picks whichever of comma, semicolon or tab occurs most often outside
/// quotes. Defaults to comma.
pub fn detect_delimiter(text: &str) -> char {
    let sample: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best = (',', 0usize);
    for candidate in CANDIDATES {
        let count: usize = sample
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .sum();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

fn count_unquoted(line: &str, target: char) -> usize {
    let mut in_quotes = false;
    line.chars()
        .filter(|&c| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            !in_quotes && c == target
        })
        .count()
}

/// Split one record on `delimiter`, honouring double quotes
///
/// A doubled quote inside a quoted field is a literal quote. Fields are
/// trimmed.
pub fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Split `text` into records, skipping blank lines
pub fn records(text: &str, delimiter: char) -> Vec<Vec<String>> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| split_record(l, delimiter))
        .collect()
}
