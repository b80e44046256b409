//! Text-field sanitization for submitted license keys.
//!
//! Follows the host's single-line text sanitizer: a `<` that does not open a
//! complete tag is encoded as `&lt;`, `<script>` and `<style>` elements are
//! dropped together with their contents, remaining tags are stripped, runs of
//! whitespace collapse to one space, percent-encoded octets are removed and
//! the result is trimmed. The output is a fixed point, so re-submitting a
//! stored key leaves it unchanged.
//!
//! Only the `<` of an incomplete tag is entity-encoded; other characters in
//! that run are kept as submitted.

/// Sanitize a raw form value into the string that gets persisted.
pub fn sanitize_text_field(raw: &str) -> String {
    let stripped = if raw.contains('<') {
        let encoded = encode_incomplete_tags(raw);
        strip_tags(&strip_script_style(&encoded))
    } else {
        raw.to_string()
    };
    let collapsed = collapse_whitespace(&stripped);

    let mut filtered = collapsed;
    let mut found_octet = false;
    loop {
        let next = remove_octets(&filtered);
        if next == filtered {
            break;
        }
        found_octet = true;
        filtered = next;
    }

    if found_octet {
        collapse_spaces(&filtered)
    } else {
        filtered
    }
}

/// Encode every `<` whose run reaches another `<` or the end of input before
/// a `>`.
fn encode_incomplete_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let run = &rest[open + 1..];
        match run.find(['<', '>']) {
            Some(end) if run.as_bytes()[end] == b'>' => {
                out.push_str(&rest[open..open + 1 + end + 1]);
                rest = &run[end + 1..];
            }
            Some(end) => {
                out.push_str("&lt;");
                out.push_str(&run[..end]);
                rest = &run[end..];
            }
            None => {
                out.push_str("&lt;");
                out.push_str(run);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Drop `<script ...>...</script>` and `<style ...>...</style>`, matched
/// case-insensitively. An element with no closing tag is left to
/// [`strip_tags`].
fn strip_script_style(input: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `input`.
    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let next = ["script", "style"]
            .iter()
            .filter_map(|name| {
                lower[pos..]
                    .find(&format!("<{}", name))
                    .map(|at| (pos + at, *name))
            })
            .min_by_key(|(at, _)| *at);

        let Some((start, name)) = next else {
            break;
        };
        let element_end = lower[start..].find('>').and_then(|open_end| {
            let body = start + open_end + 1;
            let closing = format!("</{}>", name);
            lower[body..]
                .find(&closing)
                .map(|at| body + at + closing.len())
        });

        match element_end {
            Some(end) => {
                out.push_str(&input[pos..start]);
                pos = end;
            }
            None => {
                let skip = start + 1 + name.len();
                out.push_str(&input[pos..skip]);
                pos = skip;
            }
        }
    }
    out.push_str(&input[pos..]);
    out
}

/// Drop `<...>` tags; a `<` that never closes is entity-encoded.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str("&lt;");
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(input: &str) -> String {
    input
        .split(['\r', '\n', '\t', ' '])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_spaces(input: &str) -> String {
    input
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove every `%XX` hex octet in a single left-to-right pass.
fn remove_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    // Only ASCII triples are removed, so the remainder is still UTF-8.
    String::from_utf8(out).unwrap_or_default()
}
