//! Slug derivation
//!
//! Slugs are derived deterministically from display names: lowercase,
//! trimmed, accents folded to ASCII, whitespace runs collapsed to single
//! hyphens, anything that is not a word character or hyphen stripped,
//! repeated hyphens collapsed. The derivation is idempotent so re-saving
//! an unchanged name never changes the slug.

/// Derive a URL-safe slug from a display name.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = false;

    for ch in text.trim().to_lowercase().chars() {
        let mapped = if ch.is_whitespace() {
            '-'
        } else {
            fold_accent(ch)
        };

        if mapped == '-' {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
            continue;
        }

        // Word characters only: alphanumerics and underscore, matching the
        // backend's slug columns. Anything else is dropped.
        if mapped.is_ascii_alphanumeric() || mapped == '_' {
            slug.push(mapped);
            last_was_hyphen = false;
        }
    }

    slug
}

/// Map the Latin-1 accented letters that show up in Portuguese course
/// titles to their base ASCII letter. Anything else passes through.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => ch,
    }
}
