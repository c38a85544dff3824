use sha2::{Digest, Sha256};

const MAX_SLUG_LEN: usize = 48;

/// Deterministic file name for a detached preview:
/// `{slug(description)}--{short_hash(code)}.html`.
pub fn preview_filename(description: &str, code: &str) -> String {
    format!("{}--{}.html", slugify(description), short_hash(code))
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("component");
    }
    slug
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
