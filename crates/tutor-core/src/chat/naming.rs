//! Chat name generation.

/// Returns the lowest-numbered `"<prefix> <n>"` (n >= 1) for which `taken` is false.
pub fn next_numbered_name<F>(prefix: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut n = 1usize;
    loop {
        let candidate = format!("{} {}", prefix, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Resolves a collision by appending `" (2)"`, `" (3)"`, ... to `name`.
///
/// Returns `name` unchanged when it is free.
pub fn disambiguate<F>(name: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !taken(name) {
        return name.to_string();
    }
    let mut i = 2usize;
    loop {
        let candidate = format!("{} ({})", name, i);
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}
