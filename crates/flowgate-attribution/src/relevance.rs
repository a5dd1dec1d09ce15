use flowgate_types::Fragment;

/// Trailing words that link a fragment's description to the adjacent
/// fragment of the same diagnostic ("incompatible with" -> the next
/// fragment continues the same point).
pub const CONNECTIVES: &[&str] = &["with", "found", "in"];

/// True when the description's final whitespace-delimited token is a
/// connective word. The match is case-sensitive and token-exact: "within"
/// does not count.
pub fn ends_with_connective(descr: &str) -> bool {
    match descr.split_whitespace().next_back() {
        Some(word) => CONNECTIVES.contains(&word),
        None => false,
    }
}

/// Fatal fragments describe checker-level failure rather than a type error
/// in user code; they are global, never file-scoped.
pub fn is_fatal(descr: &str) -> bool {
    descr.to_ascii_lowercase().contains("fatal")
}

/// Decide whether the fragment at `index` is about `target`.
///
/// A window-of-3 scan over the ordered fragment sequence:
/// - direct: the fragment's own path equals the target, byte-for-byte
///   (the checker formats paths consistently; no normalization);
/// - backward transfer: the immediately preceding fragment ends in a
///   connective word and its path equals the target;
/// - forward transfer: this fragment ends in a connective word and the
///   immediately following fragment's path equals the target;
/// - fatal fragments are relevant for every target.
pub fn fragment_relevant(fragments: &[Fragment], index: usize, target: &str) -> bool {
    let Some(current) = fragments.get(index) else {
        return false;
    };

    if is_fatal(&current.descr) {
        return true;
    }
    if current.path == target {
        return true;
    }

    if index > 0 {
        let prev = &fragments[index - 1];
        if ends_with_connective(&prev.descr) && prev.path == target {
            return true;
        }
    }

    if ends_with_connective(&current.descr) {
        if let Some(next) = fragments.get(index + 1) {
            if next.path == target {
                return true;
            }
        }
    }

    false
}
