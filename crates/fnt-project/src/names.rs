//! Filename legalization and collision resolution.
//!
//! Resource names double as file names when a project is exported, so they
//! are kept to a conservative character set and must be unique across the
//! whole project, regardless of resource kind.
//!
//! - [`sanitize_filename`] strips everything outside `[A-Za-z0-9-_.]`. It is
//!   applied to user labels (e.g. a difficulty name) before they become part
//!   of a filename, never to names already stored in the tree.
//! - [`unique_filename`] appends underscores to the stem until the name is
//!   free: `easy.json`, `easy_.json`, `easy__.json`, ...

/// Returns `true` for characters allowed in resource filenames.
fn is_legal(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')
}

/// Drop every character outside `[A-Za-z0-9-_.]`.
///
/// ```
/// use fnt_project::names::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Song!! (v2).ogg"), "MySongv2.ogg");
/// assert_eq!(sanitize_filename("Ex-Hard_2"), "Ex-Hard_2");
/// ```
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars().filter(|&ch| is_legal(ch)).collect()
}

/// Rewrite `candidate` until `exists` no longer reports it as taken.
///
/// Each round splits the name on its last `.` into stem and extension and
/// tries `stem + "_." + extension`. A name without a dot is all stem with an
/// empty extension, so `foo` becomes `foo_.` (trailing dot included, which
/// saved documents rely on). The stem grows by one character per round and
/// the set of taken names is finite, so the loop terminates.
///
/// ```
/// use fnt_project::names::unique_filename;
///
/// let taken = ["easy.json", "easy_.json"];
/// assert_eq!(unique_filename("easy.json", |n| taken.contains(&n)), "easy__.json");
/// assert_eq!(unique_filename("hard.json", |n| taken.contains(&n)), "hard.json");
/// ```
pub fn unique_filename(candidate: &str, exists: impl Fn(&str) -> bool) -> String {
    let mut name = candidate.to_string();
    while exists(&name) {
        let (stem, extension) = name.rsplit_once('.').unwrap_or((name.as_str(), ""));
        let next = format!("{stem}_.{extension}");
        name = next;
    }
    name
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn sanitize_keeps_only_legal_characters() {
        assert_eq!(sanitize_filename("My Song!! (v2).ogg"), "MySongv2.ogg");
        assert_eq!(sanitize_filename("a/b\\c:d"), "abcd");
        assert_eq!(sanitize_filename("ünïcödé"), "ncd");
        assert_eq!(sanitize_filename("!!!"), "");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_filename("Special (Hidden) #1.json");
        assert_eq!(sanitize_filename(&once), once);
    }

    #[test]
    fn free_name_is_unchanged() {
        let set = taken(&["meta.json"]);
        assert_eq!(unique_filename("easy.json", |n| set.contains(n)), "easy.json");
    }

    #[test]
    fn underscores_accumulate() {
        let set = taken(&["easy.json", "easy_.json", "easy__.json"]);
        assert_eq!(unique_filename("easy.json", |n| set.contains(n)), "easy___.json");
    }

    #[test]
    fn splits_on_last_dot() {
        let set = taken(&["song.v2.ogg"]);
        assert_eq!(unique_filename("song.v2.ogg", |n| set.contains(n)), "song.v2_.ogg");
    }

    #[test]
    fn name_without_dot_gains_trailing_dot() {
        let set = taken(&["foo"]);
        assert_eq!(unique_filename("foo", |n| set.contains(n)), "foo_.");

        let set = taken(&["foo", "foo_."]);
        assert_eq!(unique_filename("foo", |n| set.contains(n)), "foo__.");
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let set = taken(&["Easy.json"]);
        assert_eq!(unique_filename("easy.json", |n| set.contains(n)), "easy.json");
    }

    proptest! {
        #[test]
        fn result_is_always_free(existing in proptest::collection::hash_set("[a-z_]{0,4}(\\.[a-z]{0,3})?", 0..30), candidate in "[a-z_]{0,4}(\\.[a-z]{0,3})?") {
            let name = unique_filename(&candidate, |n| existing.contains(n));
            prop_assert!(!existing.contains(&name));
            if !existing.contains(&candidate) {
                prop_assert_eq!(name, candidate);
            }
        }
    }
}
