//! Case-insensitive path resolution over configuration trees
//!
//! Paths use `.` separators and may carry `[index]` brackets, e.g.
//! `database.replicas[0].host`. Segments are matched against mapping keys
//! after lower-casing both sides, and the stored key keeps its original
//! casing on every write.

use serde_json::{Map, Value};

/// Split a dotted/bracketed path into its segments.
///
/// `[word]` becomes `.word`, a single leading `.` is dropped and the rest is
/// split on `.`. Never fails; odd input just yields odd segments.
pub fn normalize(path: &str) -> Vec<String> {
    let mut flat = String::with_capacity(path.len() + 1);
    let mut rest = path;

    while let Some(open) = rest.find('[') {
        flat.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let word_len = after
            .find(|c: char| !is_word_char(c))
            .unwrap_or(after.len());

        if word_len > 0 && after[word_len..].starts_with(']') {
            flat.push('.');
            flat.push_str(&after[..word_len]);
            rest = &after[word_len + 1..];
        } else {
            flat.push('[');
            rest = after;
        }
    }
    flat.push_str(rest);

    let flat = flat.strip_prefix('.').unwrap_or(&flat);
    flat.split('.').map(str::to_string).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Find the first key of `map` equal to `segment` ignoring case.
///
/// Enumeration order decides between keys that only differ in case.
pub fn find_key<'a>(map: &'a Map<String, Value>, segment: &str) -> Option<&'a String> {
    let wanted = segment.to_lowercase();
    map.keys().find(|key| key.to_lowercase() == wanted)
}

/// Look up `path` in `tree`, matching keys case-insensitively.
///
/// Returns `None` as soon as a segment has no match or the current node is
/// not a mapping.
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    normalize(path).iter().try_fold(tree, |node, segment| {
        let map = node.as_object()?;
        map.get(find_key(map, segment)?)
    })
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a>(tree: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut node = tree;
    for segment in normalize(path) {
        let map = node.as_object_mut()?;
        let key = find_key(map, &segment)?.clone();
        node = map.get_mut(&key)?;
    }
    Some(node)
}

/// Overwrite the value at `path`, keeping the stored key casing.
///
/// Only existing keys are written: when the terminal segment has no
/// case-insensitive match the tree is left untouched and `false` is
/// returned. Missing intermediate levels are never created since a new,
/// empty mapping could not hold the terminal key anyway.
pub fn assign(tree: &mut Value, path: &str, value: Value) -> bool {
    let mut segments = normalize(path);
    let Some(terminal) = segments.pop() else {
        return false;
    };

    let mut node = tree;
    for segment in &segments {
        let Some(map) = node.as_object_mut() else {
            return false;
        };
        let Some(key) = find_key(map, segment).cloned() else {
            return false;
        };
        let Some(next) = map.get_mut(&key) else {
            return false;
        };
        node = next;
    }

    let Some(map) = node.as_object_mut() else {
        return false;
    };
    match find_key(map, &terminal).cloned() {
        Some(key) => {
            map.insert(key, value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Database": { "ConString": "x", "Pool": { "Max": 4 } },
            "servers": [ { "host": "a" } ],
            "name": "svc"
        })
    }

    #[test]
    fn test_normalize_brackets_and_dots() {
        assert_eq!(normalize("a.b[0].c"), vec!["a", "b", "0", "c"]);
        assert_eq!(normalize("a[key]"), vec!["a", "key"]);
        assert_eq!(normalize(".a.b"), vec!["a", "b"]);
        assert_eq!(normalize("[0]"), vec!["0"]);
    }

    #[test]
    fn test_normalize_is_total_on_malformed_input() {
        assert_eq!(normalize(""), vec![""]);
        assert_eq!(normalize("a[b"), vec!["a[b"]);
        assert_eq!(normalize("a[]"), vec!["a[]"]);
        assert_eq!(normalize("a[b-c]"), vec!["a[b-c]"]);
        assert_eq!(normalize("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let tree = sample();
        assert_eq!(resolve(&tree, "Database.ConString"), Some(&json!("x")));
        assert_eq!(resolve(&tree, "database.constring"), Some(&json!("x")));
        assert_eq!(resolve(&tree, "DATABASE.POOL.MAX"), Some(&json!(4)));
        assert_eq!(resolve(&tree, "database.pool"), Some(&json!({ "Max": 4 })));
    }

    #[test]
    fn test_resolve_missing_paths() {
        let tree = sample();
        assert_eq!(resolve(&tree, "database.missing"), None);
        assert_eq!(resolve(&tree, "name.deeper"), None);
        assert_eq!(resolve(&tree, "unknown.field"), None);
        // Sequences are not traversed
        assert_eq!(resolve(&tree, "servers[0].host"), None);
    }

    #[test]
    fn test_resolve_mut_writes_through() {
        let mut tree = sample();
        *resolve_mut(&mut tree, "database.pool.max").unwrap() = json!(16);
        assert_eq!(tree["Database"]["Pool"]["Max"], json!(16));
        assert!(resolve_mut(&mut tree, "database.nope").is_none());
    }

    #[test]
    fn test_assign_keeps_key_casing() {
        let mut tree = sample();
        assert!(assign(&mut tree, "database.constring", json!("new")));
        assert_eq!(tree["Database"]["ConString"], json!("new"));
        let keys: Vec<_> = tree["Database"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ConString", "Pool"]);
    }

    #[test]
    fn test_assign_replaces_structured_values() {
        let mut tree = sample();
        assert!(assign(&mut tree, "database.pool", json!("flat")));
        assert_eq!(tree["Database"]["Pool"], json!("flat"));
    }

    #[test]
    fn test_assign_never_creates_terminal_keys() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(!assign(&mut tree, "database.newkey", json!(1)));
        assert!(!assign(&mut tree, "missing.level.key", json!(1)));
        assert!(!assign(&mut tree, "name.inner", json!(1)));
        assert_eq!(tree, before);
    }
}
