use serde_json::Value;

/// One step of a JSON path such as `items[0].name` or `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
    /// `len()` or `size()`: element count of an array, object or string.
    Len,
}

/// Split a dotted path into segments. Panics on malformed indices.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        if part == "len()" || part == "size()" {
            segments.push(PathSegment::Len);
            continue;
        }
        let (key, mut indices) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(PathSegment::Key(key.to_string()));
        }
        while let Some(rest) = indices.strip_prefix('[') {
            let close = rest
                .find(']')
                .unwrap_or_else(|| panic!("unclosed '[' in JSON path \"{path}\""));
            let index = rest[..close]
                .parse()
                .unwrap_or_else(|_| panic!("non-numeric index in JSON path \"{path}\""));
            segments.push(PathSegment::Index(index));
            indices = &rest[close + 1..];
        }
    }
    segments
}

/// Resolve `path` against `root`. Missing keys and indices resolve to `null`.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root.clone();
    for segment in parse_path(path) {
        current = match segment {
            PathSegment::Key(key) => current.get(&key).cloned().unwrap_or(Value::Null),
            PathSegment::Index(index) => current.get(index).cloned().unwrap_or(Value::Null),
            PathSegment::Len => {
                let len = match &current {
                    Value::Array(items) => items.len(),
                    Value::Object(fields) => fields.len(),
                    Value::String(text) => text.len(),
                    other => panic!("len() on a non-collection in \"{path}\": {other}"),
                };
                Value::from(len)
            }
        };
    }
    current
}
