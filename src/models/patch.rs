//! JSON patch items (RFC 6902) used by partial-update requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    Add,
    Copy,
    Move,
    Remove,
    Replace,
    Test,
}

/// One operation of a patch list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchItem {
    pub op: PatchOperation,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("invalid JSON pointer {0:?}")]
    InvalidPointer(String),
    #[error("path {0:?} does not exist")]
    PathNotFound(String),
    #[error("{op:?} at {path:?} requires a \"{member}\" member")]
    MissingMember {
        op: PatchOperation,
        path: String,
        member: &'static str,
    },
    #[error("cannot move {from:?} into its own child {path:?}")]
    MoveIntoChild { from: String, path: String },
    #[error("test failed at {0:?}")]
    TestFailed(String),
}

/// Apply `items` in order to a copy of `doc`.
///
/// Either every item applies and the patched document is returned, or `doc`
/// is left as it was.
pub fn apply_patch(doc: &Value, items: &[PatchItem]) -> Result<Value, PatchError> {
    let mut patched = doc.clone();
    for item in items {
        apply_item(&mut patched, item)?;
    }
    Ok(patched)
}

fn apply_item(doc: &mut Value, item: &PatchItem) -> Result<(), PatchError> {
    let path = item.path.as_str();
    match item.op {
        PatchOperation::Add => add(doc, path, required_value(item)?),
        PatchOperation::Remove => remove(doc, path).map(drop),
        PatchOperation::Replace => {
            let value = required_value(item)?;
            let target = doc
                .pointer_mut(path)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
            *target = value;
            Ok(())
        }
        PatchOperation::Move => {
            let from = required_from(item)?;
            if path.starts_with(from) && path[from.len()..].starts_with('/') {
                return Err(PatchError::MoveIntoChild {
                    from: from.to_string(),
                    path: path.to_string(),
                });
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy => {
            let from = required_from(item)?;
            let value = doc
                .pointer(from)
                .cloned()
                .ok_or_else(|| PatchError::PathNotFound(from.to_string()))?;
            add(doc, path, value)
        }
        PatchOperation::Test => {
            let expected = required_value(item)?;
            match doc.pointer(path) {
                Some(actual) if *actual == expected => Ok(()),
                _ => Err(PatchError::TestFailed(path.to_string())),
            }
        }
    }
}

fn required_value(item: &PatchItem) -> Result<Value, PatchError> {
    item.value.clone().ok_or_else(|| PatchError::MissingMember {
        op: item.op,
        path: item.path.clone(),
        member: "value",
    })
}

fn required_from(item: &PatchItem) -> Result<&str, PatchError> {
    item.from.as_deref().ok_or_else(|| PatchError::MissingMember {
        op: item.op,
        path: item.path.clone(),
        member: "from",
    })
}

/// Split a non-root pointer into its (still escaped) parent and its last,
/// unescaped reference token.
fn split_pointer(path: &str) -> Result<(&str, String), PatchError> {
    if !path.starts_with('/') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    let idx = path.rfind('/').unwrap_or(0);
    let token = path[idx + 1..].replace("~1", "/").replace("~0", "~");
    Ok((&path[..idx], token))
}

fn array_index(token: &str, len: usize, path: &str) -> Result<usize, PatchError> {
    if token.len() > 1 && token.starts_with('0') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    token
        .parse::<usize>()
        .map_err(|_| PatchError::InvalidPointer(path.to_string()))
        .and_then(|i| {
            if i < len {
                Ok(i)
            } else {
                Err(PatchError::PathNotFound(path.to_string()))
            }
        })
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, token) = split_pointer(path)?;
    match doc.pointer_mut(parent) {
        Some(Value::Object(map)) => {
            map.insert(token, value);
            Ok(())
        }
        Some(Value::Array(items)) => {
            if token == "-" {
                items.push(value);
            } else {
                // `len + 1` so that inserting at the end is allowed.
                let idx = array_index(&token, items.len() + 1, path)?;
                items.insert(idx, value);
            }
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    let (parent, token) = split_pointer(path)?;
    match doc.pointer_mut(parent) {
        Some(Value::Object(map)) => map
            .remove(&token)
            .ok_or_else(|| PatchError::PathNotFound(path.to_string())),
        Some(Value::Array(items)) => {
            let idx = array_index(&token, items.len(), path)?;
            Ok(items.remove(idx))
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}
