//! Skeleton documents
//!
//! A skeleton is a tree of named bones used to pose capsule collision
//! shapes for animated characters. Documents are stored as JSON; the
//! in-memory form mirrors the file schema directly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving skeleton documents
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// The file could not be read or written
    #[error("skeleton file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not a valid skeleton document
    #[error("skeleton document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single bone in a skeleton hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Name of the bone, unique within its skeleton
    pub name: String,
    /// Orientation of the bone in bind pose, relative to its parent
    pub bind_pose_orientation: [[f32; 3]; 3],
    /// Length of the bone in bind pose
    pub bind_pose_length: f32,
    /// Whether vertices may be weighted to this bone
    pub weightable: bool,
    /// Bones attached to the far end of this bone
    #[serde(default)]
    pub child_bone_array: Vec<Bone>,
}

impl Bone {
    /// Create a weightable bone with identity orientation and no children
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            bind_pose_orientation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            bind_pose_length: length,
            weightable: true,
            child_bone_array: Vec::new(),
        }
    }

    /// Count this bone and all of its descendants
    pub fn bone_count(&self) -> usize {
        1 + self
            .child_bone_array
            .iter()
            .map(Bone::bone_count)
            .sum::<usize>()
    }

    /// Find a descendant (or this bone) by name
    pub fn find(&self, name: &str) -> Option<&Bone> {
        if self.name == name {
            return Some(self);
        }
        self.child_bone_array.iter().find_map(|bone| bone.find(name))
    }
}

/// A complete skeleton document as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDocument {
    /// The bone hierarchy, starting at the root
    pub root_bone: Bone,
}

impl SkeletonDocument {
    /// Load a skeleton document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkeletonError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save this skeleton document to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SkeletonError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Count every bone in the hierarchy
    pub fn bone_count(&self) -> usize {
        self.root_bone.bone_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biped() -> SkeletonDocument {
        let mut spine = Bone::new("spine", 0.6);
        spine.child_bone_array.push(Bone::new("arm_l", 0.7));
        spine.child_bone_array.push(Bone::new("arm_r", 0.7));

        let mut root = Bone::new("pelvis", 0.2);
        root.weightable = false;
        root.child_bone_array.push(spine);
        SkeletonDocument { root_bone: root }
    }

    #[test]
    fn test_bone_count_and_find() {
        let doc = biped();
        assert_eq!(doc.bone_count(), 4);
        assert!(doc.root_bone.find("arm_l").is_some());
        assert!(doc.root_bone.find("tail").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let doc = biped();
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: SkeletonDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_missing_children_default_to_empty() {
        let json = r#"{
            "root_bone": {
                "name": "pelvis",
                "bind_pose_orientation": [[1,0,0],[0,1,0],[0,0,1]],
                "bind_pose_length": 0.2,
                "weightable": false
            }
        }"#;
        let parsed: SkeletonDocument = serde_json::from_str(json).unwrap();
        assert!(parsed.root_bone.child_bone_array.is_empty());
    }
}
