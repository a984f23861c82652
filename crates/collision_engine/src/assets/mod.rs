//! Asset documents loaded from and saved to disk

mod skeleton;

pub use skeleton::{Bone, SkeletonDocument, SkeletonError};
