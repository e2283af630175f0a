//! Component hierarchy and forward kinematics.
//!
//! Components form a forest: each one is either a root, pinned at a frame
//! position, or a child pinned at a joint on its parent. Solving a frame
//! walks the forest parents-first and chains the placements, so rotating an
//! arm carries the pickaxe held in its hand along with it.

use crate::geometry::{Placement, Vec2};
use crate::models::{ComponentDef, Pose};
use std::collections::HashMap;
use thiserror::Error;

/// Error resolving the component hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkeletonError {
    #[error("duplicate component name '{0}'")]
    DuplicateName(String),
    #[error("component '{component}' has unknown parent '{parent}'")]
    UnknownParent { component: String, parent: String },
    #[error("component hierarchy has a cycle: {}", path.join(" -> "))]
    Cycle {
        /// Component names forming the cycle, e.g. `["a", "b", "a"]`
        path: Vec<String>,
    },
}

#[derive(Debug, Clone)]
struct Joint {
    name: String,
    parent: Option<usize>,
    anchor: Vec2,
    pivot: Vec2,
}

/// Resolved component tree.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    /// Component indices, parents before children
    order: Vec<usize>,
}

impl Skeleton {
    /// Resolve parents and a parents-first evaluation order.
    ///
    /// # Examples
    ///
    /// ```
    /// use digrig::models::ComponentDef;
    /// use digrig::skeleton::Skeleton;
    ///
    /// let defs: Vec<ComponentDef> = serde_json::from_str(r#"[
    ///     {"name": "pickaxe", "size": [3, 8], "parent": "arm"},
    ///     {"name": "arm", "size": [2, 6], "parent": "body"},
    ///     {"name": "body", "size": [6, 10]}
    /// ]"#).unwrap();
    /// let skeleton = Skeleton::new(&defs).unwrap();
    ///
    /// let order: Vec<&str> = skeleton.order().iter().map(|&i| skeleton.name(i)).collect();
    /// assert_eq!(order, ["body", "arm", "pickaxe"]);
    /// ```
    pub fn new(components: &[ComponentDef]) -> Result<Self, SkeletonError> {
        let mut index = HashMap::with_capacity(components.len());
        for (i, c) in components.iter().enumerate() {
            if index.insert(c.name.as_str(), i).is_some() {
                return Err(SkeletonError::DuplicateName(c.name.clone()));
            }
        }

        let mut joints = Vec::with_capacity(components.len());
        for c in components {
            let parent = match &c.parent {
                Some(p) => Some(*index.get(p.as_str()).ok_or_else(|| {
                    SkeletonError::UnknownParent { component: c.name.clone(), parent: p.clone() }
                })?),
                None => None,
            };
            joints.push(Joint {
                name: c.name.clone(),
                parent,
                anchor: c.anchor_point(),
                pivot: c.pivot_point(),
            });
        }

        let order = evaluation_order(&joints)?;
        Ok(Self { joints, order })
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.joints[index].name
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.joints[index].parent
    }

    /// Number of ancestors of a component (0 for roots).
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.joints[index].parent;
        while let Some(p) = current {
            depth += 1;
            current = self.joints[p].parent;
        }
        depth
    }

    /// Component indices with every parent before its children.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Solve one frame. `poses[i]` poses component `i`.
    ///
    /// Returns one placement per component, indexed like the components.
    pub fn solve(&self, poses: &[Pose]) -> Vec<Placement> {
        let rest = Pose::default();
        let mut placements: Vec<Option<Placement>> = vec![None; self.joints.len()];

        for &i in &self.order {
            let joint = &self.joints[i];
            let pose = poses.get(i).unwrap_or(&rest);
            let offset = Vec2::from(pose.offset);
            let placement = match joint.parent.and_then(|p| placements[p]) {
                Some(parent) => parent.child(joint.anchor, joint.pivot, pose.angle, offset),
                None => Placement::root(joint.anchor, joint.pivot, pose.angle, offset),
            };
            placements[i] = Some(placement);
        }

        // Every index appears in `order`, so every slot is filled
        placements
            .into_iter()
            .zip(&self.joints)
            .map(|(p, j)| p.unwrap_or_else(|| Placement::root(j.anchor, j.pivot, 0.0, Vec2::ZERO)))
            .collect()
    }
}

/// Parents-first order over the forest, or the first cycle found.
fn evaluation_order(joints: &[Joint]) -> Result<Vec<usize>, SkeletonError> {
    let mut done = vec![false; joints.len()];
    let mut order = Vec::with_capacity(joints.len());

    for start in 0..joints.len() {
        let mut chain: Vec<usize> = Vec::new();
        let mut current = Some(start);

        while let Some(i) = current {
            if done[i] {
                break;
            }
            if let Some(pos) = chain.iter().position(|&c| c == i) {
                let mut path: Vec<String> =
                    chain[pos..].iter().map(|&c| joints[c].name.clone()).collect();
                path.push(joints[i].name.clone());
                return Err(SkeletonError::Cycle { path });
            }
            chain.push(i);
            current = joints[i].parent;
        }

        for &i in chain.iter().rev() {
            done[i] = true;
            order.push(i);
        }
    }

    Ok(order)
}
