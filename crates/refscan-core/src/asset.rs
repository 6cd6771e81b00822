//! Serialized asset graph types.
//!
//! An asset resolves to one of three shapes: a scene (a collection of root
//! composite nodes), a single composite node (a prefab root), or a single
//! serialized object with no structural children. Slots that may fail to
//! resolve are modelled as `Option`, where `None` means the referenced
//! object no longer exists.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Declared kind of a serialized property.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PropertyKind {
    /// Compound property with nested fields.
    #[default]
    Generic,
    Integer,
    Boolean,
    Float,
    String,
    Color,
    Enum,
    Vector,
    /// Length of an array or list property.
    ArraySize,
    /// Reference to another object by instance id.
    ObjectReference,
    /// Inline managed reference (not an object reference).
    ManagedReference,
}

/// The object an object-reference property currently resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Instance id of the target.
    pub instance_id: i64,
    /// Name of the target object.
    #[serde(default)]
    pub name: CompactString,
}

impl ObjectRef {
    /// Create a new resolved reference.
    pub fn new(instance_id: i64, name: impl Into<CompactString>) -> Self {
        Self {
            instance_id,
            name: name.into(),
        }
    }
}

/// A single serialized property, possibly with nested properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedProperty {
    /// Field name as stored in the serialized data (e.g. `m_Material`).
    pub name: CompactString,

    /// Human-readable label. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<CompactString>,

    /// Declared property kind.
    #[serde(default)]
    pub kind: PropertyKind,

    /// Resolved target for object references; `None` when the target is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ObjectRef>,

    /// Stored reference id, kept even when the target no longer resolves.
    #[serde(default)]
    pub instance_id: i64,

    /// Hidden properties and their subtrees are not enumerated.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Nested properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedProperty>,
}

fn default_true() -> bool {
    true
}

impl SerializedProperty {
    /// Create a visible property with no value and no children.
    pub fn new(name: impl Into<CompactString>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            value: None,
            instance_id: 0,
            visible: true,
            children: Vec::new(),
        }
    }

    /// Create an object-reference property pointing at a live target.
    pub fn reference(name: impl Into<CompactString>, target: ObjectRef) -> Self {
        let mut prop = Self::new(name, PropertyKind::ObjectReference);
        prop.instance_id = target.instance_id;
        prop.value = Some(target);
        prop
    }

    /// Create an object-reference property that was never assigned.
    pub fn unassigned(name: impl Into<CompactString>) -> Self {
        Self::new(name, PropertyKind::ObjectReference)
    }

    /// Create an object-reference property whose target is gone but whose
    /// stored id survives.
    pub fn dangling(name: impl Into<CompactString>, instance_id: i64) -> Self {
        let mut prop = Self::new(name, PropertyKind::ObjectReference);
        prop.instance_id = instance_id;
        prop
    }

    /// Set an explicit display label.
    pub fn with_label(mut self, label: impl Into<CompactString>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach nested properties.
    pub fn with_children(mut self, children: Vec<SerializedProperty>) -> Self {
        self.children = children;
        self
    }

    /// Mark the property as hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Check if this property is declared as an object reference.
    pub fn is_object_reference(&self) -> bool {
        self.kind == PropertyKind::ObjectReference
    }

    /// Human-readable name: the explicit label, or a prettified field name.
    pub fn display_name(&self) -> CompactString {
        match &self.label {
            Some(label) => label.clone(),
            None => nicify_name(&self.name),
        }
    }
}

/// Turn a field name like `m_targetGraphic` into `Target Graphic`.
pub fn nicify_name(name: &str) -> CompactString {
    let trimmed = name
        .strip_prefix("m_")
        .or_else(|| name.strip_prefix('_'))
        .unwrap_or(name);

    let mut out = CompactString::default();
    let mut prev: Option<char> = None;
    for c in trimmed.chars() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            prev = Some(c);
            continue;
        }
        if matches!(prev, Some(p) if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit())) {
            out.push(' ');
        }
        if out.is_empty() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    if out.is_empty() {
        CompactString::from(name)
    } else {
        out
    }
}

/// A serializable unit with properties and no structural children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedObject {
    /// Fully qualified runtime type name (e.g. `UnityEngine.MeshRenderer`).
    pub type_name: CompactString,

    /// Top-level properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SerializedProperty>,

    /// Set when the object's serialized data cannot be opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrupt: Option<String>,
}

impl SerializedObject {
    /// Create a new object with no properties.
    pub fn new(type_name: impl Into<CompactString>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            corrupt: None,
        }
    }

    /// Attach top-level properties.
    pub fn with_properties(mut self, properties: Vec<SerializedProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Mark the object's serialized data as unreadable.
    pub fn corrupted(mut self, reason: impl Into<String>) -> Self {
        self.corrupt = Some(reason.into());
        self
    }

    /// Type name without its namespace qualifier.
    pub fn short_type_name(&self) -> &str {
        short_type_name(&self.type_name)
    }

    /// Iterate every visible property depth-first, entering nested ones.
    pub fn visible_properties(&self) -> VisibleProperties<'_> {
        VisibleProperties {
            stack: vec![self.properties.iter()],
        }
    }
}

/// Keep only what follows the last `.` of a qualified type name.
///
/// A trailing `.` yields an empty name.
pub fn short_type_name(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(idx) => &type_name[idx + 1..],
        None => type_name,
    }
}

/// Depth-first iterator over visible properties.
#[derive(Debug)]
pub struct VisibleProperties<'a> {
    stack: Vec<std::slice::Iter<'a, SerializedProperty>>,
}

impl<'a> Iterator for VisibleProperties<'a> {
    type Item = &'a SerializedProperty;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(prop) if prop.visible => {
                    if !prop.children.is_empty() {
                        self.stack.push(prop.children.iter());
                    }
                    return Some(prop);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A hierarchical node owning attached objects ("facets") and child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeNode {
    /// Node display name.
    pub name: CompactString,

    /// Attached objects, in declaration order. `None` is an attached object
    /// that no longer resolves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Option<SerializedObject>>,

    /// Child nodes in hierarchy order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Option<CompositeNode>>,
}

impl CompositeNode {
    /// Create a new node with no facets or children.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            facets: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach a resolvable object.
    pub fn with_facet(mut self, facet: SerializedObject) -> Self {
        self.facets.push(Some(facet));
        self
    }

    /// Attach an object slot that no longer resolves.
    pub fn with_missing_facet(mut self) -> Self {
        self.facets.push(None);
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: CompositeNode) -> Self {
        self.children.push(Some(child));
        self
    }

    /// Append a child slot that no longer resolves.
    pub fn with_missing_child(mut self) -> Self {
        self.children.push(None);
        self
    }

    /// Total number of resolvable nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(CompositeNode::node_count)
            .sum::<usize>()
    }
}

/// A scene: an ordered collection of root composite nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Root nodes in scene order.
    #[serde(default)]
    pub roots: Vec<Option<CompositeNode>>,
}

impl Scene {
    /// Create a scene from its root nodes.
    pub fn new(roots: Vec<CompositeNode>) -> Self {
        Self {
            roots: roots.into_iter().map(Some).collect(),
        }
    }
}

/// How an entry point should be resolved, chosen from its path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    Scene,
    Composite,
    Object,
}

/// A resolved entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Asset {
    Scene(Scene),
    Composite(CompositeNode),
    Object(SerializedObject),
}

impl Asset {
    /// Get the shape of this asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Scene(_) => AssetKind::Scene,
            Asset::Composite(_) => AssetKind::Composite,
            Asset::Object(_) => AssetKind::Object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("UnityEngine.MeshRenderer"), "MeshRenderer");
        assert_eq!(short_type_name("UnityEngine.UI.Button"), "Button");
        assert_eq!(short_type_name("Transform"), "Transform");
        assert_eq!(short_type_name("Game::Player"), "Game::Player");
        assert_eq!(short_type_name("Broken."), "");
    }

    #[test]
    fn test_nicify_name() {
        assert_eq!(nicify_name("m_Material"), "Material");
        assert_eq!(nicify_name("targetGraphic"), "Target Graphic");
        assert_eq!(nicify_name("_onClick"), "On Click");
        assert_eq!(nicify_name("hit_sound"), "Hit sound");
        assert_eq!(nicify_name("m_"), "m_");
    }

    #[test]
    fn test_display_name_prefers_label() {
        let prop = SerializedProperty::dangling("m_Mesh", 7).with_label("Mesh Asset");
        assert_eq!(prop.display_name(), "Mesh Asset");
    }

    #[test]
    fn test_visible_properties_depth_first() {
        let obj = SerializedObject::new("Test.Holder").with_properties(vec![
            SerializedProperty::new("a", PropertyKind::Generic).with_children(vec![
                SerializedProperty::new("a1", PropertyKind::Integer),
                SerializedProperty::new("a2", PropertyKind::Generic)
                    .with_children(vec![SerializedProperty::unassigned("a2x")]),
            ]),
            SerializedProperty::new("b", PropertyKind::Generic)
                .hidden()
                .with_children(vec![SerializedProperty::dangling("b1", 3)]),
            SerializedProperty::new("c", PropertyKind::Float),
        ]);

        let names: Vec<&str> = obj.visible_properties().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a1", "a2", "a2x", "c"]);
    }

    #[test]
    fn test_node_count_skips_missing() {
        let node = CompositeNode::new("Root")
            .with_child(CompositeNode::new("A").with_child(CompositeNode::new("B")))
            .with_missing_child();
        assert_eq!(node.node_count(), 3);
    }
}
