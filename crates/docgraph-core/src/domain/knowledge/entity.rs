//! Graph nodes for the knowledge extraction engine
//!
//! A [`Node`] is the visual and semantic representation of one entity in an
//! analysis result. Nodes are plain values: they are built once per analysis
//! and never shared or mutated afterwards.

use serde::{Deserialize, Serialize};

/// Smallest size a node can be rendered at
pub const MIN_NODE_SIZE: f64 = 5.0;

/// Largest size a node can be rendered at
pub const MAX_NODE_SIZE: f64 = 25.0;

/// Colour used when a type tag matches nothing in the lookup table
pub const NEUTRAL_GRAY: &str = "#95A5A6";

/// Type tag → colour, matched by substring in declaration order
const TYPE_COLORS: &[(&str, &str)] = &[
    ("Person", "#FF6B6B"),
    ("Organization", "#4ECDC4"),
    ("Place", "#45B7D1"),
    ("Event", "#96CEB4"),
    ("CreativeWork", "#FFEAA7"),
    ("Thing", "#DDA0DD"),
];

/// Fixed colours for the first cluster ids of a locally derived graph
const CLUSTER_PALETTE: &[&str] = &["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7"];

/// A node in the analysis graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within one analysis result
    pub id: String,
    /// Human-readable label, as found in the text or returned by the lookup
    pub label: String,
    /// Visual weight, always within [`MIN_NODE_SIZE`, `MAX_NODE_SIZE`]
    pub size: f64,
    /// CSS colour string
    pub color: String,
    /// Small grouping id used for colouring and concept buckets
    pub cluster: u32,
    /// Declared type tag ("Person", "Entity", "Concept", ...)
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw salience used for ranking
    pub score: f64,
}

impl Node {
    /// Create a node with neutral defaults
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size: MIN_NODE_SIZE,
            color: NEUTRAL_GRAY.to_string(),
            cluster: 0,
            node_type: EntityKind::Thing.as_str().to_string(),
            description: None,
            score: 0.0,
        }
    }

    /// Set the size (clamped to the renderable range)
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = if size.is_finite() {
            size.clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
        } else {
            MIN_NODE_SIZE
        };
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_cluster(mut self, cluster: u32) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

/// Broad entity categories reported by the lookup service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Organization,
    Place,
    Event,
    CreativeWork,
    /// Anything else, including the generic "Thing"
    Thing,
}

impl EntityKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Organization => "Organization",
            Self::Place => "Place",
            Self::Event => "Event",
            Self::CreativeWork => "CreativeWork",
            Self::Thing => "Thing",
        }
    }

    /// Classify a type tag by substring, so "SportsOrganization" is an
    /// organization and "TouristAttraction" is a thing
    pub fn classify(type_tag: &str) -> Self {
        [
            Self::Person,
            Self::Organization,
            Self::Place,
            Self::Event,
            Self::CreativeWork,
        ]
        .into_iter()
        .find(|kind| type_tag.contains(kind.as_str()))
        .unwrap_or(Self::Thing)
    }

    /// Cluster ordinal for the kind
    pub fn cluster(&self) -> u32 {
        match self {
            Self::Person => 0,
            Self::Organization => 1,
            Self::Place => 2,
            Self::Event => 3,
            Self::CreativeWork => 4,
            Self::Thing => 5,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colour for a declared type tag, falling back to [`NEUTRAL_GRAY`]
pub fn type_color(type_tag: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(key, _)| type_tag.contains(key))
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_GRAY)
}

/// Colour for a cluster id; ids past the palette get a generated hue
pub fn cluster_color(cluster: u32) -> String {
    match CLUSTER_PALETTE.get(cluster as usize) {
        Some(color) => color.to_string(),
        None => {
            // golden angle keeps neighbouring ids visually apart
            let hue = (cluster as u64 * 137) % 360;
            format!("hsl({}, 65%, 55%)", hue)
        }
    }
}

/// Normalize a label into a node id: lowercase alphanumeric runs joined by '-'
pub fn slugify(label: &str) -> String {
    let slug = label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "node".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = Node::new("apple", "Apple")
            .with_size(12.0)
            .with_color("#FF0000")
            .with_cluster(2)
            .with_type("Organization")
            .with_description("Technology company")
            .with_score(0.75);

        assert_eq!(node.id, "apple");
        assert_eq!(node.label, "Apple");
        assert_eq!(node.size, 12.0);
        assert_eq!(node.cluster, 2);
        assert_eq!(node.node_type, "Organization");
        assert_eq!(node.description.as_deref(), Some("Technology company"));
        assert_eq!(node.score, 0.75);
    }

    #[test]
    fn test_size_clamping() {
        assert_eq!(Node::new("a", "A").with_size(0.0).size, MIN_NODE_SIZE);
        assert_eq!(Node::new("a", "A").with_size(-3.0).size, MIN_NODE_SIZE);
        assert_eq!(Node::new("a", "A").with_size(400.0).size, MAX_NODE_SIZE);
        assert_eq!(Node::new("a", "A").with_size(f64::NAN).size, MIN_NODE_SIZE);
    }

    #[test]
    fn test_node_serializes_type_field() {
        let node = Node::new("apple", "Apple").with_type("Entity");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Entity");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_entity_kind_classification() {
        assert_eq!(EntityKind::classify("Person"), EntityKind::Person);
        assert_eq!(EntityKind::classify("SportsOrganization"), EntityKind::Organization);
        assert_eq!(EntityKind::classify("AdministrativeArea"), EntityKind::Thing);
        assert_eq!(EntityKind::classify("Place"), EntityKind::Place);
        assert_eq!(EntityKind::classify("MusicEvent"), EntityKind::Event);
        assert_eq!(EntityKind::classify("CreativeWork"), EntityKind::CreativeWork);
        assert_eq!(EntityKind::classify("Thing"), EntityKind::Thing);
    }

    #[test]
    fn test_entity_kind_clusters() {
        assert_eq!(EntityKind::Person.cluster(), 0);
        assert_eq!(EntityKind::Organization.cluster(), 1);
        assert_eq!(EntityKind::Place.cluster(), 2);
        assert_eq!(EntityKind::Event.cluster(), 3);
        assert_eq!(EntityKind::CreativeWork.cluster(), 4);
        assert_eq!(EntityKind::Thing.cluster(), 5);
    }

    #[test]
    fn test_type_color_lookup() {
        assert_eq!(type_color("Person"), "#FF6B6B");
        assert_eq!(type_color("EducationalOrganization"), "#4ECDC4");
        assert_eq!(type_color("Thing"), "#DDA0DD");
        assert_eq!(type_color("Vehicle"), NEUTRAL_GRAY);
    }

    #[test]
    fn test_cluster_color() {
        assert_eq!(cluster_color(0), "#FF6B6B");
        assert_eq!(cluster_color(4), "#FFEAA7");
        assert_eq!(cluster_color(5), "hsl(325, 65%, 55%)");
        assert_eq!(cluster_color(5), cluster_color(5));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Apple Inc"), "apple-inc");
        assert_eq!(slugify("  New   York  "), "new-york");
        assert_eq!(slugify("NASA"), "nasa");
        assert_eq!(slugify("research_data"), "research-data");
        assert_eq!(slugify("!!!"), "node");
    }
}
