//! Insight generation: follow-up questions, knowledge gaps and concept buckets
//!
//! Gaps are a fixed set of exploratory prompts and do not look at the
//! content. Questions and clusters are pure functions of the nodes and text.

use std::collections::HashSet;

use super::entity::Node;
use super::result::{Cluster, Insights};

/// Maximum labels listed per concept bucket
const MAX_CONCEPTS_PER_CLUSTER: usize = 5;

/// Maximum keyword-triggered questions per analysis
const MAX_KEYWORD_QUESTIONS: usize = 2;

/// Keyword (matched case-insensitively as a substring) → question
const KEYWORD_QUESTIONS: &[(&str, &str)] = &[
    ("conclusion", "What are the broader implications of these findings?"),
    ("method", "How was the methodology designed, and what are its limitations?"),
    ("data", "What data sources support these claims?"),
    ("limitation", "How might these limitations affect the results?"),
    ("future", "What future research directions does this suggest?"),
];

/// Always asked, whatever the content
const GENERIC_QUESTIONS: &[&str] = &[
    "What are the main takeaways from this document?",
    "What evidence supports the key claims?",
];

/// Content-independent exploration prompts
const GENERIC_GAPS: &[&str] = &[
    "Historical context and background of the topic",
    "Practical applications and real-world examples",
    "Counterarguments and alternative perspectives",
];

/// How cluster ids are grouped into named buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterScheme {
    /// Cluster ids come from entity types (0 person ... 5 thing)
    Typed,
    /// Cluster 0 is extracted entities, higher ids are frequency bands
    Frequency,
}

impl ClusterScheme {
    /// Bucket id and label for the buckets of this scheme
    fn buckets(&self) -> &'static [(u32, &'static str)] {
        match self {
            Self::Typed => &[
                (0, "People & Organizations"),
                (1, "Places & Events"),
                (2, "Concepts & Things"),
            ],
            Self::Frequency => &[(0, "Key Entities"), (1, "Main Concepts")],
        }
    }

    /// Bucket id a node cluster falls into
    fn bucket_of(&self, cluster: u32) -> u32 {
        match self {
            Self::Typed => match cluster {
                0 | 1 => 0,
                2 | 3 => 1,
                _ => 2,
            },
            Self::Frequency => cluster.min(1),
        }
    }
}

/// Builds [`Insights`] from a synthesized graph
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate questions, gaps and clusters
    pub fn generate(&self, nodes: &[Node], text: &str, scheme: ClusterScheme) -> Insights {
        Insights {
            gaps: self.gaps(),
            questions: self.questions(nodes, text),
            clusters: self.clusters(nodes, scheme),
        }
    }

    /// Follow-up questions: templates over the most salient nodes, then
    /// keyword-triggered questions, then the generic ones
    pub fn questions(&self, nodes: &[Node], text: &str) -> Vec<String> {
        let mut questions = Vec::new();

        let top = most_salient(nodes, 2);
        if let [first, second] = top.as_slice() {
            questions.push(format!(
                "How do {} and {} relate to the main topic?",
                first.label, second.label
            ));
        }
        if let Some(first) = top.first() {
            questions.push(format!("What are the key details about {}?", first.label));
        }

        let lower = text.to_lowercase();
        questions.extend(
            KEYWORD_QUESTIONS
                .iter()
                .filter(|(keyword, _)| lower.contains(*keyword))
                .take(MAX_KEYWORD_QUESTIONS)
                .map(|(_, question)| question.to_string()),
        );

        questions.extend(GENERIC_QUESTIONS.iter().map(|q| q.to_string()));

        let mut seen = HashSet::new();
        questions.retain(|q| seen.insert(q.clone()));
        questions
    }

    /// Generic knowledge-gap prompts
    pub fn gaps(&self) -> Vec<String> {
        GENERIC_GAPS.iter().map(|g| g.to_string()).collect()
    }

    /// Named concept buckets; empty buckets are omitted
    pub fn clusters(&self, nodes: &[Node], scheme: ClusterScheme) -> Vec<Cluster> {
        scheme
            .buckets()
            .iter()
            .filter_map(|(id, label)| {
                let concepts: Vec<String> = nodes
                    .iter()
                    .filter(|node| scheme.bucket_of(node.cluster) == *id)
                    .take(MAX_CONCEPTS_PER_CLUSTER)
                    .map(|node| node.label.clone())
                    .collect();

                (!concepts.is_empty()).then(|| Cluster {
                    id: *id,
                    label: label.to_string(),
                    concepts,
                })
            })
            .collect()
    }
}

/// Highest-scoring nodes, ties kept in graph order
fn most_salient(nodes: &[Node], count: usize) -> Vec<&Node> {
    let mut ranked: Vec<&Node> = nodes.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: &str, cluster: u32, score: f64) -> Node {
        Node::new(label.to_lowercase(), label)
            .with_cluster(cluster)
            .with_score(score)
    }

    #[test]
    fn test_questions_use_top_nodes() {
        let nodes = vec![
            node("Paris", 2, 0.2),
            node("Marie Curie", 0, 0.9),
            node("Radium", 5, 0.5),
        ];
        let questions = InsightGenerator::new().questions(&nodes, "");

        assert_eq!(
            questions[0],
            "How do Marie Curie and Radium relate to the main topic?"
        );
        assert_eq!(questions[1], "What are the key details about Marie Curie?");
        assert!(questions.contains(&GENERIC_QUESTIONS[0].to_string()));
    }

    #[test]
    fn test_single_node_omits_pair_template() {
        let nodes = vec![node("Radium", 5, 1.0)];
        let questions = InsightGenerator::new().questions(&nodes, "");

        assert!(!questions.iter().any(|q| q.starts_with("How do")));
        assert_eq!(questions[0], "What are the key details about Radium?");
    }

    #[test]
    fn test_no_nodes_still_has_generic_questions() {
        let questions = InsightGenerator::new().questions(&[], "");
        assert_eq!(questions.len(), GENERIC_QUESTIONS.len());
        assert!(questions.iter().all(|q| !q.contains("{}")));
    }

    #[test]
    fn test_conclusion_triggers_implications_question() {
        let questions =
            InsightGenerator::new().questions(&[], "In conclusion, the trial worked.");
        assert!(questions.iter().any(|q| q.contains("implications of these findings")));
    }

    #[test]
    fn test_keyword_questions_are_capped() {
        let text = "Conclusion: the method had a limitation with data and future work.";
        let questions = InsightGenerator::new().questions(&[], text);

        let keyword_count = questions
            .iter()
            .filter(|q| KEYWORD_QUESTIONS.iter().any(|(_, kq)| *kq == q.as_str()))
            .count();
        assert_eq!(keyword_count, MAX_KEYWORD_QUESTIONS);
        assert_eq!(questions[0], "What are the broader implications of these findings?");
        assert_eq!(
            questions[1],
            "How was the methodology designed, and what are its limitations?"
        );
    }

    #[test]
    fn test_keyword_questions_follow_table_order() {
        let questions = InsightGenerator::new()
            .questions(&[], "In conclusion, the limitation is the data.");

        assert_eq!(questions[0], "What are the broader implications of these findings?");
        assert_eq!(questions[1], "What data sources support these claims?");
        assert!(
            !questions
                .iter()
                .any(|q| q == "How might these limitations affect the results?")
        );
        assert_eq!(&questions[2..], GENERIC_QUESTIONS);
    }

    #[test]
    fn test_gaps_are_generic() {
        let generator = InsightGenerator::new();
        assert_eq!(generator.gaps().len(), 3);
        let insights = generator.generate(&[node("X-ray", 0, 1.0)], "anything", ClusterScheme::Typed);
        assert_eq!(insights.gaps, generator.gaps());
    }

    #[test]
    fn test_typed_clusters() {
        let nodes = vec![
            node("Marie Curie", 0, 1.0),
            node("Sorbonne", 1, 1.0),
            node("Paris", 2, 1.0),
            node("Radium", 5, 1.0),
            node("Treatise", 4, 1.0),
        ];
        let clusters = InsightGenerator::new().clusters(&nodes, ClusterScheme::Typed);

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].label, "People & Organizations");
        assert_eq!(clusters[0].concepts, vec!["Marie Curie", "Sorbonne"]);
        assert_eq!(clusters[1].label, "Places & Events");
        assert_eq!(clusters[1].concepts, vec!["Paris"]);
        assert_eq!(clusters[2].label, "Concepts & Things");
        assert_eq!(clusters[2].concepts, vec!["Radium", "Treatise"]);
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let nodes = vec![node("Paris", 2, 1.0)];
        let clusters = InsightGenerator::new().clusters(&nodes, ClusterScheme::Typed);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, 1);

        assert!(InsightGenerator::new().clusters(&[], ClusterScheme::Frequency).is_empty());
    }

    #[test]
    fn test_frequency_clusters_are_capped() {
        let mut nodes: Vec<Node> = (0..7).map(|i| node(&format!("Entity{}", i), 0, 1.0)).collect();
        nodes.push(node("gravity", 1, 1.0));
        nodes.push(node("orbits", 2, 0.5));

        let clusters = InsightGenerator::new().clusters(&nodes, ClusterScheme::Frequency);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].label, "Key Entities");
        assert_eq!(clusters[0].concepts.len(), MAX_CONCEPTS_PER_CLUSTER);
        assert_eq!(clusters[1].label, "Main Concepts");
        assert_eq!(clusters[1].concepts, vec!["gravity", "orbits"]);
    }
}
