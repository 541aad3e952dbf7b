//! Configuration for the core crate
//!
//! This module provides configuration options for tree building, matching,
//! aggregation, property merging and learning.

use serde::{Serialize, Deserialize};

use crate::error::{to_config_error, CoreError, Result};

/// Size thresholds and split criterion for property tree building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Smallest branch size, relative to its parent's size
    pub min_relative_size: f64,

    /// Largest branch size, relative to its parent's size
    pub max_relative_size: f64,

    /// Smallest absolute partition size for a column or a branch
    pub min_absolute_size: usize,

    /// Minimum correlation ratio a split must reach to be selected
    pub min_separation: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            min_relative_size: 0.05,
            max_relative_size: 0.95,
            min_absolute_size: 2,
            min_separation: 0.1,
        }
    }
}

impl TreeConfig {
    /// Whether a branch of `size` values is acceptable under a parent of `parent_size`
    pub fn accepts(&self, size: usize, parent_size: usize) -> bool {
        let size_f = size as f64;
        let parent_f = parent_size as f64;

        size >= self.min_absolute_size
            && size_f >= self.min_relative_size * parent_f
            && size_f <= self.max_relative_size * parent_f
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_relative_size)
            || !(0.0..=1.0).contains(&self.max_relative_size)
        {
            return Err(CoreError::ConfigError(
                "relative sizes must lie within [0, 1]".to_string(),
            ));
        }
        if self.min_relative_size > self.max_relative_size {
            return Err(CoreError::ConfigError(format!(
                "min_relative_size {} exceeds max_relative_size {}",
                self.min_relative_size, self.max_relative_size
            )));
        }
        if self.min_absolute_size == 0 {
            return Err(CoreError::ConfigError(
                "min_absolute_size must be at least 1".to_string(),
            ));
        }
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(CoreError::ConfigError(
                "min_separation must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Weights and capacity of the top-k node matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Weight of the numeric distance
    pub values_weight: f64,

    /// Weight of the context property dissimilarity
    pub properties_weight: f64,

    /// Weight of the context class dissimilarity
    pub classes_weight: f64,

    /// Number of nearest nodes kept per query node
    pub k: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            values_weight: 0.5,
            properties_weight: 0.25,
            classes_weight: 0.25,
            k: 50,
        }
    }
}

/// Ranking function used to order grouped matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    /// Ascending mean distance
    AverageDistance,

    /// Descending group size
    MajorityVote,
}

impl Default for AggregationKind {
    fn default() -> Self {
        AggregationKind::AverageDistance
    }
}

/// Annotation output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Number of ranked entries kept per grouping
    pub k: usize,

    /// Ranking function
    pub aggregation: AggregationKind,

    /// Whether collected (linked) properties and classes count as context
    pub include_collected: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        AnnotationConfig {
            k: 3,
            aggregation: AggregationKind::default(),
            include_collected: true,
        }
    }
}

/// Strategy used to group learned trees into properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergingKind {
    /// Merge by declared URI, falling back to label similarity
    DeclaredUri,

    /// Every tree becomes its own property
    Isolated,
}

impl Default for MergingKind {
    fn default() -> Self {
        MergingKind::DeclaredUri
    }
}

/// Property merging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergingConfig {
    /// Merging strategy
    pub strategy: MergingKind,

    /// Minimum normalized label similarity for URI-less merges
    pub label_similarity_threshold: f64,
}

impl Default for MergingConfig {
    fn default() -> Self {
        MergingConfig {
            strategy: MergingKind::default(),
            label_similarity_threshold: 0.9,
        }
    }
}

/// Learning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Only learn columns that carry a declared property
    pub only_with_properties: bool,
}

impl Default for LearningConfig {
    fn default() -> Self {
        LearningConfig {
            only_with_properties: true,
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Property tree configuration
    pub tree: TreeConfig,

    /// Matcher configuration
    pub matcher: MatcherConfig,

    /// Annotation configuration
    pub annotation: AnnotationConfig,

    /// Merging configuration
    pub merging: MergingConfig,

    /// Learning configuration
    pub learning: LearningConfig,

    /// Log level
    pub log_level: String,

    /// Whether to enable debug mode
    pub debug_mode: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            tree: TreeConfig::default(),
            matcher: MatcherConfig::default(),
            annotation: AnnotationConfig::default(),
            merging: MergingConfig::default(),
            learning: LearningConfig::default(),
            log_level: "info".to_string(),
            debug_mode: false,
        }
    }
}

impl CoreConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: CoreConfig = serde_json::from_reader(file).map_err(to_config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Check every section for values the core cannot work with
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()?;

        let weights = [
            self.matcher.values_weight,
            self.matcher.properties_weight,
            self.matcher.classes_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::ConfigError(
                "matcher weights must be non-negative numbers".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(CoreError::ConfigError(
                "matcher weights must not all be zero".to_string(),
            ));
        }
        if self.matcher.k == 0 {
            return Err(CoreError::ConfigError("matcher k must be at least 1".to_string()));
        }
        if self.annotation.k == 0 {
            return Err(CoreError::ConfigError("annotation k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.merging.label_similarity_threshold) {
            return Err(CoreError::ConfigError(
                "label_similarity_threshold must lie within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.debug_mode = true;
        config.log_level = "debug".to_string();
        config
    }

    /// Create a production configuration
    pub fn production() -> Self {
        let mut config = Self::default();
        config.debug_mode = false;
        config.log_level = "info".to_string();
        config.learning.only_with_properties = true;
        config
    }

    /// Create a testing configuration
    ///
    /// Small tables are the norm in tests, so every split with at least two
    /// values per branch is allowed.
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.debug_mode = true;
        config.log_level = "debug".to_string();
        config.tree.min_relative_size = 0.0;
        config.matcher.k = 10;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();

        assert_eq!(config.tree.min_absolute_size, 2);
        assert_eq!(config.matcher.k, 50);
        assert_eq!(config.matcher.values_weight, 0.5);
        assert_eq!(config.matcher.properties_weight, 0.25);
        assert_eq!(config.matcher.classes_weight, 0.25);
        assert_eq!(config.annotation.k, 3);
        assert_eq!(config.annotation.aggregation, AggregationKind::AverageDistance);
        assert_eq!(config.merging.strategy, MergingKind::DeclaredUri);
        assert!(config.learning.only_with_properties);
        assert_eq!(config.log_level, "info");
        assert!(!config.debug_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let config = CoreConfig::development();
        assert!(config.debug_mode);
        assert_eq!(config.log_level, "debug");

        let config = CoreConfig::production();
        assert!(!config.debug_mode);
        assert!(config.learning.only_with_properties);

        let config = CoreConfig::testing();
        assert_eq!(config.tree.min_relative_size, 0.0);
        assert_eq!(config.matcher.k, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tree_bounds() {
        let tree = TreeConfig::default();

        assert!(tree.accepts(5, 10));
        assert!(!tree.accepts(1, 10)); // below the absolute minimum
        assert!(!tree.accepts(10, 10)); // same as the parent
        assert!(!tree.accepts(2, 100)); // below 5% of the parent
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CoreConfig::default();
        config.matcher.values_weight = -1.0;
        assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));

        let mut config = CoreConfig::default();
        config.matcher.values_weight = 0.0;
        config.matcher.properties_weight = 0.0;
        config.matcher.classes_weight = 0.0;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.matcher.k = 0;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.tree.min_relative_size = 0.9;
        config.tree.max_relative_size = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = CoreConfig::default();
        config.annotation.aggregation = AggregationKind::MajorityVote;

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"majority_vote\""));

        let deserialized: CoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.tree, config.tree);
        assert_eq!(deserialized.matcher, config.matcher);
        assert_eq!(deserialized.annotation, config.annotation);
        assert_eq!(deserialized.merging, config.merging);
        assert_eq!(deserialized.log_level, config.log_level);
    }

    #[test]
    fn test_config_file_io() {
        let config = CoreConfig::testing();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.to_file(path).unwrap();
        let loaded = CoreConfig::from_file(path).unwrap();

        assert_eq!(loaded.tree, config.tree);
        assert_eq!(loaded.matcher.k, 10);
        assert!(loaded.debug_mode);
    }
}
